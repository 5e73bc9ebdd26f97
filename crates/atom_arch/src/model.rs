//! Primitive model descriptors and the library that owns them.

use serde::{Deserialize, Serialize};

/// The direction of a port on a primitive model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Data flows into the primitive.
    Input,
    /// Data flows out of the primitive.
    Output,
}

/// How a netlist block files a port created from a model port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortClass {
    /// A data input.
    Input,
    /// An output. Outputs flagged as clocks (e.g. from a PLL) are still outputs.
    Output,
    /// A clock input.
    Clock,
}

/// One named port of a primitive model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPort {
    /// The port name, unique within its model.
    pub name: String,
    /// The direction of data flow.
    pub direction: PortDirection,
    /// Number of bits (pins) in the port.
    pub width: u32,
    /// Whether the port carries a clock.
    #[serde(default)]
    pub clock: bool,
}

impl ModelPort {
    /// Creates a data input port.
    pub fn input(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            width,
            clock: false,
        }
    }

    /// Creates an output port.
    pub fn output(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
            width,
            clock: false,
        }
    }

    /// Creates a single-bit clock input port.
    pub fn clock(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            width: 1,
            clock: true,
        }
    }

    /// Returns the category under which a block lists ports of this kind.
    pub fn class(&self) -> PortClass {
        match (self.direction, self.clock) {
            (PortDirection::Input, true) => PortClass::Clock,
            (PortDirection::Input, false) => PortClass::Input,
            (PortDirection::Output, _) => PortClass::Output,
        }
    }
}

/// A primitive type: a name and the ports every instance may expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// The model name (e.g. "lut4", "dff", ".input").
    pub name: String,
    /// The ports declared by this model.
    #[serde(default)]
    pub ports: Vec<ModelPort>,
}

impl Model {
    /// Creates a model with no ports.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ports: Vec::new(),
        }
    }

    /// Adds a port, returning the model for chaining.
    pub fn with_port(mut self, port: ModelPort) -> Self {
        self.ports.push(port);
        self
    }

    /// Returns the port named `name`, if the model declares one.
    pub fn find_port(&self, name: &str) -> Option<&ModelPort> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Returns `true` if any input port of the model is a clock.
    pub fn has_clock_input(&self) -> bool {
        self.ports.iter().any(|p| p.class() == PortClass::Clock)
    }
}

/// The set of primitive models available to a netlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelLibrary {
    /// All models, in declaration order.
    #[serde(default, rename = "model")]
    pub models: Vec<Model>,
}

impl ModelLibrary {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the model named `name`.
    pub fn get(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Returns the number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the library holds no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Iterates over the models in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dff() -> Model {
        Model::new("dff")
            .with_port(ModelPort::input("D", 1))
            .with_port(ModelPort::output("Q", 1))
            .with_port(ModelPort::clock("clk"))
    }

    #[test]
    fn port_classes() {
        assert_eq!(ModelPort::input("a", 4).class(), PortClass::Input);
        assert_eq!(ModelPort::output("y", 1).class(), PortClass::Output);
        assert_eq!(ModelPort::clock("clk").class(), PortClass::Clock);
    }

    #[test]
    fn clock_output_is_output() {
        let mut pll_out = ModelPort::output("clk_out", 1);
        pll_out.clock = true;
        assert_eq!(pll_out.class(), PortClass::Output);
    }

    #[test]
    fn find_port_by_name() {
        let m = dff();
        assert_eq!(m.find_port("Q").unwrap().direction, PortDirection::Output);
        assert!(m.find_port("R").is_none());
    }

    #[test]
    fn clock_detection() {
        assert!(dff().has_clock_input());
        let lut = Model::new("lut2")
            .with_port(ModelPort::input("in", 2))
            .with_port(ModelPort::output("out", 1));
        assert!(!lut.has_clock_input());
    }

    #[test]
    fn library_lookup() {
        let lib = ModelLibrary {
            models: vec![dff(), Model::new(".input")],
        };
        assert_eq!(lib.len(), 2);
        assert!(lib.get("dff").is_some());
        assert!(lib.get("lut6").is_none());
    }

    #[test]
    fn model_serde_roundtrip() {
        let m = dff();
        let json = serde_json::to_string(&m).unwrap();
        let restored: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, m);
    }
}
