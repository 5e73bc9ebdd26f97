//! Port store: fixed-width named pin groups owned by a block.

use crate::error::{NetlistError, NetlistResult};
use crate::ids::{BitIndex, BlockId, EntityId, NetId, PinId, PortId};
use crate::netlist::AtomNetlist;
use atom_arch::PortClass;

impl<'m> AtomNetlist<'m> {
    /// Creates a port on `block`, or returns the block's existing port of that name.
    ///
    /// The width and class (input, output, clock) come from the matching port
    /// of the block's model and never change afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`NetlistError::InvalidBlock`] if `block` is not live, and
    /// [`NetlistError::UnknownModelPort`] if the model declares no such port.
    pub fn create_port(&mut self, block: BlockId, name: &str) -> NetlistResult<PortId> {
        if !self.valid_block(block) {
            return Err(NetlistError::InvalidBlock(block));
        }
        if let Some(existing) = self.find_port_unchecked(block, name) {
            return Ok(existing);
        }

        let model = self.block_models[block.index()];
        let model_port = model
            .find_port(name)
            .ok_or_else(|| NetlistError::UnknownModelPort {
                model: model.name.clone(),
                port: name.to_string(),
            })?;

        let name_id = self.strings.get_or_intern(name);
        let id = PortId::from_raw(self.port_ids.len() as u32);
        let class = model_port.class();
        self.port_ids.push(Some(id));
        self.port_names.push(name_id);
        self.port_blocks.push(block);
        self.port_widths.push(model_port.width);
        self.port_classes.push(class);
        self.port_pins.push(vec![None; model_port.width as usize]);

        let b = block.index();
        match class {
            PortClass::Input => self.block_input_ports[b].push(id),
            PortClass::Output => self.block_output_ports[b].push(id),
            PortClass::Clock => self.block_clock_ports[b].push(id),
        }

        self.lookups.port_by_block_name.insert((block, name_id), id);
        Ok(id)
    }

    /// Marks a port removed, removing every pin on it first.
    ///
    /// The owning block keeps the port in its lists until compaction drops it.
    pub(crate) fn remove_port(&mut self, id: PortId) {
        let i = id.index();
        let pins: Vec<PinId> = self.port_pins[i].iter().flatten().copied().collect();
        for pin in pins {
            self.invalidate_pin(pin);
        }

        self.lookups
            .port_by_block_name
            .remove(&(self.port_blocks[i], self.port_names[i]));
        self.port_ids[i] = None;
        self.dirty = true;
        tracing::trace!(port = %id, "removed port");
    }

    /// Returns the name of a port.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live port (as do all `port_*` accessors).
    pub fn port_name(&self, id: PortId) -> &str {
        let i = self.port_index(id);
        self.strings.resolve(self.port_names[i])
    }

    /// Returns the number of bits in a port.
    pub fn port_width(&self, id: PortId) -> BitIndex {
        self.port_widths[self.port_index(id)]
    }

    /// Returns the block that owns a port.
    pub fn port_block(&self, id: PortId) -> BlockId {
        self.port_blocks[self.port_index(id)]
    }

    /// Returns whether a port is an input, output, or clock port.
    pub fn port_class(&self, id: PortId) -> PortClass {
        self.port_classes[self.port_index(id)]
    }

    /// Iterates over the port's existing pins in bit order.
    pub fn port_pins(&self, id: PortId) -> impl Iterator<Item = PinId> + '_ {
        self.port_pins[self.port_index(id)].iter().flatten().copied()
    }

    /// Returns the pin at `bit`, or `None` if no pin was created for that bit.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not below the port width.
    pub fn port_pin(&self, id: PortId, bit: BitIndex) -> Option<PinId> {
        let i = self.port_index(id);
        let width = self.port_widths[i];
        assert!(bit < width, "bit {bit} out of range for {id} of width {width}");
        self.port_pins[i][bit as usize]
    }

    /// Returns the net at `bit`, or `None` if there is no pin or it is unconnected.
    pub fn port_net(&self, id: PortId, bit: BitIndex) -> Option<NetId> {
        self.port_pin(id, bit)
            .and_then(|pin| self.pin_nets[pin.index()])
    }
}

#[cfg(test)]
mod tests {
    use crate::netlist::{AtomNetlist, PinRole};
    use crate::test_models::{dff, lut2};
    use crate::NetlistError;
    use atom_arch::PortClass;

    #[test]
    fn create_port_is_idempotent() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("b", &lut);
        let p1 = nl.create_port(b, "in").unwrap();
        let p2 = nl.create_port(b, "in").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(nl.port_count(), 1);
        assert_eq!(nl.block_input_ports(b), &[p1]);
    }

    #[test]
    fn same_port_name_on_different_blocks() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let a = nl.create_block("a", &lut);
        let b = nl.create_block("b", &lut);
        let pa = nl.create_port(a, "out").unwrap();
        let pb = nl.create_port(b, "out").unwrap();
        assert_ne!(pa, pb);
        assert_eq!(nl.find_port(a, "out"), Some(pa));
        assert_eq!(nl.find_port(b, "out"), Some(pb));
        assert_eq!(nl.find_port(b, "in"), None);
    }

    #[test]
    fn port_attributes_come_from_model() {
        let ff = dff();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("ff", &ff);
        let clk = nl.create_port(b, "clk").unwrap();
        assert_eq!(nl.port_name(clk), "clk");
        assert_eq!(nl.port_width(clk), 1);
        assert_eq!(nl.port_block(clk), b);
        assert_eq!(nl.port_class(clk), PortClass::Clock);
        assert_eq!(nl.port_pins(clk).count(), 0);
    }

    #[test]
    fn unknown_model_port_is_rejected() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("b", &lut);
        let err = nl.create_port(b, "clk").unwrap_err();
        assert_eq!(
            err,
            NetlistError::UnknownModelPort {
                model: "lut2".to_string(),
                port: "clk".to_string(),
            }
        );
        assert_eq!(nl.port_count(), 0);
        assert_eq!(nl.find_string("clk"), None);
    }

    #[test]
    fn create_port_on_removed_block() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("b", &lut);
        nl.remove_block(b).unwrap();
        assert_eq!(nl.create_port(b, "in"), Err(NetlistError::InvalidBlock(b)));
    }

    #[test]
    fn port_pin_and_net_by_bit() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("b", &lut);
        let inp = nl.create_port(b, "in").unwrap();
        let net = nl.create_net("n");
        assert_eq!(nl.port_pin(inp, 0), None);
        assert_eq!(nl.port_net(inp, 0), None);

        let p0 = nl.create_pin(inp, 0, Some(net), PinRole::Sink).unwrap();
        let p1 = nl.create_pin(inp, 1, None, PinRole::Sink).unwrap();
        assert_eq!(nl.port_pin(inp, 0), Some(p0));
        assert_eq!(nl.port_net(inp, 0), Some(net));
        assert_eq!(nl.port_pin(inp, 1), Some(p1));
        assert_eq!(nl.port_net(inp, 1), None);
        assert_eq!(nl.port_pins(inp).collect::<Vec<_>>(), vec![p0, p1]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn port_pin_out_of_range_panics() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("b", &lut);
        let out = nl.create_port(b, "out").unwrap();
        nl.port_pin(out, 1);
    }
}
