//! Architecture model descriptors consumed by the atom netlist.
//!
//! A [`Model`] describes one primitive type: its name and the named ports it
//! exposes, each with a direction, a bit width, and a clock flag. Models are
//! owned by the caller (usually a [`ModelLibrary`] loaded from TOML) and only
//! borrowed by the netlist blocks that instantiate them.
//!
//! # Usage
//!
//! ```
//! use atom_arch::{load_models_from_str, PortClass};
//!
//! let library = load_models_from_str(r#"
//! [[model]]
//! name = "dff"
//! ports = [
//!   { name = "D", direction = "input", width = 1 },
//!   { name = "Q", direction = "output", width = 1 },
//!   { name = "clk", direction = "input", width = 1, clock = true },
//! ]
//! "#).unwrap();
//!
//! let dff = library.get("dff").unwrap();
//! assert_eq!(dff.find_port("clk").unwrap().class(), PortClass::Clock);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod model;

pub use error::ArchError;
pub use loader::{load_models, load_models_from_str};
pub use model::{Model, ModelLibrary, ModelPort, PortClass, PortDirection};
