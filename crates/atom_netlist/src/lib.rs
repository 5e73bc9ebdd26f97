//! In-memory store for technology-mapped primitive ("atom") netlists.
//!
//! An [`AtomNetlist`] holds four kinds of entity:
//!
//! - **blocks**: named primitive instances bound to an architecture [`Model`],
//! - **ports**: named fixed-width pin groups on a block (input, output, or clock),
//! - **pins**: single bits of a port, optionally connected to a net,
//! - **nets**: named hyperedges with one driver slot and any number of sinks.
//!
//! Entities are addressed through the opaque handles [`BlockId`], [`PortId`],
//! [`PinId`] and [`NetId`]. Creation is idempotent on each entity's key, so
//! a reader can call `create_*` freely while walking a netlist file. Removal
//! only marks entities invalid; [`AtomNetlist::compress`] reclaims their
//! storage in one pass and renumbers every handle.
//!
//! # Usage
//!
//! ```
//! use atom_arch::{Model, ModelPort};
//! use atom_netlist::{AtomNetlist, PinRole};
//!
//! let lut = Model::new("lut2")
//!     .with_port(ModelPort::input("in", 2))
//!     .with_port(ModelPort::output("out", 1));
//!
//! let mut nl = AtomNetlist::new("top");
//! let a = nl.create_block("a", &lut);
//! let b = nl.create_block("b", &lut);
//! let out = nl.create_port(a, "out").unwrap();
//! let inp = nl.create_port(b, "in").unwrap();
//!
//! let net = nl.create_net("a_out");
//! nl.create_pin(out, 0, Some(net), PinRole::Driver).unwrap();
//! nl.create_pin(inp, 1, Some(net), PinRole::Sink).unwrap();
//!
//! assert_eq!(nl.net_driver_block(net), Some(a));
//! nl.remove_block(b).unwrap();
//! nl.compress();
//! assert!(nl.verify().is_ok());
//! ```
//!
//! [`Model`]: atom_arch::Model

#![warn(missing_docs)]

mod block;
mod compress;
pub mod error;
pub mod ids;
mod lookup;
mod net;
mod netlist;
mod pin;
mod port;
mod verify;

pub use error::{CheckKind, EntityKind, NetlistError, NetlistResult, VerifyError, Violation};
pub use ids::{BitIndex, BlockId, EntityId, NetId, PinId, PortId};
pub use netlist::{AtomNetlist, BlockType, NetlistStats, PinRole};
