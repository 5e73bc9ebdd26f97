//! Opaque handle newtypes for netlist entities.
//!
//! Each handle is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. A handle is only meaningful for the
//! [`AtomNetlist`](crate::AtomNetlist) that issued it, and only until that
//! netlist's next [`compress`](crate::AtomNetlist::compress). "No entity" is
//! always spelled `Option::None`, never an out-of-range integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit position of a pin within its port.
pub type BitIndex = u32;

/// Trait for handle types used as indices into the netlist's parallel arrays.
pub trait EntityId: Copy + Eq {
    /// Creates a handle from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;

    /// Returns the handle as a `usize` array index.
    fn index(self) -> usize {
        self.as_raw() as usize
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a handle from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl EntityId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable handle for a primitive block.
    BlockId,
    "block"
);

define_id!(
    /// Opaque, copyable handle for a port on a block.
    PortId,
    "port"
);

define_id!(
    /// Opaque, copyable handle for a single-bit pin on a port.
    PinId,
    "pin"
);

define_id!(
    /// Opaque, copyable handle for a net.
    NetId,
    "net"
);
