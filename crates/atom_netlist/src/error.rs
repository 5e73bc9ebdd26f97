//! Error types for netlist mutation and verification.
//!
//! [`NetlistError`] reports a broken calling contract (bad handle, bad bit
//! index, name clash). [`VerifyError`] reports a broken internal invariant
//! found by [`AtomNetlist::verify`](crate::AtomNetlist::verify), which is a bug
//! in the netlist itself rather than bad input.

use crate::ids::{BitIndex, BlockId, NetId, PinId, PortId};
use std::fmt;

/// The standard result type for netlist mutators.
pub type NetlistResult<T> = Result<T, NetlistError>;

/// A contract violation detected by a netlist mutator.
///
/// Every mutator checks all of its preconditions before touching storage, so
/// an `Err` always means the netlist is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlistError {
    /// The block handle does not name a live block.
    #[error("invalid block handle {0}")]
    InvalidBlock(BlockId),

    /// The port handle does not name a live port.
    #[error("invalid port handle {0}")]
    InvalidPort(PortId),

    /// The pin handle does not name a live pin.
    #[error("invalid pin handle {0}")]
    InvalidPin(PinId),

    /// The net handle does not name a live net.
    #[error("invalid net handle {0}")]
    InvalidNet(NetId),

    /// A bit index is not below the port width.
    #[error("bit {bit} is out of range for {port} of width {width}")]
    BitOutOfRange {
        /// The port being indexed.
        port: PortId,
        /// The requested bit.
        bit: BitIndex,
        /// The port width.
        width: BitIndex,
    },

    /// The block's model declares no port with the requested name.
    #[error("model '{model}' has no port named '{port}'")]
    UnknownModelPort {
        /// The block's model name.
        model: String,
        /// The requested port name.
        port: String,
    },

    /// `add_net` was given a name that already names a live net.
    #[error("net '{0}' already exists")]
    DuplicateNet(String),

    /// A driver pin was requested for a net that already has a driver.
    #[error("{net} is already driven by {existing}")]
    DriverConflict {
        /// The net being driven.
        net: NetId,
        /// The pin already in the driver slot.
        existing: PinId,
    },

    /// A pin handed to `add_net` is already associated with a net.
    #[error("{pin} is already connected to {net}")]
    PinAlreadyConnected {
        /// The pin being connected.
        pin: PinId,
        /// The net it is already on.
        net: NetId,
    },

    /// A pin appears more than once in one `add_net` call.
    #[error("{0} is listed more than once")]
    DuplicatePin(PinId),

    /// A pin's role does not match the slot it was given (driver vs. sink).
    #[error("{0} has the wrong role for this connection")]
    RoleMismatch(PinId),

    /// `remove_net_pin` was asked to detach a pin that is not on the net.
    #[error("{pin} is not connected to {net}")]
    PinNotOnNet {
        /// The pin.
        pin: PinId,
        /// The net it was expected on.
        net: NetId,
    },
}

/// The entity kind an inconsistency was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A block.
    Block,
    /// A port.
    Port,
    /// A pin.
    Pin,
    /// A net.
    Net,
    /// An interned string.
    String,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Block => "block",
            EntityKind::Port => "port",
            EntityKind::Pin => "pin",
            EntityKind::Net => "net",
            EntityKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Which family of invariants a [`Violation`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Parallel attribute arrays disagree in length.
    Size,
    /// A cross-reference is dangling or not mirrored.
    Reference,
    /// A fast-lookup index disagrees with the live entities.
    Lookup,
    /// The string table is not a bijection.
    Strings,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Size => "size",
            CheckKind::Reference => "reference",
            CheckKind::Lookup => "lookup",
            CheckKind::Strings => "strings",
        };
        f.write_str(name)
    }
}

/// One broken invariant found by verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The invariant family that failed.
    pub check: CheckKind,
    /// The kind of entity the failure was found on.
    pub kind: EntityKind,
    /// Raw handle of the offending entity, when one can be named.
    pub index: Option<u32>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Violation {
    pub(crate) fn new(
        check: CheckKind,
        kind: EntityKind,
        index: Option<u32>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check,
            kind,
            index,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "[{}] {} {}: {}",
                self.check, self.kind, index, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.check, self.kind, self.message),
        }
    }
}

/// Structural inconsistency reported by verification.
///
/// This is never auto-repaired: it indicates a bug in the netlist
/// bookkeeping and should abort the caller's current operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "netlist is inconsistent ({} violations, first: {})",
    .violations.len(),
    first_violation(.violations)
)]
pub struct VerifyError {
    /// Every violation found, in check order.
    pub violations: Vec<Violation>,
}

impl VerifyError {
    /// Returns `true` if any violation belongs to `check`.
    pub fn has(&self, check: CheckKind) -> bool {
        self.violations.iter().any(|v| v.check == check)
    }
}

fn first_violation(violations: &[Violation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".to_string())
}
