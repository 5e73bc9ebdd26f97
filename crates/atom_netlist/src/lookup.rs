//! Name- and key-based indices layered over the entity stores.

use crate::ids::{BitIndex, BlockId, NetId, PinId, PortId};
use atom_common::StringId;
use std::collections::HashMap;

/// Fast lookups from identifying keys to live entity handles.
///
/// Mutators keep these maps in lock-step with the stores; compaction clears
/// and refills them wholesale. The text-to-string map lives in the
/// [`Interner`](atom_common::Interner).
#[derive(Debug, Clone, Default)]
pub(crate) struct Lookups {
    pub(crate) block_by_name: HashMap<StringId, BlockId>,
    pub(crate) port_by_block_name: HashMap<(BlockId, StringId), PortId>,
    pub(crate) pin_by_port_bit: HashMap<(PortId, BitIndex), PinId>,
    pub(crate) net_by_name: HashMap<StringId, NetId>,
}

impl Lookups {
    pub(crate) fn clear(&mut self) {
        self.block_by_name.clear();
        self.port_by_block_name.clear();
        self.pin_by_port_bit.clear();
        self.net_by_name.clear();
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.block_by_name.shrink_to_fit();
        self.port_by_block_name.shrink_to_fit();
        self.pin_by_port_bit.shrink_to_fit();
        self.net_by_name.shrink_to_fit();
    }
}
