//! The [`AtomNetlist`] container and its netlist-wide queries.
//!
//! Storage is struct-of-arrays: every entity kind owns a set of parallel
//! vectors indexed by the raw value of its handle. Removed entities keep their
//! slot (with `None` in the `*_ids` vector) until [`AtomNetlist::compress`]
//! physically reclaims them.
//!
//! Per-kind accessors and mutators live next to each store in the `block`,
//! `port`, `pin`, and `net` modules.

use crate::ids::{BitIndex, BlockId, EntityId, NetId, PinId, PortId};
use crate::lookup::Lookups;
use atom_arch::{Model, PortClass};
use atom_common::{Interner, StringId, TruthTable};

/// Whether a pin drives its net or is driven by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinRole {
    /// The pin occupies the driver slot of its net.
    Driver,
    /// The pin is one of the net's sinks.
    Sink,
}

/// Coarse classification of a block, derived from its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// A primary input pad (model `.input`).
    InPad,
    /// A primary output pad (model `.output`).
    OutPad,
    /// A primitive without clock inputs.
    Combinational,
    /// A primitive with at least one clock input.
    Sequential,
}

/// Issued and live entity counts, as reported by [`AtomNetlist::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetlistStats {
    /// Block handles issued since the last compaction.
    pub blocks: usize,
    /// Blocks not yet removed.
    pub live_blocks: usize,
    /// Port handles issued since the last compaction.
    pub ports: usize,
    /// Ports not yet removed.
    pub live_ports: usize,
    /// Pin handles issued since the last compaction.
    pub pins: usize,
    /// Pins not yet removed.
    pub live_pins: usize,
    /// Net handles issued since the last compaction.
    pub nets: usize,
    /// Nets not yet removed.
    pub live_nets: usize,
    /// Interned strings.
    pub strings: usize,
}

/// A technology-mapped primitive netlist.
///
/// Blocks are primitive instances, each bound to an architecture [`Model`]
/// borrowed for `'m`. Ports group the pins of a block, pins bind single port
/// bits to nets, and nets connect one driver slot to any number of sinks.
///
/// All `create_*` operations are idempotent on their identifying key. All
/// `remove_*` operations only mark entities invalid; call [`compress`] to
/// reclaim their storage. Compaction invalidates every handle issued before it.
///
/// Accessors taking a handle panic if the handle is not live; that is a caller
/// bug, not an expected outcome. Lookups (`find_*`) return `None` for absent
/// keys.
///
/// [`compress`]: AtomNetlist::compress
#[derive(Debug, Clone)]
pub struct AtomNetlist<'m> {
    pub(crate) name: String,
    pub(crate) dirty: bool,

    // Block data
    pub(crate) block_ids: Vec<Option<BlockId>>,
    pub(crate) block_names: Vec<StringId>,
    pub(crate) block_models: Vec<&'m Model>,
    pub(crate) block_truth_tables: Vec<TruthTable>,
    pub(crate) block_input_ports: Vec<Vec<PortId>>,
    pub(crate) block_output_ports: Vec<Vec<PortId>>,
    pub(crate) block_clock_ports: Vec<Vec<PortId>>,

    // Port data
    pub(crate) port_ids: Vec<Option<PortId>>,
    pub(crate) port_names: Vec<StringId>,
    pub(crate) port_blocks: Vec<BlockId>,
    pub(crate) port_widths: Vec<BitIndex>,
    pub(crate) port_classes: Vec<PortClass>,
    pub(crate) port_pins: Vec<Vec<Option<PinId>>>,

    // Pin data
    pub(crate) pin_ids: Vec<Option<PinId>>,
    pub(crate) pin_ports: Vec<PortId>,
    pub(crate) pin_port_bits: Vec<BitIndex>,
    pub(crate) pin_nets: Vec<Option<NetId>>,
    pub(crate) pin_roles: Vec<PinRole>,

    // Net data; slot 0 of each pin list is the driver
    pub(crate) net_ids: Vec<Option<NetId>>,
    pub(crate) net_names: Vec<StringId>,
    pub(crate) net_pins: Vec<Vec<Option<PinId>>>,

    pub(crate) strings: Interner,
    pub(crate) lookups: Lookups,
}

impl<'m> AtomNetlist<'m> {
    /// Creates an empty netlist with the given top-level name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dirty: false,
            block_ids: Vec::new(),
            block_names: Vec::new(),
            block_models: Vec::new(),
            block_truth_tables: Vec::new(),
            block_input_ports: Vec::new(),
            block_output_ports: Vec::new(),
            block_clock_ports: Vec::new(),
            port_ids: Vec::new(),
            port_names: Vec::new(),
            port_blocks: Vec::new(),
            port_widths: Vec::new(),
            port_classes: Vec::new(),
            port_pins: Vec::new(),
            pin_ids: Vec::new(),
            pin_ports: Vec::new(),
            pin_port_bits: Vec::new(),
            pin_nets: Vec::new(),
            pin_roles: Vec::new(),
            net_ids: Vec::new(),
            net_names: Vec::new(),
            net_pins: Vec::new(),
            strings: Interner::new(),
            lookups: Lookups::default(),
        }
    }

    /// Returns the top-level netlist name.
    pub fn netlist_name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if entities have been removed since the last compaction.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    // --- Validity ---

    /// Returns `true` if `id` names a live block of this netlist.
    pub fn valid_block(&self, id: BlockId) -> bool {
        self.block_ids.get(id.index()).is_some_and(|slot| *slot == Some(id))
    }

    /// Returns `true` if `id` names a live port of this netlist.
    pub fn valid_port(&self, id: PortId) -> bool {
        self.port_ids.get(id.index()).is_some_and(|slot| *slot == Some(id))
    }

    /// Returns `true` if `id` is a live port and `bit` is below its width.
    pub fn valid_port_bit(&self, id: PortId, bit: BitIndex) -> bool {
        self.valid_port(id) && bit < self.port_widths[id.index()]
    }

    /// Returns `true` if `id` names a live pin of this netlist.
    pub fn valid_pin(&self, id: PinId) -> bool {
        self.pin_ids.get(id.index()).is_some_and(|slot| *slot == Some(id))
    }

    /// Returns `true` if `id` names a live net of this netlist.
    pub fn valid_net(&self, id: NetId) -> bool {
        self.net_ids.get(id.index()).is_some_and(|slot| *slot == Some(id))
    }

    pub(crate) fn block_index(&self, id: BlockId) -> usize {
        assert!(self.valid_block(id), "invalid block handle {id}");
        id.index()
    }

    pub(crate) fn port_index(&self, id: PortId) -> usize {
        assert!(self.valid_port(id), "invalid port handle {id}");
        id.index()
    }

    pub(crate) fn pin_index(&self, id: PinId) -> usize {
        assert!(self.valid_pin(id), "invalid pin handle {id}");
        id.index()
    }

    pub(crate) fn net_index(&self, id: NetId) -> usize {
        assert!(self.valid_net(id), "invalid net handle {id}");
        id.index()
    }

    // --- Aggregates ---

    /// Iterates over all live blocks in handle order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.block_ids.iter().flatten().copied()
    }

    /// Iterates over all live ports in handle order.
    pub fn ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.port_ids.iter().flatten().copied()
    }

    /// Iterates over all live pins in handle order.
    pub fn pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.pin_ids.iter().flatten().copied()
    }

    /// Iterates over all live nets in handle order.
    pub fn nets(&self) -> impl Iterator<Item = NetId> + '_ {
        self.net_ids.iter().flatten().copied()
    }

    /// Returns the number of block handles issued (live or removed).
    pub fn block_count(&self) -> usize {
        self.block_ids.len()
    }

    /// Returns the number of port handles issued (live or removed).
    pub fn port_count(&self) -> usize {
        self.port_ids.len()
    }

    /// Returns the number of pin handles issued (live or removed).
    pub fn pin_count(&self) -> usize {
        self.pin_ids.len()
    }

    /// Returns the number of net handles issued (live or removed).
    pub fn net_count(&self) -> usize {
        self.net_ids.len()
    }

    /// Returns the number of live blocks.
    pub fn live_block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Returns the number of live ports.
    pub fn live_port_count(&self) -> usize {
        self.ports().count()
    }

    /// Returns the number of live pins.
    pub fn live_pin_count(&self) -> usize {
        self.pins().count()
    }

    /// Returns the number of live nets.
    pub fn live_net_count(&self) -> usize {
        self.nets().count()
    }

    /// Returns a snapshot of issued and live counts for every entity kind.
    pub fn stats(&self) -> NetlistStats {
        NetlistStats {
            blocks: self.block_count(),
            live_blocks: self.live_block_count(),
            ports: self.port_count(),
            live_ports: self.live_port_count(),
            pins: self.pin_count(),
            live_pins: self.live_pin_count(),
            nets: self.net_count(),
            live_nets: self.live_net_count(),
            strings: self.strings.len(),
        }
    }

    // --- Lookups ---

    /// Returns the live block named `name`.
    pub fn find_block(&self, name: &str) -> Option<BlockId> {
        let name_id = self.strings.get(name)?;
        self.lookups.block_by_name.get(&name_id).copied()
    }

    /// Returns the port named `name` on `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not a live block.
    pub fn find_port(&self, block: BlockId, name: &str) -> Option<PortId> {
        assert!(self.valid_block(block), "invalid block handle {block}");
        self.find_port_unchecked(block, name)
    }

    pub(crate) fn find_port_unchecked(&self, block: BlockId, name: &str) -> Option<PortId> {
        let name_id = self.strings.get(name)?;
        self.lookups
            .port_by_block_name
            .get(&(block, name_id))
            .copied()
    }

    /// Returns the pin at `bit` of `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is not a live port or `bit` is not below its width.
    pub fn find_pin(&self, port: PortId, bit: BitIndex) -> Option<PinId> {
        assert!(
            self.valid_port_bit(port, bit),
            "invalid port bit {port}[{bit}]"
        );
        self.lookups.pin_by_port_bit.get(&(port, bit)).copied()
    }

    /// Returns the live net named `name`.
    pub fn find_net(&self, name: &str) -> Option<NetId> {
        let name_id = self.strings.get(name)?;
        self.lookups.net_by_name.get(&name_id).copied()
    }

    /// Returns the handle of an interned string without interning it.
    pub fn find_string(&self, text: &str) -> Option<StringId> {
        self.strings.get(text)
    }

    /// Returns the text of an interned string.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this netlist's interner.
    pub fn string(&self, id: StringId) -> &str {
        self.strings.resolve(id)
    }

    /// Returns the netlist's string interner.
    pub fn strings(&self) -> &Interner {
        &self.strings
    }
}

impl Default for AtomNetlist<'_> {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_models::{dff, lut2};

    #[test]
    fn new_netlist_is_empty() {
        let nl = AtomNetlist::new("top");
        assert_eq!(nl.netlist_name(), "top");
        assert!(!nl.dirty());
        assert_eq!(nl.stats(), NetlistStats::default());
        assert_eq!(nl.blocks().count(), 0);
        assert!(nl.verify().is_ok());
    }

    #[test]
    fn default_has_empty_name() {
        let nl = AtomNetlist::default();
        assert_eq!(nl.netlist_name(), "");
    }

    #[test]
    fn validity_of_foreign_handles() {
        let nl = AtomNetlist::new("top");
        assert!(!nl.valid_block(BlockId::from_raw(0)));
        assert!(!nl.valid_port(PortId::from_raw(0)));
        assert!(!nl.valid_pin(PinId::from_raw(0)));
        assert!(!nl.valid_net(NetId::from_raw(0)));
    }

    #[test]
    fn lookups_on_missing_names() {
        let nl = AtomNetlist::new("top");
        assert_eq!(nl.find_block("nope"), None);
        assert_eq!(nl.find_net("nope"), None);
        assert_eq!(nl.find_string("nope"), None);
    }

    #[test]
    fn stats_track_issued_and_live() {
        let lut = lut2();
        let ff = dff();
        let mut nl = AtomNetlist::new("top");
        let a = nl.create_block("a", &lut);
        nl.create_block("b", &ff);
        nl.create_net("n");
        nl.remove_block(a).unwrap();

        let stats = nl.stats();
        assert_eq!(stats.blocks, 2);
        assert_eq!(stats.live_blocks, 1);
        assert_eq!(stats.nets, 1);
        assert_eq!(stats.live_nets, 1);
        assert_eq!(stats.strings, 3);
    }

    #[test]
    fn aggregates_skip_removed_entities() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let a = nl.create_block("a", &lut);
        let b = nl.create_block("b", &lut);
        let c = nl.create_block("c", &lut);
        nl.remove_block(b).unwrap();
        assert_eq!(nl.blocks().collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(nl.block_count(), 3);
        assert_eq!(nl.live_block_count(), 2);
    }

    #[test]
    fn string_lookup() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let b = nl.create_block("lut_a", &lut);
        let id = nl.find_string("lut_a").unwrap();
        assert_eq!(nl.string(id), "lut_a");
        assert_eq!(nl.block_name(b), "lut_a");
        assert_eq!(nl.strings().len(), 1);
    }

    #[test]
    #[should_panic(expected = "invalid block handle")]
    fn find_port_on_invalid_block_panics() {
        let nl = AtomNetlist::new("top");
        nl.find_port(BlockId::from_raw(0), "in");
    }
}
