//! Block store: primitive instances and their categorized port lists.

use crate::error::{NetlistError, NetlistResult};
use crate::ids::{BlockId, EntityId, PortId};
use crate::netlist::{AtomNetlist, BlockType};
use atom_arch::Model;
use atom_common::TruthTable;

impl<'m> AtomNetlist<'m> {
    /// Creates a block, or returns the existing block of the same name.
    ///
    /// The block starts with no ports; attach them with
    /// [`create_port`](AtomNetlist::create_port).
    pub fn create_block(&mut self, name: &str, model: &'m Model) -> BlockId {
        self.create_block_with_truth_table(name, model, TruthTable::new())
    }

    /// Creates a block carrying a truth table (a LUT cover or a flip-flop
    /// initial state), or returns the existing block of the same name.
    ///
    /// When the name already exists the supplied model and truth table are
    /// ignored: the first creation wins.
    pub fn create_block_with_truth_table(
        &mut self,
        name: &str,
        model: &'m Model,
        truth_table: TruthTable,
    ) -> BlockId {
        let name_id = self.strings.get_or_intern(name);
        if let Some(&existing) = self.lookups.block_by_name.get(&name_id) {
            return existing;
        }

        let id = BlockId::from_raw(self.block_ids.len() as u32);
        self.block_ids.push(Some(id));
        self.block_names.push(name_id);
        self.block_models.push(model);
        self.block_truth_tables.push(truth_table);
        self.block_input_ports.push(Vec::new());
        self.block_output_ports.push(Vec::new());
        self.block_clock_ports.push(Vec::new());

        self.lookups.block_by_name.insert(name_id, id);
        id
    }

    /// Marks a block and all of its ports and pins as removed.
    ///
    /// Pins are detached from their nets, but the nets themselves stay. Storage
    /// is reclaimed by the next [`compress`](AtomNetlist::compress).
    pub fn remove_block(&mut self, id: BlockId) -> NetlistResult<()> {
        if !self.valid_block(id) {
            return Err(NetlistError::InvalidBlock(id));
        }
        self.invalidate_block(id);
        Ok(())
    }

    pub(crate) fn invalidate_block(&mut self, id: BlockId) {
        let ports: Vec<PortId> = self.block_ports(id).collect();
        for port in ports {
            if self.valid_port(port) {
                self.remove_port(port);
            }
        }

        let i = id.index();
        self.lookups.block_by_name.remove(&self.block_names[i]);
        self.block_ids[i] = None;
        self.dirty = true;
        tracing::trace!(block = %id, "removed block");
    }

    /// Returns the name of a block.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live block (as do all `block_*` accessors).
    pub fn block_name(&self, id: BlockId) -> &str {
        let i = self.block_index(id);
        self.strings.resolve(self.block_names[i])
    }

    /// Returns the architecture model the block instantiates.
    pub fn block_model(&self, id: BlockId) -> &'m Model {
        self.block_models[self.block_index(id)]
    }

    /// Returns the block's classification, derived from its model.
    pub fn block_type(&self, id: BlockId) -> BlockType {
        let model = self.block_model(id);
        match model.name.as_str() {
            ".input" => BlockType::InPad,
            ".output" => BlockType::OutPad,
            _ if model.has_clock_input() => BlockType::Sequential,
            _ => BlockType::Combinational,
        }
    }

    /// Returns the block's truth table (empty unless one was supplied).
    pub fn block_truth_table(&self, id: BlockId) -> &TruthTable {
        &self.block_truth_tables[self.block_index(id)]
    }

    /// Returns the block's data input ports in creation order.
    pub fn block_input_ports(&self, id: BlockId) -> &[PortId] {
        &self.block_input_ports[self.block_index(id)]
    }

    /// Returns the block's output ports in creation order.
    ///
    /// Clock outputs (e.g. of a PLL) are listed here, not with the clocks.
    pub fn block_output_ports(&self, id: BlockId) -> &[PortId] {
        &self.block_output_ports[self.block_index(id)]
    }

    /// Returns the block's clock input ports in creation order.
    pub fn block_clock_ports(&self, id: BlockId) -> &[PortId] {
        &self.block_clock_ports[self.block_index(id)]
    }

    /// Iterates over all of the block's ports: inputs, then outputs, then clocks.
    pub fn block_ports(&self, id: BlockId) -> impl Iterator<Item = PortId> + '_ {
        let i = self.block_index(id);
        self.block_input_ports[i]
            .iter()
            .chain(&self.block_output_ports[i])
            .chain(&self.block_clock_ports[i])
            .copied()
    }
}
