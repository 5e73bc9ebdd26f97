//! Compaction: reclaiming removed entities and renumbering every handle.
//!
//! Removal only marks entries invalid, so a batch of `remove_*` calls costs
//! O(1) each. [`AtomNetlist::compress`] then does one O(n) pass:
//!
//! 1. sweep ports and blocks left without live children,
//! 2. squeeze out invalid entries per kind (pins, ports, nets, blocks), building
//!    an old-to-new handle map for each,
//! 3. rewrite every cross-reference through those maps,
//! 4. compact the string table and rebuild the fast lookups from scratch,
//! 5. release spare capacity.

use crate::ids::{BlockId, EntityId, NetId, PinId, PortId};
use crate::netlist::AtomNetlist;

/// Old raw handle to new handle; `None` for entries that were squeezed out.
type IdMap<I> = Vec<Option<I>>;

/// Numbers the live entries of `ids` contiguously from zero.
fn build_id_map<I: EntityId>(ids: &[Option<I>]) -> IdMap<I> {
    let mut next = 0;
    ids.iter()
        .map(|slot| {
            slot.map(|_| {
                let id = I::from_raw(next);
                next += 1;
                id
            })
        })
        .collect()
}

/// Keeps only the entries of a parallel array whose handle survives in `map`.
fn retain_mapped<T, I>(values: &mut Vec<T>, map: &IdMap<I>) {
    let mut index = 0;
    values.retain(|_| {
        let keep = map[index].is_some();
        index += 1;
        keep
    });
}

/// Rebuilds an `*_ids` vector as `Some(0)..Some(n)` after compaction.
fn dense_ids<I: EntityId>(map: &IdMap<I>) -> Vec<Option<I>> {
    map.iter().flatten().map(|&id| Some(id)).collect()
}

fn remap<I: EntityId>(map: &IdMap<I>, id: I) -> Option<I> {
    map.get(id.index()).copied().flatten()
}

impl<'m> AtomNetlist<'m> {
    /// Physically removes every invalidated entity and renumbers all handles.
    ///
    /// Ports left without live pins and blocks whose ports were all removed
    /// are swept first, so they are reclaimed too. Afterwards the handles of
    /// every kind are contiguous from zero and [`dirty`](AtomNetlist::dirty)
    /// is `false`.
    ///
    /// Every handle obtained before this call is invalidated and must not be
    /// used again; look entities up by name afterwards.
    pub fn compress(&mut self) {
        let before = self.stats();
        self.remove_unused();

        let pin_map = self.clean_pins();
        let port_map = self.clean_ports();
        let net_map = self.clean_nets();
        let block_map = self.clean_blocks();

        self.rebuild_pin_refs(&port_map, &net_map);
        self.rebuild_port_refs(&block_map, &pin_map);
        self.rebuild_net_refs(&pin_map);
        self.rebuild_block_refs(&port_map);

        self.clean_strings();
        self.rebuild_lookups();
        self.shrink_to_fit();
        self.dirty = false;

        let after = self.stats();
        tracing::debug!(
            blocks = after.blocks,
            ports = after.ports,
            pins = after.pins,
            nets = after.nets,
            strings = after.strings,
            reclaimed_blocks = before.blocks - after.blocks,
            reclaimed_ports = before.ports - after.ports,
            reclaimed_pins = before.pins - after.pins,
            reclaimed_nets = before.nets - after.nets,
            "compressed netlist '{}'",
            self.name
        );
    }

    /// Marks ports with no live pins, then blocks that have ports but no live
    /// ones, as removed. Blocks created without any port are kept.
    pub(crate) fn remove_unused(&mut self) {
        let mut swept_ports = 0;
        for i in 0..self.port_ids.len() {
            if let Some(port) = self.port_ids[i] {
                if self.port_pins[i].iter().all(Option::is_none) {
                    self.remove_port(port);
                    swept_ports += 1;
                }
            }
        }

        let mut swept_blocks = 0;
        for i in 0..self.block_ids.len() {
            if let Some(block) = self.block_ids[i] {
                let (has_ports, any_live) = {
                    let mut ports = self.block_ports(block).peekable();
                    (
                        ports.peek().is_some(),
                        ports.any(|port| self.valid_port(port)),
                    )
                };
                if has_ports && !any_live {
                    self.invalidate_block(block);
                    swept_blocks += 1;
                }
            }
        }

        if swept_ports + swept_blocks > 0 {
            tracing::debug!(swept_ports, swept_blocks, "swept unused entities");
        }
    }

    fn clean_pins(&mut self) -> IdMap<PinId> {
        let map = build_id_map(&self.pin_ids);
        retain_mapped(&mut self.pin_ports, &map);
        retain_mapped(&mut self.pin_port_bits, &map);
        retain_mapped(&mut self.pin_nets, &map);
        retain_mapped(&mut self.pin_roles, &map);
        self.pin_ids = dense_ids(&map);
        map
    }

    fn clean_ports(&mut self) -> IdMap<PortId> {
        let map = build_id_map(&self.port_ids);
        retain_mapped(&mut self.port_names, &map);
        retain_mapped(&mut self.port_blocks, &map);
        retain_mapped(&mut self.port_widths, &map);
        retain_mapped(&mut self.port_classes, &map);
        retain_mapped(&mut self.port_pins, &map);
        self.port_ids = dense_ids(&map);
        map
    }

    fn clean_nets(&mut self) -> IdMap<NetId> {
        let map = build_id_map(&self.net_ids);
        retain_mapped(&mut self.net_names, &map);
        retain_mapped(&mut self.net_pins, &map);
        self.net_ids = dense_ids(&map);
        map
    }

    fn clean_blocks(&mut self) -> IdMap<BlockId> {
        let map = build_id_map(&self.block_ids);
        retain_mapped(&mut self.block_names, &map);
        retain_mapped(&mut self.block_models, &map);
        retain_mapped(&mut self.block_truth_tables, &map);
        retain_mapped(&mut self.block_input_ports, &map);
        retain_mapped(&mut self.block_output_ports, &map);
        retain_mapped(&mut self.block_clock_ports, &map);
        self.block_ids = dense_ids(&map);
        map
    }

    fn rebuild_pin_refs(&mut self, port_map: &IdMap<PortId>, net_map: &IdMap<NetId>) {
        for port in &mut self.pin_ports {
            if let Some(new) = remap(port_map, *port) {
                *port = new;
            }
        }
        for net in &mut self.pin_nets {
            *net = net.and_then(|old| remap(net_map, old));
        }
    }

    fn rebuild_port_refs(&mut self, block_map: &IdMap<BlockId>, pin_map: &IdMap<PinId>) {
        for block in &mut self.port_blocks {
            if let Some(new) = remap(block_map, *block) {
                *block = new;
            }
        }
        for pins in &mut self.port_pins {
            for slot in pins.iter_mut() {
                *slot = slot.and_then(|old| remap(pin_map, old));
            }
        }
    }

    /// Keeps the driver slot (possibly empty) and drops emptied sink slots.
    fn rebuild_net_refs(&mut self, pin_map: &IdMap<PinId>) {
        for pins in &mut self.net_pins {
            let driver = pins.first().copied().flatten().and_then(|old| remap(pin_map, old));
            let sinks = pins
                .iter()
                .skip(1)
                .flatten()
                .filter_map(|&old| remap(pin_map, old))
                .map(Some);
            *pins = std::iter::once(driver).chain(sinks).collect();
        }
    }

    fn rebuild_block_refs(&mut self, port_map: &IdMap<PortId>) {
        let lists = self
            .block_input_ports
            .iter_mut()
            .chain(self.block_output_ports.iter_mut())
            .chain(self.block_clock_ports.iter_mut());
        for ports in lists {
            *ports = ports.iter().filter_map(|&old| remap(port_map, old)).collect();
        }
    }

    /// Drops strings no longer used as a block, port, or net name.
    fn clean_strings(&mut self) {
        let mut referenced = vec![false; self.strings.len()];
        for name in self
            .block_names
            .iter()
            .chain(&self.port_names)
            .chain(&self.net_names)
        {
            referenced[name.as_raw() as usize] = true;
        }

        let (strings, map) = self.strings.compact(|id| referenced[id.as_raw() as usize]);
        let names = self
            .block_names
            .iter_mut()
            .chain(self.port_names.iter_mut())
            .chain(self.net_names.iter_mut());
        for name in names {
            if let Some(new) = map[name.as_raw() as usize] {
                *name = new;
            }
        }
        self.strings = strings;
    }

    fn rebuild_lookups(&mut self) {
        self.lookups.clear();
        for (i, &name) in self.block_names.iter().enumerate() {
            self.lookups
                .block_by_name
                .insert(name, BlockId::from_raw(i as u32));
        }
        for (i, (&block, &name)) in self.port_blocks.iter().zip(&self.port_names).enumerate() {
            self.lookups
                .port_by_block_name
                .insert((block, name), PortId::from_raw(i as u32));
        }
        for (i, (&port, &bit)) in self.pin_ports.iter().zip(&self.pin_port_bits).enumerate() {
            self.lookups
                .pin_by_port_bit
                .insert((port, bit), PinId::from_raw(i as u32));
        }
        for (i, &name) in self.net_names.iter().enumerate() {
            self.lookups
                .net_by_name
                .insert(name, NetId::from_raw(i as u32));
        }
    }

    fn shrink_to_fit(&mut self) {
        self.block_ids.shrink_to_fit();
        self.block_names.shrink_to_fit();
        self.block_models.shrink_to_fit();
        self.block_truth_tables.shrink_to_fit();
        for ports in self
            .block_input_ports
            .iter_mut()
            .chain(self.block_output_ports.iter_mut())
            .chain(self.block_clock_ports.iter_mut())
        {
            ports.shrink_to_fit();
        }
        self.block_input_ports.shrink_to_fit();
        self.block_output_ports.shrink_to_fit();
        self.block_clock_ports.shrink_to_fit();

        self.port_ids.shrink_to_fit();
        self.port_names.shrink_to_fit();
        self.port_blocks.shrink_to_fit();
        self.port_widths.shrink_to_fit();
        self.port_classes.shrink_to_fit();
        self.port_pins.shrink_to_fit();

        self.pin_ids.shrink_to_fit();
        self.pin_ports.shrink_to_fit();
        self.pin_port_bits.shrink_to_fit();
        self.pin_nets.shrink_to_fit();
        self.pin_roles.shrink_to_fit();

        self.net_ids.shrink_to_fit();
        self.net_names.shrink_to_fit();
        for pins in &mut self.net_pins {
            pins.shrink_to_fit();
        }
        self.net_pins.shrink_to_fit();

        self.lookups.shrink_to_fit();
    }
}
