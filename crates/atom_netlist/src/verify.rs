//! Structural self-check of the netlist bookkeeping.

use crate::error::{CheckKind, EntityKind, VerifyError, Violation};
use crate::ids::{EntityId, PinId};
use crate::netlist::{AtomNetlist, PinRole};
use atom_arch::PortClass;
use std::collections::HashSet;

/// Collects violations for one check family.
struct Report {
    check: CheckKind,
    violations: Vec<Violation>,
}

impl Report {
    fn new(check: CheckKind) -> Self {
        Self {
            check,
            violations: Vec::new(),
        }
    }

    fn push(&mut self, kind: EntityKind, index: usize, message: impl Into<String>) {
        self.violations
            .push(Violation::new(self.check, kind, Some(index as u32), message));
    }

    /// Records a violation that concerns a whole entity kind.
    fn push_global(&mut self, kind: EntityKind, message: impl Into<String>) {
        self.violations
            .push(Violation::new(self.check, kind, None, message));
    }
}

fn ids_consistent<I: EntityId>(ids: &[Option<I>]) -> Option<usize> {
    ids.iter()
        .enumerate()
        .find(|(i, slot)| slot.is_some_and(|id| id.index() != *i))
        .map(|(i, _)| i)
}

impl<'m> AtomNetlist<'m> {
    /// Checks every structural invariant of the netlist.
    ///
    /// Four families of checks run in order: array sizes and handle
    /// positions, cross-references between entities, the fast lookups, and the
    /// string table. Reference and lookup checks are skipped when the sizes
    /// are already inconsistent, since indexing would not be meaningful.
    ///
    /// Removed-but-not-compacted entities are allowed; they are simply
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`VerifyError`] listing every violation found.
    pub fn verify(&self) -> Result<(), VerifyError> {
        let mut violations = self.check_sizes();
        if violations.is_empty() {
            violations.extend(self.check_references());
            violations.extend(self.check_lookups());
        }
        violations.extend(self.check_strings());

        if violations.is_empty() {
            return Ok(());
        }
        tracing::warn!(
            violations = violations.len(),
            "netlist '{}' failed verification",
            self.name
        );
        Err(VerifyError { violations })
    }

    fn check_sizes(&self) -> Vec<Violation> {
        let mut report = Report::new(CheckKind::Size);

        let blocks = self.block_ids.len();
        for (field, len) in [
            ("names", self.block_names.len()),
            ("models", self.block_models.len()),
            ("truth tables", self.block_truth_tables.len()),
            ("input ports", self.block_input_ports.len()),
            ("output ports", self.block_output_ports.len()),
            ("clock ports", self.block_clock_ports.len()),
        ] {
            if len != blocks {
                report.push_global(EntityKind::Block, format!("{len} {field} for {blocks} blocks"));
            }
        }

        let ports = self.port_ids.len();
        for (field, len) in [
            ("names", self.port_names.len()),
            ("blocks", self.port_blocks.len()),
            ("widths", self.port_widths.len()),
            ("classes", self.port_classes.len()),
            ("pin lists", self.port_pins.len()),
        ] {
            if len != ports {
                report.push_global(EntityKind::Port, format!("{len} {field} for {ports} ports"));
            }
        }

        let pins = self.pin_ids.len();
        for (field, len) in [
            ("ports", self.pin_ports.len()),
            ("bits", self.pin_port_bits.len()),
            ("nets", self.pin_nets.len()),
            ("roles", self.pin_roles.len()),
        ] {
            if len != pins {
                report.push_global(EntityKind::Pin, format!("{len} {field} for {pins} pins"));
            }
        }

        let nets = self.net_ids.len();
        for (field, len) in [
            ("names", self.net_names.len()),
            ("pin lists", self.net_pins.len()),
        ] {
            if len != nets {
                report.push_global(EntityKind::Net, format!("{len} {field} for {nets} nets"));
            }
        }

        if let Some(i) = ids_consistent(&self.block_ids) {
            report.push(EntityKind::Block, i, "handle does not match its position");
        }
        if let Some(i) = ids_consistent(&self.port_ids) {
            report.push(EntityKind::Port, i, "handle does not match its position");
        }
        if let Some(i) = ids_consistent(&self.pin_ids) {
            report.push(EntityKind::Pin, i, "handle does not match its position");
        }
        if let Some(i) = ids_consistent(&self.net_ids) {
            report.push(EntityKind::Net, i, "handle does not match its position");
        }

        report.violations
    }

    fn check_references(&self) -> Vec<Violation> {
        let mut report = Report::new(CheckKind::Reference);

        for block in self.blocks() {
            let b = block.index();
            let lists = [
                (PortClass::Input, &self.block_input_ports[b]),
                (PortClass::Output, &self.block_output_ports[b]),
                (PortClass::Clock, &self.block_clock_ports[b]),
            ];
            for (class, ports) in lists {
                for &port in ports {
                    if !self.valid_port(port) {
                        // removed ports linger until compaction
                        if port.index() >= self.port_ids.len() {
                            report.push(EntityKind::Block, b, format!("lists unknown {port}"));
                        }
                        continue;
                    }
                    let p = port.index();
                    if self.port_blocks[p] != block {
                        report.push(
                            EntityKind::Block,
                            b,
                            format!("lists {port} owned by {}", self.port_blocks[p]),
                        );
                    }
                    if self.port_classes[p] != class {
                        report.push(
                            EntityKind::Block,
                            b,
                            format!("lists {port} under the wrong class"),
                        );
                    }
                }
            }
        }

        for port in self.ports() {
            let p = port.index();
            let block = self.port_blocks[p];
            if !self.valid_block(block) {
                report.push(EntityKind::Port, p, format!("owned by dead {block}"));
            } else {
                let listed = match self.port_classes[p] {
                    PortClass::Input => &self.block_input_ports[block.index()],
                    PortClass::Output => &self.block_output_ports[block.index()],
                    PortClass::Clock => &self.block_clock_ports[block.index()],
                };
                if !listed.contains(&port) {
                    report.push(
                        EntityKind::Port,
                        p,
                        format!("missing from the port list of {block}"),
                    );
                }
            }

            let width = self.port_widths[p];
            if self.port_pins[p].len() != width as usize {
                report.push(
                    EntityKind::Port,
                    p,
                    format!("{} pin slots for width {width}", self.port_pins[p].len()),
                );
            }
            for (bit, slot) in self.port_pins[p].iter().enumerate() {
                let Some(pin) = *slot else { continue };
                if !self.valid_pin(pin) {
                    report.push(EntityKind::Port, p, format!("bit {bit} holds dead {pin}"));
                } else if self.pin_ports[pin.index()] != port
                    || self.pin_port_bits[pin.index()] as usize != bit
                {
                    report.push(
                        EntityKind::Port,
                        p,
                        format!("bit {bit} holds {pin} of another port bit"),
                    );
                }
            }
        }

        for pin in self.pins() {
            let i = pin.index();
            let port = self.pin_ports[i];
            let bit = self.pin_port_bits[i];
            if !self.valid_port(port) {
                report.push(EntityKind::Pin, i, format!("owned by dead {port}"));
            } else if bit >= self.port_widths[port.index()] {
                report.push(EntityKind::Pin, i, format!("bit {bit} exceeds the width of {port}"));
            } else if self.port_pins[port.index()][bit as usize] != Some(pin) {
                report.push(EntityKind::Pin, i, format!("not recorded at {port}[{bit}]"));
            }

            if let Some(net) = self.pin_nets[i] {
                if !self.valid_net(net) {
                    report.push(EntityKind::Pin, i, format!("connected to dead {net}"));
                    continue;
                }
                let pins = &self.net_pins[net.index()];
                let placed = match self.pin_roles[i] {
                    PinRole::Driver => pins.first() == Some(&Some(pin)),
                    PinRole::Sink => pins.iter().skip(1).any(|slot| *slot == Some(pin)),
                };
                if !placed {
                    report.push(EntityKind::Pin, i, format!("missing from its slot on {net}"));
                }
            }
        }

        for net in self.nets() {
            let n = net.index();
            let pins = &self.net_pins[n];
            if pins.is_empty() {
                report.push(EntityKind::Net, n, "has no driver slot");
                continue;
            }

            let mut seen: HashSet<PinId> = HashSet::new();
            for (slot, pin) in pins.iter().enumerate() {
                let Some(pin) = *pin else { continue };
                let expected = if slot == 0 { PinRole::Driver } else { PinRole::Sink };
                if !self.valid_pin(pin) {
                    report.push(EntityKind::Net, n, format!("slot {slot} holds dead {pin}"));
                    continue;
                }
                if self.pin_roles[pin.index()] != expected {
                    report.push(
                        EntityKind::Net,
                        n,
                        format!("slot {slot} holds {pin} with the wrong role"),
                    );
                }
                if self.pin_nets[pin.index()] != Some(net) {
                    report.push(EntityKind::Net, n, format!("{pin} does not point back"));
                }
                if !seen.insert(pin) {
                    report.push(EntityKind::Net, n, format!("{pin} appears twice"));
                }
            }
        }

        report.violations
    }

    fn check_lookups(&self) -> Vec<Violation> {
        let mut report = Report::new(CheckKind::Lookup);
        let lookups = &self.lookups;

        for block in self.blocks() {
            let b = block.index();
            if lookups.block_by_name.get(&self.block_names[b]) != Some(&block) {
                report.push(EntityKind::Block, b, "not found by name");
            }
        }
        for (name, &block) in &lookups.block_by_name {
            if !self.valid_block(block) || self.block_names[block.index()] != *name {
                report.push(EntityKind::Block, block.index(), "stale name entry");
            }
        }

        for port in self.ports() {
            let p = port.index();
            let key = (self.port_blocks[p], self.port_names[p]);
            if lookups.port_by_block_name.get(&key) != Some(&port) {
                report.push(EntityKind::Port, p, "not found by block and name");
            }
        }
        for (&(block, name), &port) in &lookups.port_by_block_name {
            if !self.valid_port(port)
                || self.port_blocks[port.index()] != block
                || self.port_names[port.index()] != name
            {
                report.push(EntityKind::Port, port.index(), "stale block and name entry");
            }
        }

        for pin in self.pins() {
            let i = pin.index();
            let key = (self.pin_ports[i], self.pin_port_bits[i]);
            if lookups.pin_by_port_bit.get(&key) != Some(&pin) {
                report.push(EntityKind::Pin, i, "not found by port bit");
            }
        }
        for (&(port, bit), &pin) in &lookups.pin_by_port_bit {
            if !self.valid_pin(pin)
                || self.pin_ports[pin.index()] != port
                || self.pin_port_bits[pin.index()] != bit
            {
                report.push(EntityKind::Pin, pin.index(), "stale port bit entry");
            }
        }

        for net in self.nets() {
            let n = net.index();
            if lookups.net_by_name.get(&self.net_names[n]) != Some(&net) {
                report.push(EntityKind::Net, n, "not found by name");
            }
        }
        for (name, &net) in &lookups.net_by_name {
            if !self.valid_net(net) || self.net_names[net.index()] != *name {
                report.push(EntityKind::Net, net.index(), "stale name entry");
            }
        }

        report.violations
    }

    fn check_strings(&self) -> Vec<Violation> {
        let mut report = Report::new(CheckKind::Strings);

        for (id, text) in self.strings.iter() {
            if self.strings.get(text) != Some(id) {
                report.push(
                    EntityKind::String,
                    id.as_raw() as usize,
                    format!("'{text}' does not map back to its handle"),
                );
            }
        }

        let names = [
            (EntityKind::Block, &self.block_names),
            (EntityKind::Port, &self.port_names),
            (EntityKind::Net, &self.net_names),
        ];
        for (kind, names) in names {
            for (i, name) in names.iter().enumerate() {
                if !self.strings.contains(*name) {
                    report.push(kind, i, format!("name {name} is not interned"));
                }
            }
        }

        report.violations
    }
}
