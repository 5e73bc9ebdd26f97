//! Net store: hyperedges with one driver slot and any number of sinks.

use crate::error::{NetlistError, NetlistResult};
use crate::ids::{BlockId, EntityId, NetId, PinId};
use crate::netlist::{AtomNetlist, PinRole};
use std::collections::HashSet;

impl<'m> AtomNetlist<'m> {
    /// Creates an empty net (no driver, no sinks), or returns the existing
    /// net of the same name.
    pub fn create_net(&mut self, name: &str) -> NetId {
        let name_id = self.strings.get_or_intern(name);
        if let Some(&existing) = self.lookups.net_by_name.get(&name_id) {
            return existing;
        }

        let id = NetId::from_raw(self.net_ids.len() as u32);
        self.net_ids.push(Some(id));
        self.net_names.push(name_id);
        self.net_pins.push(vec![None]);

        self.lookups.net_by_name.insert(name_id, id);
        id
    }

    /// Creates a fully specified net from an optional driver and a list of sinks.
    ///
    /// Unlike [`create_net`](AtomNetlist::create_net) the name must be new.
    ///
    /// # Errors
    ///
    /// Fails without changing the netlist if the name already names a live net,
    /// if any pin is not live, already connected, listed twice, or has the
    /// wrong role for its slot.
    pub fn add_net(
        &mut self,
        name: &str,
        driver: Option<PinId>,
        sinks: &[PinId],
    ) -> NetlistResult<NetId> {
        if self.find_net(name).is_some() {
            return Err(NetlistError::DuplicateNet(name.to_string()));
        }

        let mut seen = HashSet::new();
        let slots = driver
            .map(|pin| (pin, PinRole::Driver))
            .into_iter()
            .chain(sinks.iter().map(|&pin| (pin, PinRole::Sink)));
        for (pin, role) in slots {
            if !self.valid_pin(pin) {
                return Err(NetlistError::InvalidPin(pin));
            }
            if self.pin_roles[pin.index()] != role {
                return Err(NetlistError::RoleMismatch(pin));
            }
            if let Some(net) = self.pin_nets[pin.index()] {
                return Err(NetlistError::PinAlreadyConnected { pin, net });
            }
            if !seen.insert(pin) {
                return Err(NetlistError::DuplicatePin(pin));
            }
        }

        let id = self.create_net(name);
        let pins = &mut self.net_pins[id.index()];
        pins[0] = driver;
        pins.extend(sinks.iter().copied().map(Some));

        for pin in driver.into_iter().chain(sinks.iter().copied()) {
            self.pin_nets[pin.index()] = Some(id);
        }
        Ok(id)
    }

    /// Marks a net removed. Its pins stay, but lose their net association.
    pub fn remove_net(&mut self, id: NetId) -> NetlistResult<()> {
        if !self.valid_net(id) {
            return Err(NetlistError::InvalidNet(id));
        }
        let i = id.index();
        for pin in std::mem::take(&mut self.net_pins[i]).into_iter().flatten() {
            self.pin_nets[pin.index()] = None;
        }

        self.lookups.net_by_name.remove(&self.net_names[i]);
        self.net_ids[i] = None;
        self.dirty = true;
        tracing::trace!(net = %id, "removed net");
        Ok(())
    }

    /// Disconnects one pin from a net, leaving both the pin and the net live.
    ///
    /// Removing the driver leaves the net without a driver.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is not live or the pin is not on `net`.
    pub fn remove_net_pin(&mut self, net: NetId, pin: PinId) -> NetlistResult<()> {
        if !self.valid_net(net) {
            return Err(NetlistError::InvalidNet(net));
        }
        if !self.valid_pin(pin) {
            return Err(NetlistError::InvalidPin(pin));
        }
        if self.pin_nets[pin.index()] != Some(net) {
            return Err(NetlistError::PinNotOnNet { pin, net });
        }

        self.unlink_net_pin(net, pin);
        self.pin_nets[pin.index()] = None;
        self.dirty = true;
        Ok(())
    }

    /// Clears the slot holding `pin` in the net's pin list.
    ///
    /// Sink slots are left empty rather than shifted; compaction squeezes them out.
    pub(crate) fn unlink_net_pin(&mut self, net: NetId, pin: PinId) {
        if let Some(slot) = self.net_pins[net.index()]
            .iter_mut()
            .find(|slot| **slot == Some(pin))
        {
            *slot = None;
        }
    }

    /// Returns the name of a net.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live net (as do all `net_*` accessors).
    pub fn net_name(&self, id: NetId) -> &str {
        let i = self.net_index(id);
        self.strings.resolve(self.net_names[i])
    }

    /// Returns the net's raw pin list: the driver slot first, then the sinks.
    ///
    /// Until the next compaction, slots of removed pins read as `None`.
    pub fn net_pins(&self, id: NetId) -> &[Option<PinId>] {
        &self.net_pins[self.net_index(id)]
    }

    /// Returns the net's driver pin, if it has one.
    pub fn net_driver(&self, id: NetId) -> Option<PinId> {
        self.net_pins(id).first().copied().flatten()
    }

    /// Iterates over the net's sink pins.
    pub fn net_sinks(&self, id: NetId) -> impl Iterator<Item = PinId> + '_ {
        self.net_pins(id).iter().skip(1).flatten().copied()
    }

    /// Returns the block owning the net's driver pin, if it has one.
    pub fn net_driver_block(&self, id: NetId) -> Option<BlockId> {
        self.net_driver(id).map(|pin| self.pin_block(pin))
    }
}

#[cfg(test)]
mod tests {
    use crate::netlist::{AtomNetlist, PinRole};
    use crate::test_models::lut2;
    use crate::{NetlistError, PinId};
    use atom_arch::Model;

    /// Creates the pins `drv.out[0]`, `s1.in[0]` and `s2.in[0]`, all unconnected.
    fn three_pins<'m>(nl: &mut AtomNetlist<'m>, lut: &'m Model) -> (PinId, PinId, PinId) {
        let drv = nl.create_block("drv", lut);
        let s1 = nl.create_block("s1", lut);
        let s2 = nl.create_block("s2", lut);
        let out = nl.create_port(drv, "out").unwrap();
        let in1 = nl.create_port(s1, "in").unwrap();
        let in2 = nl.create_port(s2, "in").unwrap();
        (
            nl.create_pin(out, 0, None, PinRole::Driver).unwrap(),
            nl.create_pin(in1, 0, None, PinRole::Sink).unwrap(),
            nl.create_pin(in2, 0, None, PinRole::Sink).unwrap(),
        )
    }

    #[test]
    fn create_net_is_idempotent() {
        let mut nl = AtomNetlist::new("top");
        let a = nl.create_net("n");
        let b = nl.create_net("n");
        assert_eq!(a, b);
        assert_eq!(nl.net_count(), 1);
        assert_eq!(nl.net_name(a), "n");
        assert_eq!(nl.net_driver(a), None);
        assert_eq!(nl.net_sinks(a).count(), 0);
        assert_eq!(nl.net_pins(a), &[None]);
    }

    #[test]
    fn add_net_installs_driver_and_sinks() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, s2) = three_pins(&mut nl, &lut);

        let net = nl.add_net("n1", Some(d), &[s1, s2]).unwrap();
        assert_eq!(nl.net_driver(net), Some(d));
        assert_eq!(nl.net_sinks(net).collect::<Vec<_>>(), vec![s1, s2]);
        assert_eq!(nl.pin_net(d), Some(net));
        assert_eq!(nl.pin_net(s2), Some(net));
        assert_eq!(nl.net_driver_block(net), Some(nl.pin_block(d)));
        assert!(nl.verify().is_ok());
    }

    #[test]
    fn add_net_without_driver() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (_, s1, _) = three_pins(&mut nl, &lut);
        let net = nl.add_net("n1", None, &[s1]).unwrap();
        assert_eq!(nl.net_driver(net), None);
        assert_eq!(nl.net_driver_block(net), None);
        assert_eq!(nl.net_pins(net), &[None, Some(s1)]);
    }

    #[test]
    fn add_net_rejects_duplicate_name_without_mutation() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, _) = three_pins(&mut nl, &lut);
        let existing = nl.create_net("n1");

        let err = nl.add_net("n1", Some(d), &[s1]);
        assert_eq!(err, Err(NetlistError::DuplicateNet("n1".to_string())));
        assert_eq!(nl.net_count(), 1);
        assert_eq!(nl.pin_net(d), None);
        assert_eq!(nl.net_driver(existing), None);
    }

    #[test]
    fn add_net_rejects_bad_pins() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, s2) = three_pins(&mut nl, &lut);

        assert_eq!(
            nl.add_net("a", Some(s1), &[]),
            Err(NetlistError::RoleMismatch(s1))
        );
        assert_eq!(
            nl.add_net("a", None, &[s1, s1]),
            Err(NetlistError::DuplicatePin(s1))
        );
        let taken = nl.add_net("taken", None, &[s2]).unwrap();
        assert_eq!(
            nl.add_net("a", Some(d), &[s2]),
            Err(NetlistError::PinAlreadyConnected { pin: s2, net: taken })
        );
        nl.remove_pin(s1).unwrap();
        assert_eq!(
            nl.add_net("a", Some(d), &[s1]),
            Err(NetlistError::InvalidPin(s1))
        );
        assert_eq!(nl.find_net("a"), None);
        assert_eq!(nl.pin_net(d), None);
    }

    #[test]
    fn remove_net_keeps_pins() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, s2) = three_pins(&mut nl, &lut);
        let net = nl.add_net("n1", Some(d), &[s1, s2]).unwrap();

        nl.remove_net(net).unwrap();
        assert!(nl.dirty());
        assert!(!nl.valid_net(net));
        assert_eq!(nl.find_net("n1"), None);
        for pin in [d, s1, s2] {
            assert!(nl.valid_pin(pin));
            assert_eq!(nl.pin_net(pin), None);
        }
        assert!(nl.verify().is_ok());
        assert_eq!(nl.remove_net(net), Err(NetlistError::InvalidNet(net)));
    }

    #[test]
    fn remove_net_pin_detaches_one_pin() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, s2) = three_pins(&mut nl, &lut);
        let net = nl.add_net("n1", Some(d), &[s1, s2]).unwrap();

        nl.remove_net_pin(net, s1).unwrap();
        assert_eq!(nl.pin_net(s1), None);
        assert!(nl.valid_pin(s1));
        assert_eq!(nl.net_sinks(net).collect::<Vec<_>>(), vec![s2]);

        nl.remove_net_pin(net, d).unwrap();
        assert_eq!(nl.net_driver(net), None);
        assert!(nl.verify().is_ok());

        assert_eq!(
            nl.remove_net_pin(net, d),
            Err(NetlistError::PinNotOnNet { pin: d, net })
        );
    }

    #[test]
    fn detached_driver_can_drive_a_new_net() {
        let lut = lut2();
        let mut nl = AtomNetlist::new("top");
        let (d, s1, _) = three_pins(&mut nl, &lut);
        let old = nl.add_net("old", Some(d), &[s1]).unwrap();
        nl.remove_net_pin(old, d).unwrap();
        let new = nl.add_net("new", Some(d), &[]).unwrap();
        assert_eq!(nl.pin_net(d), Some(new));
        assert!(nl.verify().is_ok());
    }
}
