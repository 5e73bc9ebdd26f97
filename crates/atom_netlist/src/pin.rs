//! Pin store: single-bit endpoints binding a port bit to a net.

use crate::error::{NetlistError, NetlistResult};
use crate::ids::{BitIndex, BlockId, EntityId, NetId, PinId, PortId};
use crate::netlist::{AtomNetlist, PinRole};

impl<'m> AtomNetlist<'m> {
    /// Creates the pin at `bit` of `port`, or returns the pin already there.
    ///
    /// If `net` is given the pin is connected to it: a driver takes the net's
    /// driver slot, a sink is appended to the net's sinks. For an existing pin
    /// the `net` and `role` arguments are ignored.
    ///
    /// # Errors
    ///
    /// Fails without changing the netlist if `port` or `net` is not live, if
    /// `bit` is not below the port width, or if a new driver is requested for
    /// a net that already has one ([`NetlistError::DriverConflict`]).
    pub fn create_pin(
        &mut self,
        port: PortId,
        bit: BitIndex,
        net: Option<NetId>,
        role: PinRole,
    ) -> NetlistResult<PinId> {
        if !self.valid_port(port) {
            return Err(NetlistError::InvalidPort(port));
        }
        let width = self.port_widths[port.index()];
        if bit >= width {
            return Err(NetlistError::BitOutOfRange { port, bit, width });
        }
        if let Some(net) = net {
            if !self.valid_net(net) {
                return Err(NetlistError::InvalidNet(net));
            }
        }
        if let Some(&existing) = self.lookups.pin_by_port_bit.get(&(port, bit)) {
            return Ok(existing);
        }
        if let (Some(net), PinRole::Driver) = (net, role) {
            if let Some(existing) = self.net_pins[net.index()][0] {
                return Err(NetlistError::DriverConflict { net, existing });
            }
        }

        let id = PinId::from_raw(self.pin_ids.len() as u32);
        self.pin_ids.push(Some(id));
        self.pin_ports.push(port);
        self.pin_port_bits.push(bit);
        self.pin_nets.push(net);
        self.pin_roles.push(role);

        self.port_pins[port.index()][bit as usize] = Some(id);
        self.lookups.pin_by_port_bit.insert((port, bit), id);

        if let Some(net) = net {
            let pins = &mut self.net_pins[net.index()];
            match role {
                PinRole::Driver => pins[0] = Some(id),
                PinRole::Sink => pins.push(Some(id)),
            }
        }
        Ok(id)
    }

    /// Marks a pin removed, clearing its port bit and detaching it from its net.
    pub fn remove_pin(&mut self, id: PinId) -> NetlistResult<()> {
        if !self.valid_pin(id) {
            return Err(NetlistError::InvalidPin(id));
        }
        self.invalidate_pin(id);
        Ok(())
    }

    pub(crate) fn invalidate_pin(&mut self, id: PinId) {
        let i = id.index();
        if let Some(net) = self.pin_nets[i].take() {
            self.unlink_net_pin(net, id);
        }

        let port = self.pin_ports[i];
        let bit = self.pin_port_bits[i];
        self.port_pins[port.index()][bit as usize] = None;
        self.lookups.pin_by_port_bit.remove(&(port, bit));
        self.pin_ids[i] = None;
        self.dirty = true;
        tracing::trace!(pin = %id, "removed pin");
    }

    /// Returns the net a pin is connected to, if any.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a live pin (as do all `pin_*` accessors).
    pub fn pin_net(&self, id: PinId) -> Option<NetId> {
        self.pin_nets[self.pin_index(id)]
    }

    /// Returns whether the pin drives or sinks its net.
    pub fn pin_role(&self, id: PinId) -> PinRole {
        self.pin_roles[self.pin_index(id)]
    }

    /// Returns the port that owns a pin.
    pub fn pin_port(&self, id: PinId) -> PortId {
        self.pin_ports[self.pin_index(id)]
    }

    /// Returns the pin's bit position within its port.
    pub fn pin_port_bit(&self, id: PinId) -> BitIndex {
        self.pin_port_bits[self.pin_index(id)]
    }

    /// Returns the block that owns the pin's port.
    pub fn pin_block(&self, id: PinId) -> BlockId {
        self.port_blocks[self.pin_port(id).index()]
    }
}
