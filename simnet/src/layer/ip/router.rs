use crate::layer::{Error, Result};
use crate::layer::eth::Interface;
use crate::wire::{Ipv4Address, Ipv4Datagram};

use super::route::{NextHop, Route, Routes};

/// An IPv4 router forwarding between a set of interfaces.
///
/// Interfaces are referred to by the index returned from [`add_interface`]. The router takes the
/// datagrams each interface has received and hands them to the interface of the best matching
/// route. Moving frames between the interfaces and their links is left to the owner.
///
/// [`add_interface`]: #method.add_interface
#[derive(Debug, Default)]
pub struct Router {
    interfaces: Vec<Interface>,
    routes: Routes,
}

impl Router {
    /// Create a router without interfaces or routes.
    pub fn new() -> Self {
        Router::default()
    }

    /// Attach an interface, returning its index.
    pub fn add_interface(&mut self, interface: Interface) -> usize {
        let index = self.interfaces.len();
        net_debug!("router: attached {} as interface {}", interface.name(), index);
        self.interfaces.push(interface);
        index
    }

    /// The interface with the given index.
    pub fn interface(&self, index: usize) -> Option<&Interface> {
        self.interfaces.get(index)
    }

    /// Mutable access to the interface with the given index.
    pub fn interface_mut(&mut self, index: usize) -> Option<&mut Interface> {
        self.interfaces.get_mut(index)
    }

    /// All attached interfaces, by index.
    pub fn interfaces_mut(&mut self) -> &mut [Interface] {
        &mut self.interfaces
    }

    /// The routing table.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Add a route for the `prefix_len` most significant bits of `prefix`.
    ///
    /// Fails with `BadSize` for a prefix longer than 32 bits and with `Illegal` when no interface
    /// with the given index is attached.
    pub fn add_route(
        &mut self,
        prefix: Ipv4Address,
        prefix_len: u8,
        next_hop: NextHop,
        interface: usize,
    ) -> Result<()> {
        if interface >= self.interfaces.len() {
            return Err(Error::Illegal);
        }

        self.routes.add(prefix, prefix_len, Route { next_hop, interface })?;

        match next_hop {
            NextHop::Direct => net_debug!("router: {}/{} => (direct) on interface {}",
                prefix.mask(prefix_len), prefix_len, interface),
            NextHop::Via(gateway) => net_debug!("router: {}/{} => {} on interface {}",
                prefix.mask(prefix_len), prefix_len, gateway, interface),
        }
        Ok(())
    }

    /// The route for `address` with the longest matching prefix.
    pub fn longest_prefix_match(&self, address: Ipv4Address) -> Option<Route> {
        self.routes.lookup(address)
    }

    /// Forward all datagrams received by any interface.
    ///
    /// Interfaces are drained in order of their index. Datagrams without a route and those whose
    /// hop limit would drop to zero are dropped, the others leave with a decremented hop limit.
    pub fn route(&mut self) {
        for index in 0..self.interfaces.len() {
            while let Some(datagram) = self.interfaces[index].pop_datagram() {
                let repr = datagram.repr;
                if let Err(err) = self.forward(datagram) {
                    net_trace!("router: dropped {} from interface {}: {}", repr, index, err);
                }
            }
        }
    }

    /// Forward a single datagram.
    ///
    /// Fails with `Unreachable` when no route matches and with `Exhausted` when the hop limit is
    /// used up. The datagram is consumed in either case.
    pub fn forward(&mut self, mut datagram: Ipv4Datagram) -> Result<()> {
        let dst_addr = datagram.repr.dst_addr;
        let route = self.routes.lookup(dst_addr).ok_or(Error::Unreachable)?;

        if datagram.repr.hop_limit <= 1 {
            return Err(Error::Exhausted);
        }
        datagram.repr.hop_limit -= 1;

        let interface = self.interfaces
            .get_mut(route.interface)
            .ok_or(Error::Illegal)?;
        interface.send_datagram(datagram, route.next_hop.resolve(dst_addr));
        Ok(())
    }
}
