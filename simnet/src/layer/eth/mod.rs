//! The ethernet layer.
//!
//! This is tasked with putting IPv4 datagrams into an ethernet framing and taking them out again.
//! The only protocol logic involved is address resolution: the hardware address of a next hop is
//! learned with ARP, remembered in the [`NeighborCache`] and refreshed by any ARP message its
//! owner sends us.
//!
//! [`NeighborCache`]: ../arp/struct.NeighborCache.html
mod interface;
#[cfg(test)]
mod tests;

pub use interface::Interface;
