//! The ARP neighbor cache.
//!
//! Restricted to the needs of an Ethernet interface carrying IPv4: remembering the hardware
//! addresses of neighbors and which addresses have been asked for recently. Sending and answering
//! the messages themselves is done by the [`Interface`].
//!
//! [`Interface`]: ../eth/struct.Interface.html
mod neighbor;

pub use neighbor::{
    Neighbor,
    Mapping as NeighborMapping,
    Cache as NeighborCache,
};
