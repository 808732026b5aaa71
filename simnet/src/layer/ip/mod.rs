//! The IP layer.
//!
//! Forwarding of IPv4 datagrams between several [`Interface`]s. There is no local delivery here,
//! the router only moves datagrams from the interface that received them to the interface of the
//! best matching route.
//!
//! ## Routing
//!
//! Routes are kept in a binary trie over the address bits. The route whose prefix is the longest
//! one matching the destination wins, a route with prefix length zero acts as the default route.
//! Each route names the interface to send on and either a gateway on that interface's network or
//! that the destination itself is attached to it.
//!
//! ## Forwarding
//!
//! Every forwarded datagram has its hop limit decremented and its header checksum recomputed.
//! Datagrams that arrive with a hop limit of one or less are dropped, as are those for which no
//! route exists. No ICMP errors are generated.
//!
//! [`Interface`]: ../eth/struct.Interface.html
mod route;
mod router;

pub use route::{
    NextHop,
    Route,
    Routes,
};

pub use router::Router;
