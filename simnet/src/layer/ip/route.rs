//! CIDR, relevant rfc1519, rfc4632.
//!
use crate::layer::{Error, Result};
use crate::wire::{Ipv4Address, Ipv4Cidr};

/// Where to send a datagram matching a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextHop {
    /// The network is attached to the interface, send to the destination itself.
    Direct,

    /// Send to a router on the attached network.
    Via(Ipv4Address),
}

impl NextHop {
    /// The neighbor to hand a datagram for `destination` to.
    pub fn resolve(self, destination: Ipv4Address) -> Ipv4Address {
        match self {
            NextHop::Direct => destination,
            NextHop::Via(gateway) => gateway,
        }
    }
}

/// A forwarding decision for a prefix of addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
    /// Next hop for this network.
    pub next_hop: NextHop,

    /// Index of the interface to send on.
    pub interface: usize,
}

#[derive(Debug, Default, Clone)]
struct Node {
    /// Indices of the children for a zero and a one bit.
    children: [Option<usize>; 2],
    route: Option<Route>,
}

/// A routing table with longest prefix matching.
///
/// A binary trie over the address bits, most significant first. The nodes are kept in one arena
/// and refer to their children by index; the root at index zero stands for the empty prefix.
///
/// ```rust
/// use simnet::layer::ip::{NextHop, Route, Routes};
/// use simnet::wire::Ipv4Address;
///
/// let mut routes = Routes::new();
/// let gateway = Route { next_hop: NextHop::Via(Ipv4Address::new(10, 0, 0, 1)), interface: 0 };
/// let local = Route { next_hop: NextHop::Direct, interface: 1 };
/// routes.add(Ipv4Address::UNSPECIFIED, 0, gateway).unwrap();
/// routes.add(Ipv4Address::new(192, 168, 0, 0), 16, local).unwrap();
///
/// assert_eq!(routes.lookup(Ipv4Address::new(192, 168, 3, 4)), Some(local));
/// assert_eq!(routes.lookup(Ipv4Address::new(8, 8, 8, 8)), Some(gateway));
/// ```
#[derive(Debug, Clone)]
pub struct Routes {
    nodes: Vec<Node>,
}

impl Routes {
    const ROOT: usize = 0;

    /// Creates an empty routing table.
    pub fn new() -> Self {
        Routes { nodes: vec![Node::default()] }
    }

    /// Add a route for all addresses starting with the first `prefix_len` bits of `prefix`.
    ///
    /// Replaces the route of the exact same prefix, if any. The bits of `prefix` beyond the
    /// prefix length are ignored.
    pub fn add(&mut self, prefix: Ipv4Address, prefix_len: u8, route: Route) -> Result<()> {
        if prefix_len > 32 {
            return Err(Error::BadSize);
        }

        let bits = prefix.to_network_integer();
        let mut node = Self::ROOT;
        for depth in 0..prefix_len {
            let bit = Self::bit(bits, depth);
            node = match self.nodes[node].children[bit] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children[bit] = Some(child);
                    child
                },
            };
        }

        self.nodes[node].route = Some(route);
        Ok(())
    }

    /// Find the route with the longest prefix matching `address`.
    pub fn lookup(&self, address: Ipv4Address) -> Option<Route> {
        let bits = address.to_network_integer();
        let mut node = &self.nodes[Self::ROOT];
        let mut best = node.route;

        for depth in 0..32 {
            node = match node.children[Self::bit(bits, depth)] {
                Some(child) => &self.nodes[child],
                None => break,
            };
            if node.route.is_some() {
                best = node.route;
            }
        }

        best
    }

    /// Iterate over all routes and the CIDR blocks they were added for.
    ///
    /// The order is that of a depth first walk, zero bits before one bits.
    pub fn iter(&self) -> impl Iterator<Item=(Ipv4Cidr, Route)> + '_ {
        let mut stack = vec![(Self::ROOT, 0u32, 0u8)];
        core::iter::from_fn(move || {
            while let Some((index, bits, depth)) = stack.pop() {
                let node = &self.nodes[index];
                for bit in (0..2).rev() {
                    if let Some(child) = node.children[bit] {
                        let bits = bits | ((bit as u32) << (31 - u32::from(depth)));
                        stack.push((child, bits, depth + 1));
                    }
                }
                if let Some(route) = node.route {
                    let cidr = Ipv4Cidr::new(Ipv4Address::from_network_integer(bits), depth);
                    return Some((cidr, route));
                }
            }
            None
        })
    }

    /// The number of routes in the table.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.route.is_some()).count()
    }

    /// Whether the table contains no routes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bit(bits: u32, depth: u8) -> usize {
        ((bits >> (31 - u32::from(depth))) & 1) as usize
    }
}

impl Default for Routes {
    fn default() -> Self {
        Routes::new()
    }
}
