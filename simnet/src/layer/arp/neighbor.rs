// Heads up! Before working on this file you should read, at least,
// the parts of RFC 1122 that discuss ARP.
use std::collections::BTreeMap;

use crate::time::{Duration, Instant};
use crate::wire::{EthernetAddress, Ipv4Address};

/// The state of a neighbor entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Mapping {
    /// An address is present.
    Address(EthernetAddress),

    /// We are currently waiting for the answer to a request.
    Requesting,
}

/// A cached neighbor.
///
/// Contains the hardware address or the knowledge that we asked for it, and the timestamp at
/// which this was last learned. Each kind of entry is considered stale after its own lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    mapping: Mapping,
    refreshed: Instant,
}

/// A neighbor cache translating IPv4 to Ethernet addresses.
///
/// Entries are only ever removed by an explicit call to [`expire`], which is supposed to be
/// called from the timer of the owning interface.
///
/// ```rust
/// use simnet::layer::arp::{NeighborCache, NeighborMapping};
/// use simnet::time::Instant;
/// use simnet::wire::{EthernetAddress, Ipv4Address};
///
/// let mut cache = NeighborCache::new();
/// let addr = Ipv4Address::new(10, 0, 0, 1);
/// assert!(cache.request(addr, Instant::ZERO));
/// // A second request is suppressed while the first is outstanding.
/// assert!(!cache.request(addr, Instant::from_millis(100u64)));
///
/// cache.fill(addr, EthernetAddress([2, 0, 0, 0, 0, 1]), Instant::from_millis(200u64));
/// assert_eq!(cache.lookup(addr), Some(NeighborMapping::Address(EthernetAddress([2, 0, 0, 0, 0, 1]))));
/// ```
///
/// [`expire`]: #method.expire
#[derive(Debug, Default, Clone)]
pub struct Cache {
    entries: BTreeMap<Ipv4Address, Neighbor>,
}

impl Cache {
    /// Lifetime of a learned hardware address.
    pub const ENTRY_LIFETIME: Duration = Duration::from_millis(30_000);

    /// Minimum delay between requests for the same address.
    pub const REQUEST_INTERVAL: Duration = Duration::from_millis(5_000);

    /// Create an empty cache.
    pub fn new() -> Self {
        Cache::default()
    }

    /// Look up the entry for a protocol address.
    pub fn lookup(&self, protocol_addr: Ipv4Address) -> Option<Mapping> {
        self.entries.get(&protocol_addr).map(|neighbor| neighbor.mapping)
    }

    /// Look up the hardware address of a neighbor.
    pub fn hardware_addr(&self, protocol_addr: Ipv4Address) -> Option<EthernetAddress> {
        self.entries.get(&protocol_addr).and_then(Neighbor::hardware_addr)
    }

    /// Insert or refresh a mapping to a hardware address.
    ///
    /// Replaces an outstanding request.
    pub fn fill(
        &mut self,
        protocol_addr: Ipv4Address,
        hardware_addr: EthernetAddress,
        timestamp: Instant,
    ) {
        let neighbor = Neighbor {
            mapping: Mapping::Address(hardware_addr),
            refreshed: timestamp,
        };
        self.entries.insert(protocol_addr, neighbor);
    }

    /// Note that a request for the address is about to be sent.
    ///
    /// Returns `false` and changes nothing if the address is already known or a request for it
    /// is still outstanding. In that case no request should be sent.
    pub fn request(&mut self, protocol_addr: Ipv4Address, timestamp: Instant) -> bool {
        if self.entries.contains_key(&protocol_addr) {
            return false;
        }

        self.entries.insert(protocol_addr, Neighbor {
            mapping: Mapping::Requesting,
            refreshed: timestamp,
        });
        true
    }

    /// Remove all entries that outlived their lifetime at `now`.
    pub fn expire(&mut self, now: Instant) {
        self.entries.retain(|_, neighbor| !neighbor.is_expired(now));
    }

    /// Iterate over all entries, ordered by protocol address.
    pub fn iter(&self) -> impl Iterator<Item=(Ipv4Address, Neighbor)> + '_ {
        self.entries.iter().map(|(&addr, &neighbor)| (addr, neighbor))
    }

    /// The number of entries, resolved or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Neighbor {
    /// The state of this entry.
    pub fn mapping(&self) -> Mapping {
        self.mapping
    }

    /// The hardware address, if it is known.
    pub fn hardware_addr(&self) -> Option<EthernetAddress> {
        match self.mapping {
            Mapping::Address(addr) => Some(addr),
            Mapping::Requesting => None,
        }
    }

    /// When the entry was created or last refreshed.
    pub fn refreshed(&self) -> Instant {
        self.refreshed
    }

    /// How long the entry stays valid after its last refresh.
    pub fn lifetime(&self) -> Duration {
        match self.mapping {
            Mapping::Address(_) => Cache::ENTRY_LIFETIME,
            Mapping::Requesting => Cache::REQUEST_INTERVAL,
        }
    }

    /// Whether strictly more than the lifetime passed since the last refresh.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.refreshed) > self.lifetime()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ADDR_A: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
    const ADDR_B: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);

    const HADDR_A: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 1]);
    const HADDR_B: EthernetAddress = EthernetAddress([0, 0, 0, 0, 0, 2]);

    #[test]
    fn fill() {
        let mut cache = Cache::new();
        assert_eq!(cache.hardware_addr(ADDR_A), None);

        cache.fill(ADDR_A, HADDR_A, Instant::ZERO);
        assert_eq!(cache.hardware_addr(ADDR_A), Some(HADDR_A));
        assert_eq!(cache.hardware_addr(ADDR_B), None);
    }

    #[test]
    fn replace() {
        let mut cache = Cache::new();
        cache.fill(ADDR_A, HADDR_A, Instant::ZERO);
        cache.fill(ADDR_A, HADDR_B, Instant::ZERO);
        assert_eq!(cache.hardware_addr(ADDR_A), Some(HADDR_B));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expire() {
        let mut cache = Cache::new();
        cache.fill(ADDR_A, HADDR_A, Instant::ZERO);

        cache.expire(Instant::ZERO + Cache::ENTRY_LIFETIME);
        assert_eq!(cache.hardware_addr(ADDR_A), Some(HADDR_A));

        cache.expire(Instant::ZERO + Cache::ENTRY_LIFETIME + Duration::from_millis(1));
        assert_eq!(cache.hardware_addr(ADDR_A), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn request_suppressed_until_expired() {
        let mut cache = Cache::new();
        assert!(cache.request(ADDR_A, Instant::ZERO));
        assert_eq!(cache.lookup(ADDR_A), Some(Mapping::Requesting));
        assert!(!cache.request(ADDR_A, Instant::from_millis(4_000u64)));

        cache.expire(Instant::ZERO + Cache::REQUEST_INTERVAL);
        assert!(!cache.request(ADDR_A, Instant::ZERO + Cache::REQUEST_INTERVAL));

        let later = Instant::ZERO + Cache::REQUEST_INTERVAL + Duration::from_millis(1);
        cache.expire(later);
        assert!(cache.request(ADDR_A, later));
    }

    #[test]
    fn request_for_known_address() {
        let mut cache = Cache::new();
        cache.fill(ADDR_A, HADDR_A, Instant::ZERO);
        assert!(!cache.request(ADDR_A, Instant::ZERO));
        assert_eq!(cache.hardware_addr(ADDR_A), Some(HADDR_A));
    }

    #[test]
    fn fill_answers_request() {
        let mut cache = Cache::new();
        cache.request(ADDR_A, Instant::ZERO);
        cache.fill(ADDR_A, HADDR_A, Instant::from_millis(10u64));
        let (addr, neighbor) = cache.iter().next().unwrap();
        assert_eq!(addr, ADDR_A);
        assert_eq!(neighbor.mapping(), Mapping::Address(HADDR_A));
        assert_eq!(neighbor.refreshed(), Instant::from_millis(10u64));
        assert_eq!(neighbor.lifetime(), Cache::ENTRY_LIFETIME);
    }
}
