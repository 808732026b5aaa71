use std::collections::{BTreeMap, VecDeque};

use crate::layer::arp::NeighborCache;
use crate::time::{Duration, Instant};
use crate::wire::{ArpOperation, ArpRepr};
use crate::wire::{EthernetAddress, EthernetFrame, EthernetProtocol, EthernetRepr};
use crate::wire::{Ipv4Address, Ipv4Datagram};

/// A network interface connecting IPv4 to an Ethernet link.
///
/// Resolves the hardware address of each next hop with ARP, holding back datagrams while the
/// resolution is in progress. Outbound frames are queued until the owner takes them with
/// [`poll_frame`], inbound datagrams until the owner takes them with [`pop_datagram`].
///
/// [`poll_frame`]: #method.poll_frame
/// [`pop_datagram`]: #method.pop_datagram
#[derive(Debug)]
pub struct Interface {
    name: String,

    /// Our own address.
    ///
    /// We ignored any frames with mismatching destination.
    ethernet_address: EthernetAddress,

    /// The address we answer ARP requests for.
    ip_address: Ipv4Address,

    neighbors: NeighborCache,

    /// The clock, advanced by `tick`.
    now: Instant,

    /// Datagrams waiting for their next hop to be resolved, with the time they were queued.
    waiting: BTreeMap<Ipv4Address, VecDeque<(Ipv4Datagram, Instant)>>,

    outbound: VecDeque<EthernetFrame>,

    received: VecDeque<Ipv4Datagram>,
}

impl Interface {
    /// Create an interface with the given hardware and protocol address.
    pub fn new<N>(name: N, ethernet_address: EthernetAddress, ip_address: Ipv4Address) -> Self
        where N: Into<String>
    {
        let name = name.into();
        net_debug!("{}: interface has Ethernet address {} and IP address {}",
            name, ethernet_address, ip_address);
        Interface {
            name,
            ethernet_address,
            ip_address,
            neighbors: NeighborCache::new(),
            now: Instant::ZERO,
            waiting: BTreeMap::new(),
            outbound: VecDeque::new(),
            received: VecDeque::new(),
        }
    }

    /// The name given at construction, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hardware address of this interface.
    pub fn ethernet_address(&self) -> EthernetAddress {
        self.ethernet_address
    }

    /// The IPv4 address of this interface.
    pub fn ip_address(&self) -> Ipv4Address {
        self.ip_address
    }

    /// The neighbor cache.
    pub fn neighbors(&self) -> &NeighborCache {
        &self.neighbors
    }

    /// The time of the interface clock.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Send a datagram to the neighbor `next_hop`.
    ///
    /// If the hardware address of `next_hop` is not known the datagram is queued and, unless one
    /// was sent recently, an ARP request is broadcast.
    pub fn send_datagram(&mut self, datagram: Ipv4Datagram, next_hop: Ipv4Address) {
        if let Some(hardware_addr) = self.neighbors.hardware_addr(next_hop) {
            self.transmit_datagram(datagram, hardware_addr);
            return;
        }

        self.waiting
            .entry(next_hop)
            .or_default()
            .push_back((datagram, self.now));

        if !self.neighbors.request(next_hop, self.now) {
            return;
        }

        net_debug!("{}: who has {}? tell {}", self.name, next_hop, self.ip_address);
        let request = ArpRepr {
            operation: ArpOperation::Request,
            source_hardware_addr: self.ethernet_address,
            source_protocol_addr: self.ip_address,
            target_hardware_addr: EthernetAddress::default(),
            target_protocol_addr: next_hop,
        };
        self.transmit(EthernetAddress::BROADCAST, EthernetProtocol::Arp, request.serialize());
    }

    /// Process a frame received from the link.
    ///
    /// Frames for other hosts and frames that can not be parsed are dropped silently.
    pub fn recv_frame(&mut self, frame: &EthernetFrame) {
        let dst_addr = frame.repr.dst_addr;
        if dst_addr != self.ethernet_address && !dst_addr.is_broadcast() {
            return;
        }

        match frame.repr.ethertype {
            EthernetProtocol::Ipv4 => match Ipv4Datagram::parse(&frame.payload) {
                Ok(datagram) => self.received.push_back(datagram),
                Err(err) => net_trace!("{}: dropped malformed datagram: {}", self.name, err),
            },
            EthernetProtocol::Arp => match ArpRepr::parse(&frame.payload) {
                Ok(message) => self.recv_arp(&message),
                Err(err) => net_trace!("{}: dropped malformed arp message: {}", self.name, err),
            },
            _ => (),
        }
    }

    /// Parse raw bytes from the link as a frame and process it.
    pub fn recv_frame_bytes(&mut self, data: &[u8]) {
        match EthernetFrame::parse(data) {
            Ok(frame) => self.recv_frame(&frame),
            Err(err) => net_trace!("{}: dropped malformed frame: {}", self.name, err),
        }
    }

    /// Advance the clock by `elapsed` and expire stale state.
    ///
    /// Learned addresses are forgotten after [`ENTRY_LIFETIME`]. Requests may be repeated and
    /// queued datagrams are dropped after [`REQUEST_INTERVAL`].
    ///
    /// [`ENTRY_LIFETIME`]: ../arp/struct.NeighborCache.html#associatedconstant.ENTRY_LIFETIME
    /// [`REQUEST_INTERVAL`]: ../arp/struct.NeighborCache.html#associatedconstant.REQUEST_INTERVAL
    pub fn tick(&mut self, elapsed: Duration) {
        self.now += elapsed;
        let now = self.now;

        self.neighbors.expire(now);
        self.waiting.retain(|_, queue| {
            queue.retain(|(_, queued)| now.duration_since(*queued) <= NeighborCache::REQUEST_INTERVAL);
            !queue.is_empty()
        });
    }

    /// Take the next frame to put on the link.
    pub fn poll_frame(&mut self) -> Option<EthernetFrame> {
        self.outbound.pop_front()
    }

    /// The queue of datagrams received and not yet taken.
    pub fn datagrams_received(&mut self) -> &mut VecDeque<Ipv4Datagram> {
        &mut self.received
    }

    /// Take the oldest received datagram.
    pub fn pop_datagram(&mut self) -> Option<Ipv4Datagram> {
        self.received.pop_front()
    }

    fn recv_arp(&mut self, message: &ArpRepr) {
        if message.operation == ArpOperation::Request
            && message.target_protocol_addr == self.ip_address
        {
            net_debug!("{}: {} is at {}, telling {}",
                self.name, self.ip_address, self.ethernet_address, message.source_protocol_addr);
            let reply = ArpRepr {
                operation: ArpOperation::Reply,
                source_hardware_addr: self.ethernet_address,
                source_protocol_addr: self.ip_address,
                target_hardware_addr: message.source_hardware_addr,
                target_protocol_addr: message.source_protocol_addr,
            };
            self.transmit(message.source_hardware_addr, EthernetProtocol::Arp, reply.serialize());
        }

        let protocol_addr = message.source_protocol_addr;
        let hardware_addr = message.source_hardware_addr;
        self.neighbors.fill(protocol_addr, hardware_addr, self.now);

        if let Some(queue) = self.waiting.remove(&protocol_addr) {
            net_debug!("{}: resolved {} to {}, sending {} queued datagrams",
                self.name, protocol_addr, hardware_addr, queue.len());
            for (datagram, _) in queue {
                self.transmit_datagram(datagram, hardware_addr);
            }
        }
    }

    fn transmit_datagram(&mut self, datagram: Ipv4Datagram, dst_addr: EthernetAddress) {
        self.transmit(dst_addr, EthernetProtocol::Ipv4, datagram.serialize());
    }

    fn transmit(&mut self, dst_addr: EthernetAddress, ethertype: EthernetProtocol, payload: Vec<u8>) {
        let frame = EthernetFrame {
            repr: EthernetRepr {
                src_addr: self.ethernet_address,
                dst_addr,
                ethertype,
            },
            payload,
        };
        net_trace!("{}: sending {}", self.name, frame.repr);
        self.outbound.push_back(frame);
    }
}
