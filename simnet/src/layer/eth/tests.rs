use super::*;
use crate::layer::arp::NeighborCache;
use crate::time::Duration;
use crate::wire::{ArpOperation, ArpRepr, IpProtocol};
use crate::wire::{EthernetAddress, EthernetFrame, EthernetProtocol, EthernetRepr};
use crate::wire::{Ipv4Address, Ipv4Datagram};

const LOCAL_ETH: EthernetAddress = EthernetAddress([2, 0, 0, 0, 0, 1]);
const LOCAL_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 1);
const REMOTE_ETH: EthernetAddress = EthernetAddress([2, 0, 0, 0, 0, 2]);
const REMOTE_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 2);
const OTHER_ETH: EthernetAddress = EthernetAddress([2, 0, 0, 0, 0, 9]);
const OTHER_IP: Ipv4Address = Ipv4Address::new(10, 0, 0, 9);

fn interface() -> Interface {
    Interface::new("eth0", LOCAL_ETH, LOCAL_IP)
}

fn datagram(payload: &[u8]) -> Ipv4Datagram {
    Ipv4Datagram::new(LOCAL_IP, Ipv4Address::new(192, 168, 0, 1), IpProtocol::Udp, payload.to_vec())
}

fn drain(interface: &mut Interface) -> Vec<EthernetFrame> {
    core::iter::from_fn(|| interface.poll_frame()).collect()
}

fn frame(dst_addr: EthernetAddress, ethertype: EthernetProtocol, payload: Vec<u8>) -> EthernetFrame {
    EthernetFrame {
        repr: EthernetRepr { src_addr: REMOTE_ETH, dst_addr, ethertype },
        payload,
    }
}

fn arp(operation: ArpOperation, target_hardware_addr: EthernetAddress, target_protocol_addr: Ipv4Address)
    -> EthernetFrame
{
    let dst_addr = match operation {
        ArpOperation::Request => EthernetAddress::BROADCAST,
        _ => target_hardware_addr,
    };
    let message = ArpRepr {
        operation,
        source_hardware_addr: REMOTE_ETH,
        source_protocol_addr: REMOTE_IP,
        target_hardware_addr,
        target_protocol_addr,
    };
    frame(dst_addr, EthernetProtocol::Arp, message.serialize())
}

fn reply() -> EthernetFrame {
    arp(ArpOperation::Reply, LOCAL_ETH, LOCAL_IP)
}

fn assert_request_for(frame: &EthernetFrame, target: Ipv4Address) {
    assert_eq!(frame.repr.dst_addr, EthernetAddress::BROADCAST);
    assert_eq!(frame.repr.src_addr, LOCAL_ETH);
    assert_eq!(frame.repr.ethertype, EthernetProtocol::Arp);
    let message = ArpRepr::parse(&frame.payload).unwrap();
    assert_eq!(message.operation, ArpOperation::Request);
    assert_eq!(message.source_hardware_addr, LOCAL_ETH);
    assert_eq!(message.source_protocol_addr, LOCAL_IP);
    assert_eq!(message.target_protocol_addr, target);
}

fn assert_datagram_to(frame: &EthernetFrame, dst_addr: EthernetAddress, expected: &Ipv4Datagram) {
    assert_eq!(frame.repr.dst_addr, dst_addr);
    assert_eq!(frame.repr.src_addr, LOCAL_ETH);
    assert_eq!(frame.repr.ethertype, EthernetProtocol::Ipv4);
    assert_eq!(&Ipv4Datagram::parse(&frame.payload).unwrap(), expected);
}

#[test]
fn unresolved_next_hop_is_requested_once() {
    let mut interface = interface();
    interface.send_datagram(datagram(b"first"), REMOTE_IP);

    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_request_for(&frames[0], REMOTE_IP);

    interface.tick(Duration::from_millis(1_000));
    interface.send_datagram(datagram(b"second"), REMOTE_IP);
    assert!(drain(&mut interface).is_empty());
}

#[test]
fn reply_flushes_queue() {
    let mut interface = interface();
    interface.send_datagram(datagram(b"first"), REMOTE_IP);
    interface.send_datagram(datagram(b"second"), REMOTE_IP);
    drain(&mut interface);

    interface.recv_frame(&reply());
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 2);
    assert_datagram_to(&frames[0], REMOTE_ETH, &datagram(b"first"));
    assert_datagram_to(&frames[1], REMOTE_ETH, &datagram(b"second"));
    assert_eq!(interface.neighbors().hardware_addr(REMOTE_IP), Some(REMOTE_ETH));

    // Now resolved, sent right away.
    interface.send_datagram(datagram(b"third"), REMOTE_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_datagram_to(&frames[0], REMOTE_ETH, &datagram(b"third"));
}

#[test]
fn answers_request_for_own_address() {
    let mut interface = interface();
    interface.recv_frame(&arp(ArpOperation::Request, EthernetAddress::default(), LOCAL_IP));

    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].repr.dst_addr, REMOTE_ETH);
    assert_eq!(frames[0].repr.ethertype, EthernetProtocol::Arp);
    let message = ArpRepr::parse(&frames[0].payload).unwrap();
    assert_eq!(message, ArpRepr {
        operation: ArpOperation::Reply,
        source_hardware_addr: LOCAL_ETH,
        source_protocol_addr: LOCAL_IP,
        target_hardware_addr: REMOTE_ETH,
        target_protocol_addr: REMOTE_IP,
    });

    // The requester was learned as well.
    interface.send_datagram(datagram(b"hi"), REMOTE_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_datagram_to(&frames[0], REMOTE_ETH, &datagram(b"hi"));
}

#[test]
fn request_for_other_address_is_not_answered() {
    let mut interface = interface();
    interface.recv_frame(&arp(ArpOperation::Request, EthernetAddress::default(), OTHER_IP));
    assert!(drain(&mut interface).is_empty());
    assert_eq!(interface.neighbors().hardware_addr(REMOTE_IP), Some(REMOTE_ETH));
}

#[test]
fn receives_datagrams_for_us() {
    let mut interface = interface();
    let inbound = Ipv4Datagram::new(REMOTE_IP, LOCAL_IP, IpProtocol::Tcp, b"data".to_vec());

    interface.recv_frame(&frame(OTHER_ETH, EthernetProtocol::Ipv4, inbound.serialize()));
    assert!(interface.datagrams_received().is_empty());

    interface.recv_frame(&frame(LOCAL_ETH, EthernetProtocol::Ipv4, inbound.serialize()));
    interface.recv_frame(&frame(EthernetAddress::BROADCAST, EthernetProtocol::Ipv4, inbound.serialize()));
    assert_eq!(interface.datagrams_received().len(), 2);
    assert_eq!(interface.pop_datagram(), Some(inbound.clone()));
    assert_eq!(interface.pop_datagram(), Some(inbound));
    assert_eq!(interface.pop_datagram(), None);
}

#[test]
fn ignores_arp_for_other_hosts() {
    let mut interface = interface();
    interface.recv_frame(&arp(ArpOperation::Reply, OTHER_ETH, OTHER_IP));
    assert!(interface.neighbors().is_empty());
}

#[test]
fn drops_malformed_input() {
    let mut interface = interface();
    interface.recv_frame(&frame(LOCAL_ETH, EthernetProtocol::Ipv4, vec![0x45, 0, 0]));
    interface.recv_frame(&frame(LOCAL_ETH, EthernetProtocol::Arp, vec![0, 1, 8, 0]));
    interface.recv_frame(&frame(LOCAL_ETH, EthernetProtocol::Ipv6, vec![0; 40]));
    interface.recv_frame_bytes(&[0xff; 5]);
    assert!(interface.datagrams_received().is_empty());
    assert!(interface.neighbors().is_empty());
    assert!(drain(&mut interface).is_empty());
}

#[test]
fn receives_raw_frames() {
    let mut interface = interface();
    interface.recv_frame_bytes(&reply().serialize());
    assert_eq!(interface.neighbors().hardware_addr(REMOTE_IP), Some(REMOTE_ETH));
}

#[test]
fn request_repeated_after_interval() {
    let mut interface = interface();
    interface.send_datagram(datagram(b"first"), REMOTE_IP);
    drain(&mut interface);

    interface.tick(NeighborCache::REQUEST_INTERVAL);
    interface.send_datagram(datagram(b"second"), REMOTE_IP);
    assert!(drain(&mut interface).is_empty());

    // The first request and the first datagram are now stale.
    interface.tick(Duration::from_millis(1));
    interface.send_datagram(datagram(b"third"), REMOTE_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_request_for(&frames[0], REMOTE_IP);

    interface.recv_frame(&reply());
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 2);
    assert_datagram_to(&frames[0], REMOTE_ETH, &datagram(b"second"));
    assert_datagram_to(&frames[1], REMOTE_ETH, &datagram(b"third"));
}

#[test]
fn unanswered_datagrams_are_dropped() {
    let mut interface = interface();
    interface.send_datagram(datagram(b"lost"), REMOTE_IP);
    drain(&mut interface);

    interface.tick(NeighborCache::REQUEST_INTERVAL + Duration::from_millis(1));
    interface.recv_frame(&reply());
    assert!(drain(&mut interface).is_empty());
}

#[test]
fn learned_address_expires() {
    let mut interface = interface();
    interface.recv_frame(&reply());

    interface.tick(NeighborCache::ENTRY_LIFETIME);
    interface.send_datagram(datagram(b"still known"), REMOTE_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].repr.ethertype, EthernetProtocol::Ipv4);

    interface.tick(Duration::from_millis(1));
    interface.send_datagram(datagram(b"forgotten"), REMOTE_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_request_for(&frames[0], REMOTE_IP);
}

#[test]
fn clock_saturates() {
    let mut interface = interface();
    interface.recv_frame(&reply());
    interface.send_datagram(datagram(b"queued"), OTHER_IP);
    drain(&mut interface);

    interface.tick(Duration::MAX);
    interface.tick(Duration::MAX);
    assert_eq!(interface.now().total_millis(), u64::MAX);
    assert!(interface.neighbors().is_empty());

    // Everything expired, the next send asks again.
    interface.send_datagram(datagram(b"again"), OTHER_IP);
    let frames = drain(&mut interface);
    assert_eq!(frames.len(), 1);
    assert_request_for(&frames[0], OTHER_IP);
}
