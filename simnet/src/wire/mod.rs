/*! Low-level packet access and construction.

# An overview over packet representations

The `wire` module deals with the packet *representation*. Each protocol provides a compact,
high-level representation of its header data, the `Repr` family of structs, that can be parsed
from a sequence of octets and emitted into one. Where a packet carries a payload that is handed
between layers there is also an owning type, [`EthernetFrame`] or [`Ipv4Datagram`], which keeps
the parsed header next to the raw payload bytes.

[`EthernetFrame`]: struct.EthernetFrame.html
[`Ipv4Datagram`]: struct.Ipv4Datagram.html

In the `Repr` family of data structures, the `parse()` method never panics and the `emit()`
method never panics as long as the underlying buffer is at least as long as the length the
representation reports. Parsing validates everything the layers later rely on, such as length
fields and the IPv4 header checksum, and fails with an [`Error`] otherwise. The layers drop such
input silently.

[`Error`]: enum.Error.html

The transport layer does not have a byte representation here. Its segments are exchanged as the
typed messages of [`layer::tcp`] and only share the sequence number arithmetic of
[`TcpSeqNumber`] with this module.

[`layer::tcp`]: ../layer/tcp/index.html
[`TcpSeqNumber`]: struct.TcpSeqNumber.html

# Examples

To emit an IP datagram into an octet buffer, and then parse it back:

```rust
use simnet::wire::*;
let datagram = Ipv4Datagram::new(
    Ipv4Address::new(10, 0, 0, 1),
    Ipv4Address::new(10, 0, 0, 2),
    IpProtocol::Tcp,
    b"payload".to_vec());
let buffer = datagram.serialize();
let parsed = Ipv4Datagram::parse(&buffer)
    .expect("malformed datagram");
assert_eq!(datagram, parsed);
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `arp.rs`
// * `error.rs`
// * `ethernet.rs`
// * `ipv4.rs`
// * `mod.rs` (this file)

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod error;
pub mod arp;
pub mod ethernet;
pub mod ipv4;
pub mod tcp;

pub use self::error::{
    Error,
    Result};

pub use self::ethernet::{
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    Frame as EthernetFrame,
    Repr as EthernetRepr};

pub use self::arp::{
    Hardware as ArpHardware,
    Operation as ArpOperation,
    Repr as ArpRepr};

pub use self::ipv4::{
    Protocol as IpProtocol,
    Address as Ipv4Address,
    Cidr as Ipv4Cidr,
    Datagram as Ipv4Datagram,
    Repr as Ipv4Repr};

pub use self::tcp::SeqNumber as TcpSeqNumber;
