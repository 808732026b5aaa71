//! Ethernet II frames and hardware addresses.
use core::{fmt, str::FromStr};
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};

enum_with_unknown! {
    /// Ethernet protocol type.
    pub doc enum EtherType(u16) {
        /// An IPv4 datagram.
        Ipv4 = 0x0800,
        /// An address resolution message.
        Arp  = 0x0806,
        /// An IPv6 datagram, recognized but never handled.
        Ipv6 = 0x86DD,
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EtherType::Ipv4 => write!(f, "IPv4"),
            EtherType::Ipv6 => write!(f, "IPv6"),
            EtherType::Arp  => write!(f, "ARP"),
            EtherType::Unknown(id) => write!(f, "0x{:04x}", id)
        }
    }
}

/// A six-octet Ethernet II address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 6]);

impl Address {
    /// The broadcast address.
    pub const BROADCAST: Address = Address([0xff; 6]);

    /// Construct an Ethernet address from a sequence of octets, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not six octets long.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut bytes = [0; 6];
        bytes.copy_from_slice(data);
        Address(bytes)
    }

    /// Return an Ethernet address as a sequence of octets, in big-endian.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !(self.is_broadcast() ||
          self.is_multicast())
    }

    /// Query whether this address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }

    /// Query whether the "multicast" bit in the OUI is set.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }

    /// Query whether the "locally administered" bit in the OUI is set.
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

/// The error when an ethernet address could not be parsed from a string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseAddressError {
    kind: ParseAddressErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseAddressErrorKind {
    ComponentError,
    SeparatorError,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
               bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5])
    }
}

impl fmt::Display for ParseAddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self.kind {
            ParseAddressErrorKind::ComponentError => "invalid ethernet component",
            ParseAddressErrorKind::SeparatorError => "unexpected number of ethernet address components (should be 6)",
        })
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(src: &str) -> core::result::Result<Self, ParseAddressError> {
        let mut parsed = [0; 6];
        let mut components = src.split(':');
        for c in parsed.iter_mut() {
            let part = components
                .next()
                .ok_or(ParseAddressError {
                    kind: ParseAddressErrorKind::SeparatorError,
                })?;
            *c = u8::from_str_radix(part, 16)
                .map_err(|_| ParseAddressError {
                    kind: ParseAddressErrorKind::ComponentError,
                })?;
        }

        if components.next().is_some() {
            Err(ParseAddressError {
                kind: ParseAddressErrorKind::SeparatorError,
            })
        } else {
            Ok(Address(parsed))
        }
    }
}

mod field {
    use crate::wire::field::*;

    pub(crate) const DESTINATION: Field =  0..6;
    pub(crate) const SOURCE:      Field =  6..12;
    pub(crate) const ETHERTYPE:   Field = 12..14;
    pub(crate) const PAYLOAD:     Rest  = 14..;
}

/// A high-level representation of an Ethernet II frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repr {
    /// The hardware address of the sending interface.
    pub src_addr: Address,
    /// The hardware address of the receiving interface, or broadcast.
    pub dst_addr: Address,
    /// The protocol of the contained payload.
    pub ethertype: EtherType,
}

impl Repr {
    /// Parse the header of an Ethernet II frame.
    pub fn parse(data: &[u8]) -> Result<Repr> {
        if data.len() < field::PAYLOAD.start {
            return Err(Error::Truncated);
        }

        Ok(Repr {
            src_addr: Address::from_bytes(&data[field::SOURCE]),
            dst_addr: Address::from_bytes(&data[field::DESTINATION]),
            ethertype: NetworkEndian::read_u16(&data[field::ETHERTYPE]).into(),
        })
    }

    /// Return the length of a header that will be emitted from this high-level representation.
    pub fn header_len(&self) -> usize {
        field::PAYLOAD.start
    }

    /// Emit the header into the start of a buffer.
    ///
    /// # Panics
    /// This function panics if the buffer is shorter than `header_len`.
    pub fn emit(&self, data: &mut [u8]) {
        data[field::DESTINATION].copy_from_slice(self.dst_addr.as_bytes());
        data[field::SOURCE].copy_from_slice(self.src_addr.as_bytes());
        NetworkEndian::write_u16(&mut data[field::ETHERTYPE], self.ethertype.into());
    }
}

/// An owned Ethernet II frame, the header and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The parsed frame header.
    pub repr: Repr,
    /// The payload, not yet interpreted according to the `ethertype`.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Parse an Ethernet II frame from the raw bytes received on a link.
    pub fn parse(data: &[u8]) -> Result<Frame> {
        let repr = Repr::parse(data)?;
        Ok(Frame {
            repr,
            payload: data[field::PAYLOAD].to_vec(),
        })
    }

    /// Serialize the frame into the raw bytes to put on a link.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = vec![0; self.repr.header_len() + self.payload.len()];
        self.repr.emit(&mut buffer);
        buffer[field::PAYLOAD].copy_from_slice(&self.payload);
        buffer
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EthernetII src={} dst={} type={}",
               self.src_addr, self.dst_addr, self.ethertype)
    }
}
