//! Address resolution messages for Ethernet and IPv4, see RFC 826.
use core::fmt;
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::{EthernetAddress, EthernetProtocol, Ipv4Address};

enum_with_unknown! {
    /// ARP hardware type.
    pub doc enum Hardware(u16) {
        /// Ethernet hardware addresses.
        Ethernet = 1
    }
}

enum_with_unknown! {
    /// ARP operation type.
    pub doc enum Operation(u16) {
        /// A request to resolve the target protocol address.
        Request = 1,
        /// The answer to a request.
        Reply = 2
    }
}

mod field {
    use crate::wire::field::*;

    pub(crate) const HTYPE: Field = 0..2;
    pub(crate) const PTYPE: Field = 2..4;
    pub(crate) const HLEN: usize = 4;
    pub(crate) const PLEN: usize = 5;
    pub(crate) const OPER: Field = 6..8;

    // Fixed offsets for Ethernet/IPv4, the only supported combination.
    pub(crate) const SHA: Field = 8..14;
    pub(crate) const SPA: Field = 14..18;
    pub(crate) const THA: Field = 18..24;
    pub(crate) const TPA: Field = 24..28;
}

/// A high-level representation of an Address Resolution Protocol message.
///
/// Only the combination of Ethernet hardware addresses and IPv4 protocol addresses is
/// represented, see [RFC826].
///
/// [RFC826]: https://tools.ietf.org/html/rfc826
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    /// Whether this is a request or reply.
    pub operation: Operation,
    /// Hardware address of the sender.
    pub source_hardware_addr: EthernetAddress,
    /// Protocol address of the sender.
    pub source_protocol_addr: Ipv4Address,
    /// Hardware address of the target, zero for requests.
    pub target_hardware_addr: EthernetAddress,
    /// Protocol address of the target.
    pub target_protocol_addr: Ipv4Address,
}

impl Repr {
    /// The length of an Ethernet/IPv4 ARP message.
    pub const BUFFER_LEN: usize = field::TPA.end;

    /// Parse an ARP message.
    pub fn parse(data: &[u8]) -> Result<Repr> {
        if data.len() < field::OPER.end {
            return Err(Error::Truncated);
        }

        let hardware = Hardware::from(NetworkEndian::read_u16(&data[field::HTYPE]));
        let protocol = EthernetProtocol::from(NetworkEndian::read_u16(&data[field::PTYPE]));
        match (hardware, protocol, data[field::HLEN], data[field::PLEN]) {
            (Hardware::Ethernet, EthernetProtocol::Ipv4, 6, 4) => (),
            _ => return Err(Error::Unsupported),
        }

        if data.len() < field::TPA.end {
            return Err(Error::Truncated);
        }

        let operation = Operation::from(NetworkEndian::read_u16(&data[field::OPER]));
        if let Operation::Unknown(_) = operation {
            return Err(Error::Unrecognized);
        }

        Ok(Repr {
            operation,
            source_hardware_addr: EthernetAddress::from_bytes(&data[field::SHA]),
            source_protocol_addr: Ipv4Address::from_bytes(&data[field::SPA]),
            target_hardware_addr: EthernetAddress::from_bytes(&data[field::THA]),
            target_protocol_addr: Ipv4Address::from_bytes(&data[field::TPA]),
        })
    }

    /// Return the length of a message that will be emitted from this high-level representation.
    pub fn buffer_len(&self) -> usize {
        Self::BUFFER_LEN
    }

    /// Emit a high-level representation into a buffer.
    ///
    /// # Panics
    /// This function panics if the buffer is shorter than `buffer_len`.
    pub fn emit(&self, data: &mut [u8]) {
        NetworkEndian::write_u16(&mut data[field::HTYPE], Hardware::Ethernet.into());
        NetworkEndian::write_u16(&mut data[field::PTYPE], EthernetProtocol::Ipv4.into());
        data[field::HLEN] = 6;
        data[field::PLEN] = 4;
        NetworkEndian::write_u16(&mut data[field::OPER], self.operation.into());
        data[field::SHA].copy_from_slice(self.source_hardware_addr.as_bytes());
        data[field::SPA].copy_from_slice(self.source_protocol_addr.as_bytes());
        data[field::THA].copy_from_slice(self.target_hardware_addr.as_bytes());
        data[field::TPA].copy_from_slice(self.target_protocol_addr.as_bytes());
    }

    /// Emit into a freshly allocated buffer of exactly the right size.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buffer = vec![0; self.buffer_len()];
        self.emit(&mut buffer);
        buffer
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ARP type=Ethernet+IPv4 src={}/{} tgt={}/{} op={:?}",
               self.source_hardware_addr, self.source_protocol_addr,
               self.target_hardware_addr, self.target_protocol_addr,
               self.operation)
    }
}
