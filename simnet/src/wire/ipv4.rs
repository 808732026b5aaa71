//! IPv4 addresses and datagrams, see RFC 791.
use core::{fmt, str::FromStr};
use byteorder::{ByteOrder, NetworkEndian};

use super::{Error, Result};
use super::field::Field;

enum_with_unknown! {
    /// IP datagram encapsulated protocol.
    pub doc enum Protocol(u8) {
        /// Internet control messages.
        Icmp = 0x01,
        /// Transmission control protocol.
        Tcp  = 0x06,
        /// User datagram protocol.
        Udp  = 0x11,
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protocol::Icmp => write!(f, "ICMP"),
            Protocol::Tcp  => write!(f, "TCP"),
            Protocol::Udp  => write!(f, "UDP"),
            Protocol::Unknown(id) => write!(f, "0x{:02x}", id),
        }
    }
}

/// A four-octet IPv4 address.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Address(pub [u8; 4]);

impl Address {
    /// An unspecified address.
    pub const UNSPECIFIED: Address = Address([0x00; 4]);

    /// The broadcast address.
    pub const BROADCAST:   Address = Address([0xff; 4]);

    /// Construct an IPv4 address from parts.
    pub const fn new(a0: u8, a1: u8, a2: u8, a3: u8) -> Address {
        Address([a0, a1, a2, a3])
    }

    /// Construct an IPv4 address from a sequence of octets, in big-endian.
    ///
    /// # Panics
    /// The function panics if `data` is not four octets long.
    pub fn from_bytes(data: &[u8]) -> Address {
        let mut bytes = [0; 4];
        bytes.copy_from_slice(data);
        Address(bytes)
    }

    /// Return an IPv4 address as a sequence of octets, in big-endian.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encode the address into a `u32` in network endian byte order.
    pub fn to_network_integer(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Decode a network endian `u32` into an address.
    pub fn from_network_integer(num: u32) -> Self {
        Address(num.to_be_bytes())
    }

    /// Query whether the address is an unicast address.
    pub fn is_unicast(&self) -> bool {
        !(self.is_broadcast() ||
          self.is_multicast() ||
          self.is_unspecified())
    }

    /// Query whether the address is the broadcast address.
    pub fn is_broadcast(&self) -> bool {
        self.0[0..4] == [255; 4]
    }

    /// Query whether the address is a multicast address.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0xf0 == 224
    }

    /// Query whether the address falls into the "unspecified" range.
    pub fn is_unspecified(&self) -> bool {
        self.0[0] == 0
    }

    /// Mask the address to some prefix length.
    ///
    /// Preserves only address bits that are relevant for the prefix length.
    ///
    /// ```rust
    /// # use simnet::wire::Ipv4Address as Address;
    /// let base = Address([192, 168, 178, 32]);
    /// let masked = base.mask(24);
    /// assert!(masked == Address([192, 168, 178, 0]));
    /// ```
    ///
    /// # Panics
    /// This function panics if `prefix` is greater than 32.
    pub fn mask(&self, prefix: u8) -> Address {
        assert!(prefix <= 32);
        let masked_off = (!0u32)
            .checked_shr(prefix.into())
            .unwrap_or(0);
        let as_int = self.to_network_integer() & !masked_off;
        Address::from_network_integer(as_int)
    }
}

impl From<std::net::Ipv4Addr> for Address {
    fn from(x: std::net::Ipv4Addr) -> Address {
        Address(x.octets())
    }
}

impl From<Address> for std::net::Ipv4Addr {
    fn from(Address(x): Address) -> std::net::Ipv4Addr {
        x.into()
    }
}

impl FromStr for Address {
    type Err = std::net::AddrParseError;

    fn from_str(src: &str) -> core::result::Result<Self, Self::Err> {
        src.parse::<std::net::Ipv4Addr>().map(Address::from)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes = self.0;
        write!(f, "{}.{}.{}.{}", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A specification of an IPv4 CIDR block, containing an address and a variable-length
/// subnet masking prefix length.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Cidr {
    address:    Address,
    prefix_len: u8,
}

impl Cidr {
    /// Create an IPv4 CIDR block from the given address and prefix length.
    ///
    /// # Panics
    /// This function panics if the prefix length is larger than 32.
    pub fn new(address: Address, prefix_len: u8) -> Cidr {
        assert!(prefix_len <= 32);
        Cidr { address, prefix_len }
    }

    /// Return the address of this IPv4 CIDR block.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Return the prefix length of this IPv4 CIDR block.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Return the network address, with all host bits cleared.
    pub fn network(&self) -> Address {
        self.address.mask(self.prefix_len)
    }

    /// Query whether the subnetwork described by this IPv4 CIDR block contains
    /// the given address.
    pub fn contains(&self, addr: Address) -> bool {
        self.network() == addr.mask(self.prefix_len)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

mod field {
    use super::Field;

    pub(crate) const VER_IHL:  usize = 0;
    pub(crate) const DSCP_ECN: usize = 1;
    pub(crate) const LENGTH:   Field = 2..4;
    pub(crate) const IDENT:    Field = 4..6;
    pub(crate) const FLG_OFF:  Field = 6..8;
    pub(crate) const TTL:      usize = 8;
    pub(crate) const PROTOCOL: usize = 9;
    pub(crate) const CHECKSUM: Field = 10..12;
    pub(crate) const SRC_ADDR: Field = 12..16;
    pub(crate) const DST_ADDR: Field = 16..20;

    pub(crate) const FLG_DF:   u16 = 0x4000;
    pub(crate) const FLG_MF:   u16 = 0x2000;
    pub(crate) const OFF_MASK: u16 = 0x1fff;
}

/// A high-level representation of an Internet Protocol version 4 datagram header.
///
/// Options are skipped when parsing and never emitted.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Repr {
    /// The source of the datagram.
    pub src_addr:    Address,
    /// The destination of the datagram.
    pub dst_addr:    Address,
    /// The encapsulated protocol identifier.
    pub protocol:    Protocol,
    /// The remaining hop limit (time-to-live) of the datagram.
    pub hop_limit:   u8,
    /// The combined differentiated services and congestion notification octet.
    pub tos:         u8,
    /// The identification field.
    pub ident:       u16,
    /// Whether fragmentation is forbidden.
    pub dont_frag:   bool,
}

impl Repr {
    /// The default hop limit of freshly created datagrams.
    pub const DEFAULT_HOP_LIMIT: u8 = 64;

    /// A header with default values for the variable fields.
    pub fn new(src_addr: Address, dst_addr: Address, protocol: Protocol) -> Self {
        Repr {
            src_addr,
            dst_addr,
            protocol,
            hop_limit: Self::DEFAULT_HOP_LIMIT,
            tos: 0,
            ident: 0,
            dont_frag: true,
        }
    }

    /// Return the length of a header that will be emitted from this high-level representation.
    pub fn header_len(&self) -> usize {
        // We never emit any options.
        field::DST_ADDR.end
    }

    /// Emit the header for a payload of `payload_len` into the start of a buffer.
    ///
    /// The checksum is always filled in.
    ///
    /// # Panics
    /// This function panics if the buffer is shorter than `header_len`.
    pub fn emit(&self, data: &mut [u8], payload_len: usize) {
        let header_len = self.header_len();
        data[field::VER_IHL] = 0x40 | (header_len / 4) as u8;
        data[field::DSCP_ECN] = self.tos;
        NetworkEndian::write_u16(&mut data[field::LENGTH], (header_len + payload_len) as u16);
        NetworkEndian::write_u16(&mut data[field::IDENT], self.ident);
        let flags = if self.dont_frag { field::FLG_DF } else { 0 };
        NetworkEndian::write_u16(&mut data[field::FLG_OFF], flags);
        data[field::TTL] = self.hop_limit;
        data[field::PROTOCOL] = self.protocol.into();
        data[field::SRC_ADDR].copy_from_slice(self.src_addr.as_bytes());
        data[field::DST_ADDR].copy_from_slice(self.dst_addr.as_bytes());

        NetworkEndian::write_u16(&mut data[field::CHECKSUM], 0);
        let checksum = !checksum::data(&data[..header_len]);
        NetworkEndian::write_u16(&mut data[field::CHECKSUM], checksum);
    }
}

/// An owned IPv4 datagram, its header and payload.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Datagram {
    /// The parsed header.
    pub repr: Repr,
    /// The payload bytes, exactly as long as the header claims.
    pub payload: Vec<u8>,
}

impl Datagram {
    /// Create a datagram with a default header.
    pub fn new(src_addr: Address, dst_addr: Address, protocol: Protocol, payload: Vec<u8>) -> Self {
        Datagram {
            repr: Repr::new(src_addr, dst_addr, protocol),
            payload,
        }
    }

    /// Parse an IPv4 datagram, verifying its header checksum.
    pub fn parse(data: &[u8]) -> Result<Datagram> {
        if data.len() < field::DST_ADDR.end {
            return Err(Error::Truncated);
        }

        // Version 4 is expected.
        if data[field::VER_IHL] >> 4 != 4 {
            return Err(Error::Malformed);
        }

        let header_len = usize::from(data[field::VER_IHL] & 0x0f) * 4;
        if header_len < field::DST_ADDR.end {
            return Err(Error::Malformed);
        }
        if data.len() < header_len {
            return Err(Error::Truncated);
        }

        if checksum::data(&data[..header_len]) != !0 {
            return Err(Error::WrongChecksum);
        }

        let total_len = usize::from(NetworkEndian::read_u16(&data[field::LENGTH]));
        if total_len < header_len {
            return Err(Error::Malformed);
        }
        if data.len() < total_len {
            return Err(Error::Truncated);
        }

        // We do not support fragmentation.
        let flg_off = NetworkEndian::read_u16(&data[field::FLG_OFF]);
        if flg_off & field::FLG_MF != 0 || flg_off & field::OFF_MASK != 0 {
            return Err(Error::Unsupported);
        }

        let repr = Repr {
            src_addr: Address::from_bytes(&data[field::SRC_ADDR]),
            dst_addr: Address::from_bytes(&data[field::DST_ADDR]),
            protocol: data[field::PROTOCOL].into(),
            hop_limit: data[field::TTL],
            tos: data[field::DSCP_ECN],
            ident: NetworkEndian::read_u16(&data[field::IDENT]),
            dont_frag: flg_off & field::FLG_DF != 0,
        };

        Ok(Datagram {
            repr,
            payload: data[header_len..total_len].to_vec(),
        })
    }

    /// Serialize the datagram, computing a fresh header checksum.
    pub fn serialize(&self) -> Vec<u8> {
        let header_len = self.repr.header_len();
        let mut buffer = vec![0; header_len + self.payload.len()];
        self.repr.emit(&mut buffer, self.payload.len());
        buffer[header_len..].copy_from_slice(&self.payload);
        buffer
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IPv4 src={} dst={} proto={} ttl={}",
               self.src_addr, self.dst_addr, self.protocol, self.hop_limit)
    }
}

pub(crate) mod checksum {
    use byteorder::{ByteOrder, NetworkEndian};

    fn propagate_carries(word: u32) -> u16 {
        let sum = (word >> 16) + (word & 0xffff);
        ((sum >> 16) as u16) + (sum as u16)
    }

    /// Compute an RFC 1071 compliant checksum (without the final complement).
    pub(crate) fn data(mut data: &[u8]) -> u16 {
        let mut accum = 0;

        while data.len() >= 2 {
            accum += NetworkEndian::read_u16(data) as u32;
            data = &data[2..];
        }

        // Add the last remaining odd byte, if any.
        if let Some(&value) = data.first() {
            accum += (value as u32) << 8;
        }

        propagate_carries(accum)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static PACKET_BYTES: [u8; 30] =
        [0x45, 0x00, 0x00, 0x1e,
         0x01, 0x02, 0x62, 0x03,
         0x1a, 0x01, 0xd5, 0x6e,
         0x11, 0x12, 0x13, 0x14,
         0x21, 0x22, 0x23, 0x24,
         0xaa, 0x00, 0x00, 0x00,
         0x00, 0x00, 0x00, 0x00,
         0x00, 0xff];

    static PAYLOAD_BYTES: [u8; 10] =
        [0xaa, 0x00, 0x00, 0x00,
         0x00, 0x00, 0x00, 0x00,
         0x00, 0xff];

    #[test]
    fn test_checksum_vector() {
        // Header with a zeroed checksum field.
        let mut header = PACKET_BYTES[..20].to_vec();
        header[10] = 0;
        header[11] = 0;
        assert_eq!(!checksum::data(&header), 0xd56e);
        assert_eq!(checksum::data(&PACKET_BYTES[..20]), !0);
    }

    #[test]
    fn test_fragmented_unsupported() {
        // The sample vector carries a fragment offset.
        assert_eq!(Datagram::parse(&PACKET_BYTES[..]), Err(Error::Unsupported));
    }

    #[test]
    fn test_emit_then_parse() {
        let datagram = Datagram {
            repr: Repr {
                src_addr: Address([0x11, 0x12, 0x13, 0x14]),
                dst_addr: Address([0x21, 0x22, 0x23, 0x24]),
                protocol: Protocol::Icmp,
                hop_limit: 0x1a,
                tos: 0,
                ident: 0x102,
                dont_frag: true,
            },
            payload: PAYLOAD_BYTES.to_vec(),
        };
        let bytes = datagram.serialize();
        assert_eq!(bytes.len(), 30);
        assert_eq!(bytes[0], 0x45);
        assert_eq!(&bytes[2..4], &[0x00, 0x1e]);
        assert_eq!(checksum::data(&bytes[..20]), !0);
        assert_eq!(Datagram::parse(&bytes), Ok(datagram));
    }

    #[test]
    fn test_wrong_checksum() {
        let datagram = Datagram::new(
            Address::new(10, 0, 0, 1),
            Address::new(10, 0, 0, 2),
            Protocol::Tcp,
            b"payload".to_vec());
        let mut bytes = datagram.serialize();
        bytes[8] ^= 0x01;
        assert_eq!(Datagram::parse(&bytes), Err(Error::WrongChecksum));
    }

    #[test]
    fn test_truncated_payload() {
        let datagram = Datagram::new(
            Address::new(10, 0, 0, 1),
            Address::new(10, 0, 0, 2),
            Protocol::Udp,
            vec![0; 16]);
        let bytes = datagram.serialize();
        assert_eq!(Datagram::parse(&bytes[..30]), Err(Error::Truncated));
        assert_eq!(Datagram::parse(&bytes[..12]), Err(Error::Truncated));
    }

    #[test]
    fn test_trailing_padding_ignored() {
        let datagram = Datagram::new(
            Address::new(10, 0, 0, 1),
            Address::new(10, 0, 0, 2),
            Protocol::Udp,
            vec![1, 2, 3]);
        let mut bytes = datagram.serialize();
        bytes.extend_from_slice(&[0; 20]);
        assert_eq!(Datagram::parse(&bytes), Ok(datagram));
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = Datagram::new(
            Address::new(10, 0, 0, 1),
            Address::new(10, 0, 0, 2),
            Protocol::Udp,
            vec![]).serialize();
        bytes[0] = 0x65;
        assert_eq!(Datagram::parse(&bytes), Err(Error::Malformed));
    }

    #[test]
    fn test_cidr() {
        let cidr = Cidr::new(Address::new(192, 168, 1, 10), 24);
        assert_eq!(cidr.network(), Address::new(192, 168, 1, 0));
        assert!(cidr.contains(Address::new(192, 168, 1, 1)));
        assert!(cidr.contains(Address::new(192, 168, 1, 255)));
        assert!(!cidr.contains(Address::new(192, 168, 2, 1)));

        let all = Cidr::new(Address::UNSPECIFIED, 0);
        assert!(all.contains(Address::new(8, 8, 8, 8)));
        assert_eq!(format!("{}", cidr), "192.168.1.10/24");
    }

    #[test]
    fn test_address_parse() {
        assert_eq!("10.0.5.5".parse(), Ok(Address::new(10, 0, 5, 5)));
        assert!("10.0.5".parse::<Address>().is_err());
        assert_eq!(Address::new(10, 0, 0, 1).to_network_integer(), 0x0a00_0001);
    }
}
