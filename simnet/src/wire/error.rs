use core::fmt;

/// The error type for parsing of the network stack.
///
/// None of these ever leave the layers as a failure of an operation. Components that receive
/// unparseable input drop it and carry on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// An incoming packet could not be parsed because it was shorter than assumed.
    ///
    /// The packet may be shorter than the minimum length specified, or a length field claims more
    /// data than was actually received.
    Truncated,

    /// An incoming packet had an incorrect checksum and was dropped.
    WrongChecksum,

    /// An incoming packet could not be recognized and was dropped.
    ///
    /// E.g. an Ethernet frame with an unknown EtherType.
    Unrecognized,

    /// An incoming packet was recognized but was self-contradictory.
    ///
    /// Examples: an IPv4 header with a version other than 4; a header length smaller than the
    /// fixed part of the header.
    Malformed,

    /// Parsing depends on information derived from a non-implemented feature.
    ///
    /// Fragmented IPv4 datagrams and ARP for hardware other than Ethernet fall in this category.
    Unsupported,
}

/// The result type for the wire representations.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated     => write!(f, "truncated packet"),
            Error::WrongChecksum => write!(f, "checksum error"),
            Error::Unrecognized  => write!(f, "unrecognized packet"),
            Error::Unsupported   => write!(f, "unsupported option"),
            Error::Malformed     => write!(f, "malformed packet"),
        }
    }
}

impl std::error::Error for Error {}
