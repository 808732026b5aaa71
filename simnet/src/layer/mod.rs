//! The process logic of protocol layers.
//!
//! ## Layering
//!
//! Each protocol layer is split into two parts; the packet logic contained in `wire` and the
//! processing part in this module. Every component here is the local state of a protocol: a tcp
//! sender or receiver, a network interface, a router. That state is open to inspection and
//! modification by the user program between calls, similar to reconfiguration on the OS level
//! with utilities such as `arp` or `ip route`.
//!
//! ## Receiving
//!
//! Inbound data is handed over by value or by reference and processed to completion within the
//! call. Anything the layer above would consume is queued inside the component and popped by its
//! owner, for example the datagrams an [`Interface`] extracted from its frames.
//!
//! [`Interface`]: eth/struct.Interface.html
//!
//! ## Sending
//!
//! Outbound messages are never delivered through a callback. The tcp components take an output
//! parameter implementing `Extend` which receives every produced segment, while the interfaces
//! keep a queue of frames that the caller polls and puts on its simulated link.
//!
//! ## Time
//!
//! Nothing here reads a clock. Components that have timers expose a `tick` taking the simulated
//! time that passed since the last call and fire all timers that expire within it.
pub mod arp;
pub mod eth;
pub mod ip;
pub mod tcp;

/// The result type of layer configuration.
pub type Result<T> = core::result::Result<T, Error>;

/// An error in the configuration of a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation was not permitted.
    ///
    /// Returned when a referenced interface, route or other entity does not exist.
    Illegal,

    /// A length or size argument is out of range.
    ///
    /// For example an IPv4 prefix longer than 32 bits.
    BadSize,

    /// Unable to find a route towards the destination address.
    Unreachable,

    /// The action could not be completed because there were not enough resources.
    ///
    /// The main difference towards `Illegal` is that implies that it would have been legal with
    /// more resources. A datagram whose hop limit ran out is dropped with this error.
    Exhausted,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::Illegal => write!(f, "illegal operation"),
            Error::BadSize => write!(f, "size out of range"),
            Error::Unreachable => write!(f, "destination unreachable"),
            Error::Exhausted => write!(f, "resources exhausted"),
        }
    }
}

impl std::error::Error for Error {}

/// Can convert from a wire error.
///
/// This indicates some layer tried to operate on a packet but failed.
impl From<crate::wire::Error> for Error {
    fn from(_: crate::wire::Error) -> Self {
        Error::Illegal
    }
}
