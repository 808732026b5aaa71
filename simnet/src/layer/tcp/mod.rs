//! The TCP layer abstraction.
//!
//! Offers a [`Sender`] and a [`Receiver`], the two halves of one direction of a connection. The
//! sender reads from a [`ByteStream`] and produces [`SenderMessage`]s; the receiver consumes
//! those, reassembles the stream into its own [`ByteStream`] and answers with
//! [`ReceiverMessage`]s which the sender in turn consumes. A full duplex connection is a pair of
//! both, one per direction, whose messages are combined into one segment by connection-level
//! logic outside of this module.
//!
//! There are a number of simplifying assumptions:
//! * No congestion control. The sender fills whatever window the receiver advertised, probing
//!   with a single sequence number when that window is zero.
//! * No options besides the window. The window is not scaled and capped at 65535.
//! * Retransmission only ever resends the oldest outstanding segment, verbatim. The timeout
//!   doubles with every retransmission while the advertised window is non-zero and is reset by
//!   any acknowledgement that makes progress.
//!
//! ## Time
//!
//! The sender has the only timer. It runs while any segment is outstanding and is advanced by
//! [`Sender::tick`]. The receiver is purely reactive.
//!
//! [`ByteStream`]: ../../storage/struct.ByteStream.html
//! [`Sender`]: struct.Sender.html
//! [`Receiver`]: struct.Receiver.html
//! [`SenderMessage`]: struct.SenderMessage.html
//! [`ReceiverMessage`]: struct.ReceiverMessage.html
//! [`Sender::tick`]: struct.Sender.html#method.tick
use crate::time::Duration;
use crate::wire::TcpSeqNumber as SeqNumber;

mod message;
mod receiver;
mod sender;

pub use message::{ReceiverMessage, SenderMessage};
pub use receiver::Receiver;
pub use sender::Sender;

/// Parameters of one direction of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// The initial retransmission timeout.
    pub rt_timeout: Duration,
    /// Capacity of the receiving byte stream.
    pub recv_capacity: usize,
    /// Capacity of the sending byte stream.
    pub send_capacity: usize,
    /// Maximum number of payload bytes in a single segment.
    pub max_payload_size: usize,
    /// Consecutive retransmissions after which a connection should be given up.
    ///
    /// Not enforced by the sender itself, see [`Sender::consecutive_retransmissions`].
    ///
    /// [`Sender::consecutive_retransmissions`]: struct.Sender.html#method.consecutive_retransmissions
    pub max_retx_attempts: u64,
    /// The initial sequence number of the sender.
    pub isn: SeqNumber,
}

impl Config {
    /// Default initial retransmission timeout.
    pub const TIMEOUT_DFLT: Duration = Duration::from_millis(1000);

    /// Default payload limit of a segment.
    pub const MAX_PAYLOAD_SIZE: usize = 1000;

    /// Default capacity of either byte stream.
    pub const DEFAULT_CAPACITY: usize = 64000;

    /// Default limit of consecutive retransmissions.
    pub const MAX_RETX_ATTEMPTS: u64 = 8;
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rt_timeout: Self::TIMEOUT_DFLT,
            recv_capacity: Self::DEFAULT_CAPACITY,
            send_capacity: Self::DEFAULT_CAPACITY,
            max_payload_size: Self::MAX_PAYLOAD_SIZE,
            max_retx_attempts: Self::MAX_RETX_ATTEMPTS,
            isn: SeqNumber(0),
        }
    }
}
