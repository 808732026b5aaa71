//! Buffers between the protocol layers and the user.
//!
//! The [`ByteStream`] is a bounded pipe with sticky close and error flags. It is the sink of
//! every receiver and the source of every sender. The [`Reassembler`] sits in front of a stream
//! and puts out-of-order substrings back into sequence.
//!
//! [`ByteStream`]: struct.ByteStream.html
//! [`Reassembler`]: struct.Reassembler.html
mod reassembler;
mod stream;

pub use self::reassembler::Reassembler;
pub use self::stream::ByteStream;
