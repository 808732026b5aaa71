//! Reliable byte streams, address resolution and forwarding over a simulated packet network.
//!
//! ## Table of contents
//!
//! 1. [Design](#design-and-relevant-core-concepts)
//! 2. [The wire module](wire/index.html)
//! 3. [The storage module](storage/index.html)
//! 4. [The layers](layer/index.html)
//!    1. [Tcp sender and receiver](layer/tcp/index.html)
//!    1. [Arp neighbor cache](layer/arp/index.html)
//!    1. [The eth interface](layer/eth/index.html)
//!    1. [Ip routing](layer/ip/index.html)
//!
//! ## Design and relevant core concepts
//!
//! Everything in `simnet` is driven by its caller. There is no scheduler, no thread and no wall
//! clock: each component that cares about time exposes a `tick` that receives the amount of
//! simulated time that has passed since the previous call. This makes every run reproducible,
//! which matters since the intended use is testing under deliberately injected loss, reordering
//! and duplication.
//!
//! Components never call back into the caller. Outbound segments and frames are handed out either
//! through an explicit output parameter (anything implementing `Extend`) or through a queue that
//! the owner drains. Errors caused by the peer are not errors of the call: a reset marks the
//! affected byte stream as errored, malformed input is dropped and stale acknowledgements are
//! ignored.
//!
//! The protocol layers share one vocabulary for sequence space, the wrapping 32-bit
//! [`SeqNumber`], and one for buffering, the [`ByteStream`].
//!
//! [`SeqNumber`]: wire/struct.TcpSeqNumber.html
//! [`ByteStream`]: storage/struct.ByteStream.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use] mod macros;
pub mod layer;
pub mod storage;
pub mod time;
pub mod wire;
