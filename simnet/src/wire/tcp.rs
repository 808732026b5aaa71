//! Sequence number arithmetic of the transmission control protocol.
use core::{fmt, ops};

/// A TCP sequence number.
///
/// A 32-bit value representing `(zero_point + absolute) mod 2^32`. The absolute offset is an
/// unbounded 64-bit position in a stream, where `0` is the position of the SYN flag. Wrapping
/// is cheap; unwrapping needs a checkpoint near the expected result to resolve the ambiguity.
///
/// ```
/// # use simnet::wire::TcpSeqNumber as SeqNumber;
/// let isn = SeqNumber(u32::MAX - 1);
/// let seqno = SeqNumber::wrap(3, isn);
/// assert_eq!(seqno, SeqNumber(1));
/// assert_eq!(seqno.unwrap(isn, 0), 3);
/// assert_eq!(seqno.unwrap(isn, 1 << 33), (1 << 33) + 3);
/// ```
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
pub struct SeqNumber(pub u32);

impl SeqNumber {
    const SPAN: u64 = 1 << 32;

    /// Convert an absolute stream offset to its on-wire sequence number.
    pub fn wrap(absolute: u64, zero_point: SeqNumber) -> SeqNumber {
        // Truncation is the modular reduction.
        SeqNumber(zero_point.0.wrapping_add(absolute as u32))
    }

    /// Convert back to an absolute stream offset.
    ///
    /// Of all absolute offsets that wrap to this sequence number, returns the one closest to
    /// `checkpoint`. An exact tie resolves to the candidate sharing the upper 32 bits of
    /// `checkpoint`.
    pub fn unwrap(self, zero_point: SeqNumber, checkpoint: u64) -> u64 {
        let offset = u64::from(self.0.wrapping_sub(zero_point.0));
        let base = (checkpoint & !(Self::SPAN - 1)) + offset;
        let distance = |candidate: u64| candidate.abs_diff(checkpoint);

        let mut closest = base;
        if let Some(lower) = base.checked_sub(Self::SPAN) {
            if distance(lower) < distance(closest) {
                closest = lower;
            }
        }
        if let Some(upper) = base.checked_add(Self::SPAN) {
            if distance(upper) < distance(closest) {
                closest = upper;
            }
        }
        closest
    }

    /// The raw 32-bit value as it appears in a segment header.
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ops::Add<u32> for SeqNumber {
    type Output = SeqNumber;

    fn add(self, rhs: u32) -> SeqNumber {
        SeqNumber(self.0.wrapping_add(rhs))
    }
}

impl ops::AddAssign<u32> for SeqNumber {
    fn add_assign(&mut self, rhs: u32) {
        *self = *self + rhs;
    }
}
