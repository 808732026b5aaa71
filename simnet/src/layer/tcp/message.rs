use core::fmt;

use crate::wire::TcpSeqNumber as SeqNumber;

/// A segment travelling from a sender to the receiver of the other end.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct SenderMessage {
    /// Sequence number of the first occupied slot, the SYN flag if set or the first payload byte.
    pub seqno: SeqNumber,
    /// Set on the first segment of the stream.
    pub syn: bool,
    /// The stream bytes carried.
    pub payload: Vec<u8>,
    /// Set on the segment that ends the stream.
    pub fin: bool,
    /// The sending side has failed.
    pub rst: bool,
}

impl SenderMessage {
    /// The number of sequence numbers occupied, counting the SYN and FIN flags as one each.
    pub fn sequence_length(&self) -> u64 {
        u64::from(self.syn) + self.payload.len() as u64 + u64::from(self.fin)
    }
}

impl fmt::Display for SenderMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TCP seq={} len={}", self.seqno, self.payload.len())?;
        if self.syn { write!(f, " syn")?; }
        if self.fin { write!(f, " fin")?; }
        if self.rst { write!(f, " rst")?; }
        Ok(())
    }
}

/// An acknowledgement and window advertisement from a receiver to the sender of the other end.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverMessage {
    /// The next sequence number expected, absent until a SYN was received.
    pub ackno: Option<SeqNumber>,
    /// Number of further sequence numbers the receiver is willing to accept.
    pub window_size: u16,
    /// The receiving side has failed.
    pub rst: bool,
}

impl fmt::Display for ReceiverMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ackno {
            Some(ackno) => write!(f, "TCP ack={} win={}", ackno, self.window_size)?,
            None => write!(f, "TCP win={}", self.window_size)?,
        }
        if self.rst { write!(f, " rst")?; }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sequence_length_counts_flags() {
        let mut message = SenderMessage::default();
        assert_eq!(message.sequence_length(), 0);
        message.syn = true;
        assert_eq!(message.sequence_length(), 1);
        message.payload = b"cat".to_vec();
        message.fin = true;
        assert_eq!(message.sequence_length(), 5);
        message.rst = true;
        assert_eq!(message.sequence_length(), 5);
    }

    #[test]
    fn display() {
        let message = SenderMessage {
            seqno: SeqNumber(7),
            syn: true,
            payload: b"ab".to_vec(),
            ..SenderMessage::default()
        };
        assert_eq!(format!("{}", message), "TCP seq=7 len=2 syn");

        let ack = ReceiverMessage { ackno: Some(SeqNumber(9)), window_size: 10, rst: false };
        assert_eq!(format!("{}", ack), "TCP ack=9 win=10");
    }
}
