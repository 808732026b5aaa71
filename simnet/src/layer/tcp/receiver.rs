use crate::storage::{ByteStream, Reassembler};
use crate::wire::TcpSeqNumber as SeqNumber;

use super::{Config, ReceiverMessage, SenderMessage};

/// The receiving half of a connection.
///
/// Waits for a SYN to learn the zero point of the sequence space, then hands every payload to
/// its [`Reassembler`] and acknowledges the contiguous prefix that arrived so far.
///
/// [`Reassembler`]: ../../storage/struct.Reassembler.html
#[derive(Debug)]
pub struct Receiver {
    reassembler: Reassembler,
    zero_point: Option<SeqNumber>,
    /// Stream length announced by the first FIN.
    last_index: Option<u64>,
}

impl Receiver {
    /// Create a receiver writing into the output of `reassembler`.
    pub fn new(reassembler: Reassembler) -> Self {
        Receiver {
            reassembler,
            zero_point: None,
            last_index: None,
        }
    }

    /// Create a receiver with a fresh stream of the configured capacity.
    pub fn with_config(config: &Config) -> Self {
        Receiver::new(Reassembler::new(ByteStream::new(config.recv_capacity)))
    }

    /// Process a segment from the peer's sender.
    pub fn receive(&mut self, message: &SenderMessage) {
        if message.rst {
            net_debug!("tcp receiver: reset by peer at {}", message.seqno);
            self.reassembler.output_mut().set_error();
            return;
        }

        if message.syn {
            self.zero_point = Some(message.seqno);
            self.last_index = None;
        }

        let zero_point = match self.zero_point {
            Some(zero_point) => zero_point,
            None => return,
        };

        let checkpoint = self.reassembler.output().bytes_pushed();
        let absolute = message.seqno.unwrap(zero_point, checkpoint);
        // Slot zero belongs to the SYN, payload starts at one.
        let first_index = if message.syn {
            absolute
        } else if absolute == 0 {
            return;
        } else {
            absolute - 1
        };

        if message.fin && self.last_index.is_none() {
            self.last_index = Some(first_index + message.payload.len() as u64);
        }

        self.reassembler.insert(first_index, &message.payload, message.fin);
    }

    /// The acknowledgement and window to report to the peer's sender.
    pub fn send(&self) -> ReceiverMessage {
        let output = self.reassembler.output();
        let ackno = self.zero_point.map(|zero_point| {
            let pushed = output.bytes_pushed();
            // The FIN occupies the slot after the last byte.
            let fin = u64::from(self.last_index == Some(pushed));
            SeqNumber::wrap(pushed + 1 + fin, zero_point)
        });

        ReceiverMessage {
            ackno,
            window_size: output.available_capacity().min(usize::from(u16::MAX)) as u16,
            rst: output.has_error(),
        }
    }

    /// The reassembler owning the inbound stream.
    pub fn reassembler(&self) -> &Reassembler {
        &self.reassembler
    }

    /// The inbound stream.
    pub fn stream(&self) -> &ByteStream {
        self.reassembler.output()
    }

    /// The inbound stream, for reading from it.
    pub fn stream_mut(&mut self) -> &mut ByteStream {
        self.reassembler.output_mut()
    }
}
