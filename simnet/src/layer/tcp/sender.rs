use std::collections::BTreeMap;

use crate::storage::ByteStream;
use crate::time::Duration;
use crate::wire::TcpSeqNumber as SeqNumber;

use super::{Config, ReceiverMessage, SenderMessage};

/// The sending half of a connection.
///
/// Reads from its [`ByteStream`] and cuts it into segments that fit the window the peer last
/// advertised. Every segment that occupies sequence space is kept until it is fully
/// acknowledged and retransmitted when the timer expires first.
///
/// Produced segments are appended to an output parameter, the caller decides how to deliver
/// them.
///
/// [`ByteStream`]: ../../storage/struct.ByteStream.html
#[derive(Debug)]
pub struct Sender {
    input: ByteStream,
    isn: SeqNumber,
    max_payload_size: usize,

    initial_rto: Duration,
    rto: Duration,
    /// Time since the timer was (re)started, `None` while it is stopped.
    timer: Option<Duration>,
    consecutive_retransmissions: u64,

    /// Sent but unacknowledged segments by absolute sequence number.
    outstanding: BTreeMap<u64, SenderMessage>,
    next_abs_seqno: u64,
    last_abs_ack: u64,
    window_size: u16,
    syn_sent: bool,
    fin_sent: bool,
}

impl Sender {
    /// Create a sender reading from `input`.
    ///
    /// Segments carry at most [`Config::MAX_PAYLOAD_SIZE`] bytes of payload.
    ///
    /// [`Config::MAX_PAYLOAD_SIZE`]: struct.Config.html#associatedconstant.MAX_PAYLOAD_SIZE
    pub fn new(input: ByteStream, isn: SeqNumber, initial_rto: Duration) -> Self {
        Sender {
            input,
            isn,
            max_payload_size: Config::MAX_PAYLOAD_SIZE,
            initial_rto,
            rto: initial_rto,
            timer: None,
            consecutive_retransmissions: 0,
            outstanding: BTreeMap::new(),
            next_abs_seqno: 0,
            last_abs_ack: 0,
            // Enough to send the SYN before anything was heard from the peer.
            window_size: 1,
            syn_sent: false,
            fin_sent: false,
        }
    }

    /// Create a sender with a fresh stream and the parameters of `config`.
    pub fn with_config(config: &Config) -> Self {
        let mut sender = Sender::new(
            ByteStream::new(config.send_capacity),
            config.isn,
            config.rt_timeout);
        sender.max_payload_size = config.max_payload_size;
        sender
    }

    /// Send as much of the input as the window allows.
    ///
    /// A zero window is treated as a window of one so that the peer is probed and eventually
    /// reports when it has room again.
    pub fn push<E>(&mut self, transmit: &mut E)
        where E: Extend<SenderMessage>
    {
        while self.next_abs_seqno < self.window_end() && !self.fin_sent {
            let room = self.window_end() - self.next_abs_seqno - u64::from(!self.syn_sent);
            let len = self.input.bytes_buffered()
                .min(self.max_payload_size)
                .min(room as usize);

            let mut message = SenderMessage {
                seqno: SeqNumber::wrap(self.next_abs_seqno, self.isn),
                syn: !self.syn_sent,
                payload: self.input.read(len),
                ..SenderMessage::default()
            };
            self.syn_sent = true;

            if self.next_abs_seqno + message.sequence_length() < self.window_end()
                && self.input.is_finished()
            {
                message.fin = true;
                self.fin_sent = true;
            }
            message.rst = self.input.has_error();

            let length = message.sequence_length();
            if length > 0 {
                net_trace!("tcp sender: sent {}", message);
                transmit.extend(Some(message.clone()));
                self.outstanding.insert(self.next_abs_seqno, message);
                if self.timer.is_none() {
                    self.timer = Some(Duration::from_millis(0));
                }
            }
            self.next_abs_seqno += length;

            if self.input.bytes_buffered() == 0 {
                break;
            }
        }
    }

    /// Process an acknowledgement and window update from the peer's receiver.
    ///
    /// Acknowledgements of data never sent and those that do not advance are ignored.
    pub fn receive(&mut self, message: &ReceiverMessage) {
        self.window_size = message.window_size;
        if message.rst {
            net_debug!("tcp sender: reset by peer");
            self.input.set_error();
        }

        let ackno = match message.ackno {
            Some(ackno) => ackno.unwrap(self.isn, self.next_abs_seqno),
            None => return,
        };
        if ackno > self.next_abs_seqno || ackno <= self.last_abs_ack {
            return;
        }

        // Segments are only retired once acknowledged completely.
        while let Some((&start, segment)) = self.outstanding.iter().next() {
            if start + segment.sequence_length() > ackno {
                break;
            }
            self.outstanding.remove(&start);
        }

        self.timer = if self.outstanding.is_empty() {
            None
        } else {
            Some(Duration::from_millis(0))
        };
        self.last_abs_ack = ackno;
        self.rto = self.initial_rto;
        self.consecutive_retransmissions = 0;
    }

    /// Advance the retransmission timer by `elapsed`.
    ///
    /// On expiry the oldest outstanding segment is sent again.
    pub fn tick<E>(&mut self, elapsed: Duration, transmit: &mut E)
        where E: Extend<SenderMessage>
    {
        let timer = match self.timer {
            Some(timer) => timer.saturating_add(elapsed),
            None => return,
        };

        if timer < self.rto {
            self.timer = Some(timer);
            return;
        }

        if let Some(segment) = self.outstanding.values().next() {
            transmit.extend(Some(segment.clone()));
        }
        // A closed window is flow control, not loss.
        if self.window_size > 0 {
            self.rto = self.rto.saturating_mul(2);
            self.consecutive_retransmissions += 1;
        }
        net_trace!("tcp sender: retransmission, rto now {:?}", self.rto);
        self.timer = Some(Duration::from_millis(0));
    }

    /// A segment that occupies no sequence space, for acknowledgements and resets.
    pub fn make_empty_message(&self) -> SenderMessage {
        SenderMessage {
            seqno: SeqNumber::wrap(self.next_abs_seqno, self.isn),
            rst: self.input.has_error(),
            ..SenderMessage::default()
        }
    }

    /// The number of sequence numbers sent but not yet acknowledged.
    pub fn sequence_numbers_in_flight(&self) -> u64 {
        self.outstanding.values().map(SenderMessage::sequence_length).sum()
    }

    /// The number of retransmissions since the last acknowledgement that made progress.
    pub fn consecutive_retransmissions(&self) -> u64 {
        self.consecutive_retransmissions
    }

    /// The current retransmission timeout.
    pub fn rto(&self) -> Duration {
        self.rto
    }

    /// The outbound stream.
    pub fn stream(&self) -> &ByteStream {
        &self.input
    }

    /// The outbound stream, for writing to it.
    pub fn stream_mut(&mut self) -> &mut ByteStream {
        &mut self.input
    }

    fn window_end(&self) -> u64 {
        self.last_abs_ack + u64::from(self.window_size.max(1))
    }
}
