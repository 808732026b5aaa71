//! Moves a byte stream across a simulated lossy link.
//!
//! # Usage
//!
//! A sender and a receiver exchange segments and acknowledgements in lockstep rounds. Every
//! `drop-every`th segment the sender emits is lost on the way, and every `swap-every`th pair of
//! surviving segments is delivered out of order. Time advances by `tick` milliseconds per round,
//! which drives the retransmission timer of the sender.
//!
//!   > $ cargo run --example lossy_transfer -- --bytes 100000 --drop-every 4 --swap-every 3
//!
//! The transfer is abandoned once the sender retransmitted the same segment more often than the
//! configured limit allows.
use std::io::{stdout, Write};
use structopt::StructOpt;

use simnet::layer::tcp::{Config, Receiver, Sender, SenderMessage};
use simnet::time::Duration;
use simnet::wire::TcpSeqNumber;

fn main() {
    let Options {
        bytes,
        drop_every,
        swap_every,
        payload,
        tick,
        isn,
        max_rounds,
    } = Options::from_args();

    let config = Config {
        max_payload_size: payload,
        isn: TcpSeqNumber(isn),
        ..Config::default()
    };
    let mut sender = Sender::with_config(&config);
    let mut receiver = Receiver::with_config(&config);

    let data: Vec<u8> = (0..bytes).map(|i| (i % 251) as u8).collect();
    let mut written = 0;
    let mut received = Vec::with_capacity(bytes);
    let mut link = Link { drop_every, swap_every, segments: 0, dropped: 0 };

    let out = stdout();
    let mut out = out.lock();

    let mut rounds = 0;
    while !receiver.stream().is_finished() {
        if rounds == max_rounds {
            writeln!(out, "gave up after {} rounds", rounds).unwrap();
            std::process::exit(1);
        }
        rounds += 1;

        if written < data.len() {
            written += sender.stream_mut().push(&data[written..]);
            if written == data.len() {
                sender.stream_mut().close();
            }
        }

        let mut segments = Vec::new();
        sender.push(&mut segments);
        sender.tick(Duration::from_millis(tick), &mut segments);
        if sender.consecutive_retransmissions() > config.max_retx_attempts {
            writeln!(out, "connection lost after {} retransmissions",
                sender.consecutive_retransmissions()).unwrap();
            std::process::exit(1);
        }

        for segment in link.deliver(segments) {
            receiver.receive(&segment);
        }
        sender.receive(&receiver.send());

        let available = receiver.stream().bytes_buffered();
        received.extend(receiver.stream_mut().read(available));
    }

    assert_eq!(received, data, "stream was corrupted in transit");
    writeln!(out, "transferred {} bytes in {} rounds ({} ms)", bytes, rounds, rounds * tick).unwrap();
    writeln!(out, "sent {} segments, {} lost", link.segments, link.dropped).unwrap();
}

/// A deterministic unreliable link.
struct Link {
    drop_every: u64,
    swap_every: u64,
    segments: u64,
    dropped: u64,
}

impl Link {
    fn deliver(&mut self, segments: Vec<SenderMessage>) -> Vec<SenderMessage> {
        let mut delivered = Vec::with_capacity(segments.len());
        for segment in segments {
            self.segments += 1;
            if self.drop_every != 0 && self.segments % self.drop_every == 0 {
                self.dropped += 1;
                continue;
            }
            delivered.push(segment);
        }

        if self.swap_every != 0 {
            let every = self.swap_every as usize;
            for (i, pair) in delivered.chunks_mut(2).enumerate() {
                if pair.len() == 2 && i % every == every - 1 {
                    pair.swap(0, 1);
                }
            }
        }

        delivered
    }
}

#[derive(StructOpt)]
struct Options {
    /// Number of bytes to transfer.
    #[structopt(long, default_value = "100000")]
    bytes: usize,
    /// Lose every n-th segment, zero for a reliable link.
    #[structopt(long, default_value = "3")]
    drop_every: u64,
    /// Swap every n-th pair of delivered segments, zero to keep the order.
    #[structopt(long, default_value = "2")]
    swap_every: u64,
    /// Maximum payload bytes per segment.
    #[structopt(long, default_value = "1000")]
    payload: usize,
    /// Milliseconds of simulated time per round.
    #[structopt(long, default_value = "100")]
    tick: u64,
    /// The initial sequence number of the sender.
    #[structopt(long, default_value = "4294967000")]
    isn: u32,
    /// Give up after this many rounds.
    #[structopt(long, default_value = "100000")]
    max_rounds: u64,
}
