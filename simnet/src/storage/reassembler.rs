use std::collections::BTreeMap;

use super::ByteStream;

/// Reorders substrings of a stream into its output.
///
/// Each substring is tagged with the absolute index of its first byte. Substrings may arrive in
/// any order, overlap or be repeated; the output receives every byte exactly once and in order.
/// Bytes that do not yet fit into the output are held back, but only as far as the output has
/// room for them at all. Anything beyond is discarded and must be retransmitted by the peer.
///
/// ```
/// # use simnet::storage::{ByteStream, Reassembler};
/// let mut reassembler = Reassembler::new(ByteStream::new(64));
/// reassembler.insert(3, b"def", true);
/// assert_eq!(reassembler.count_bytes_pending(), 3);
/// reassembler.insert(0, b"abc", false);
/// assert_eq!(reassembler.count_bytes_pending(), 0);
///
/// let output = reassembler.output_mut();
/// assert_eq!(output.read(6), b"abcdef".to_vec());
/// assert!(output.is_finished());
/// ```
#[derive(Debug)]
pub struct Reassembler {
    output: ByteStream,
    /// Buffered substrings by start index.
    ///
    /// Entries never overlap or touch and all start after `next_index`.
    pending: BTreeMap<u64, Vec<u8>>,
    next_index: u64,
    last_index: Option<u64>,
}

impl Reassembler {
    /// Create a reassembler writing into `output`.
    pub fn new(output: ByteStream) -> Self {
        Reassembler {
            output,
            pending: BTreeMap::new(),
            next_index: 0,
            last_index: None,
        }
    }

    /// Insert a substring starting at absolute index `first_index`.
    ///
    /// Set `is_last_substring` if the end of `data` is the end of the stream. The output is closed
    /// as soon as every byte up to that end has been written to it.
    ///
    /// Once the output is closed every further insert is ignored. The first final substring fixes
    /// the stream length, later ones claiming a different end do not move it.
    pub fn insert(&mut self, first_index: u64, data: &[u8], is_last_substring: bool) {
        if self.output.is_closed() {
            return;
        }

        if is_last_substring && self.last_index.is_none() {
            let last_index = first_index + data.len() as u64;
            self.last_index = Some(last_index);
            self.pending.retain(|&start, _| start < last_index);
            if let Some((&start, tail)) = self.pending.iter_mut().next_back() {
                tail.truncate((last_index - start) as usize);
            }
        }

        self.buffer(first_index, data);

        if Some(self.next_index) == self.last_index {
            self.output.close();
            self.pending.clear();
        }
    }

    /// The number of bytes held back, waiting for a gap before them to be filled.
    pub fn count_bytes_pending(&self) -> u64 {
        self.pending.values().map(|data| data.len() as u64).sum()
    }

    /// The absolute index of the next byte the output expects.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// The stream length, if the final substring has been seen.
    pub fn last_index(&self) -> Option<u64> {
        self.last_index
    }

    /// The stream the reassembled bytes are written to.
    pub fn output(&self) -> &ByteStream {
        &self.output
    }

    /// Mutable access to the output stream, for reading from it.
    pub fn output_mut(&mut self) -> &mut ByteStream {
        &mut self.output
    }

    fn buffer(&mut self, first_index: u64, data: &[u8]) {
        let end = first_index + data.len() as u64;
        let limit = self.next_index + self.output.available_capacity() as u64;

        // Clip to the part that is neither delivered already nor beyond the output capacity.
        // Nothing exists past the end of the stream.
        let start = first_index.max(self.next_index);
        let end = end.min(limit).min(self.last_index.unwrap_or(u64::MAX));
        if start >= end {
            return;
        }

        let data = &data[(start - first_index) as usize..(end - first_index) as usize];
        let (start, merged) = self.merge(start, data);

        if start == self.next_index {
            // Anything the output refuses is dropped and has to be sent again.
            let written = self.output.push(&merged);
            self.next_index += written as u64;
        } else {
            self.pending.insert(start, merged);
        }
    }

    /// Take all pending entries that overlap or touch `[start, start + data.len())` out of the
    /// map and return their union.
    ///
    /// Where bytes are already buffered, those are kept.
    fn merge(&mut self, mut start: u64, data: &[u8]) -> (u64, Vec<u8>) {
        let mut merged = data.to_vec();

        let before = self.pending
            .range(..=start)
            .next_back()
            .map(|(&key, value)| (key, key + value.len() as u64));
        if let Some((prev_start, prev_end)) = before {
            if prev_end >= start {
                if let Some(mut prev) = self.pending.remove(&prev_start) {
                    let end = start + merged.len() as u64;
                    if end > prev_end {
                        prev.extend_from_slice(&merged[(prev_end - start) as usize..]);
                    }
                    merged = prev;
                    start = prev_start;
                }
            }
        }

        loop {
            let end = start + merged.len() as u64;
            let after = match self.pending.range(start..).next() {
                Some((&key, _)) if key <= end => key,
                _ => break,
            };

            let following = match self.pending.remove(&after) {
                Some(following) => following,
                None => break,
            };

            let offset = (after - start) as usize;
            let following_end = after + following.len() as u64;
            if following_end >= end {
                merged.truncate(offset);
                merged.extend_from_slice(&following);
            } else {
                merged[offset..offset + following.len()].copy_from_slice(&following);
            }
        }

        (start, merged)
    }
}
