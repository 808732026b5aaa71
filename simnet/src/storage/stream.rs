use std::collections::VecDeque;

/// A bounded, in-memory pipe of bytes.
///
/// One side pushes, the other side peeks and pops. The stream can hold at most `capacity` bytes
/// that have been pushed but not yet popped; excess input is truncated, not queued. Closing and
/// the error flag are both sticky.
#[derive(Debug, Clone)]
pub struct ByteStream {
    capacity: usize,
    buffer: VecDeque<u8>,
    pushed: u64,
    popped: u64,
    closed: bool,
    error: bool,
}

impl ByteStream {
    /// Create an empty stream holding at most `capacity` unread bytes.
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
            pushed: 0,
            popped: 0,
            closed: false,
            error: false,
        }
    }

    /// Append as much of `data` as fits.
    ///
    /// Returns the number of bytes accepted. Nothing is accepted after the stream was closed.
    pub fn push(&mut self, data: &[u8]) -> usize {
        if self.closed {
            return 0;
        }

        let len = data.len().min(self.available_capacity());
        self.buffer.extend(&data[..len]);
        self.pushed += len as u64;
        len
    }

    /// Signal that no more bytes will be pushed.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Mark the stream as errored.
    pub fn set_error(&mut self) {
        self.error = true;
    }

    /// Whether the stream has been marked as errored.
    pub fn has_error(&self) -> bool {
        self.error
    }

    /// Whether the writing side has closed the stream.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the stream is closed and every byte was popped.
    pub fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }

    /// The number of bytes that could be pushed right now.
    pub fn available_capacity(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    /// The total capacity the stream was created with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total number of bytes ever pushed.
    pub fn bytes_pushed(&self) -> u64 {
        self.pushed
    }

    /// Total number of bytes ever popped.
    pub fn bytes_popped(&self) -> u64 {
        self.popped
    }

    /// Number of bytes pushed but not yet popped.
    pub fn bytes_buffered(&self) -> usize {
        self.buffer.len()
    }

    /// A view of the next bytes to be popped.
    ///
    /// This is a prefix of the buffered data and may be shorter than `bytes_buffered`. It is
    /// empty only if nothing is buffered.
    pub fn peek(&self) -> &[u8] {
        let (front, back) = self.buffer.as_slices();
        if front.is_empty() { back } else { front }
    }

    /// Discard up to `len` bytes from the front.
    pub fn pop(&mut self, len: usize) {
        let len = len.min(self.buffer.len());
        self.buffer.drain(..len);
        self.popped += len as u64;
    }

    /// Pop up to `max` bytes into an owned buffer.
    pub fn read(&mut self, max: usize) -> Vec<u8> {
        let len = max.min(self.buffer.len());
        let data: Vec<u8> = self.buffer.drain(..len).collect();
        self.popped += len as u64;
        data
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn push_truncates_to_capacity() {
        let mut stream = ByteStream::new(4);
        assert_eq!(stream.push(b"abc"), 3);
        assert_eq!(stream.available_capacity(), 1);
        assert_eq!(stream.push(b"def"), 1);
        assert_eq!(stream.bytes_pushed(), 4);
        assert_eq!(stream.available_capacity(), 0);
        assert_eq!(stream.read(10), b"abcd".to_vec());
        assert_eq!(stream.bytes_popped(), 4);
        assert_eq!(stream.available_capacity(), 4);
    }

    #[test]
    fn peek_and_pop() {
        let mut stream = ByteStream::new(8);
        stream.push(b"hello");
        assert_eq!(stream.peek(), b"hello");
        stream.pop(2);
        assert_eq!(stream.peek(), b"llo");
        assert_eq!(stream.bytes_buffered(), 3);
        stream.pop(100);
        assert_eq!(stream.peek(), b"");
        assert_eq!(stream.bytes_popped(), 5);
    }

    #[test]
    fn peek_after_wrap_around() {
        let mut stream = ByteStream::new(4);
        stream.push(b"abcd");
        stream.pop(3);
        stream.push(b"efg");
        let mut seen = Vec::new();
        while stream.bytes_buffered() > 0 {
            let chunk = stream.peek().to_vec();
            assert!(!chunk.is_empty());
            stream.pop(chunk.len());
            seen.extend(chunk);
        }
        assert_eq!(seen, b"defg".to_vec());
    }

    #[test]
    fn close_and_finish() {
        let mut stream = ByteStream::new(8);
        stream.push(b"ab");
        stream.close();
        assert!(stream.is_closed());
        assert!(!stream.is_finished());
        assert_eq!(stream.push(b"c"), 0);
        stream.pop(2);
        assert!(stream.is_finished());
    }

    #[test]
    fn error_is_sticky() {
        let mut stream = ByteStream::new(1);
        assert!(!stream.has_error());
        stream.set_error();
        stream.push(b"x");
        stream.close();
        assert!(stream.has_error());
    }
}
