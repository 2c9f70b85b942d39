//! Incremental decoding of a top-level JSON array.
//!
//! The reader keeps a growing byte buffer. Chunks are appended until the
//! opening `[` is found, then each element is decoded in place with
//! `serde_json`'s stream deserializer. When a value runs past the end of the
//! buffer another chunk is appended and decoding restarts from the value's
//! first byte.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;

use super::{StreamingError, StreamingResult};
use crate::config::StreamingConfig;

const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Searching,
    InArray,
    Finished,
}

enum Decoded {
    Value(Value, usize),
    Incomplete,
    Invalid(serde_json::Error),
}

/// Lazy sequence of the elements of a top-level JSON array.
///
/// Yields `Ok(value)` per element. After the first `Err` the iterator is
/// exhausted.
///
/// # Errors
///
/// - [`StreamingError::NotAnArray`] if the first non-whitespace byte is not `[`
/// - [`StreamingError::UnexpectedEof`] if the source ends inside a value
/// - [`StreamingError::Json`] if a value is malformed
/// - [`StreamingError::Io`] if reading fails
pub struct JsonArrayStream<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    state: State,
    bytes_read: u64,
    total_bytes: Option<u64>,
    values_yielded: usize,
}

impl JsonArrayStream<File> {
    /// Opens a file for incremental reading.
    ///
    /// # Errors
    ///
    /// Returns [`StreamingError::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, config: StreamingConfig) -> StreamingResult<Self> {
        let file = File::open(path)?;
        let total = file.metadata()?.len();
        let mut stream = Self::new(file, config);
        stream.total_bytes = Some(total);
        Ok(stream)
    }
}

impl<R: Read> JsonArrayStream<R> {
    /// Wraps any reader.
    pub fn new(reader: R, config: StreamingConfig) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            pos: 0,
            chunk_size: config.chunk_size.max(1),
            state: State::Searching,
            bytes_read: 0,
            total_bytes: None,
            values_yielded: 0,
        }
    }

    /// Returns the number of bytes read from the source so far.
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the source size in bytes, if known.
    pub fn total_bytes(&self) -> Option<u64> {
        self.total_bytes
    }

    /// Returns approximate progress as a percentage (0.0 to 100.0).
    pub fn progress(&self) -> Option<f64> {
        match self.total_bytes {
            Some(0) | None => None,
            Some(total) => Some((self.bytes_read as f64 / total as f64) * 100.0),
        }
    }

    /// Returns the number of elements yielded so far.
    pub fn values_yielded(&self) -> usize {
        self.values_yielded
    }

    /// Appends one chunk to the buffer. Returns `false` at end of stream.
    fn fill(&mut self) -> io::Result<bool> {
        if self.pos > 0 {
            self.buffer.drain(..self.pos);
            self.pos = 0;
        }

        let start = self.buffer.len();
        self.buffer.resize(start + self.chunk_size, 0);
        let read = loop {
            match self.reader.read(&mut self.buffer[start..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.buffer.truncate(start);
                    return Err(e);
                }
            }
        };
        self.buffer.truncate(start + read);
        self.bytes_read += read as u64;
        Ok(read > 0)
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.pos < self.buffer.len() && pred(self.buffer[self.pos]) {
            self.pos += 1;
        }
    }

    /// Positions the buffer just past the opening `[`.
    ///
    /// Returns `Ok(false)` for an empty (or whitespace-only) document.
    fn find_array_start(&mut self) -> StreamingResult<bool> {
        let mut bom_checked = false;
        loop {
            if !bom_checked {
                if self.buffer.len() - self.pos < BOM.len() && self.fill()? {
                    continue;
                }
                if self.buffer[self.pos..].starts_with(BOM) {
                    self.pos += BOM.len();
                }
                bom_checked = true;
            }

            self.skip_while(|b| b.is_ascii_whitespace());
            match self.buffer.get(self.pos) {
                Some(b'[') => {
                    self.pos += 1;
                    return Ok(true);
                }
                Some(_) => {
                    return Err(StreamingError::NotAnArray(leading_char(
                        &self.buffer[self.pos..],
                    )));
                }
                None => {
                    if !self.fill()? {
                        return Ok(false);
                    }
                }
            }
        }
    }

    /// Decodes the next array element, or `None` once the array closes.
    fn decode_next(&mut self) -> StreamingResult<Option<Value>> {
        loop {
            self.skip_while(|b| b.is_ascii_whitespace() || b == b',');

            let Some(&first) = self.buffer.get(self.pos) else {
                if self.fill()? {
                    continue;
                }
                return Ok(None);
            };
            if first == b']' {
                self.pos += 1;
                return Ok(None);
            }

            let decoded = {
                let mut values =
                    serde_json::Deserializer::from_slice(&self.buffer[self.pos..]).into_iter::<Value>();
                match values.next() {
                    Some(Ok(value)) => Decoded::Value(value, values.byte_offset()),
                    Some(Err(e)) if e.is_eof() => Decoded::Incomplete,
                    Some(Err(e)) => Decoded::Invalid(e),
                    None => Decoded::Incomplete,
                }
            };

            match decoded {
                Decoded::Value(value, consumed) => {
                    // a number touching the buffer end may continue in the next chunk
                    let at_end = self.pos + consumed == self.buffer.len();
                    if value.is_number() && at_end && self.fill()? {
                        continue;
                    }
                    self.pos += consumed;
                    return Ok(Some(value));
                }
                Decoded::Incomplete => {
                    if !self.fill()? {
                        return Err(StreamingError::UnexpectedEof);
                    }
                }
                Decoded::Invalid(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for JsonArrayStream<R> {
    type Item = StreamingResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Finished => return None,
                State::Searching => match self.find_array_start() {
                    Ok(true) => self.state = State::InArray,
                    Ok(false) => {
                        self.state = State::Finished;
                        return None;
                    }
                    Err(e) => {
                        self.state = State::Finished;
                        return Some(Err(e));
                    }
                },
                State::InArray => {
                    return match self.decode_next() {
                        Ok(Some(value)) => {
                            self.values_yielded += 1;
                            Some(Ok(value))
                        }
                        Ok(None) => {
                            self.state = State::Finished;
                            None
                        }
                        Err(e) => {
                            self.state = State::Finished;
                            Some(Err(e))
                        }
                    };
                }
            }
        }
    }
}

fn leading_char(bytes: &[u8]) -> char {
    String::from_utf8_lossy(&bytes[..bytes.len().min(4)])
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
