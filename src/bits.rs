//! Bit packing into printable text.
//!
//! Bits are grouped six at a time, most significant first, and each group is
//! written as one character of a base64-style alphabet. Newlines are inserted
//! for readability and carry no bits.

use crate::error::{Error, Result};

/// The 64 printable characters, indexed by 6-bit value.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Bits carried by one alphabet character.
pub const BITS_PER_CHAR: usize = 6;

/// Default characters per output line.
pub const DEFAULT_LINE_WIDTH: usize = 80;

fn alphabet_index(c: u8) -> Option<u8> {
    match c {
        b'A'..=b'Z' => Some(c - b'A'),
        b'a'..=b'z' => Some(c - b'a' + 26),
        b'0'..=b'9' => Some(c - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Append-only bit sequence.
#[derive(Debug, Default, Clone)]
pub struct BitBuffer {
    bits: Vec<u8>, // one 0/1 per entry
}

impl BitBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    /// Append a code, given as a sequence of 0/1 values.
    pub fn append(&mut self, code: &[u8]) {
        self.bits.extend_from_slice(code);
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether no bits have been appended.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Render as printable text, breaking lines every `line_width` characters.
    ///
    /// The last group is right-padded with zero bits. A `line_width` of 0
    /// disables wrapping. No newline follows the final character.
    pub fn format(&self, line_width: usize) -> String {
        let nchars = self.bits.len().div_ceil(BITS_PER_CHAR);
        let mut text = String::with_capacity(nchars + nchars / line_width.max(1));
        for (i, chunk) in self.bits.chunks(BITS_PER_CHAR).enumerate() {
            if line_width > 0 && i > 0 && i % line_width == 0 {
                text.push('\n');
            }
            let mut index = 0usize;
            for &b in chunk {
                index = (index << 1) | (b & 1) as usize;
            }
            index <<= BITS_PER_CHAR - chunk.len();
            text.push(ALPHABET[index] as char);
        }
        text
    }
}

/// Reads bits back out of text produced by [`BitBuffer::format`].
#[derive(Debug)]
pub struct BitReader {
    encoded: Vec<char>,
    position: usize,
    accum: u8,
    nbits: usize,
    consumed: usize,
}

impl BitReader {
    /// Create a reader over printable text. Whitespace is ignored.
    pub fn new(text: &str) -> Self {
        Self {
            encoded: text
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect(),
            position: 0,
            accum: 0,
            nbits: 0,
            consumed: 0,
        }
    }

    /// Yield the next bit, decoding a new character once the current one is spent.
    pub fn next_bit(&mut self) -> Result<u8> {
        if self.nbits == 0 {
            let c = *self
                .encoded
                .get(self.position)
                .ok_or(Error::BitsExhausted {
                    consumed: self.consumed,
                })?;
            self.accum = u8::try_from(c)
                .ok()
                .and_then(alphabet_index)
                .ok_or(Error::InvalidBitChar(c))?;
            self.position += 1;
            self.nbits = BITS_PER_CHAR;
        }
        let bit = 1 & (self.accum >> 5);
        self.accum = 0b11_1111 & (self.accum << 1);
        self.nbits -= 1;
        self.consumed += 1;
        Ok(bit)
    }

    /// Total bits handed out so far.
    pub fn bits_consumed(&self) -> usize {
        self.consumed
    }

    /// Check that only zero padding remains unread.
    ///
    /// `words` is reported in the error to locate the mismatch.
    pub fn finish(&self, words: usize) -> Result<()> {
        if self.position < self.encoded.len() || self.accum != 0 {
            return Err(Error::TrailingBits { words });
        }
        Ok(())
    }
}
