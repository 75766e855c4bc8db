//! The textual blob layout and the decode loop.
//!
//! ```text
//! Repeat=<prefix-length tree>
//! Tail=<suffix-length tree>
//! Char=<character tree>
//! NumWords=<count>
//! Bits=
//! <bitstream, wrapped>
//! ```

use tracing::{debug, trace};

use crate::bits::BitReader;
use crate::error::{Error, Result};
use crate::huffman::HuffmanTree;

const REPEAT: &str = "Repeat";
const TAIL: &str = "Tail";
const CHAR: &str = "Char";
const NUM_WORDS: &str = "NumWords";
const BITS: &str = "Bits";

/// A parsed blob: the three code trees, the word count and the packed bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Tree for shared-prefix lengths.
    pub repeat: HuffmanTree<usize>,
    /// Tree for suffix lengths.
    pub tail: HuffmanTree<usize>,
    /// Tree for suffix characters.
    pub chars: HuffmanTree<char>,
    /// Number of words encoded in `bits`.
    pub num_words: usize,
    /// Printable bitstream; whitespace is insignificant.
    pub bits: String,
}

/// Strip `key=` from the front of the next line and advance past it.
fn field<'a>(rest: &mut &'a str, key: &'static str) -> Result<&'a str> {
    let (line, remainder) = rest.split_once('\n').unwrap_or((*rest, ""));
    let line = line.strip_suffix('\r').unwrap_or(line);
    let value = line
        .strip_prefix(key)
        .and_then(|v| v.strip_prefix('='))
        .ok_or(Error::MissingField(key))?;
    *rest = remainder;
    Ok(value)
}

impl Blob {
    /// Parse blob text. The bitstream is not decoded until [`expand`](Self::expand).
    pub fn parse(text: &str) -> Result<Self> {
        let mut rest = text;
        let repeat = HuffmanTree::parse(field(&mut rest, REPEAT)?)?;
        let tail = HuffmanTree::parse(field(&mut rest, TAIL)?)?;
        let chars = HuffmanTree::parse(field(&mut rest, CHAR)?)?;
        let count = field(&mut rest, NUM_WORDS)?;
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCount(count.to_string()));
        }
        let num_words = count
            .parse()
            .map_err(|_| Error::InvalidCount(count.to_string()))?;
        let body = rest
            .strip_prefix(BITS)
            .and_then(|v| v.strip_prefix('='))
            .ok_or(Error::MissingField(BITS))?;
        // Keep the line breaks, drop blank lines and surrounding whitespace.
        let bits = body
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Self {
            repeat,
            tail,
            chars,
            num_words,
            bits,
        })
    }

    /// Render in the fixed line layout.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.bits.len() + 256);
        for (key, src) in [
            (REPEAT, self.repeat.source_code()),
            (TAIL, self.tail.source_code()),
            (CHAR, self.chars.source_code()),
            (NUM_WORDS, self.num_words.to_string()),
        ] {
            out.push_str(key);
            out.push('=');
            out.push_str(&src);
            out.push('\n');
        }
        out.push_str(BITS);
        out.push_str("=\n");
        if !self.bits.is_empty() {
            out.push_str(&self.bits);
            out.push('\n');
        }
        out
    }

    /// Decode every word.
    ///
    /// Fails if the bitstream runs out before `num_words` words, or if
    /// anything other than zero padding is left afterwards.
    pub fn expand(&self) -> Result<Vec<String>> {
        let mut reader = BitReader::new(&self.bits);
        // Every word costs at least two bits.
        let mut words = Vec::with_capacity(self.num_words.min(self.bits.len() * 3));
        let mut prev: Vec<char> = Vec::new();

        for i in 0..self.num_words {
            let prefix = self.repeat.decode_symbol(&mut reader, REPEAT)?;
            let tail = self.tail.decode_symbol(&mut reader, TAIL)?;
            if prefix > prev.len() {
                return Err(Error::InvalidPrefix {
                    prefix,
                    available: prev.len(),
                });
            }
            prev.truncate(prefix);
            for _ in 0..tail {
                let ch = self.chars.decode_symbol(&mut reader, CHAR)?;
                if ch.is_control() {
                    return Err(Error::Alphabet { word: i, ch });
                }
                prev.push(ch);
            }
            let word: String = prev.iter().collect();
            trace!(index = i, prefix, tail, word = %word, "decoded word");
            words.push(word);
        }
        reader.finish(self.num_words)?;

        debug!(
            words = words.len(),
            bits = reader.bits_consumed(),
            "expanded blob"
        );
        Ok(words)
    }
}
