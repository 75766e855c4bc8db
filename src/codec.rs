//! Word-list compressor.

use std::fmt::Debug;

use tracing::debug;

use crate::bits::{BitBuffer, DEFAULT_LINE_WIDTH};
use crate::blob::Blob;
use crate::delta::deltas;
use crate::error::{Error, Result};
use crate::huffman::{CodeTable, SymbolTally};

/// Output settings for [`Compressor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecConfig {
    /// Bitstream characters per line. `0` writes the bitstream on one line.
    pub line_width: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Delta + Huffman compressor for sorted word lists.
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

fn code_for<'t, S: Ord + Debug>(
    table: &'t CodeTable<S>,
    symbol: &S,
    name: &'static str,
) -> Result<&'t [u8]> {
    table
        .get(symbol)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::UnknownSymbol(format!("{symbol:?}"), name))
}

impl Compressor {
    /// Create a compressor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compressor with explicit settings.
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Strategy name.
    pub fn name(&self) -> &'static str {
        "prefix"
    }

    /// Current settings.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Build the blob for `words`, in the order given.
    ///
    /// Words must not contain control characters; the first offending word
    /// is reported before any output is produced.
    ///
    /// # Errors
    /// Returns `Error::Alphabet` for a word with a control character.
    pub fn build<S: AsRef<str>>(&self, words: &[S]) -> Result<Blob> {
        for (word, w) in words.iter().enumerate() {
            if let Some(ch) = w.as_ref().chars().find(|c| c.is_control()) {
                return Err(Error::Alphabet { word, ch });
            }
        }

        let mut repeat = SymbolTally::new();
        let mut tail = SymbolTally::new();
        let mut chars = SymbolTally::new();
        for d in deltas(words) {
            repeat.tally(d.prefix_len);
            tail.tally(d.suffix_len());
            for c in d.suffix.chars() {
                chars.tally(c);
            }
        }
        debug!(
            words = words.len(),
            repeat_symbols = repeat.distinct(),
            tail_symbols = tail.distinct(),
            char_symbols = chars.distinct(),
            "tallied word list"
        );

        let (repeat, tail, chars) = (repeat.compile(), tail.compile(), chars.compile());
        let repeat_code = repeat.make_encoding();
        let tail_code = tail.make_encoding();
        let char_code = chars.make_encoding();

        let mut bits = BitBuffer::new();
        for d in deltas(words) {
            bits.append(code_for(&repeat_code, &d.prefix_len, "Repeat")?);
            bits.append(code_for(&tail_code, &d.suffix_len(), "Tail")?);
            for c in d.suffix.chars() {
                bits.append(code_for(&char_code, &c, "Char")?);
            }
        }
        debug!(bits = bits.len(), "encoded word list");

        Ok(Blob {
            repeat,
            tail,
            chars,
            num_words: words.len(),
            bits: bits.format(self.config.line_width),
        })
    }

    /// Compress `words` into blob text.
    pub fn compress<S: AsRef<str>>(&self, words: &[S]) -> Result<String> {
        let text = self.build(words)?.to_text();
        debug!(bytes = text.len(), "compressed word list");
        Ok(text)
    }

    /// Decode blob text back into its words.
    pub fn expand(&self, blob: &str) -> Result<Vec<String>> {
        Blob::parse(blob)?.expand()
    }

    /// Decode blob text into newline-separated words.
    pub fn expand_to_text(&self, blob: &str) -> Result<String> {
        Ok(self.expand(blob)?.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apple_scenario() {
        let words = ["apple", "apples", "application"];
        let c = Compressor::new();
        let text = c.compress(&words).unwrap();
        assert!(text.contains("\nNumWords=3\n"));
        assert_eq!(c.expand(&text).unwrap(), words);
        assert_eq!(c.expand_to_text(&text).unwrap(), "apple\napples\napplication");
    }

    #[test]
    fn test_empty_list() {
        let c = Compressor::new();
        let text = c.compress::<&str>(&[]).unwrap();
        assert_eq!(text, "Repeat=\nTail=\nChar=\nNumWords=0\nBits=\n");
        assert!(c.expand(&text).unwrap().is_empty());
    }

    #[test]
    fn test_single_word_uses_single_leaf_trees() {
        let blob = Compressor::new().build(&["a"]).unwrap();
        assert_eq!(blob.repeat.source_code(), "0");
        assert_eq!(blob.tail.source_code(), "1");
        assert_eq!(blob.repeat.make_encoding().len(), 1);
        assert_eq!(blob.tail.make_encoding().len(), 1);
        // three one-bit codes, padded: 000000
        assert_eq!(blob.bits, "A");
        assert_eq!(blob.expand().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_repeated_words_have_empty_suffixes() {
        let words = ["same", "same", "same"];
        let blob = Compressor::new().build(&words).unwrap();
        assert_eq!(blob.expand().unwrap(), words);
    }

    #[test]
    fn test_empty_word() {
        let words = ["", "", "a"];
        let c = Compressor::new();
        assert_eq!(c.expand(&c.compress(&words).unwrap()).unwrap(), words);

        let only_empty = [""];
        let blob = c.build(&only_empty).unwrap();
        assert_eq!(blob.chars.source_code(), "");
        assert_eq!(blob.expand().unwrap(), only_empty);
    }

    #[test]
    fn test_control_char_rejected_before_output() {
        let err = Compressor::new().compress(&["ok", "bad\nword"]).unwrap_err();
        assert!(matches!(err, Error::Alphabet { word: 1, ch: '\n' }));
    }

    #[test]
    fn test_line_width_config() {
        let words: Vec<String> = (0..400).map(|i| format!("w{i:04}")).collect();
        let narrow = Compressor::with_config(CodecConfig { line_width: 10 });
        let blob = narrow.build(&words).unwrap();
        assert!(blob.bits.lines().all(|l| l.len() <= 10));
        assert_eq!(narrow.config().line_width, 10);

        let flat = Compressor::with_config(CodecConfig { line_width: 0 });
        let flat_blob = flat.build(&words).unwrap();
        assert!(!flat_blob.bits.contains('\n'));
        assert_eq!(flat_blob.expand().unwrap(), words);
    }

    #[test]
    fn test_name() {
        assert_eq!(Compressor::new().name(), "prefix");
    }
}
