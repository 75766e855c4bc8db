//! Error types for word-list compression.

use thiserror::Error;

/// Error variants for compress and expand.
#[derive(Debug, Error)]
pub enum Error {
    /// A required header line is absent or out of order.
    #[error("missing header field: {0}")]
    MissingField(&'static str),

    /// A serialized tree does not follow the tree grammar.
    #[error("malformed tree at offset {offset}: {message}")]
    MalformedTree {
        /// Byte offset into the tree source where parsing failed.
        offset: usize,
        /// What the parser expected.
        message: String,
    },

    /// The `NumWords` field is not a decimal integer.
    #[error("invalid word count: {0:?}")]
    InvalidCount(String),

    /// The bitstream contains a character outside the 64-symbol alphabet.
    #[error("invalid bitstream character {0:?}")]
    InvalidBitChar(char),

    /// The decoder needed more bits than the bitstream holds.
    #[error("bitstream exhausted after {consumed} bits")]
    BitsExhausted {
        /// Bits read before running out.
        consumed: usize,
    },

    /// Data remains after the last word was decoded.
    #[error("unexpected trailing bits after word {words}")]
    TrailingBits {
        /// Number of words decoded.
        words: usize,
    },

    /// A decoded prefix length exceeds the previous word.
    #[error("prefix length {prefix} exceeds previous word length {available}")]
    InvalidPrefix {
        /// Decoded prefix length.
        prefix: usize,
        /// Length of the previous word, in characters.
        available: usize,
    },

    /// A symbol was requested from a tree with no leaves.
    #[error("cannot decode from an empty {0} tree")]
    EmptyTree(&'static str),

    /// A single-leaf tree read a `1` bit where only `0` is a valid code.
    #[error("invalid code for single-symbol {0} tree")]
    InvalidCode(&'static str),

    /// A word contains a character the blob format cannot carry.
    #[error("word {word} contains unsupported character {ch:?}")]
    Alphabet {
        /// Index of the offending word (or of the tree leaf when decoding).
        word: usize,
        /// The rejected character.
        ch: char,
    },

    /// A symbol has no entry in the code table it is being encoded with.
    #[error("symbol {0} missing from {1} code table")]
    UnknownSymbol(String, &'static str),
}

impl Error {
    pub(crate) fn malformed(offset: usize, message: impl Into<String>) -> Self {
        Error::MalformedTree {
            offset,
            message: message.into(),
        }
    }
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
