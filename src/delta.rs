//! Prefix delta transform.
//!
//! Each word is expressed relative to its predecessor: how many leading
//! characters it shares, and the characters that follow. Sorted word lists
//! share long prefixes, so most of each word collapses into one small integer.

/// A word expressed against the word before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta<'a> {
    /// Characters shared with the previous word.
    pub prefix_len: usize,
    /// Remainder of the current word after the shared prefix.
    pub suffix: &'a str,
}

impl Delta<'_> {
    /// Length of the suffix in characters.
    pub fn suffix_len(&self) -> usize {
        self.suffix.chars().count()
    }
}

/// Count leading characters shared by `prev` and `cur`.
///
/// Bounded by the shorter of the two; 0 when either is empty.
pub fn shared_prefix_len(prev: &str, cur: &str) -> usize {
    prev.chars()
        .zip(cur.chars())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Split `cur` into its shared prefix length and suffix against `prev`.
pub fn delta<'a>(prev: &str, cur: &'a str) -> Delta<'a> {
    let prefix_len = shared_prefix_len(prev, cur);
    let split = cur
        .char_indices()
        .nth(prefix_len)
        .map_or(cur.len(), |(i, _)| i);
    Delta {
        prefix_len,
        suffix: &cur[split..],
    }
}

/// Iterate the deltas of a word list, starting from the empty word.
pub fn deltas<'a, S: AsRef<str>>(words: &'a [S]) -> impl Iterator<Item = Delta<'a>> + 'a {
    let mut prev = "";
    words.iter().map(move |w| {
        let cur = w.as_ref();
        let d = delta(prev, cur);
        prev = cur;
        d
    })
}
