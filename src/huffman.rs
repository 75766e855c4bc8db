//! Huffman coding over arbitrary ordered symbols.
//!
//! Frequencies are tallied into a [`SymbolTally`], compiled into a
//! [`HuffmanTree`], and the tree is written into the blob as nested pairs so
//! the decoder can rebuild it without the frequencies.
//!
//! # Historical Context
//!
//! David Huffman (1952) developed this algorithm as a term paper at MIT.
//! Repeatedly merging the two least frequent subtrees yields a prefix code
//! whose expected length is minimal among all prefix codes for the tally.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

use crate::bits::BitReader;
use crate::error::{Error, Result};

/// A symbol that can appear as a tree leaf and be written as a literal.
pub trait Symbol: Ord + Clone + fmt::Debug {
    /// Append the literal form of this symbol to `out`.
    fn write_literal(&self, out: &mut String);

    /// Parse one literal at the cursor.
    fn parse_literal(cursor: &mut Cursor<'_>) -> Result<Self>;
}

impl Symbol for usize {
    fn write_literal(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }

    fn parse_literal(cursor: &mut Cursor<'_>) -> Result<Self> {
        let start = cursor.offset();
        let digits = cursor.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(Error::malformed(start, "expected integer leaf"));
        }
        digits
            .parse()
            .map_err(|_| Error::malformed(start, "integer leaf out of range"))
    }
}

impl Symbol for char {
    fn write_literal(&self, out: &mut String) {
        out.push('\'');
        if matches!(self, '\'' | '\\') {
            out.push('\\');
        }
        out.push(*self);
        out.push('\'');
    }

    fn parse_literal(cursor: &mut Cursor<'_>) -> Result<Self> {
        cursor.expect('\'')?;
        let start = cursor.offset();
        let c = match cursor.bump() {
            Some('\\') => match cursor.bump() {
                Some(c @ ('\'' | '\\')) => c,
                _ => return Err(Error::malformed(start, "unknown escape in char leaf")),
            },
            Some(c) if c != '\'' => c,
            _ => return Err(Error::malformed(start, "expected char leaf")),
        };
        cursor.expect('\'')?;
        Ok(c)
    }
}

/// Position within a serialized tree.
#[derive(Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Look at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Consume and return the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `want` or fail.
    pub fn expect(&mut self, want: char) -> Result<()> {
        let at = self.pos;
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(Error::malformed(at, format!("expected {want:?}, found {c:?}"))),
            None => Err(Error::malformed(at, format!("expected {want:?}, found end"))),
        }
    }

    /// Consume the longest run of characters matching `pred`.
    pub fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.src[start..self.pos]
    }

    fn is_at_end(&self) -> bool {
        self.pos == self.src.len()
    }
}

/// Deepest tree accepted when parsing. Trees compiled from 64-bit counts
/// stay well below this.
const MAX_DEPTH: usize = 256;

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<S> {
    /// A symbol.
    Leaf(S),
    /// Bit `0` descends left, bit `1` descends right.
    Internal(Box<Node<S>>, Box<Node<S>>),
}

impl<S: Symbol> Node<S> {
    fn build_codes(&self, prefix: &mut Vec<u8>, codes: &mut BTreeMap<S, Vec<u8>>) {
        match self {
            Node::Leaf(symbol) => {
                let code = if prefix.is_empty() {
                    vec![0]
                } else {
                    prefix.clone()
                };
                codes.insert(symbol.clone(), code);
            }
            Node::Internal(left, right) => {
                prefix.push(0);
                left.build_codes(prefix, codes);
                prefix.pop();
                prefix.push(1);
                right.build_codes(prefix, codes);
                prefix.pop();
            }
        }
    }

    fn write_source(&self, out: &mut String) {
        match self {
            Node::Leaf(symbol) => symbol.write_literal(out),
            Node::Internal(left, right) => {
                out.push('(');
                left.write_source(out);
                out.push(',');
                right.write_source(out);
                out.push(')');
            }
        }
    }

    fn parse(cursor: &mut Cursor<'_>, depth: usize) -> Result<Self> {
        if cursor.peek() == Some('(') {
            if depth == MAX_DEPTH {
                return Err(Error::malformed(cursor.offset(), "tree nested too deeply"));
            }
            cursor.bump();
            let left = Self::parse(cursor, depth + 1)?;
            cursor.expect(',')?;
            let right = Self::parse(cursor, depth + 1)?;
            cursor.expect(')')?;
            Ok(Node::Internal(Box::new(left), Box::new(right)))
        } else {
            S::parse_literal(cursor).map(Node::Leaf)
        }
    }
}

/// Subtree waiting in the merge queue.
struct Pending<S> {
    freq: u64,
    seq: usize,
    node: Node<S>,
}

impl<S> PartialEq for Pending<S> {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl<S> Eq for Pending<S> {}

impl<S> Ord for Pending<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-priority queue; equal frequencies pop in sequence order.
        (other.freq, other.seq).cmp(&(self.freq, self.seq))
    }
}

impl<S> PartialOrd for Pending<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Occurrence counts for one symbol stream.
#[derive(Debug, Clone)]
pub struct SymbolTally<S> {
    counts: BTreeMap<S, u64>,
}

impl<S: Symbol> SymbolTally<S> {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Count one occurrence of `symbol`.
    pub fn tally(&mut self, symbol: S) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    /// Number of distinct symbols seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Build the Huffman tree for the tallied frequencies.
    ///
    /// Leaves enter the queue in ascending symbol order, so the resulting
    /// tree depends only on the counts.
    pub fn compile(self) -> HuffmanTree<S> {
        let mut seq = 0;
        let mut pq: BinaryHeap<Pending<S>> = self
            .counts
            .into_iter()
            .map(|(symbol, freq)| {
                seq += 1;
                Pending {
                    freq,
                    seq,
                    node: Node::Leaf(symbol),
                }
            })
            .collect();

        while pq.len() > 1 {
            let (Some(left), Some(right)) = (pq.pop(), pq.pop()) else {
                break;
            };
            seq += 1;
            pq.push(Pending {
                freq: left.freq + right.freq,
                seq,
                node: Node::Internal(Box::new(left.node), Box::new(right.node)),
            });
        }

        HuffmanTree {
            root: pq.pop().map(|p| p.node),
        }
    }
}

impl<S: Symbol> Default for SymbolTally<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Symbol to code mapping; each code is a sequence of 0/1 values.
pub type CodeTable<S> = BTreeMap<S, Vec<u8>>;

/// A compiled Huffman tree, or an empty one when nothing was tallied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    root: Option<Node<S>>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Root node, if any symbols were tallied.
    pub fn root(&self) -> Option<&Node<S>> {
        self.root.as_ref()
    }

    /// Derive the code for every leaf.
    ///
    /// A tree with a single leaf has no branches; that leaf is given the code `0`.
    pub fn make_encoding(&self) -> CodeTable<S> {
        let mut codes = BTreeMap::new();
        if let Some(root) = &self.root {
            root.build_codes(&mut Vec::new(), &mut codes);
        }
        codes
    }

    /// Serialize the tree shape: leaves as literals, branches as `(left,right)`.
    pub fn source_code(&self) -> String {
        let mut out = String::new();
        if let Some(root) = &self.root {
            root.write_source(&mut out);
        }
        out
    }

    /// Rebuild a tree from [`source_code`](Self::source_code) output.
    pub fn parse(src: &str) -> Result<Self> {
        let mut cursor = Cursor::new(src);
        if cursor.is_at_end() {
            return Ok(Self { root: None });
        }
        let root = Node::parse(&mut cursor, 0)?;
        if !cursor.is_at_end() {
            return Err(Error::malformed(cursor.offset(), "unexpected trailing input"));
        }
        Ok(Self { root: Some(root) })
    }

    /// Visit every leaf symbol, left to right.
    pub fn leaves(&self) -> Vec<&S> {
        let mut out = Vec::new();
        let mut stack: Vec<&Node<S>> = self.root.iter().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(s) => out.push(s),
                Node::Internal(l, r) => {
                    stack.push(r);
                    stack.push(l);
                }
            }
        }
        out
    }

    /// Decode one symbol, consuming one bit per branch taken.
    ///
    /// `name` identifies the tree in errors.
    pub fn decode_symbol(&self, reader: &mut BitReader, name: &'static str) -> Result<S> {
        let mut node = self.root.as_ref().ok_or(Error::EmptyTree(name))?;
        if let Node::Leaf(symbol) = node {
            // Lone leaf: its code is the single bit 0.
            return match reader.next_bit()? {
                0 => Ok(symbol.clone()),
                _ => Err(Error::InvalidCode(name)),
            };
        }
        loop {
            match node {
                Node::Leaf(symbol) => return Ok(symbol.clone()),
                Node::Internal(left, right) => {
                    node = if reader.next_bit()? == 0 { &**left } else { &**right };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitBuffer;
    use proptest::prelude::*;

    fn tally_str(text: &str) -> SymbolTally<char> {
        let mut t = SymbolTally::new();
        for c in text.chars() {
            t.tally(c);
        }
        t
    }

    fn is_prefix_free<S>(codes: &CodeTable<S>) -> bool {
        let all: Vec<&Vec<u8>> = codes.values().collect();
        all.iter().enumerate().all(|(i, a)| {
            all.iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a))
        })
    }

    #[test]
    fn test_huffman_roundtrip() {
        let data = "abracadabra";
        let tree = tally_str(data).compile();
        let codes = tree.make_encoding();

        let mut buf = BitBuffer::new();
        for c in data.chars() {
            buf.append(&codes[&c]);
        }
        let text = buf.format(80);

        let parsed = HuffmanTree::<char>::parse(&tree.source_code()).unwrap();
        let mut reader = BitReader::new(&text);
        let decoded: String = (0..data.len())
            .map(|_| parsed.decode_symbol(&mut reader, "char").unwrap())
            .collect();
        assert_eq!(decoded, data);
        assert_eq!(reader.bits_consumed(), buf.len());
    }

    #[test]
    fn test_most_frequent_gets_shortest_code() {
        let codes = tally_str("aaaaaaaabbbc").compile().make_encoding();
        assert_eq!(codes[&'a'].len(), 1);
        assert_eq!(codes[&'b'].len(), 2);
        assert_eq!(codes[&'c'].len(), 2);
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let mut t = SymbolTally::new();
        for s in [3usize, 1, 2, 0] {
            t.tally(s);
        }
        // Equal weights: leaves pop in symbol order, merged nodes after.
        assert_eq!(t.compile().source_code(), "((0,1),(2,3))");
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let mut t = SymbolTally::new();
        t.tally(7usize);
        t.tally(7usize);
        let tree = t.compile();
        assert_eq!(tree.source_code(), "7");
        let codes = tree.make_encoding();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[&7], vec![0]);

        let mut reader = BitReader::new("A");
        assert_eq!(tree.decode_symbol(&mut reader, "len").unwrap(), 7);
        assert_eq!(reader.bits_consumed(), 1);

        let mut reader = BitReader::new("g");
        assert!(matches!(
            tree.decode_symbol(&mut reader, "len"),
            Err(Error::InvalidCode("len"))
        ));
    }

    #[test]
    fn test_empty_tally() {
        let tree = SymbolTally::<usize>::new().compile();
        assert!(tree.root().is_none());
        assert!(tree.make_encoding().is_empty());
        assert_eq!(tree.source_code(), "");
        assert_eq!(HuffmanTree::<usize>::parse("").unwrap(), tree);

        let mut reader = BitReader::new("A");
        assert!(matches!(
            tree.decode_symbol(&mut reader, "tail"),
            Err(Error::EmptyTree("tail"))
        ));
    }

    #[test]
    fn test_char_literals_escape() {
        let tree = tally_str("'\\(,)").compile();
        let src = tree.source_code();
        assert!(src.contains(r"'\''"));
        assert!(src.contains(r"'\\'"));
        assert_eq!(HuffmanTree::<char>::parse(&src).unwrap(), tree);
    }

    #[test]
    fn test_parse_rejects_bad_grammar() {
        for src in ["(1,2", "(1 2)", "1,2", "(,1)", "x", "(1,2))"] {
            assert!(
                matches!(
                    HuffmanTree::<usize>::parse(src),
                    Err(Error::MalformedTree { .. })
                ),
                "{src}"
            );
        }
        for src in ["a", "'ab'", "''", r"'\n'", "('a','b'"] {
            assert!(HuffmanTree::<char>::parse(src).is_err(), "{src}");
        }
    }

    #[test]
    fn test_parse_limits_depth() {
        let deep = "(".repeat(MAX_DEPTH + 1) + "1";
        assert!(matches!(
            HuffmanTree::<usize>::parse(&deep),
            Err(Error::MalformedTree { .. })
        ));
    }

    #[test]
    fn test_leaves_in_order() {
        let tree = HuffmanTree::<usize>::parse("((4,5),(6,(7,8)))").unwrap();
        let leaves: Vec<usize> = tree.leaves().into_iter().copied().collect();
        assert_eq!(leaves, vec![4, 5, 6, 7, 8]);
    }

    proptest! {
        #[test]
        fn prop_codes_are_prefix_free(symbols in prop::collection::vec(0usize..40, 1..300)) {
            let mut t = SymbolTally::new();
            for &s in &symbols {
                t.tally(s);
            }
            let distinct = t.distinct();
            let tree = t.compile();
            let codes = tree.make_encoding();
            prop_assert_eq!(codes.len(), distinct);
            prop_assert!(codes.values().all(|c| !c.is_empty()));
            prop_assert!(is_prefix_free(&codes));

            let reparsed = HuffmanTree::<usize>::parse(&tree.source_code()).unwrap();
            prop_assert_eq!(reparsed.make_encoding(), codes);
        }
    }
}
