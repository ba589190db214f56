//! Delimiter splitting over byte ranges.
//!
//! A blob is partitioned into [`Chunk`]s: maximal runs that contain no
//! [`Delimiter`], and single delimiter occurrences standing alone. Text chunks
//! are ranges into the original buffer, so no substring is copied while
//! splitting.
//!
//! Splitting runs one pass per delimiter in [`Delimiter::ALL`] order. Each pass
//! only looks inside the text chunks left by the previous pass; empty text
//! chunks are dropped.
//!
//! ## Examples
//!
//! ```rust
//! use go_bindata::chunk::{reassemble, split_chunks, Chunk};
//! use go_bindata::Delimiter;
//!
//! let blob = b"a`b";
//! let chunks = split_chunks(blob);
//! assert_eq!(
//!     chunks,
//!     vec![
//!         Chunk::Text(0..1),
//!         Chunk::Delimiter(Delimiter::Backquote),
//!         Chunk::Text(2..3),
//!     ]
//! );
//! assert_eq!(reassemble(blob, &chunks), blob.to_vec());
//! ```

use crate::options::Delimiter;
use std::ops::Range;
use tracing::trace;

/// A leaf of the literal expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    /// Delimiter-free range of the source blob
    Text(Range<usize>),
    /// One occurrence of a delimiter
    Delimiter(Delimiter),
}

impl Chunk {
    /// Returns the bytes this chunk stands for.
    #[must_use]
    pub fn bytes<'a>(&self, blob: &'a [u8]) -> &'a [u8] {
        match self {
            Chunk::Text(range) => &blob[range.clone()],
            Chunk::Delimiter(delimiter) => delimiter.as_bytes(),
        }
    }

    #[must_use]
    pub fn is_delimiter(&self) -> bool {
        matches!(self, Chunk::Delimiter(_))
    }
}

/// Splits `blob` on every delimiter, in order.
///
/// The empty blob has no chunks.
#[must_use]
pub fn split_chunks(blob: &[u8]) -> Vec<Chunk> {
    if blob.is_empty() {
        return Vec::new();
    }

    let mut chunks = vec![Chunk::Text(0..blob.len())];
    for delimiter in Delimiter::ALL {
        let mut next = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                Chunk::Text(range) => split_range(blob, range, delimiter, &mut next),
                other => next.push(other),
            }
        }
        trace!(?delimiter, chunks = next.len(), "split pass");
        chunks = next;
    }
    chunks
}

fn split_range(blob: &[u8], range: Range<usize>, delimiter: Delimiter, out: &mut Vec<Chunk>) {
    let needle = delimiter.as_bytes();
    let mut start = range.start;

    while let Some(offset) = find(&blob[start..range.end], needle) {
        let at = start + offset;
        if at > start {
            out.push(Chunk::Text(start..at));
        }
        out.push(Chunk::Delimiter(delimiter));
        start = at + needle.len();
    }

    if start < range.end {
        out.push(Chunk::Text(start..range.end));
    }
}

#[inline]
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    match needle {
        [byte] => haystack.iter().position(|b| b == byte),
        _ => haystack
            .windows(needle.len())
            .position(|window| window == needle),
    }
}

/// Concatenates the bytes of `chunks` back into one buffer.
#[must_use]
pub fn reassemble(blob: &[u8], chunks: &[Chunk]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blob.len());
    for chunk in chunks {
        out.extend_from_slice(chunk.bytes(blob));
    }
    out
}
