//! Fixed-window token chunking.
//!
//! Splits on token boundaries only. A window may end mid-sentence, but no
//! chunk handed to the summarizer can exceed its safe input size.

use std::num::NonZeroUsize;

/// A contiguous window of a parent token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based position within the split.
    pub ordinal: usize,
    pub tokens: &'a [u32],
}

impl Chunk<'_> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Split `tokens` into consecutive windows of `max_tokens`; the last window
/// holds the remainder.
///
/// An empty sequence yields a single empty chunk. The reducer rejects empty
/// input before it gets here.
pub fn chunk_tokens(tokens: &[u32], max_tokens: NonZeroUsize) -> Vec<Chunk<'_>> {
    if tokens.is_empty() {
        return vec![Chunk {
            ordinal: 1,
            tokens,
        }];
    }

    tokens
        .chunks(max_tokens.get())
        .enumerate()
        .map(|(i, window)| Chunk {
            ordinal: i + 1,
            tokens: window,
        })
        .collect()
}
