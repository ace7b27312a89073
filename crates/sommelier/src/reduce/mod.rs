//! The reduction engine: chunking, length budgeting, and the multi-pass
//! reducer that ties them to a summarization capability.
//!
//! 1. **[`chunker`]** — splits a token sequence into fixed windows no longer
//!    than the configured maximum. Token boundaries only.
//!
//! 2. **[`budget`]** — [`LengthBudget`] scales each call's output target with
//!    the chunk's size, clamped by the caller's `(min, max)`.
//!
//! 3. **[`reducer`]** — [`Reducer`] summarizes every chunk, then merges the
//!    summaries in further passes until exactly one remains.

pub mod budget;
pub mod chunker;
pub mod reducer;

pub use budget::LengthBudget;
pub use chunker::{Chunk, chunk_tokens};
pub use reducer::{Reducer, Summary};
