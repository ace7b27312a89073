//! Error taxonomy for a single reduction.
//!
//! Every failure is scoped to one group: the reducer either returns exactly
//! one final summary or one [`ReduceError`]. Capability and tokenization
//! failures carry the pass and chunk they happened in so callers can decide
//! whether a retry is worthwhile.

use std::time::Duration;

use thiserror::Error;

use crate::tokenizer::TokenizerError;

/// Why a single summarization call did not produce a summary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityFailure {
    /// The capability returned an error.
    #[error("{0}")]
    Failed(String),
    /// The call did not finish within the configured timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Failure of one group's reduction.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// Budget or window parameters are unusable. Raised before any call.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The group has no source text to summarize.
    #[error("group has no source text")]
    EmptyInput,

    /// The summarization capability failed for one chunk.
    #[error("summarization failed for chunk {chunk}/{chunks} in pass {pass}: {source}")]
    Capability {
        pass: u32,
        chunk: usize,
        chunks: usize,
        #[source]
        source: CapabilityFailure,
    },

    /// The tokenizer could not encode the pass text (`chunk` is `None`) or
    /// decode one chunk.
    #[error("tokenization failed in pass {pass}{}: {source}", fmt_chunk(.chunk))]
    Tokenization {
        pass: u32,
        chunk: Option<usize>,
        #[source]
        source: TokenizerError,
    },

    /// Summaries stopped shrinking fast enough to collapse into one chunk.
    #[error("no single summary after {max_passes} passes ({chunks} chunks remain)")]
    PassLimitExceeded { max_passes: u32, chunks: usize },
}

fn fmt_chunk(chunk: &Option<usize>) -> String {
    chunk.map(|c| format!(", chunk {c}")).unwrap_or_default()
}

/// Coarse error category used in failure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    EmptyInput,
    Capability,
    Tokenization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::Capability => "capability",
            ErrorKind::Tokenization => "tokenization",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ReduceError {
    /// The category of this error.
    ///
    /// A pass-limit overrun is reported as a configuration error: it means
    /// the window and length budget can never converge.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReduceError::InvalidConfig(_) | ReduceError::PassLimitExceeded { .. } => {
                ErrorKind::Configuration
            }
            ReduceError::EmptyInput => ErrorKind::EmptyInput,
            ReduceError::Capability { .. } => ErrorKind::Capability,
            ReduceError::Tokenization { .. } => ErrorKind::Tokenization,
        }
    }

    /// `(pass, chunk)` where the failure happened, when it is tied to one.
    pub fn location(&self) -> Option<(u32, Option<usize>)> {
        match self {
            ReduceError::Capability { pass, chunk, .. } => Some((*pass, Some(*chunk))),
            ReduceError::Tokenization { pass, chunk, .. } => Some((*pass, *chunk)),
            _ => None,
        }
    }

    /// Whether the failure came from a call that timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ReduceError::Capability {
                source: CapabilityFailure::TimedOut(_),
                ..
            }
        )
    }
}
