//! Configuration for the [`Reducer`](crate::reduce::Reducer).
//!
//! Every knob has a working default. Use the builder methods for the common
//! settings or struct update syntax for the rest:
//!
//! ```ignore
//! let config = SummarizerConfig::default()
//!     .with_length(40, 120)
//!     .with_call_timeout(Duration::from_secs(60));
//!
//! let config = SummarizerConfig {
//!     max_passes: 4,
//!     ..SummarizerConfig::default()
//! };
//! ```

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::error::ReduceError;

/// Conservative input window, below the context limit of common
/// summarization models.
pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 900;
pub const DEFAULT_MIN_LEN: usize = 30;
pub const DEFAULT_MAX_LEN: usize = 80;
/// Two passes cover realistic groups; the rest is headroom.
pub const DEFAULT_MAX_PASSES: u32 = 8;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Settings for one reduction.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Largest token window handed to one summarization call. Default: `900`.
    pub max_tokens_per_chunk: usize,
    /// Caller's minimum summary length in tokens. Default: `30`.
    pub min_len: usize,
    /// Caller's maximum summary length in tokens. Default: `80`.
    pub max_len: usize,
    /// Safety limit on merge passes. Default: `8`.
    pub max_passes: u32,
    /// Per-call timeout; an expired call fails the chunk. Default: 120s.
    pub call_timeout: Duration,
    /// Joins source texts and intermediate summaries. Default: `" "`.
    pub separator: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            max_tokens_per_chunk: DEFAULT_MAX_TOKENS_PER_CHUNK,
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            max_passes: DEFAULT_MAX_PASSES,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            separator: " ".to_string(),
        }
    }
}

impl SummarizerConfig {
    /// Override the chunk window size (in tokens).
    pub fn with_max_tokens_per_chunk(mut self, max: usize) -> Self {
        self.max_tokens_per_chunk = max;
        self
    }

    /// Set the caller's `(min, max)` summary length in tokens.
    pub fn with_length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len;
        self
    }

    pub fn with_max_passes(mut self, max_passes: u32) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Check the settings and return the chunk window.
    ///
    /// Called by the reducer before any tokenizer or capability call.
    pub fn validate(&self) -> Result<NonZeroUsize, ReduceError> {
        let window = NonZeroUsize::new(self.max_tokens_per_chunk).ok_or_else(|| {
            ReduceError::InvalidConfig("max_tokens_per_chunk must be positive".into())
        })?;
        if self.max_len == 0 {
            return Err(ReduceError::InvalidConfig("max_len must be positive".into()));
        }
        if self.min_len > self.max_len {
            return Err(ReduceError::InvalidConfig(format!(
                "min_len ({}) exceeds max_len ({})",
                self.min_len, self.max_len
            )));
        }
        if self.max_passes == 0 {
            return Err(ReduceError::InvalidConfig("max_passes must be positive".into()));
        }
        if self.call_timeout.is_zero() {
            return Err(ReduceError::InvalidConfig("call_timeout must be non-zero".into()));
        }
        Ok(window)
    }
}
