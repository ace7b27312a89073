//! Convenience re-exports for common `sommelier` types.
//!
//! ```ignore
//! use sommelier::prelude::*;
//! ```

pub use crate::api::{OpenRouterSummarizer, RetryConfig};
pub use crate::capability::{SummarizationCapability, SummaryFuture, SummaryRequest};
pub use crate::config::SummarizerConfig;
pub use crate::error::{CapabilityFailure, ErrorKind, ReduceError};
pub use crate::events::{EventHandler, FnEventHandler, LoggingHandler, NoopHandler, ReductionEvent};
pub use crate::reduce::{LengthBudget, Reducer, Summary};
pub use crate::tokenizer::{TiktokenTokenizer, Tokenizer, TokenizerError};
pub use crate::{DEFAULT_MODEL, OpenRouterClient};
