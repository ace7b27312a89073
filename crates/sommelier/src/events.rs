//! Events emitted by the [`Reducer`](crate::reduce::Reducer).
//!
//! The reducer reports each pass and chunk through [`ReductionEvent`]
//! variants. Callers implement [`EventHandler`] to log, count calls, or
//! drive progress output. Events are informational: handlers cannot change
//! the course of a reduction.
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopHandler`] | Tests or fire-and-forget runs |
//! | [`LoggingHandler`] | Structured logging via `tracing` |
//! | [`FnEventHandler`] | Quick closures for simple callbacks |

use tracing::{debug, info};

use crate::reduce::LengthBudget;

/// Events emitted during one reduction.
#[derive(Debug)]
pub enum ReductionEvent<'a> {
    /// A pass has tokenized and chunked its input.
    PassStarted {
        pass: u32,
        input_tokens: usize,
        chunks: usize,
    },
    /// A chunk is about to be sent to the summarization capability.
    ChunkSummarizing {
        pass: u32,
        chunk: usize,
        chunks: usize,
        input_tokens: usize,
        budget: LengthBudget,
    },
    /// A chunk's summary came back.
    ChunkSummarized {
        pass: u32,
        chunk: usize,
        summary: &'a str,
    },
    /// Every chunk of a pass has been summarized.
    PassFinished { pass: u32, summaries: usize },
    /// The reduction produced its final summary.
    Finished { passes: u32, summary: &'a str },
}

/// Handler for reduction events.
///
/// The default implementation ignores every event.
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: &ReductionEvent<'_>) {
        let _ = event;
    }
}

/// Ignores all events.
pub struct NoopHandler;
impl EventHandler for NoopHandler {}

/// An event handler backed by a closure.
///
/// ```ignore
/// let calls = AtomicUsize::new(0);
/// let handler = FnEventHandler::new(|event| {
///     if let ReductionEvent::ChunkSummarizing { .. } = event {
///         calls.fetch_add(1, Ordering::Relaxed);
///     }
/// });
/// ```
pub struct FnEventHandler<F>(F)
where
    F: Fn(&ReductionEvent<'_>) + Send + Sync;

impl<F> FnEventHandler<F>
where
    F: Fn(&ReductionEvent<'_>) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EventHandler for FnEventHandler<F>
where
    F: Fn(&ReductionEvent<'_>) + Send + Sync,
{
    fn on_event(&self, event: &ReductionEvent<'_>) {
        (self.0)(event)
    }
}

/// Logs reduction progress through `tracing`.
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&self, event: &ReductionEvent<'_>) {
        match event {
            ReductionEvent::PassStarted {
                pass,
                input_tokens,
                chunks,
            } => {
                info!("Pass {pass}: {input_tokens} tokens in {chunks} chunk(s)");
            }
            ReductionEvent::ChunkSummarizing {
                pass,
                chunk,
                chunks,
                input_tokens,
                budget,
            } => {
                debug!(
                    "Pass {pass} chunk {chunk}/{chunks}: {input_tokens} tokens, {}",
                    budget.to_log_string()
                );
            }
            ReductionEvent::ChunkSummarized {
                pass,
                chunk,
                summary,
            } => {
                debug!("Pass {pass} chunk {chunk}: {} chars", summary.len());
            }
            ReductionEvent::PassFinished { pass, summaries } => {
                debug!("Pass {pass} produced {summaries} summary(ies)");
            }
            ReductionEvent::Finished { passes, summary } => {
                info!(
                    "Reduction finished after {passes} pass(es), {} chars",
                    summary.len()
                );
            }
        }
    }
}
