//! Trade sink error types.

use thiserror::Error;

/// Errors the trade sink's internal plumbing can produce.
///
/// A saturated queue is deliberately not surfaced as a `SinkSaturated`
/// variant here: under the default drop-oldest policy a full queue is a
/// `tracing::warn!` plus a counter
/// ([`crate::sink::BoundedTradeSink::dropped_count`]), never a
/// `Result` surfaced to the submitter. These variants cover the
/// sink's own failure modes instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    /// The sink was asked to accept a trade after its channel was
    /// closed (the drainer task has already shut down).
    #[error("trade sink is closed")]
    Closed,

    /// Under [`crate::sink::SinkPolicy::Block`], the channel was full
    /// and the caller chose not to wait.
    #[error("trade sink queue is saturated")]
    Saturated,

    /// The configured [`crate::sink::TradeWriter`] failed to durably
    /// record a batch.
    #[error("trade writer failed: {0}")]
    WriterFailed(String),
}
