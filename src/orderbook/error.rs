//! Order book error types.

use thiserror::Error;

/// Errors the matching core can surface synchronously.
///
/// `InvalidOrder` is the only error the matching kernel itself
/// produces; it is rejected up front with no state change.
/// `UnknownOrder` is deliberately not a variant here: cancelling an id
/// that is not in the directory is accepted silently (see
/// [`crate::orderbook::book::OrderBook::cancel`]).
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Non-positive price on a `Limit` order. A zero quantity is not
    /// an invalid order: it is accepted as a silent no-op that
    /// produces no trades and never rests.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        /// Human-readable description of which invariant was violated.
        reason: String,
    },

    /// An order was added whose id is already present in the
    /// directory.
    #[error("order {0} is already resting in the book")]
    DuplicateOrder(super::order::OrderId),
}

impl OrderBookError {
    pub fn non_positive_price() -> Self {
        OrderBookError::InvalidOrder {
            reason: "limit order price must be > 0".to_string(),
        }
    }
}
