//! The matching core: order/trade value types, the price-time
//! priority book, the matching kernel, the concurrency harness, and
//! the broadcast snapshot type.

pub mod book;
pub mod error;
pub mod harness;
pub mod matching;
pub mod order;
pub mod price_level;
pub mod snapshot;
pub mod trade;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use harness::MatchingHarness;
pub use matching::match_order;
pub use order::{Order, OrderId, OrderKind, Price, Quantity, Sequence, Side};
pub use snapshot::{OrderBookSnapshot, SnapshotLevel};
pub use trade::{Trade, TradeId, TradeListener};
