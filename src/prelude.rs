//! Convenience re-export of the crate's most commonly used types.
//!
//! ```
//! use matching_engine::prelude::*;
//! ```

pub use crate::orderbook::{
    MatchingHarness, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderId, OrderKind,
    Price, Quantity, Sequence, Side, SnapshotLevel, Trade, TradeId, TradeListener, match_order,
};
pub use crate::sink::{BoundedTradeSink, InMemoryTradeWriter, SinkPolicy, TradeWriter};
pub use crate::sink::error::SinkError;

pub use crate::ingest::L2BookUpdater;
