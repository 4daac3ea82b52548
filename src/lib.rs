//! # Matching Engine
//!
//! A real-time limit-order matching engine: an in-memory order book
//! with price-time priority, a pure matching kernel that crosses
//! incoming orders against resting liquidity, and a concurrency
//! harness under which a market-data ingester, an internal trading
//! agent, and a broadcast loop all operate on one shared book while a
//! bounded trade sink durably records executions off the hot path.
//!
//! ## Scope
//!
//! This crate is the matching core only. It treats the upstream
//! market-data feed transport, the snapshot-serving surface, the
//! trading agent's strategy, and durable trade storage as external
//! collaborators: [`ingest::L2BookUpdater`] and [`sink::TradeWriter`]
//! are the seams those collaborators plug into.
//!
//! ## What's inside
//!
//! - [`orderbook::book::OrderBook`] — two price-ordered sides
//!   (`crossbeam_skiplist::SkipMap`) plus an id directory, with lazy
//!   tombstoning so cancels never pay an O(N) heap-removal cost.
//! - [`orderbook::matching::match_order`] — the crossing algorithm:
//!   strict price-time priority, execution always at the resting
//!   side's price, residual limit orders rest, residual market orders
//!   are discarded.
//! - [`orderbook::harness::MatchingHarness`] — a single
//!   `tokio::sync::Mutex<OrderBook>` whose critical section encloses
//!   the entire matching loop, so every `submit`/`cancel` is
//!   linearized regardless of how many producers call it
//!   concurrently.
//! - [`sink::BoundedTradeSink`] — a bounded ring buffer plus background
//!   drainer; the default overflow policy is drop-oldest-and-warn so
//!   persistence lag never stalls matching.
//!
//! Single instrument. No cross-venue routing, accounting, or
//! settlement; the book itself is never persisted, only executed
//! trades.

pub mod ingest;
pub mod orderbook;
pub mod prelude;
pub mod sink;
mod utils;

pub use orderbook::{
    MatchingHarness, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderId, OrderKind,
    Price, Quantity, Side, Trade, TradeId, match_order,
};
pub use utils::current_time_millis;
