//! The concurrency harness: owns the book, serializes mutations from
//! every producer, and hands matched trades to the sink in order.
//!
//! Generalizes the teacher crate's `BookManagerTokio` trade-routing
//! idea (see `orderbook::manager`): instead of routing each book's
//! trade events out to multiple registered listeners, a single
//! `tokio::sync::Mutex<OrderBook>` critical section encloses the
//! entire matching loop, and the resulting trades are forwarded to one
//! configured sink in match order.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::matching;
use super::order::{Order, OrderId, Side};
use super::snapshot::OrderBookSnapshot;
use super::trade::{Trade, TradeListener};
use crate::sink::BoundedTradeSink;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Owns the single shared [`OrderBook`] and serializes every mutation
/// through one async mutex, whose critical section is the entire
/// matching loop, so mutations are linearizable across every caller.
pub struct MatchingHarness {
    symbol: String,
    book: Mutex<OrderBook>,
    sink: Option<Arc<BoundedTradeSink>>,
    /// Synchronous observer invoked with every trade a `submit` call
    /// produces, in match order, before the trades are forwarded to
    /// the sink. Lets tests (or a future in-process broadcaster)
    /// observe fills without going through the async sink.
    listener: Option<TradeListener>,
    default_depth: usize,
}

impl MatchingHarness {
    pub fn new(symbol: impl Into<String>) -> Self {
        MatchingHarness {
            symbol: symbol.into(),
            book: Mutex::new(OrderBook::new()),
            sink: None,
            listener: None,
            default_depth: 10,
        }
    }

    pub fn with_sink(mut self, sink: Arc<BoundedTradeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_trade_listener(mut self, listener: TradeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_default_depth(mut self, depth: usize) -> Self {
        self.default_depth = depth;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Single entry point for both ingest-originated resting orders
    /// and agent-originated aggressive orders. Acquires the book's
    /// mutex for the entire matching loop, then forwards any
    /// resulting trades to the configured sink in match order before
    /// returning them to the caller.
    pub async fn submit(&self, order: Order) -> Result<Vec<Trade>, OrderBookError> {
        let trades = {
            let book = self.book.lock().await;
            matching::match_order(&book, order)?
        };

        if let Some(listener) = &self.listener {
            for trade in &trades {
                listener(trade);
            }
        }

        if let Some(sink) = &self.sink {
            if !trades.is_empty() {
                if let Err(e) = sink.push_batch(trades.iter().cloned()).await {
                    warn!(error = %e, "trade sink rejected a batch");
                }
            }
        }

        if !trades.is_empty() {
            info!(symbol = %self.symbol, count = trades.len(), "trades executed");
        }

        Ok(trades)
    }

    /// Forward a cancel to the book under the same mutual-exclusion
    /// discipline as `submit`. Idempotent and best-effort.
    pub async fn cancel(&self, order_id: OrderId) -> bool {
        let book = self.book.lock().await;
        book.cancel(order_id)
    }

    /// A consistent point-in-time top-of-book view. Takes the same
    /// lock as `submit`/`cancel`, so it observes a prefix of the total
    /// mutation order and never a partial mutation.
    pub async fn snapshot(&self, top_k: usize) -> OrderBookSnapshot {
        let book = self.book.lock().await;
        OrderBookSnapshot::capture(&book, top_k)
    }

    /// `snapshot` using the harness's configured default depth.
    pub async fn snapshot_default(&self) -> OrderBookSnapshot {
        self.snapshot(self.default_depth).await
    }

    /// Number of live orders currently resting on `side`. Exposed for
    /// observability/tests; not part of the matching hot path.
    pub async fn depth_count(&self, side: Side) -> usize {
        let book = self.book.lock().await;
        book.side_len(side)
    }

    /// Physical arrival-queue length at one price level, or `None` if
    /// no level has ever existed there. Exposed for observability/tests.
    pub async fn physical_depth_at(
        &self,
        side: Side,
        price: super::order::Price,
    ) -> Option<usize> {
        let book = self.book.lock().await;
        book.physical_depth_at(side, price)
    }
}
