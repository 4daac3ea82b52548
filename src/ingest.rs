//! Ingest adapter bookkeeping helper.
//!
//! Upstream L2 (aggregated per price level) market-data updates arrive
//! as `(side, price, new_quantity)` triples and need a specific
//! convention to become book mutations: cancel whatever order is
//! currently registered at that level, then add a fresh order if the
//! new quantity is non-zero. The transport that produces those triples
//! is out of scope here; this module is the reusable bookkeeping piece
//! the core exposes so an adapter doesn't have to track per-level
//! order ids itself.

use crate::orderbook::error::OrderBookError;
use crate::orderbook::harness::MatchingHarness;
use crate::orderbook::order::{Order, OrderId, Price, Quantity, Side};
use dashmap::DashMap;

/// Owns the `(side, price) -> current-order-id` mapping an L2 adapter
/// needs, and applies a single `replace_level` call against a
/// [`MatchingHarness`] in the three steps below.
///
/// Requires monotonic delivery of updates per price level from the
/// caller; this type does not itself sequence or deduplicate updates.
#[derive(Debug, Default)]
pub struct L2BookUpdater {
    registered: DashMap<(Side, Price), OrderId>,
}

impl L2BookUpdater {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the resting order at `(side, price)` with one of
    /// `new_quantity`:
    ///
    /// 1. If a previously-registered order-id exists at `(side,
    ///    price)`, cancel it.
    /// 2. If `new_quantity > 0`, construct an order with a freshly
    ///    minted id and add it; record the id under `(side, price)`.
    /// 3. If `new_quantity == 0`, forget the mapping.
    pub async fn replace_level(
        &self,
        harness: &MatchingHarness,
        side: Side,
        price: Price,
        new_quantity: Quantity,
    ) -> Result<(), OrderBookError> {
        if let Some((_, old_id)) = self.registered.remove(&(side, price)) {
            harness.cancel(old_id).await;
        }

        if new_quantity.is_zero() {
            return Ok(());
        }

        let order = Order::limit(side, price, new_quantity);
        let id = order.id;
        // A level update that fully crosses the spread is not a
        // realistic L2 replace (L2 snapshots describe resting
        // liquidity only), but `submit` is still the correct, single
        // entry point; any residual simply rests exactly as it would
        // for a fresh limit order.
        harness.submit(order).await?;
        self.registered.insert((side, price), id);
        Ok(())
    }

    /// Number of price levels this updater currently believes are
    /// populated. Exposed for observability/tests.
    pub fn tracked_levels(&self) -> usize {
        self.registered.len()
    }
}
