//! The order book: two price-ordered sides plus an id directory.
//!
//! Two `crossbeam_skiplist::SkipMap`s keyed directly by price (no
//! negated sort key or sign games on the display price) hold
//! `Arc<PriceLevel>`, and a `DashMap` id directory at the book level
//! is the sole authority on whether an order is live.

use super::error::OrderBookError;
use super::order::{Order, OrderId, Price, Quantity, Sequence, Side};
use super::price_level::PriceLevel;
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// A (price, aggregate live quantity) pair for one level of depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
}

/// Single-instrument order book: two price-time-priority sides and
/// the id directory that arbitrates liveness.
pub struct OrderBook {
    bids: SkipMap<u64, Arc<PriceLevel>>,
    asks: SkipMap<u64, Arc<PriceLevel>>,
    /// id -> (price, side); presence is the sole authority on whether
    /// an order is live.
    order_locations: DashMap<OrderId, (Price, Side)>,
    /// Monotonically increasing arrival counter, assigned at `add`
    /// time. Used for observability and as the order's nominal
    /// tie-break key; actual tie-break ordering among live orders at
    /// a price is enforced by each `PriceLevel`'s own FIFO arrival
    /// queue, not by comparing this counter.
    next_sequence: AtomicU64,
    /// Tombstone-fraction threshold (as a percentage, 0-100) above
    /// which `best_*`/`pop_best_*` proactively compacts a level's
    /// arrival queue.
    compaction_threshold_pct: u8,
}

impl OrderBook {
    /// Default compaction threshold.
    pub const DEFAULT_COMPACTION_THRESHOLD_PCT: u8 = 50;

    pub fn new() -> Self {
        OrderBook {
            bids: SkipMap::new(),
            asks: SkipMap::new(),
            order_locations: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            compaction_threshold_pct: Self::DEFAULT_COMPACTION_THRESHOLD_PCT,
        }
    }

    pub fn with_compaction_threshold_pct(mut self, pct: u8) -> Self {
        self.compaction_threshold_pct = pct;
        self
    }

    fn side_map(&self, side: Side) -> &SkipMap<u64, Arc<PriceLevel>> {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn level_for(&self, side: Side, price: Price) -> Arc<PriceLevel> {
        self.side_map(side)
            .get_or_insert(price.ticks(), Arc::new(PriceLevel::new(price)))
            .value()
            .clone()
    }

    /// Insert a validated order into the side-appropriate level and
    /// the id directory.
    ///
    /// # Errors
    /// [`OrderBookError::DuplicateOrder`] if `order.id` is already
    /// resting.
    pub fn add(&self, mut order: Order) -> Result<(), OrderBookError> {
        if self.order_locations.contains_key(&order.id) {
            return Err(OrderBookError::DuplicateOrder(order.id));
        }
        let seq = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        order.sequence = Some(Sequence(seq));
        let (id, side, price) = (order.id, order.side, order.price);
        self.order_locations.insert(id, (price, side));
        self.level_for(side, price).insert(order);
        trace!(%id, %side, %price, seq, "order added to book");
        Ok(())
    }

    /// Remove `id` from the directory, leaving any physical copy in
    /// its price level as a tombstone. Idempotent: removing an id
    /// that is not present is a silent no-op, not an error. Returns
    /// whether an order was actually removed.
    pub fn cancel(&self, id: OrderId) -> bool {
        let Some((_, (price, side))) = self.order_locations.remove(&id) else {
            return false;
        };
        if let Some(level) = self.side_map(side).get(&price.ticks()) {
            level.value().tombstone(&id);
        }
        trace!(%id, "order cancelled");
        true
    }

    /// Best (highest) live bid, discarding tombstones from the top as
    /// needed. Empties and removes levels that become logically
    /// empty.
    pub fn best_bid(&self) -> Option<Order> {
        self.best(Side::Buy)
    }

    /// Best (lowest) live ask, discarding tombstones from the top as
    /// needed.
    pub fn best_ask(&self) -> Option<Order> {
        self.best(Side::Sell)
    }

    fn best(&self, side: Side) -> Option<Order> {
        let map = self.side_map(side);
        loop {
            let entry = match side {
                Side::Buy => map.iter().next_back(),
                Side::Sell => map.iter().next(),
            }?;
            let level = entry.value().clone();
            if let Some(order) = level.peek_front() {
                self.maybe_compact(&level);
                return Some(order);
            }
            // Level is logically empty: drop it from the side map so
            // future lookups don't re-scan a dead level.
            entry.remove();
        }
    }

    fn maybe_compact(&self, level: &PriceLevel) {
        let physical = level.physical_len();
        if physical == 0 {
            return;
        }
        let live = level.live_count();
        let tombstoned = physical.saturating_sub(live);
        if tombstoned * 100 >= physical * self.compaction_threshold_pct as usize {
            level.compact();
        }
    }

    /// Remove and return the top live bid after tombstone cleanup,
    /// deleting both its directory entry and its physical slot.
    pub fn pop_best_bid(&self) -> Option<Order> {
        self.pop_best(Side::Buy)
    }

    /// Remove and return the top live ask after tombstone cleanup.
    pub fn pop_best_ask(&self) -> Option<Order> {
        self.pop_best(Side::Sell)
    }

    fn pop_best(&self, side: Side) -> Option<Order> {
        let map = self.side_map(side);
        loop {
            let entry = match side {
                Side::Buy => map.iter().next_back(),
                Side::Sell => map.iter().next(),
            }?;
            let level = entry.value().clone();
            if let Some(order) = level.pop_front() {
                self.order_locations.remove(&order.id);
                if level.is_logically_empty() && level.physical_len() == 0 {
                    entry.remove();
                }
                return Some(order);
            }
            entry.remove();
        }
    }

    /// Reduce the resting quantity of `id` by `fill`, used by the
    /// matching kernel when the resting side is only partially
    /// consumed. `id` must currently be the top of its side (the
    /// matching kernel only ever reduces what `best_*` just returned).
    pub fn reduce_top(&self, side: Side, id: OrderId, price: Price, fill: Quantity) {
        if let Some(level) = self.side_map(side).get(&price.ticks()) {
            level.value().reduce(&id, fill);
        }
    }

    /// True if `id` currently resolves to a live order.
    pub fn contains(&self, id: OrderId) -> bool {
        self.order_locations.contains_key(&id)
    }

    /// The live remaining quantity of `id`, or `None` if it is not
    /// currently resting (cancelled, fully filled, or never added).
    pub fn quantity_of(&self, id: OrderId) -> Option<Quantity> {
        let (price, side) = *self.order_locations.get(&id)?;
        self.side_map(side)
            .get(&price.ticks())?
            .value()
            .quantity_of(&id)
    }

    /// Number of live orders tracked in the id directory.
    pub fn len(&self) -> usize {
        self.order_locations.len()
    }

    /// Number of live orders resting on one side, summed across every
    /// price level on that side.
    pub fn side_len(&self, side: Side) -> usize {
        self.side_map(side)
            .iter()
            .map(|entry| entry.value().live_count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.order_locations.is_empty()
    }

    /// Physical arrival-queue length (live orders plus not-yet-discarded
    /// tombstones) at `(side, price)`, or `None` if no level has ever
    /// existed at that price. Exposed for observability/tests; reflects
    /// compaction history, not the live order count.
    pub fn physical_depth_at(&self, side: Side, price: Price) -> Option<usize> {
        Some(self.side_map(side).get(&price.ticks())?.value().physical_len())
    }

    /// Top-`k` live (price, aggregate-quantity) levels for
    /// broadcasting, best first. Only cleanses tombstones within the
    /// traversed prefix; deeper tombstones are left for a later
    /// `best_*`/`pop_best_*` call to discover.
    pub fn depth(&self, side: Side, k: usize) -> Vec<DepthLevel> {
        let map = self.side_map(side);
        let iter: Box<dyn Iterator<Item = _>> = match side {
            Side::Buy => Box::new(map.iter().rev()),
            Side::Sell => Box::new(map.iter()),
        };
        let mut out = Vec::with_capacity(k.min(self.side_map(side).len()));
        for entry in iter {
            if out.len() >= k {
                break;
            }
            let level = entry.value();
            let qty = level.total_quantity();
            if qty.is_zero() {
                continue;
            }
            out.push(DepthLevel {
                price: level.price(),
                quantity: qty,
            });
        }
        out
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
