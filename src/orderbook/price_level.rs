//! A single price level: every live order resting at one price, kept
//! in arrival order.
//!
//! Pairs a `DashMap` keyed by order id for O(1) lookup/removal with a
//! `SegQueue` that carries only ids to preserve FIFO arrival order.
//! Removing an id from the `DashMap` without touching the `SegQueue`
//! is the lazy tombstone: the id still occupies a slot in arrival
//! order until it surfaces at the front and is discarded.

use super::order::{Order, OrderId, Price, Quantity};
use crossbeam::atomic::AtomicCell;
use crossbeam::queue::SegQueue;
use dashmap::DashMap;

/// All live and tombstoned orders resting at one price.
///
/// `head` caches the arrival queue's front once it has been confirmed
/// live, so a peek never has to pop-then-push the same id back onto
/// `arrival` (which would silently reorder it behind whatever was
/// pushed in the meantime, breaking repeat-peek stability).
pub struct PriceLevel {
    price: Price,
    orders: DashMap<OrderId, Order>,
    arrival: SegQueue<OrderId>,
    head: AtomicCell<Option<OrderId>>,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        PriceLevel {
            price,
            orders: DashMap::new(),
            arrival: SegQueue::new(),
            head: AtomicCell::new(None),
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Insert a live order. The caller (the book) is responsible for
    /// having already recorded the order in the id directory.
    pub fn insert(&self, order: Order) {
        self.arrival.push(order.id);
        self.orders.insert(order.id, order);
    }

    /// Mark an order as dead without touching the arrival queue. The
    /// tombstone is discarded the next time it surfaces at the front.
    pub fn tombstone(&self, id: &OrderId) -> Option<Order> {
        if self.head.load() == Some(*id) {
            self.head.store(None);
        }
        self.orders.remove(id).map(|(_, order)| order)
    }

    /// True once every order in the arrival queue has been
    /// tombstoned, even if the queue itself is not yet drained.
    pub fn is_logically_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of live orders at this level.
    pub fn live_count(&self) -> usize {
        self.orders.len()
    }

    /// Number of ids (live or tombstoned) still sitting in the
    /// arrival queue, including the cached head slot. Used to decide
    /// when compaction is worthwhile.
    pub fn physical_len(&self) -> usize {
        self.arrival.len() + usize::from(self.head.load().is_some())
    }

    /// Resolve the cached head to a confirmed-live id, popping and
    /// discarding tombstones from the arrival queue as needed. Leaves
    /// the live id cached in `head` rather than back on the queue, so
    /// repeated calls without an intervening pop/tombstone are stable.
    fn resolve_head(&self) -> Option<OrderId> {
        if let Some(id) = self.head.load() {
            if self.orders.contains_key(&id) {
                return Some(id);
            }
            self.head.store(None);
        }
        loop {
            let id = self.arrival.pop()?;
            if self.orders.contains_key(&id) {
                self.head.store(Some(id));
                return Some(id);
            }
            // tombstone: drop it and keep scanning
        }
    }

    /// Discard tombstones from the front of the arrival queue until a
    /// live order surfaces, returning a clone of it without removing
    /// it. Does not mutate logical state; a repeated call with no
    /// intervening mutation returns the same order.
    pub fn peek_front(&self) -> Option<Order> {
        let id = self.resolve_head()?;
        self.orders.get(&id).map(|entry| entry.clone())
    }

    /// Discard tombstones from the front, then remove and return the
    /// first live order (both from the directory and the arrival
    /// queue).
    pub fn pop_front(&self) -> Option<Order> {
        let id = self.resolve_head()?;
        self.head.store(None);
        self.orders.remove(&id).map(|(_, order)| order)
    }

    /// Decrease the resting quantity of `id` by `fill`. Returns the
    /// order's quantity after the fill, or `None` if `id` is not
    /// live (already cancelled or filled).
    pub fn reduce(&self, id: &OrderId, fill: Quantity) -> Option<Quantity> {
        let mut entry = self.orders.get_mut(id)?;
        entry.quantity = entry.quantity.saturating_sub(fill);
        Some(entry.quantity)
    }

    /// Current quantity of a single live order, if it is still live.
    pub fn quantity_of(&self, id: &OrderId) -> Option<Quantity> {
        self.orders.get(id).map(|entry| entry.quantity)
    }

    /// Aggregate live quantity across every order at this level.
    pub fn total_quantity(&self) -> Quantity {
        Quantity::new(self.orders.iter().map(|e| e.quantity.raw()).sum())
    }

    /// Re-pack the arrival queue, dropping tombstones. Call only when
    /// the tombstone fraction is high; this walks every physical
    /// entry.
    pub fn compact(&self) {
        let mut live = Vec::with_capacity(self.orders.len());
        while let Some(id) = self.arrival.pop() {
            if self.orders.contains_key(&id) {
                live.push(id);
            }
        }
        for id in live {
            self.arrival.push(id);
        }
    }
}
