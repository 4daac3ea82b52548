//! Top-of-book snapshot type for the broadcaster.

use super::book::OrderBook;
use super::order::Side;
use serde::{Deserialize, Serialize};

/// A single (price, aggregate-quantity) entry in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLevel {
    /// Non-negative display price, in ticks.
    pub price: u64,
    /// Aggregate live quantity across all orders at this price.
    pub qty: u64,
}

/// A consistent, point-in-time top-of-book view intended for
/// broadcast to viewers. `bids` and `asks` are each best-first and
/// bounded to the `top_k` requested when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<SnapshotLevel>,
    pub asks: Vec<SnapshotLevel>,
}

impl OrderBookSnapshot {
    /// Build a snapshot by reading the top `top_k` levels of each side
    /// of `book`. Callers that need linearizability across the two
    /// sides — a state that is some prefix of the total mutation order,
    /// not a torn read across a concurrent mutation — must hold
    /// whatever exclusion the harness uses while calling this.
    pub fn capture(book: &OrderBook, top_k: usize) -> Self {
        let to_levels = |side: Side| {
            book.depth(side, top_k)
                .into_iter()
                .map(|d| SnapshotLevel {
                    price: d.price.ticks(),
                    qty: d.quantity.raw(),
                })
                .collect()
        };
        OrderBookSnapshot {
            bids: to_levels(Side::Buy),
            asks: to_levels(Side::Sell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::order::{Order, Price, Quantity};

    #[test]
    fn capture_reports_best_first_both_sides() {
        let book = OrderBook::new();
        book.add(Order::limit(Side::Buy, Price::new(99), Quantity::new(1)))
            .unwrap();
        book.add(Order::limit(Side::Buy, Price::new(100), Quantity::new(1)))
            .unwrap();
        book.add(Order::limit(Side::Sell, Price::new(101), Quantity::new(1)))
            .unwrap();

        let snap = OrderBookSnapshot::capture(&book, 10);
        assert_eq!(snap.bids[0].price, 100);
        assert_eq!(snap.bids[1].price, 99);
        assert_eq!(snap.asks[0].price, 101);
    }

    #[test]
    fn snapshot_monotonicity_without_intervening_mutation() {
        let book = OrderBook::new();
        book.add(Order::limit(Side::Buy, Price::new(100), Quantity::new(3)))
            .unwrap();
        let a = OrderBookSnapshot::capture(&book, 5);
        let b = OrderBookSnapshot::capture(&book, 5);
        assert_eq!(a, b);
    }
}
