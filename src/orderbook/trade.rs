//! Executed trade value type and the listener hook used to route
//! trades out of the matching path.

use super::order::{OrderId, Price, Quantity};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique trade identifier, usable as a primary key by a durable
/// sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeId(pub Uuid);

impl TradeId {
    pub fn new() -> Self {
        TradeId(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TradeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable record of a single execution.
///
/// `price` is always the resting (passive) order's price at the
/// moment of match, never the aggressor's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    pub price: Price,
    pub quantity: Quantity,
    pub buyer_order_id: OrderId,
    pub seller_order_id: OrderId,
    pub timestamp: u64,
}

impl Trade {
    pub fn new(
        price: Price,
        quantity: Quantity,
        buyer_order_id: OrderId,
        seller_order_id: OrderId,
    ) -> Self {
        Trade {
            trade_id: TradeId::new(),
            price,
            quantity,
            buyer_order_id,
            seller_order_id,
            timestamp: current_time_millis(),
        }
    }
}

/// A callback invoked with every trade produced by a `submit` call, in
/// match order. Used by the harness to feed the trade sink and by
/// tests that want to observe fills without going through a sink.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;
