//! Order value types: [`Order`], [`Side`], [`OrderKind`], and the scaled
//! [`Price`]/[`Quantity`] newtypes that keep the book off binary floats.

use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique order identifier, stable for the order's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Mint a fresh, random order id.
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type. Only `Limit` rests in the book; `Market` is an
/// aggressor that is discarded, never added, if it cannot fully fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Limit,
    Market,
}

/// A price expressed in ticks (a scaled integer), never a binary
/// float. One unit of `Price` is one tick of the instrument; the
/// scale is a convention shared by every producer and consumer of the
/// book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price(pub u64);

impl Price {
    pub const fn new(ticks: u64) -> Self {
        Price(ticks)
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative quantity, expressed in the instrument's smallest
/// tradable unit (a scaled integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(pub u64);

impl Quantity {
    pub const fn new(amount: u64) -> Self {
        Quantity(amount)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_sub(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic arrival sequence used for tie-breaking among equal
/// prices. Preferred over wall-clock time because it guarantees a
/// total order and cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sequence(pub u64);

/// A limit or market order.
///
/// `quantity` is the order's *remaining* quantity: the matching
/// kernel decrements it in place as fills occur. Once it reaches
/// zero the order is terminal and must never re-enter the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub kind: OrderKind,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: u64,
    /// Assigned by the book at `add` time; `None` before an order has
    /// ever been resting (e.g. while still inside the matching loop).
    pub sequence: Option<Sequence>,
}

impl Order {
    /// Construct a new limit order with a freshly minted id and the
    /// current wall-clock timestamp.
    pub fn limit(side: Side, price: Price, quantity: Quantity) -> Self {
        Order {
            id: OrderId::new(),
            side,
            kind: OrderKind::Limit,
            price,
            quantity,
            timestamp: current_time_millis(),
            sequence: None,
        }
    }

    /// Construct a new market order. Market orders never rest: if
    /// they are not fully filled by the matching kernel, the residual
    /// is discarded.
    pub fn market(side: Side, quantity: Quantity) -> Self {
        Order {
            id: OrderId::new(),
            side,
            kind: OrderKind::Market,
            // Reserved, unused for crossing: market orders cross at
            // any resting price, so no price limit applies.
            price: Price::new(0),
            quantity,
            timestamp: current_time_millis(),
            sequence: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.quantity.is_zero()
    }
}
