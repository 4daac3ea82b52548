//! The matching kernel: a pure function that crosses an incoming
//! order against resting liquidity.
//!
//! Kept as a free function over `&OrderBook`, separate from the book's
//! own methods — the kernel only ever calls the book's public
//! add/cancel/peek/pop surface, it never reaches into `PriceLevel`
//! directly.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::order::{Order, OrderKind, Quantity, Side};
use super::trade::Trade;
use tracing::trace;

/// Cross `incoming` against `book`, producing trades in match order
/// (best price first, then arrival order on ties). Any residual
/// quantity rests in the book if `incoming` is a `Limit` order; a
/// `Market` order's residual is discarded.
///
/// # Errors
/// [`OrderBookError::InvalidOrder`] if `incoming` violates an
/// invariant (non-positive limit price). The book is left untouched in
/// that case: this function either completes or rejects its input up
/// front, never partway through. A zero-quantity order is not an
/// error: it produces an empty trade list and is not added.
pub fn match_order(book: &OrderBook, mut incoming: Order) -> Result<Vec<Trade>, OrderBookError> {
    validate(&incoming)?;

    let mut trades = Vec::new();
    while !incoming.quantity.is_zero() {
        let opposite = match incoming.side {
            Side::Buy => book.best_ask(),
            Side::Sell => book.best_bid(),
        };
        let Some(opposite) = opposite else {
            break;
        };
        if !crosses(&incoming, &opposite) {
            break;
        }

        let fill = min_quantity(incoming.quantity, opposite.quantity);
        let (buyer, seller) = match incoming.side {
            Side::Buy => (incoming.id, opposite.id),
            Side::Sell => (opposite.id, incoming.id),
        };
        let trade = Trade::new(opposite.price, fill, buyer, seller);
        trace!(
            price = %trade.price,
            quantity = %trade.quantity,
            buyer = %trade.buyer_order_id,
            seller = %trade.seller_order_id,
            "trade executed"
        );

        incoming.quantity = incoming.quantity.saturating_sub(fill);
        let opposite_remaining = opposite.quantity.saturating_sub(fill);

        let opposite_side = incoming.side.opposite();
        if opposite_remaining.is_zero() {
            // Fully depleted: pop it off the book rather than reduce.
            match opposite_side {
                Side::Buy => book.pop_best_bid(),
                Side::Sell => book.pop_best_ask(),
            };
        } else {
            book.reduce_top(opposite_side, opposite.id, opposite.price, fill);
        }

        trades.push(trade);
    }

    if !incoming.quantity.is_zero() && incoming.kind == OrderKind::Limit {
        book.add(incoming)?;
    }

    Ok(trades)
}

fn validate(order: &Order) -> Result<(), OrderBookError> {
    if order.kind == OrderKind::Limit && order.price.ticks() == 0 {
        return Err(OrderBookError::non_positive_price());
    }
    Ok(())
}

/// `BUY` crosses iff `incoming.price >= opposite.price`; `SELL`
/// crosses iff `incoming.price <= opposite.price`. Market orders cross
/// unconditionally against whatever rests, since they carry no price
/// limit.
fn crosses(incoming: &Order, opposite: &Order) -> bool {
    if incoming.kind == OrderKind::Market {
        return true;
    }
    match incoming.side {
        Side::Buy => incoming.price >= opposite.price,
        Side::Sell => incoming.price <= opposite.price,
    }
}

fn min_quantity(a: Quantity, b: Quantity) -> Quantity {
    if a.raw() < b.raw() { a } else { b }
}
