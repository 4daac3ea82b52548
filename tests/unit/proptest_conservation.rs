//! Property-based check of quantity conservation: for any match
//! producing trades t1..tn from an incoming order with initial
//! quantity Q, `sum(ti.quantity) + residual_quantity == Q`.

use matching_engine::orderbook::book::OrderBook;
use matching_engine::orderbook::match_order;
use matching_engine::prelude::*;
use proptest::prelude::*;

fn price_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000u64
}

fn quantity_strategy() -> impl Strategy<Value = u64> {
    1u64..=10_000u64
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn quantity_is_conserved_across_a_single_match(
        resting in prop::collection::vec((side_strategy(), price_strategy(), quantity_strategy()), 0..20),
        incoming_side in side_strategy(),
        incoming_price in price_strategy(),
        incoming_qty in quantity_strategy(),
    ) {
        let book = OrderBook::new();
        let mut resting_quantities = Vec::new();
        for (side, price, qty) in resting {
            let order = Order::limit(side, Price::new(price), Quantity::new(qty));
            let id = order.id;
            if book.add(order).is_ok() {
                resting_quantities.push((id, qty));
            }
        }

        let incoming = Order::limit(incoming_side, Price::new(incoming_price), Quantity::new(incoming_qty));
        let incoming_id = incoming.id;

        let trades = match_order(&book, incoming).unwrap();
        let traded: u64 = trades.iter().map(|t| t.quantity.raw()).sum();
        let residual = book.quantity_of(incoming_id).map(|q| q.raw()).unwrap_or(0);

        prop_assert_eq!(traded + residual, incoming_qty);

        // Every resting counterparty's quantity only ever decreased by
        // exactly what it traded; it never went negative or grew.
        for (id, original_qty) in resting_quantities {
            if let Some(remaining) = book.quantity_of(id) {
                prop_assert!(remaining.raw() <= original_qty);
            }
        }
    }
}
