//! Core matching invariants, each exercised directly against the
//! named property rather than re-deriving it from a scenario.

use matching_engine::prelude::*;

fn limit(side: Side, price: u64, qty: u64) -> Order {
    Order::limit(side, Price::new(price), Quantity::new(qty))
}

#[tokio::test]
async fn directory_structure_consistency_after_mixed_operations() {
    let harness = MatchingHarness::new("XYZ");
    let mut ids = Vec::new();
    for i in 0..20 {
        let o = limit(Side::Buy, 100 + (i % 5), 1);
        ids.push(o.id);
        harness.submit(o).await.unwrap();
    }
    for id in ids.iter().step_by(3) {
        harness.cancel(*id).await;
    }

    let expected_live = ids.iter().step_by(3).count();
    assert_eq!(harness.depth_count(Side::Buy).await, 20 - expected_live);
}

#[tokio::test]
async fn price_time_priority_holds_at_every_level() {
    let harness = MatchingHarness::new("XYZ");
    // Later, better price must win regardless of arrival order.
    harness.submit(limit(Side::Buy, 100, 1)).await.unwrap();
    harness.submit(limit(Side::Buy, 105, 1)).await.unwrap();
    harness.submit(limit(Side::Buy, 102, 1)).await.unwrap();

    let snap = harness.snapshot(3).await;
    let prices: Vec<_> = snap.bids.iter().map(|l| l.price).collect();
    assert_eq!(prices, vec![105, 102, 100]);
}

#[tokio::test]
async fn conservation_of_quantity_across_a_single_submit() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Sell, 100, 3)).await.unwrap();
    harness.submit(limit(Side::Sell, 101, 4)).await.unwrap();

    let initial_qty = 10u64;
    let trades = harness.submit(limit(Side::Buy, 101, initial_qty)).await.unwrap();

    let traded: u64 = trades.iter().map(|t| t.quantity.raw()).sum();
    let residual = harness
        .snapshot(5)
        .await
        .bids
        .first()
        .map(|l| l.qty)
        .unwrap_or(0);

    assert_eq!(traded + residual, initial_qty);
}

#[tokio::test]
async fn execution_is_always_at_the_resting_price() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Sell, 100, 5)).await.unwrap();
    let trades = harness.submit(limit(Side::Buy, 150, 5)).await.unwrap();
    assert_eq!(trades[0].price, Price::new(100));
}

#[tokio::test]
async fn no_cross_invariant_after_submit_returns() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Sell, 110, 100)).await.unwrap();
    harness.submit(limit(Side::Buy, 105, 10)).await.unwrap();

    let snap = harness.snapshot(1).await;
    let bid = snap.bids.first().map(|l| l.price);
    let ask = snap.asks.first().map(|l| l.price);
    if let (Some(b), Some(a)) = (bid, ask) {
        assert!(b < a);
    }
}

#[tokio::test]
async fn cancel_idempotence() {
    let harness = MatchingHarness::new("XYZ");
    let order = limit(Side::Buy, 100, 1);
    let id = order.id;
    harness.submit(order).await.unwrap();

    let first = harness.cancel(id).await;
    let second = harness.cancel(id).await;
    assert!(first);
    assert!(!second);
}

#[tokio::test]
async fn snapshot_monotonicity_without_intervening_mutation() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Buy, 100, 5)).await.unwrap();
    let a = harness.snapshot(5).await;
    let b = harness.snapshot(5).await;
    assert_eq!(a, b);
}
