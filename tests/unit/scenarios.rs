//! Literal-value end-to-end scenarios (S1-S6), driven through
//! [`MatchingHarness`] rather than the bare book, since that's the
//! contract external callers actually use.

use matching_engine::prelude::*;

fn limit(side: Side, price: u64, qty: u64) -> Order {
    Order::limit(side, Price::new(price), Quantity::new(qty))
}

#[tokio::test]
async fn s1_empty_book_resting_bid() {
    let harness = MatchingHarness::new("XYZ");
    let trades = harness.submit(limit(Side::Buy, 10_000, 100_000_000)).await.unwrap();

    assert!(trades.is_empty());
    let snap = harness.snapshot(5).await;
    assert_eq!(snap.bids[0].price, 10_000);
    assert_eq!(snap.bids[0].qty, 100_000_000);
    assert!(snap.asks.is_empty());
}

#[tokio::test]
async fn s2_simple_cross() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Sell, 10_100, 50)).await.unwrap();

    let trades = harness.submit(limit(Side::Buy, 10_200, 30)).await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, Price::new(10_100));
    assert_eq!(trades[0].quantity, Quantity::new(30));

    let snap = harness.snapshot(5).await;
    assert_eq!(snap.asks[0].price, 10_100);
    assert_eq!(snap.asks[0].qty, 20);
    assert!(snap.bids.is_empty(), "incoming order fully filled, nothing rests");
}

#[tokio::test]
async fn s3_walk_the_book() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Sell, 10_000, 10)).await.unwrap();
    harness.submit(limit(Side::Sell, 10_100, 20)).await.unwrap();
    harness.submit(limit(Side::Sell, 10_200, 50)).await.unwrap();

    let trades = harness.submit(limit(Side::Buy, 10_150, 40)).await.unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!((trades[0].price, trades[0].quantity), (Price::new(10_000), Quantity::new(10)));
    assert_eq!((trades[1].price, trades[1].quantity), (Price::new(10_100), Quantity::new(20)));

    let snap = harness.snapshot(5).await;
    assert_eq!(snap.asks[0].price, 10_200);
    assert_eq!(snap.asks[0].qty, 50);
    assert_eq!(snap.bids[0].price, 10_150);
    assert_eq!(snap.bids[0].qty, 10);
}

#[tokio::test]
async fn s4_partial_fill_residual_rests() {
    let harness = MatchingHarness::new("XYZ");
    harness.submit(limit(Side::Buy, 9_900, 20)).await.unwrap();

    let trades = harness.submit(limit(Side::Sell, 9_900, 50)).await.unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].price, Price::new(9_900));
    assert_eq!(trades[0].quantity, Quantity::new(20));

    let snap = harness.snapshot(5).await;
    assert!(snap.bids.is_empty());
    assert_eq!(snap.asks[0].price, 9_900);
    assert_eq!(snap.asks[0].qty, 30);
}

#[tokio::test]
async fn s5_cancel_then_peek() {
    let harness = MatchingHarness::new("XYZ");
    let a = limit(Side::Sell, 10_000, 1);
    let b = limit(Side::Sell, 10_000, 1);
    let c = limit(Side::Sell, 10_000, 1);
    let a_id = a.id;

    harness.submit(a).await.unwrap();
    harness.submit(b).await.unwrap();
    harness.submit(c).await.unwrap();

    assert!(harness.cancel(a_id).await);

    let snap = harness.snapshot(5).await;
    assert_eq!(snap.asks[0].price, 10_000);
    assert_eq!(snap.asks[0].qty, 2); // b + c still live
    assert_eq!(harness.depth_count(Side::Sell).await, 2);
}

#[tokio::test]
async fn s6_tombstone_cleanup_under_pressure() {
    let harness = MatchingHarness::new("XYZ");
    let mut ids = Vec::with_capacity(1000);
    for _ in 0..1000 {
        let o = limit(Side::Sell, 10_000, 1);
        ids.push(o.id);
        harness.submit(o).await.unwrap();
    }
    for (i, id) in ids.iter().enumerate() {
        if i % 2 == 1 {
            harness.cancel(*id).await;
        }
    }

    let snap = harness.snapshot(1).await;
    assert_eq!(snap.asks[0].qty, 500);
    assert_eq!(harness.depth_count(Side::Sell).await, 500);

    // A non-crossing bid forces match_order to read best_ask() once,
    // which must have compacted the level's physical arrival queue
    // well past the default 50% tombstone threshold.
    harness
        .submit(limit(Side::Buy, 1, 1))
        .await
        .unwrap();
    let physical = harness
        .physical_depth_at(Side::Sell, Price::new(10_000))
        .await
        .unwrap();
    assert!(physical <= 500);
}
