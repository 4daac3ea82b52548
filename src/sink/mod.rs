//! Trade sink: a bounded queue drained by a background writer,
//! non-blocking from the matching path.
//!
//! The drainer-task plumbing mirrors the teacher crate's
//! `BookManagerTokio::start_trade_processor` (see
//! `orderbook::manager`): a channel there, a `tokio::sync::Mutex`-guarded
//! ring buffer plus a pair of `Notify` handles here, since
//! [`SinkPolicy::DropOldest`] needs to evict from the *front* of the
//! queue under pressure — something a plain `mpsc` sender cannot do
//! from the producer side.

pub mod error;

use self::error::SinkError;
use crate::orderbook::trade::Trade;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{Mutex, Notify};
use tracing::{error, warn};

/// A boxed, `Send` future, the manual stand-in for `async fn` in a
/// `dyn`-safe trait (no `async-trait` dependency in the teacher's
/// stack, so this crate doesn't introduce one either).
type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Policy applied when the sink's bounded channel is full.
///
/// Default is [`SinkPolicy::DropOldest`]: the matching path must never
/// stall on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkPolicy {
    /// Evict the oldest buffered trade to make room, and warn.
    #[default]
    DropOldest,
    /// Drop the incoming trade instead of the oldest one, and warn.
    DropNew,
    /// Await channel capacity; can, in principle, propagate
    /// backpressure into the matching path. Not recommended for the
    /// hot path but offered as a valid configuration choice.
    Block,
}

/// Pluggable seam for the actual durable store, treated as an external
/// collaborator: this crate owns matching, not storage.
pub trait TradeWriter: Send + Sync {
    /// Durably record a batch of trades. Must be idempotent keyed by
    /// `trade_id`: a drainer crash between pop and commit may replay
    /// the same batch on restart, so the durable store must treat
    /// inserts as idempotent upserts.
    fn write_batch<'a>(&'a self, trades: &'a [Trade]) -> BoxFuture<'a, Result<(), SinkError>>;
}

/// Reference [`TradeWriter`] suitable for tests and as a stand-in for
/// a real durable store. Keyed by `trade_id`, upserts are idempotent.
#[derive(Debug, Default)]
pub struct InMemoryTradeWriter {
    written: DashMap<crate::orderbook::trade::TradeId, Trade>,
}

impl InMemoryTradeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.written.len()
    }

    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn contains(&self, trade_id: crate::orderbook::trade::TradeId) -> bool {
        self.written.contains_key(&trade_id)
    }
}

impl TradeWriter for InMemoryTradeWriter {
    fn write_batch<'a>(&'a self, trades: &'a [Trade]) -> BoxFuture<'a, Result<(), SinkError>> {
        Box::pin(async move {
            for trade in trades {
                self.written.insert(trade.trade_id, trade.clone());
            }
            Ok(())
        })
    }
}

/// The bounded ring buffer shared between pushers and the drainer
/// task. A plain `tokio::sync::mpsc` channel cannot implement
/// [`SinkPolicy::DropOldest`] from the producer side (there is no way
/// to evict the receiver's front element), so the buffer itself is a
/// mutex-guarded deque instead.
struct Shared {
    buf: Mutex<VecDeque<Trade>>,
    capacity: usize,
    /// Signalled by a pusher whenever the buffer goes from empty to
    /// non-empty, so the drainer can sleep instead of polling.
    item_ready: Notify,
    /// Signalled by the drainer after every drain, so a
    /// [`SinkPolicy::Block`] pusher waiting for room wakes up.
    space_available: Notify,
    dropped: AtomicU64,
    closed: AtomicBool,
}

/// A bounded, non-blocking trade sink with a single background
/// drainer task.
///
/// `push`/`push_batch` never stall the matching path: under the
/// default [`SinkPolicy::DropOldest`], a full buffer sheds its oldest
/// buffered trade and increments [`Self::dropped_count`] instead of
/// blocking.
pub struct BoundedTradeSink {
    shared: Arc<Shared>,
    policy: SinkPolicy,
    drainer: Option<tokio::task::JoinHandle<()>>,
}

impl BoundedTradeSink {
    /// Spawn the drainer task and return the sink handle. `capacity`
    /// bounds the buffer; `writer` receives batches in FIFO pop order.
    pub fn spawn(capacity: usize, policy: SinkPolicy, writer: Arc<dyn TradeWriter>) -> Self {
        let shared = Arc::new(Shared {
            buf: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
            capacity: capacity.max(1),
            item_ready: Notify::new(),
            space_available: Notify::new(),
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        });

        let drainer_shared = shared.clone();
        let drainer = tokio::spawn(async move {
            loop {
                let batch: Vec<Trade> = {
                    let mut buf = drainer_shared.buf.lock().await;
                    if buf.is_empty() {
                        if drainer_shared.closed.load(Ordering::Acquire) {
                            return;
                        }
                        drop(buf);
                        drainer_shared.item_ready.notified().await;
                        continue;
                    }
                    buf.drain(..).collect()
                };
                drainer_shared.space_available.notify_waiters();
                if let Err(e) = writer.write_batch(&batch).await {
                    error!(error = %e, "trade writer failed on batch");
                }
            }
        });

        BoundedTradeSink {
            shared,
            policy,
            drainer: Some(drainer),
        }
    }

    /// Push a single trade, applying the configured overflow policy
    /// on a full buffer. Never blocks under [`SinkPolicy::DropOldest`]
    /// or [`SinkPolicy::DropNew`].
    pub async fn push(&self, trade: Trade) -> Result<(), SinkError> {
        self.push_batch(std::iter::once(trade)).await
    }

    /// Push every trade produced by a single `submit` call, in match
    /// order: callers rely on trades reaching the sink in the same
    /// order they executed.
    pub async fn push_batch(
        &self,
        trades: impl IntoIterator<Item = Trade>,
    ) -> Result<(), SinkError> {
        for trade in trades {
            self.push_one(trade).await?;
        }
        Ok(())
    }

    async fn push_one(&self, trade: Trade) -> Result<(), SinkError> {
        if self.shared.closed.load(Ordering::Acquire) {
            return Err(SinkError::Closed);
        }
        match self.policy {
            SinkPolicy::DropOldest => {
                let mut buf = self.shared.buf.lock().await;
                if buf.len() >= self.shared.capacity {
                    if let Some(evicted) = buf.pop_front() {
                        self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                        warn!(trade_id = %evicted.trade_id, "trade sink saturated, dropping oldest");
                    }
                }
                buf.push_back(trade);
                drop(buf);
                self.shared.item_ready.notify_one();
                Ok(())
            }
            SinkPolicy::DropNew => {
                let mut buf = self.shared.buf.lock().await;
                if buf.len() >= self.shared.capacity {
                    self.shared.dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(trade_id = %trade.trade_id, "trade sink saturated, dropping new trade");
                } else {
                    buf.push_back(trade);
                    drop(buf);
                    self.shared.item_ready.notify_one();
                }
                Ok(())
            }
            SinkPolicy::Block => {
                loop {
                    // The `Notified` future must be constructed before the
                    // buffer lock is dropped: a drainer that drains and
                    // calls `notify_waiters` in the gap between dropping
                    // the lock and registering as a waiter would otherwise
                    // be missed, parking this task forever.
                    let notified = {
                        let mut buf = self.shared.buf.lock().await;
                        if buf.len() < self.shared.capacity {
                            buf.push_back(trade);
                            drop(buf);
                            self.shared.item_ready.notify_one();
                            return Ok(());
                        }
                        self.shared.space_available.notified()
                    };
                    if self.shared.closed.load(Ordering::Acquire) {
                        return Err(SinkError::Closed);
                    }
                    notified.await;
                }
            }
        }
    }

    /// Number of trades shed under backpressure since this sink was
    /// created. An observability counter, not a correctness signal.
    pub fn dropped_count(&self) -> u64 {
        self.shared.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for BoundedTradeSink {
    fn drop(&mut self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.item_ready.notify_waiters();
        self.shared.space_available.notify_waiters();
        if let Some(handle) = self.drainer.take() {
            handle.abort();
        }
    }
}
