//! Thread-safe book handle.
//!
//! The book itself is passive and synchronous. When a feed-delivery thread
//! and a submission/query thread share one instrument, every operation,
//! reads included, takes a single book-wide exclusive lock for its full
//! duration. Depth capture walks mutable structures, so there is no
//! read-side fast path.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    CancelResult, DepthSnapshot, FeedApplyResult, FeedEvent, FeedReconciler, OrderBook, OrderId,
    Price, Quantity, Side, SubmitError, SubmitResult, Symbol, SyncState,
};

struct Inner {
    book: OrderBook,
    feed: FeedReconciler,
}

/// A clonable handle to one instrument's book and feed reconciler.
///
/// Each method acquires the lock, runs the operation to completion
/// (including any matching sweep or cross-sweep) and releases it.
#[derive(Clone)]
pub struct SharedBook {
    inner: Arc<Mutex<Inner>>,
}

impl SharedBook {
    /// Create a shared book for the given symbol.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                book: OrderBook::new(symbol),
                feed: FeedReconciler::new(),
            })),
        }
    }

    /// Submit a local limit order.
    pub fn submit(
        &self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<SubmitResult, SubmitError> {
        self.inner.lock().book.submit(id, side, price, quantity)
    }

    /// Cancel a resting local order.
    pub fn cancel(&self, order_id: OrderId) -> CancelResult {
        self.inner.lock().book.cancel(order_id)
    }

    /// Apply one feed event through the reconciler.
    pub fn apply_feed_event(&self, event: &FeedEvent) -> FeedApplyResult {
        let mut inner = self.inner.lock();
        let Inner { book, feed } = &mut *inner;
        feed.apply(book, event)
    }

    /// Mark that the feed transport is fetching a fresh snapshot.
    pub fn begin_resync(&self) {
        self.inner.lock().feed.begin_resync();
    }

    /// Current feed synchronization status.
    pub fn sync_state(&self) -> SyncState {
        self.inner.lock().feed.state()
    }

    /// Capture the top `levels` of depth on each side.
    pub fn depth(&self, levels: usize) -> DepthSnapshot {
        self.inner.lock().book.depth(levels)
    }

    /// Best bid and ask, captured atomically.
    pub fn top_of_book(&self) -> (Option<Price>, Option<Price>) {
        let inner = self.inner.lock();
        (inner.book.best_bid(), inner.book.best_ask())
    }

    /// Run an arbitrary closure under the book lock.
    ///
    /// For compound reads that must be point-in-time consistent, or
    /// operations this wrapper does not surface directly.
    pub fn with<R>(&self, f: impl FnOnce(&mut OrderBook) -> R) -> R {
        f(&mut self.inner.lock().book)
    }
}
