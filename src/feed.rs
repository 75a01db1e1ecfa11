//! Feed reconciler: applies external depth events and tracks sequence
//! continuity.
//!
//! The reconciler is a thin state machine in front of the book's external
//! entry points. It classifies sequence discontinuities but still applies
//! the event's level data best-effort and advances the sequence id; forcing
//! a resynchronization is left to the feed transport, which calls
//! [`FeedReconciler::begin_resync`] and delivers a fresh snapshot.

use crate::{Fill, OrderBook, Price, Quantity, SeqId, Side};

/// One price level as reported by the feed: the absolute resting size at
/// that price, not a delta.
pub type FeedLevel = (Price, Quantity);

/// A depth event from the external feed, already parsed and validated by
/// the transport layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedEvent {
    /// Full depth image. Replaces the book's contents entirely.
    Snapshot {
        seq_id: SeqId,
        bids: Vec<FeedLevel>,
        asks: Vec<FeedLevel>,
    },
    /// Delta on top of the previous event, chained by `prev_seq_id`.
    Incremental {
        seq_id: SeqId,
        prev_seq_id: SeqId,
        bids: Vec<FeedLevel>,
        asks: Vec<FeedLevel>,
    },
}

impl FeedEvent {
    /// The sequence id this event carries.
    pub fn seq_id(&self) -> SeqId {
        match self {
            FeedEvent::Snapshot { seq_id, .. } | FeedEvent::Incremental { seq_id, .. } => *seq_id,
        }
    }
}

/// Synchronization status of the reconciler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncState {
    /// No snapshot received yet.
    Uninitialized,
    /// Sequence chain intact since the last snapshot.
    Synced,
    /// A continuity fault was observed; depth may be stale or wrong.
    Gap,
    /// The transport has requested a fresh snapshot.
    Resyncing,
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::Uninitialized
    }
}

/// A break in the incremental sequence chain.
///
/// Faults are warnings, not rejections: the event that triggered one has
/// still been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContinuityFault {
    /// `prev_seq_id` is ahead of the tracked id; messages were missed.
    #[error("sequence gap: expected prev {expected}, event carried {received}")]
    SequenceGap { expected: SeqId, received: SeqId },
    /// The feed's sequence moved backwards, typically a feed-side restart.
    #[error("feed reset: sequence went from {last} back to {received}")]
    FeedReset { last: SeqId, received: SeqId },
}

/// Outcome of applying one feed event.
#[derive(Clone, Debug)]
pub struct FeedApplyResult {
    /// Virtual fills emitted by cross-sweeps during the event.
    pub fills: Vec<Fill>,
    /// Continuity fault detected while applying, if any.
    pub fault: Option<ContinuityFault>,
}

impl FeedApplyResult {
    /// Returns true if the event applied with an intact sequence chain.
    pub fn is_clean(&self) -> bool {
        self.fault.is_none()
    }
}

/// Applies feed events to a book and tracks the sync state machine.
///
/// `Uninitialized → Synced` on the first snapshot; `Synced → Gap` on a
/// continuity fault; `Gap | Synced → Resyncing` when the transport requests
/// recovery; any snapshot returns to `Synced`.
#[derive(Clone, Debug, Default)]
pub struct FeedReconciler {
    state: SyncState,
}

impl FeedReconciler {
    /// Create a reconciler that has seen no feed traffic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current synchronization status.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Mark that the transport is fetching a fresh snapshot.
    ///
    /// Incrementals arriving in this state are still applied best-effort;
    /// the next snapshot returns the reconciler to `Synced`.
    pub fn begin_resync(&mut self) {
        self.state = SyncState::Resyncing;
    }

    /// Apply one feed event to the book.
    ///
    /// Snapshots clear the book and rebuild it from the event's levels.
    /// Incrementals are checked for sequence continuity; a mismatch is
    /// reported as a fault but the level data is applied regardless and the
    /// sequence id advances to the event's. Within an event, bid levels
    /// apply before ask levels, each in the order given.
    pub fn apply(&mut self, book: &mut OrderBook, event: &FeedEvent) -> FeedApplyResult {
        match event {
            FeedEvent::Snapshot { seq_id, bids, asks } => {
                book.apply_external_reset();
                let fills = Self::apply_levels(book, bids, asks);
                book.set_sequence_id(*seq_id);
                self.state = SyncState::Synced;
                FeedApplyResult { fills, fault: None }
            }
            FeedEvent::Incremental {
                seq_id,
                prev_seq_id,
                bids,
                asks,
            } => {
                let fault = self.check_continuity(book.sequence_id(), *seq_id, *prev_seq_id);
                let fills = Self::apply_levels(book, bids, asks);
                book.set_sequence_id(*seq_id);
                FeedApplyResult { fills, fault }
            }
        }
    }

    fn check_continuity(
        &mut self,
        tracked: Option<SeqId>,
        seq_id: SeqId,
        prev_seq_id: SeqId,
    ) -> Option<ContinuityFault> {
        // An incremental before any snapshot carries nothing to check
        let expected = tracked?;
        if prev_seq_id == expected {
            return None;
        }

        let fault = if seq_id < prev_seq_id {
            ContinuityFault::FeedReset {
                last: expected,
                received: seq_id,
            }
        } else {
            ContinuityFault::SequenceGap {
                expected,
                received: prev_seq_id,
            }
        };
        tracing::warn!(%fault, "feed continuity fault; applying event anyway");
        self.state = SyncState::Gap;
        Some(fault)
    }

    fn apply_levels(book: &mut OrderBook, bids: &[FeedLevel], asks: &[FeedLevel]) -> Vec<Fill> {
        let mut fills = Vec::new();
        for &(price, quantity) in bids {
            fills.extend(book.apply_external_level_update(Side::Buy, price, quantity));
        }
        for &(price, quantity) in asks {
            fills.extend(book.apply_external_level_update(Side::Sell, price, quantity));
        }
        fills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrderId, Symbol};

    fn book() -> OrderBook {
        OrderBook::new(Symbol::new("TEST"))
    }

    fn snapshot(seq_id: SeqId, bids: &[(f64, f64)], asks: &[(f64, f64)]) -> FeedEvent {
        FeedEvent::Snapshot {
            seq_id,
            bids: bids.iter().map(|&(p, q)| (Price::new(p), q)).collect(),
            asks: asks.iter().map(|&(p, q)| (Price::new(p), q)).collect(),
        }
    }

    fn incremental(
        seq_id: SeqId,
        prev_seq_id: SeqId,
        bids: &[(f64, f64)],
        asks: &[(f64, f64)],
    ) -> FeedEvent {
        FeedEvent::Incremental {
            seq_id,
            prev_seq_id,
            bids: bids.iter().map(|&(p, q)| (Price::new(p), q)).collect(),
            asks: asks.iter().map(|&(p, q)| (Price::new(p), q)).collect(),
        }
    }

    #[test]
    fn snapshot_initializes_book_and_state() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        assert_eq!(feed.state(), SyncState::Uninitialized);

        let result = feed.apply(&mut book, &snapshot(1, &[(100.0, 5.0)], &[(101.0, 4.0)]));

        assert!(result.is_clean());
        assert!(result.fills.is_empty());
        assert_eq!(feed.state(), SyncState::Synced);
        assert_eq!(book.sequence_id(), Some(1));
        assert_eq!(book.best_bid(), Some(Price::new(100.0)));
        assert_eq!(book.best_ask(), Some(Price::new(101.0)));
    }

    #[test]
    fn snapshot_discards_local_orders() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        book.submit(OrderId(1), Side::Buy, Price::new(50.0), 10.0)
            .unwrap();

        feed.apply(&mut book, &snapshot(1, &[(100.0, 5.0)], &[]));

        assert!(!book.contains_order(OrderId(1)));
        assert_eq!(book.open_order_count(), 0);
    }

    #[test]
    fn contiguous_incrementals_stay_synced() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(1, &[(100.0, 5.0)], &[]));

        let result = feed.apply(&mut book, &incremental(2, 1, &[(99.0, 3.0)], &[]));

        assert!(result.is_clean());
        assert_eq!(feed.state(), SyncState::Synced);
        assert_eq!(book.sequence_id(), Some(2));
        assert_eq!(book.bids().level_count(), 2);
    }

    #[test]
    fn gap_is_reported_but_event_still_applies() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(1, &[], &[]));

        // prev_seq 4 does not chain onto tracked 1
        let result = feed.apply(&mut book, &incremental(5, 4, &[(100.0, 5.0)], &[]));

        assert_eq!(
            result.fault,
            Some(ContinuityFault::SequenceGap {
                expected: 1,
                received: 4,
            })
        );
        assert_eq!(feed.state(), SyncState::Gap);
        // Best-effort: levels applied and sequence advanced regardless
        assert_eq!(book.best_bid(), Some(Price::new(100.0)));
        assert_eq!(book.sequence_id(), Some(5));
    }

    #[test]
    fn backwards_sequence_classified_as_feed_reset() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(10, &[], &[]));

        let result = feed.apply(&mut book, &incremental(2, 3, &[], &[(101.0, 4.0)]));

        assert_eq!(
            result.fault,
            Some(ContinuityFault::FeedReset {
                last: 10,
                received: 2,
            })
        );
        assert_eq!(feed.state(), SyncState::Gap);
        assert_eq!(book.sequence_id(), Some(2));
        assert_eq!(book.best_ask(), Some(Price::new(101.0)));
    }

    #[test]
    fn incremental_before_snapshot_carries_no_fault() {
        let mut book = book();
        let mut feed = FeedReconciler::new();

        let result = feed.apply(&mut book, &incremental(7, 6, &[(100.0, 1.0)], &[]));

        assert!(result.is_clean());
        assert_eq!(feed.state(), SyncState::Uninitialized);
        assert_eq!(book.sequence_id(), Some(7));
    }

    #[test]
    fn resync_ends_with_next_snapshot() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(1, &[], &[]));
        feed.apply(&mut book, &incremental(9, 8, &[], &[]));
        assert_eq!(feed.state(), SyncState::Gap);

        feed.begin_resync();
        assert_eq!(feed.state(), SyncState::Resyncing);

        feed.apply(&mut book, &snapshot(20, &[(100.0, 5.0)], &[]));
        assert_eq!(feed.state(), SyncState::Synced);
        assert_eq!(book.sequence_id(), Some(20));
    }

    #[test]
    fn incremental_cross_emits_virtual_fill() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(1, &[(100.0, 5.0)], &[]));
        book.submit(OrderId(1), Side::Buy, Price::new(100.0), 3.0)
            .unwrap();

        let result = feed.apply(&mut book, &incremental(2, 1, &[], &[(100.0, 5.0)]));

        assert!(result.is_clean());
        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].quantity, 3.0);
        assert_eq!(result.fills[0].passive_order_id, OrderId(1));
        assert_eq!(
            book.asks()
                .get_level(Price::new(100.0))
                .unwrap()
                .total_quantity(),
            2.0
        );
        assert_eq!(book.sequence_id(), Some(2));
    }

    #[test]
    fn zero_quantity_level_removes_aggregate() {
        let mut book = book();
        let mut feed = FeedReconciler::new();
        feed.apply(&mut book, &snapshot(1, &[(100.0, 5.0), (99.0, 2.0)], &[]));

        feed.apply(&mut book, &incremental(2, 1, &[(100.0, 0.0)], &[]));

        assert_eq!(book.best_bid(), Some(Price::new(99.0)));
        assert_eq!(book.bids().level_count(), 1);
    }
}
