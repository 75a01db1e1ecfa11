//! OrderBook: both ladders plus the id→location index.
//!
//! The book is a passive, synchronous structure owning:
//! - Bids (buy orders) sorted high → low
//! - Asks (sell orders) sorted low → high
//! - An index from local order id to the (side, price) level holding it
//! - The feed's last applied sequence id
//!
//! All mutation goes through the four entry points: [`OrderBook::submit`],
//! [`OrderBook::cancel`], [`OrderBook::apply_external_reset`] and
//! [`OrderBook::apply_external_level_update`].

use rustc_hash::FxHashMap;

use crate::{
    CancelResult, Fill, Ladder, Order, OrderId, Price, Quantity, RestingState, SeqId, Side,
    SubmitError, SubmitResult, Symbol, Timestamp, is_negligible,
};

/// Which level holds a local order. Within the level, the order is found by
/// its id; positions are never stored, so removing one order cannot
/// invalidate another's location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OrderLocation {
    pub(crate) side: Side,
    pub(crate) price: Price,
}

/// The complete order book for one instrument.
///
/// Local submissions and external feed updates mutate the same ladder pair;
/// feed-aggregate entries carry [`OrderId::EXTERNAL`] and never appear in
/// the index.
#[derive(Clone, Debug)]
pub struct OrderBook {
    /// Instrument this book serves
    pub(crate) symbol: Symbol,
    /// Buy orders, sorted by price descending (best = highest)
    pub(crate) bids: Ladder,
    /// Sell orders, sorted by price ascending (best = lowest)
    pub(crate) asks: Ladder,
    /// Local order id → level holding it
    pub(crate) index: FxHashMap<OrderId, OrderLocation>,
    /// Last applied feed sequence id; unset until the feed speaks
    pub(crate) sequence_id: Option<SeqId>,
    /// Next arrival counter to assign
    pub(crate) next_timestamp: u64,
}

impl OrderBook {
    /// Create a new empty book for the given symbol.
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            bids: Ladder::new(Side::Buy),
            asks: Ladder::new(Side::Sell),
            index: FxHashMap::default(),
            sequence_id: None,
            next_timestamp: 1,
        }
    }

    /// The instrument this book serves.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Generate the next arrival counter (monotonically increasing).
    pub(crate) fn next_timestamp(&mut self) -> Timestamp {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        ts
    }

    // === Book access ===

    /// The bid ladder.
    pub fn bids(&self) -> &Ladder {
        &self.bids
    }

    /// The ask ladder.
    pub fn asks(&self) -> &Ladder {
        &self.asks
    }

    /// The ladder for the given side.
    pub fn side(&self, side: Side) -> &Ladder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    /// Mutable access to the ladder for the given side.
    pub(crate) fn side_mut(&mut self, side: Side) -> &mut Ladder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Mutable access to the opposite side (for matching).
    pub(crate) fn opposite_side_mut(&mut self, side: Side) -> &mut Ladder {
        self.side_mut(side.opposite())
    }

    // === Best prices ===

    /// Best bid price (highest buy).
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    /// Best ask price (lowest sell).
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Spread (best ask − best bid), if both exist.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.value() - bid.value()),
            _ => None,
        }
    }

    /// Midpoint of the best bid and ask, if both exist.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.value() + ask.value()) / 2.0),
            _ => None,
        }
    }

    /// True if best bid ≥ best ask.
    ///
    /// Outside a pure-external standoff this should not survive the end of
    /// any public call.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid >= ask,
            _ => false,
        }
    }

    // === Order access ===

    /// True if a local order with this id rests on the book.
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Look up a resting local order by id.
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let loc = self.index.get(&order_id)?;
        self.side(loc.side)
            .get_level(loc.price)?
            .iter()
            .find(|o| o.id == order_id)
    }

    /// Number of local orders resting on the book.
    pub fn open_order_count(&self) -> usize {
        self.index.len()
    }

    // === Sequence tracking ===

    /// Last applied feed sequence id, unset before the first feed event and
    /// after every snapshot reset.
    pub fn sequence_id(&self) -> Option<SeqId> {
        self.sequence_id
    }

    /// Record the feed sequence id just applied.
    pub fn set_sequence_id(&mut self, seq_id: SeqId) {
        self.sequence_id = Some(seq_id);
    }

    // === Entry points ===

    /// Submit a local limit order.
    ///
    /// The order sweeps the opposite ladder under price-time priority; a
    /// non-negligible remainder rests at the tail of its price level and is
    /// registered in the index. Rejections leave the book untouched.
    pub fn submit(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<SubmitResult, SubmitError> {
        if id.is_external() {
            return Err(SubmitError::ReservedOrderId(id));
        }
        if self.index.contains_key(&id) {
            return Err(SubmitError::DuplicateOrderId(id));
        }
        // `!(quantity > 0)` also rejects NaN
        if !(quantity > 0.0) {
            return Err(SubmitError::NonPositiveQuantity);
        }

        let timestamp = self.next_timestamp();
        let mut order =
            Order::new_local(id, side, price, quantity, self.symbol.clone(), timestamp);

        let fills = self.match_incoming(&mut order);
        let filled_quantity = order.filled_quantity;

        let (resting_state, resting_quantity) = if order.is_consumed() {
            (RestingState::FullyFilled, 0.0)
        } else {
            let state = if fills.is_empty() {
                RestingState::FullyResting
            } else {
                RestingState::PartiallyResting
            };
            let resting = order.remaining_quantity;
            self.index.insert(id, OrderLocation { side, price });
            self.side_mut(side)
                .get_or_create_level(price)
                .push_back(order);
            (state, resting)
        };

        Ok(SubmitResult {
            order_id: id,
            fills,
            resting_state,
            filled_quantity,
            resting_quantity,
        })
    }

    /// Cancel a resting local order. Unknown ids are non-fatal.
    pub fn cancel(&mut self, order_id: OrderId) -> CancelResult {
        let Some(loc) = self.index.remove(&order_id) else {
            tracing::warn!(%order_id, "cancel: order not found");
            return CancelResult::not_found();
        };

        let ladder = self.side_mut(loc.side);
        let removed = ladder
            .get_level_mut(loc.price)
            .and_then(|level| level.remove_by_id(order_id))
            .expect("indexed order resides in its level");
        ladder.remove_level_if_empty(loc.price);

        CancelResult::cancelled(removed.remaining_quantity)
    }

    /// Clear both ladders, the index, and the sequence state.
    ///
    /// Used on a feed snapshot: the book is rebuilt from the snapshot's
    /// levels and any local orders must be resubmitted.
    pub fn apply_external_reset(&mut self) {
        self.bids = Ladder::new(Side::Buy);
        self.asks = Ladder::new(Side::Sell);
        self.index.clear();
        self.sequence_id = None;
    }

    /// Apply one external level update: the feed's absolute resting size at
    /// `price` on `side`.
    ///
    /// A negligible total removes the aggregate entry at that price; local
    /// orders resting at the same price survive. Otherwise the aggregate is
    /// created at the head of the level or overwritten in place. The
    /// cross-sweep runs after the mutation and its virtual fills are
    /// returned.
    pub fn apply_external_level_update(
        &mut self,
        side: Side,
        price: Price,
        total_quantity: Quantity,
    ) -> Vec<Fill> {
        if is_negligible(total_quantity) {
            let ladder = self.side_mut(side);
            if let Some(level) = ladder.get_level_mut(price) {
                level.remove_external();
                ladder.remove_level_if_empty(price);
            }
        } else {
            let timestamp = self.next_timestamp();
            let symbol = self.symbol.clone();
            let level = self.side_mut(side).get_or_create_level(price);
            match level.front_mut() {
                Some(head) if head.is_external() => head.overwrite_quantity(total_quantity),
                _ => {
                    // At most one aggregate per level
                    level.remove_external();
                    level.push_front(Order::new_external(
                        side,
                        price,
                        total_quantity,
                        symbol,
                        timestamp,
                    ));
                }
            }
        }

        self.cross_sweep()
    }
}
