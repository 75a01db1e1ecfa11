//! Order representation and lifecycle

use crate::{OrderId, Price, Quantity, Side, Symbol, Timestamp, is_negligible};

/// Where an order came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Origin {
    /// Submitted through the local API; owned by an individual id.
    Local,
    /// The feed's total resting size at one price, carried as a single
    /// synthetic entry with the sentinel id.
    ExternalAggregate,
}

/// An order resting in (or sweeping) the book.
///
/// Both locally-submitted orders and feed aggregates use this one type;
/// the [`Origin`] tag and sentinel id distinguish them.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    /// Unique id, or [`OrderId::EXTERNAL`] for feed aggregates
    pub id: OrderId,
    /// Buy or sell
    pub side: Side,
    /// Limit price (max for buy, min for sell)
    pub price: Price,
    /// Quantity when created (or last overwritten, for aggregates)
    pub original_quantity: Quantity,
    /// Quantity still available to fill
    pub remaining_quantity: Quantity,
    /// Quantity filled so far
    pub filled_quantity: Quantity,
    /// Instrument this order belongs to
    pub symbol: Symbol,
    /// Arrival counter assigned by the book
    pub timestamp: Timestamp,
    /// Local submission or feed aggregate
    pub origin: Origin,
}

impl Order {
    /// Create a locally-submitted order.
    pub fn new_local(
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
        symbol: Symbol,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            side,
            price,
            original_quantity: quantity,
            remaining_quantity: quantity,
            filled_quantity: 0.0,
            symbol,
            timestamp,
            origin: Origin::Local,
        }
    }

    /// Create a feed-aggregate entry carrying the sentinel id.
    pub fn new_external(
        side: Side,
        price: Price,
        quantity: Quantity,
        symbol: Symbol,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: OrderId::EXTERNAL,
            side,
            price,
            original_quantity: quantity,
            remaining_quantity: quantity,
            filled_quantity: 0.0,
            symbol,
            timestamp,
            origin: Origin::ExternalAggregate,
        }
    }

    /// Returns true for feed-aggregate entries.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.origin == Origin::ExternalAggregate
    }

    /// Returns true once the remaining quantity is consumed (within epsilon).
    #[inline]
    pub fn is_consumed(&self) -> bool {
        is_negligible(self.remaining_quantity)
    }

    /// Fill the order by the given quantity.
    ///
    /// Callers must never fill past the remaining quantity; the remainder is
    /// clamped at zero so float residue cannot go negative.
    pub fn fill(&mut self, quantity: Quantity) {
        debug_assert!(
            quantity <= self.remaining_quantity + crate::QTY_EPSILON,
            "fill {} exceeds remaining {}",
            quantity,
            self.remaining_quantity
        );
        self.remaining_quantity = (self.remaining_quantity - quantity).max(0.0);
        self.filled_quantity += quantity;
    }

    /// Overwrite the resting size in place (feed aggregates only).
    ///
    /// The feed reports absolute totals, not deltas, so each update replaces
    /// the previous size without touching queue position.
    pub fn overwrite_quantity(&mut self, quantity: Quantity) {
        debug_assert!(self.is_external(), "only aggregates are overwritten");
        self.original_quantity = quantity;
        self.remaining_quantity = quantity;
    }
}
