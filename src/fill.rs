//! Fill events emitted by matching and by the cross-sweep.

use std::fmt;

use crate::{OrderId, Price, Quantity, Timestamp};

/// One execution between an aggressive and a passive order.
///
/// Local matching reports the incoming order as the aggressor. Fills from
/// the cross-sweep carry [`OrderId::EXTERNAL`] on the side driven by the
/// feed update.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fill {
    /// Execution price (the passive side's price)
    pub price: Price,
    /// Quantity executed
    pub quantity: Quantity,
    /// Order that caused the execution (taker)
    pub aggressive_order_id: OrderId,
    /// Order that was resting (maker)
    pub passive_order_id: OrderId,
    /// When the fill occurred (book's arrival counter)
    pub timestamp: Timestamp,
}

impl Fill {
    /// Create a new fill.
    pub fn new(
        price: Price,
        quantity: Quantity,
        aggressive_order_id: OrderId,
        passive_order_id: OrderId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            price,
            quantity,
            aggressive_order_id,
            passive_order_id,
            timestamp,
        }
    }

    /// Returns true if either side is the feed aggregate.
    #[inline]
    pub fn involves_external(&self) -> bool {
        self.aggressive_order_id.is_external() || self.passive_order_id.is_external()
    }

    /// Notional value (price × quantity).
    #[inline]
    pub fn notional(&self) -> f64 {
        self.price.value() * self.quantity
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} ({} aggressor vs {})",
            self.quantity, self.price, self.aggressive_order_id, self.passive_order_id
        )
    }
}
