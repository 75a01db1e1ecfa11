//! Result types for book operations.

use crate::{Fill, OrderId, Quantity};

/// Where a submitted order ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestingState {
    /// Fully consumed during matching; never entered the book.
    FullyFilled,
    /// Some quantity filled, the remainder rests on the book.
    PartiallyResting,
    /// No fills; the whole order rests on the book.
    FullyResting,
}

/// Result of submitting an order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubmitResult {
    /// The id the caller submitted
    pub order_id: OrderId,
    /// Fills produced while sweeping the opposite ladder
    pub fills: Vec<Fill>,
    /// Whether the order filled, rests, or both
    pub resting_state: RestingState,
    /// Quantity filled during the sweep
    pub filled_quantity: Quantity,
    /// Quantity left resting on the book
    pub resting_quantity: Quantity,
}

impl SubmitResult {
    /// Returns true if any fills occurred.
    pub fn has_fills(&self) -> bool {
        !self.fills.is_empty()
    }

    /// Returns true if the order is resting on the book.
    pub fn is_resting(&self) -> bool {
        self.resting_state != RestingState::FullyFilled
    }
}

/// Result of cancelling an order. An unknown id is non-fatal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CancelResult {
    /// Whether the id was found and removed
    pub found: bool,
    /// Quantity removed from the book (0 if not found)
    pub cancelled_quantity: Quantity,
}

impl CancelResult {
    /// A successful cancellation.
    pub fn cancelled(cancelled_quantity: Quantity) -> Self {
        Self {
            found: true,
            cancelled_quantity,
        }
    }

    /// The id was not present in the index.
    pub fn not_found() -> Self {
        Self {
            found: false,
            cancelled_quantity: 0.0,
        }
    }
}
