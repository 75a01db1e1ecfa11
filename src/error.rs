//! Rejection kinds for order submission.
//!
//! Submission faults are rejected before any book mutation; the caller gets
//! an explicit error kind rather than a panic.

use crate::OrderId;

/// Errors returned by [`crate::OrderBook::submit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubmitError {
    /// The id is already present in the book's index.
    #[error("order id {0} already exists")]
    DuplicateOrderId(OrderId),
    /// Quantity must be greater than zero.
    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,
    /// The sentinel id is reserved for feed-aggregate entries.
    #[error("order id {0} is reserved")]
    ReservedOrderId(OrderId),
}
