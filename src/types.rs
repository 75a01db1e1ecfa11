//! Core types: Price, Quantity, OrderId, SeqId, Timestamp, Symbol

use std::fmt;
use std::sync::Arc;

use ordered_float::OrderedFloat;

/// Price as reported by the feed (f64 with a total order).
///
/// The wrapped [`OrderedFloat`] gives `Eq`/`Ord` so prices can key the
/// ladder's `BTreeMap` directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price(pub OrderedFloat<f64>);

impl Price {
    /// Wrap a raw f64 price.
    #[inline]
    pub fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    /// The raw f64 value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0.0
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Quantity of units. Feed quantities are fractional, so this is f64.
pub type Quantity = f64;

/// Tolerance below which a remaining quantity counts as fully consumed.
///
/// Repeated f64 subtraction leaves near-zero residue; anything under this
/// threshold is treated as zero everywhere quantities are compared.
pub const QTY_EPSILON: f64 = 1e-10;

/// Returns true if the quantity is zero for matching purposes.
#[inline]
pub fn is_negligible(quantity: Quantity) -> bool {
    quantity < QTY_EPSILON
}

/// Sequence id of the incremental feed. Unset until the first event applies.
pub type SeqId = i64;

/// Monotonic arrival counter assigned by the book.
///
/// A counter rather than wall-clock time keeps replay and tests
/// deterministic; only relative order matters for time priority.
pub type Timestamp = u64;

/// Order identifier supplied by the caller.
///
/// [`OrderId::EXTERNAL`] is a reserved sentinel meaning "externally
/// aggregated, no individual owner" — it never appears in the book's index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderId(pub u64);

impl OrderId {
    /// Sentinel id for feed-aggregate entries.
    pub const EXTERNAL: OrderId = OrderId(u64::MAX);

    /// Returns true if this is the external-aggregate sentinel.
    #[inline]
    pub fn is_external(self) -> bool {
        self == Self::EXTERNAL
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_external() {
            write!(f, "EXTERNAL")
        } else {
            write!(f, "O{}", self.0)
        }
    }
}

/// Instrument symbol. Cheap to clone; one book serves one symbol.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
