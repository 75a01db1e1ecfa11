//! Order side, and the price-priority rules that depend on it.
//!
//! "Better" is side-relative: a higher bid outranks a lower one, a lower
//! ask outranks a higher one. Ladder ordering and limit crossing both
//! route through these helpers so the direction logic exists once.

use std::fmt;

use crate::Price;

/// Side of an order or ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// True if `a` outranks `b` in this side's ladder.
    ///
    /// Equal prices are never better; they share one level.
    #[inline]
    pub fn is_better_price(self, a: Price, b: Price) -> bool {
        match self {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }

    /// The better-ranked of two prices on this side.
    #[inline]
    pub fn better_price(self, a: Price, b: Price) -> Price {
        if self.is_better_price(b, a) { b } else { a }
    }

    /// True if an order on this side with limit `limit` may trade at
    /// `resting`. Equality crosses: a limit is inclusive.
    #[inline]
    pub fn crosses(self, limit: Price, resting: Price) -> bool {
        match self {
            Side::Buy => limit >= resting,
            Side::Sell => limit <= resting,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}
