//! Point-in-time depth views of the book.
//!
//! Aggregate quantities per price, local and feed liquidity combined. The
//! capture walks the live ladders, so callers sharing the book across
//! threads take it through [`crate::SharedBook`] like any other operation.

use std::fmt;

use crate::{OrderBook, Price, Quantity, Timestamp};

/// Aggregate resting quantity at one price.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthLevel {
    pub price: Price,
    pub quantity: Quantity,
}

/// A point-in-time view of the top of the book.
///
/// `bids` run best to worst (highest price first). `asks` run worst to best
/// so that printing top to bottom shows the classic depth display with the
/// best ask directly above the best bid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthSnapshot {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
    /// Arrival counter at capture time, for ordering snapshots against fills
    pub timestamp: Timestamp,
}

impl DepthSnapshot {
    /// Best bid price, if any.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    /// Best ask price, if any. Asks are stored worst to best.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.last().map(|l| l.price)
    }

    /// Spread (best ask − best bid), if both sides have depth.
    pub fn spread(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.value() - bid.value()),
            _ => None,
        }
    }

    /// Midpoint of the best bid and ask, if both sides have depth.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.value() + ask.value()) / 2.0),
            _ => None,
        }
    }
}

impl fmt::Display for DepthSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ASKS")?;
        for level in &self.asks {
            writeln!(f, "  {:>12.4} x {:.4}", level.price.value(), level.quantity)?;
        }
        writeln!(f, "BIDS")?;
        for level in &self.bids {
            writeln!(f, "  {:>12.4} x {:.4}", level.price.value(), level.quantity)?;
        }
        Ok(())
    }
}

impl OrderBook {
    /// Capture the top `levels` price levels of each side.
    pub fn depth(&self, levels: usize) -> DepthSnapshot {
        let bids = self
            .bids()
            .iter_best_to_worst()
            .take(levels)
            .map(|(price, level)| DepthLevel {
                price: *price,
                quantity: level.total_quantity(),
            })
            .collect();

        let mut asks: Vec<DepthLevel> = self
            .asks()
            .iter_best_to_worst()
            .take(levels)
            .map(|(price, level)| DepthLevel {
                price: *price,
                quantity: level.total_quantity(),
            })
            .collect();
        asks.reverse(); // Display order: best ask adjacent to best bid

        DepthSnapshot {
            bids,
            asks,
            timestamp: self.next_timestamp,
        }
    }

    /// Capture the classic five-level display depth.
    pub fn depth_top5(&self) -> DepthSnapshot {
        self.depth(5)
    }

    /// Capture every price level of both sides.
    pub fn full_depth(&self) -> DepthSnapshot {
        self.depth(usize::MAX)
    }
}
