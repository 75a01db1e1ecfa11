//! Ladder: one side of the order book (bids or asks).
//!
//! Maintains a sorted collection of price levels with cached best price
//! for O(1) top-of-book queries.

use std::collections::BTreeMap;

use crate::{Level, Price, Quantity, Side};

/// One side of the order book (all bids or all asks).
///
/// - **Bids**: best = highest price
/// - **Asks**: best = lowest price
///
/// The `BTreeMap` provides O(log n) insert/remove with sorted iteration.
/// Best price is cached for O(1) access.
#[derive(Clone, Debug)]
pub struct Ladder {
    /// Price levels, sorted by price
    levels: BTreeMap<Price, Level>,
    /// Cached best price for O(1) access
    best_price: Option<Price>,
    /// Which side this represents (determines "best" direction)
    side: Side,
}

impl Ladder {
    /// Create a new empty ladder for the given side.
    pub fn new(side: Side) -> Self {
        Self {
            levels: BTreeMap::new(),
            best_price: None,
            side,
        }
    }

    /// Returns which side this ladder represents.
    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns true if there are no orders on this side.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Returns the number of distinct price levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Returns the best price (highest for bids, lowest for asks).
    #[inline]
    pub fn best_price(&self) -> Option<Price> {
        self.best_price
    }

    /// Returns a reference to the level at the given price, if it exists.
    pub fn get_level(&self, price: Price) -> Option<&Level> {
        self.levels.get(&price)
    }

    /// Returns a mutable reference to the level at the given price.
    pub fn get_level_mut(&mut self, price: Price) -> Option<&mut Level> {
        self.levels.get_mut(&price)
    }

    /// Gets or creates a level at the given price, keeping the best-price
    /// cache current.
    pub fn get_or_create_level(&mut self, price: Price) -> &mut Level {
        if !self.levels.contains_key(&price) {
            self.update_best_price_after_insert(price);
            self.levels.insert(price, Level::new(price));
        }
        self.levels.get_mut(&price).expect("level just ensured")
    }

    /// Remove a price level entirely.
    ///
    /// Updates the best price cache if the removed level was the best.
    pub fn remove_level(&mut self, price: Price) {
        if self.levels.remove(&price).is_some() && self.best_price == Some(price) {
            self.recompute_best_price();
        }
    }

    /// Remove the level at `price` if its queue is empty.
    ///
    /// Upholds the never-store-an-empty-level invariant after mutation.
    pub fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(Level::is_empty) {
            self.remove_level(price);
        }
    }

    /// Returns an iterator over levels from best to worst price.
    pub fn iter_best_to_worst(&self) -> impl Iterator<Item = (&Price, &Level)> {
        BestToWorstIter {
            inner: if self.side == Side::Buy {
                IterDirection::Reverse(self.levels.iter().rev())
            } else {
                IterDirection::Forward(self.levels.iter())
            },
        }
    }

    /// Returns the total remaining quantity across all levels.
    pub fn total_quantity(&self) -> Quantity {
        self.levels.values().map(|l| l.total_quantity()).sum()
    }

    // === Private helpers ===

    /// Recompute best price after losing the cached one.
    fn recompute_best_price(&mut self) {
        self.best_price = self
            .levels
            .keys()
            .copied()
            .reduce(|a, b| self.side.better_price(a, b));
    }

    /// Update best price after inserting a new level.
    fn update_best_price_after_insert(&mut self, new_price: Price) {
        self.best_price = Some(match self.best_price {
            None => new_price,
            Some(current_best) => self.side.better_price(current_best, new_price),
        });
    }
}

/// Direction wrapper for the iterator.
enum IterDirection<F, R> {
    Forward(F),
    Reverse(R),
}

type BTreeIter<'a> = std::collections::btree_map::Iter<'a, Price, Level>;

/// Iterator that yields levels from best to worst price.
struct BestToWorstIter<'a> {
    inner: IterDirection<BTreeIter<'a>, std::iter::Rev<BTreeIter<'a>>>,
}

impl<'a> Iterator for BestToWorstIter<'a> {
    type Item = (&'a Price, &'a Level);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterDirection::Forward(iter) => iter.next(),
            IterDirection::Reverse(iter) => iter.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Order, OrderId, Symbol};

    fn insert(ladder: &mut Ladder, price: f64, id: u64, qty: Quantity) {
        let price = Price::new(price);
        let order = Order::new_local(
            OrderId(id),
            ladder.side(),
            price,
            qty,
            Symbol::new("TEST"),
            id,
        );
        ladder.get_or_create_level(price).push_back(order);
    }

    // === Bid side (best = highest) ===

    #[test]
    fn new_bids_is_empty() {
        let bids = Ladder::new(Side::Buy);

        assert!(bids.is_empty());
        assert_eq!(bids.level_count(), 0);
        assert_eq!(bids.best_price(), None);
    }

    #[test]
    fn bids_best_is_highest() {
        let mut bids = Ladder::new(Side::Buy);

        insert(&mut bids, 100.0, 1, 100.0);
        assert_eq!(bids.best_price(), Some(Price::new(100.0)));

        insert(&mut bids, 99.0, 2, 100.0);
        assert_eq!(bids.best_price(), Some(Price::new(100.0))); // Still 100

        insert(&mut bids, 101.0, 3, 100.0);
        assert_eq!(bids.best_price(), Some(Price::new(101.0))); // Now 101
    }

    #[test]
    fn bids_remove_best_updates_cache() {
        let mut bids = Ladder::new(Side::Buy);
        insert(&mut bids, 100.0, 1, 100.0);
        insert(&mut bids, 99.0, 2, 100.0);
        insert(&mut bids, 101.0, 3, 100.0);

        bids.remove_level(Price::new(101.0));
        assert_eq!(bids.best_price(), Some(Price::new(100.0)));

        bids.remove_level(Price::new(100.0));
        assert_eq!(bids.best_price(), Some(Price::new(99.0)));

        bids.remove_level(Price::new(99.0));
        assert_eq!(bids.best_price(), None);
    }

    // === Ask side (best = lowest) ===

    #[test]
    fn asks_best_is_lowest() {
        let mut asks = Ladder::new(Side::Sell);

        insert(&mut asks, 100.0, 1, 100.0);
        assert_eq!(asks.best_price(), Some(Price::new(100.0)));

        insert(&mut asks, 101.0, 2, 100.0);
        assert_eq!(asks.best_price(), Some(Price::new(100.0))); // Still 100

        insert(&mut asks, 99.0, 3, 100.0);
        assert_eq!(asks.best_price(), Some(Price::new(99.0))); // Now 99
    }

    // === Level lifecycle ===

    #[test]
    fn remove_level_if_empty_only_removes_empty() {
        let mut bids = Ladder::new(Side::Buy);
        insert(&mut bids, 100.0, 1, 100.0);

        bids.remove_level_if_empty(Price::new(100.0));
        assert_eq!(bids.level_count(), 1);

        bids.get_level_mut(Price::new(100.0)).unwrap().pop_front();
        bids.remove_level_if_empty(Price::new(100.0));
        assert_eq!(bids.level_count(), 0);
        assert_eq!(bids.best_price(), None);
    }

    // === Iteration ===

    #[test]
    fn iter_bids_best_to_worst() {
        let mut bids = Ladder::new(Side::Buy);
        insert(&mut bids, 99.0, 1, 100.0);
        insert(&mut bids, 101.0, 2, 100.0);
        insert(&mut bids, 100.0, 3, 100.0);

        let prices: Vec<_> = bids.iter_best_to_worst().map(|(p, _)| *p).collect();
        assert_eq!(
            prices,
            vec![Price::new(101.0), Price::new(100.0), Price::new(99.0)]
        );
    }

    #[test]
    fn iter_asks_best_to_worst() {
        let mut asks = Ladder::new(Side::Sell);
        insert(&mut asks, 99.0, 1, 100.0);
        insert(&mut asks, 101.0, 2, 100.0);
        insert(&mut asks, 100.0, 3, 100.0);

        let prices: Vec<_> = asks.iter_best_to_worst().map(|(p, _)| *p).collect();
        assert_eq!(
            prices,
            vec![Price::new(99.0), Price::new(100.0), Price::new(101.0)]
        );
    }

    // === Quantities ===

    #[test]
    fn total_quantity() {
        let mut bids = Ladder::new(Side::Buy);
        insert(&mut bids, 100.0, 1, 100.0);
        insert(&mut bids, 100.0, 2, 200.0);
        insert(&mut bids, 99.0, 3, 150.0);

        assert_eq!(bids.total_quantity(), 450.0);
        assert_eq!(bids.level_count(), 2);
    }
}
