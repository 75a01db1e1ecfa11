//! Level: the FIFO order queue at a single price point.
//!
//! Orders are stored by value in arrival order. Feed aggregates sit at the
//! head of the queue (at most one per level); local orders queue behind in
//! time priority.

use std::collections::VecDeque;

use crate::{Order, OrderId, Price, Quantity};

/// A queue of orders at a single price level.
///
/// Arrival order is matching priority within the level. The level must be
/// removed from its ladder the moment the queue becomes empty — an empty
/// level is never stored.
#[derive(Clone, Debug)]
pub struct Level {
    /// The price for all orders in this level
    price: Price,
    /// Orders in arrival order (head = next to fill)
    orders: VecDeque<Order>,
}

impl Level {
    /// Create a new empty level at the given price.
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
        }
    }

    /// Returns the price of this level.
    #[inline]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns true if there are no orders at this level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Returns the number of orders at this level.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Sum of remaining quantities, used for depth reporting.
    ///
    /// Computed on demand: float residue makes a cached running total drift
    /// from the true sum.
    pub fn total_quantity(&self) -> Quantity {
        self.orders.iter().map(|o| o.remaining_quantity).sum()
    }

    /// Returns the order at the front of the queue (next to fill).
    #[inline]
    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Mutable access to the front order.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Add an order at the tail of the queue (loses to everyone resting).
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// Insert an order at the head of the queue.
    ///
    /// Used only for feed-aggregate entries, which conceptually precede any
    /// local order resting at the same price.
    pub fn push_front(&mut self, order: Order) {
        self.orders.push_front(order);
    }

    /// Remove and return the front order.
    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Positional access for lock-step sweeps.
    pub fn get(&self, index: usize) -> Option<&Order> {
        self.orders.get(index)
    }

    /// Mutable positional access.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Order> {
        self.orders.get_mut(index)
    }

    /// Remove the order at the given position.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_at(&mut self, index: usize) -> Order {
        self.orders
            .remove(index)
            .expect("level position out of bounds")
    }

    /// Remove a specific local order by id (for cancellation).
    ///
    /// Linear in the number of orders at this price.
    pub fn remove_by_id(&mut self, order_id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == order_id)?;
        self.orders.remove(pos)
    }

    /// Remove the feed-aggregate entry, if present.
    pub fn remove_external(&mut self) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.is_external())?;
        self.orders.remove(pos)
    }

    /// Returns true if the head of the queue is a feed aggregate.
    pub fn head_is_external(&self) -> bool {
        self.orders.front().is_some_and(|o| o.is_external())
    }

    /// Iterate orders in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
