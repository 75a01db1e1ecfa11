//! Matching engine: price-time priority sweep for incoming local orders.
//!
//! 1. Better prices match first (higher bids, lower asks)
//! 2. At the same price, earlier arrivals match first (FIFO)
//! 3. Fills execute at the resting side's price (price improvement for the
//!    aggressor)
//!
//! Feed-aggregate entries are ordinary resting liquidity here: a local
//! order sweeping them produces fills against [`OrderId::EXTERNAL`].

use crate::{Fill, Order, OrderBook, OrderId, Price, Side};

impl OrderBook {
    /// Match an incoming order against the opposite ladder.
    ///
    /// Mutates both the incoming order and resting orders; fully consumed
    /// resting orders leave their level and the index. The incoming order
    /// is NOT added to the book — the caller rests any remainder.
    pub(crate) fn match_incoming(&mut self, incoming: &mut Order) -> Vec<Fill> {
        let mut fills = Vec::new();

        while !incoming.is_consumed() {
            let opposite = self.side(incoming.side.opposite());
            let Some(best_price) = opposite.best_price() else {
                break; // No liquidity
            };
            if !incoming.side.crosses(incoming.price, best_price) {
                break; // Limit does not permit this level
            }

            self.match_at_price(incoming, best_price, &mut fills);
        }

        fills
    }

    /// Fill against all orders at one price level, in arrival order.
    fn match_at_price(&mut self, incoming: &mut Order, price: Price, fills: &mut Vec<Fill>) {
        loop {
            let opposite = self.opposite_side_mut(incoming.side);
            let Some(level) = opposite.get_level_mut(price) else {
                break; // Level fully consumed
            };
            let Some(resting) = level.front_mut() else {
                break;
            };

            let fill_qty = incoming.remaining_quantity.min(resting.remaining_quantity);
            let passive_id = resting.id;

            resting.fill(fill_qty);
            let resting_consumed = resting.is_consumed();
            if resting_consumed {
                level.pop_front();
            }
            let level_empty = level.is_empty();

            if resting_consumed && !passive_id.is_external() {
                self.index.remove(&passive_id);
            }
            if level_empty {
                self.opposite_side_mut(incoming.side).remove_level(price);
            }

            incoming.fill(fill_qty);
            let timestamp = self.next_timestamp();
            tracing::debug!(
                aggressor = %incoming.id,
                passive = %passive_id,
                price = price.value(),
                quantity = fill_qty,
                "match"
            );
            fills.push(Fill::new(price, fill_qty, incoming.id, passive_id, timestamp));

            if incoming.is_consumed() || level_empty {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Price, Quantity, RestingState, Symbol};

    fn book() -> OrderBook {
        OrderBook::new(Symbol::new("TEST"))
    }

    fn book_with_asks(asks: &[(u64, f64, Quantity)]) -> OrderBook {
        let mut book = book();
        for &(id, price, qty) in asks {
            book.submit(OrderId(id), Side::Sell, Price::new(price), qty)
                .unwrap();
        }
        book
    }

    fn book_with_bids(bids: &[(u64, f64, Quantity)]) -> OrderBook {
        let mut book = book();
        for &(id, price, qty) in bids {
            book.submit(OrderId(id), Side::Buy, Price::new(price), qty)
                .unwrap();
        }
        book
    }

    // === No match ===

    #[test]
    fn no_match_empty_book() {
        let mut book = book();

        let result = book
            .submit(OrderId(1), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert!(result.fills.is_empty());
        assert_eq!(result.resting_state, RestingState::FullyResting);
        assert_eq!(result.resting_quantity, 100.0);
    }

    #[test]
    fn no_match_prices_do_not_cross() {
        let mut book = book_with_asks(&[(1, 101.0, 100.0)]);

        let result = book
            .submit(OrderId(2), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert!(result.fills.is_empty());
        // Ask still on book, bid rests
        assert_eq!(book.best_ask(), Some(Price::new(101.0)));
        assert_eq!(book.best_bid(), Some(Price::new(100.0)));
    }

    // === Full and partial fills ===

    #[test]
    fn full_fill_exact_quantity() {
        let mut book = book_with_asks(&[(1, 100.0, 100.0)]);

        let result = book
            .submit(OrderId(2), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.resting_state, RestingState::FullyFilled);
        assert_eq!(result.filled_quantity, 100.0);

        let fill = &result.fills[0];
        assert_eq!(fill.price, Price::new(100.0));
        assert_eq!(fill.quantity, 100.0);
        assert_eq!(fill.aggressive_order_id, OrderId(2));
        assert_eq!(fill.passive_order_id, OrderId(1));

        // Both gone from the book
        assert_eq!(book.best_ask(), None);
        assert!(!book.contains_order(OrderId(1)));
        assert!(!book.contains_order(OrderId(2)));
    }

    #[test]
    fn partial_fill_remainder_rests() {
        let mut book = book_with_asks(&[(1, 100.0, 50.0)]);

        let result = book
            .submit(OrderId(2), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert_eq!(result.resting_state, RestingState::PartiallyResting);
        assert_eq!(result.filled_quantity, 50.0);
        assert_eq!(result.resting_quantity, 50.0);

        // Remainder rests on the bid side, ask fully consumed
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.best_bid(), Some(Price::new(100.0)));
        assert!(book.contains_order(OrderId(2)));
    }

    #[test]
    fn resting_order_partially_consumed_stays() {
        let mut book = book_with_asks(&[(1, 100.0, 200.0)]);

        let result = book
            .submit(OrderId(2), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert_eq!(result.resting_state, RestingState::FullyFilled);
        assert_eq!(book.best_ask(), Some(Price::new(100.0)));
        let resting = book.get_order(OrderId(1)).unwrap();
        assert_eq!(resting.remaining_quantity, 100.0);
        assert_eq!(resting.filled_quantity, 100.0);
    }

    // === Priority ===

    #[test]
    fn fifo_within_level() {
        let mut book = book_with_asks(&[(1, 100.0, 30.0), (2, 100.0, 40.0), (3, 100.0, 50.0)]);

        let result = book
            .submit(OrderId(4), Side::Buy, Price::new(100.0), 100.0)
            .unwrap();

        assert_eq!(result.fills.len(), 3);
        assert_eq!(result.fills[0].passive_order_id, OrderId(1));
        assert_eq!(result.fills[0].quantity, 30.0);
        assert_eq!(result.fills[1].passive_order_id, OrderId(2));
        assert_eq!(result.fills[1].quantity, 40.0);
        assert_eq!(result.fills[2].passive_order_id, OrderId(3));
        assert_eq!(result.fills[2].quantity, 30.0); // Partial

        assert_eq!(book.get_order(OrderId(3)).unwrap().remaining_quantity, 20.0);
    }

    #[test]
    fn price_priority_buy_sweeps_asks() {
        let mut book = book_with_asks(&[(1, 100.0, 50.0), (2, 101.0, 50.0), (3, 102.0, 50.0)]);

        let result = book
            .submit(OrderId(4), Side::Buy, Price::new(102.0), 120.0)
            .unwrap();

        assert_eq!(result.fills.len(), 3);
        assert_eq!(result.fills[0].price, Price::new(100.0));
        assert_eq!(result.fills[1].price, Price::new(101.0));
        assert_eq!(result.fills[2].price, Price::new(102.0));
        assert_eq!(result.fills[2].quantity, 20.0);
        assert_eq!(result.resting_state, RestingState::FullyFilled);

        assert_eq!(book.asks().total_quantity(), 30.0);
    }

    #[test]
    fn price_priority_sell_sweeps_bids() {
        let mut book = book_with_bids(&[(1, 100.0, 50.0), (2, 99.0, 50.0), (3, 98.0, 50.0)]);

        let result = book
            .submit(OrderId(4), Side::Sell, Price::new(98.0), 120.0)
            .unwrap();

        assert_eq!(result.fills.len(), 3);
        assert_eq!(result.fills[0].price, Price::new(100.0));
        assert_eq!(result.fills[1].price, Price::new(99.0));
        assert_eq!(result.fills[2].price, Price::new(98.0));
    }

    #[test]
    fn maker_price_wins() {
        let mut book = book_with_bids(&[(1, 10.0, 100.0)]);

        let result = book
            .submit(OrderId(3), Side::Sell, Price::new(9.0), 100.0)
            .unwrap();

        assert_eq!(result.fills.len(), 1);
        let fill = &result.fills[0];
        assert_eq!(fill.passive_order_id, OrderId(1));
        assert_eq!(fill.aggressive_order_id, OrderId(3));
        assert_eq!(fill.price, Price::new(10.0));
        assert_eq!(fill.quantity, 100.0);

        assert_eq!(book.best_bid(), None);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.open_order_count(), 0);
    }

    // === External aggregates as resting liquidity ===

    #[test]
    fn local_order_sweeps_feed_liquidity() {
        let mut book = book();
        book.apply_external_level_update(Side::Sell, Price::new(100.0), 5.0);

        let result = book
            .submit(OrderId(1), Side::Buy, Price::new(100.0), 3.0)
            .unwrap();

        assert_eq!(result.fills.len(), 1);
        assert_eq!(result.fills[0].passive_order_id, OrderId::EXTERNAL);
        assert!(result.fills[0].involves_external());
        assert_eq!(result.resting_state, RestingState::FullyFilled);

        // Aggregate reduced in place
        let level = book.asks().get_level(Price::new(100.0)).unwrap();
        assert_eq!(level.total_quantity(), 2.0);
    }

    #[test]
    fn conservation_of_quantity() {
        let mut book = book_with_asks(&[(1, 100.0, 30.0), (2, 101.0, 30.0)]);

        let result = book
            .submit(OrderId(3), Side::Buy, Price::new(101.0), 100.0)
            .unwrap();

        let filled: Quantity = result.fills.iter().map(|f| f.quantity).sum();
        assert_eq!(filled + result.resting_quantity, 100.0);
        assert_eq!(result.filled_quantity, filled);
    }

    #[test]
    fn match_clears_multiple_levels() {
        let mut book = book_with_asks(&[(1, 100.0, 10.0), (2, 101.0, 10.0)]);

        book.submit(OrderId(3), Side::Buy, Price::new(101.0), 20.0)
            .unwrap();

        assert_eq!(book.asks().level_count(), 0);
        assert_eq!(book.best_ask(), None);
    }

    #[test]
    fn fill_timestamps_are_sequential() {
        let mut book = book_with_asks(&[(1, 100.0, 30.0), (2, 100.0, 30.0)]);

        let result = book
            .submit(OrderId(3), Side::Buy, Price::new(100.0), 60.0)
            .unwrap();

        assert!(result.fills[0].timestamp < result.fills[1].timestamp);
    }
}
