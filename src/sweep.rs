//! Cross-sweep: virtual matching after external level mutations.
//!
//! A feed update can leave best bid ≥ best ask even though no local
//! submission occurred. The sweep resolves such crosses, but only where
//! local liquidity is involved: a crossing between two feed aggregates
//! already matched inside the exchange and must not be double-counted.

use crate::{Fill, OrderBook, OrderId, Price, Timestamp};

/// Snapshot of one queue entry, copied out before mutation.
#[derive(Clone, Copy)]
struct Entry {
    id: OrderId,
    price: Price,
    timestamp: Timestamp,
    remaining: f64,
    external: bool,
}

impl OrderBook {
    /// Resolve feed-driven crosses against resting local orders.
    ///
    /// Runs until the ladders no longer cross, one side empties, or only a
    /// pure-external standoff remains. Each local-involving pair strictly
    /// consumes quantity, so the sweep is bounded by the total order count.
    pub(crate) fn cross_sweep(&mut self) -> Vec<Fill> {
        let mut fills = Vec::new();

        loop {
            let (Some(bid_price), Some(ask_price)) =
                (self.bids.best_price(), self.asks.best_price())
            else {
                break;
            };
            if bid_price < ask_price {
                break; // Not crossed
            }

            if !self.sweep_best_levels(bid_price, ask_price, &mut fills) {
                break; // Pure-external standoff; nothing local to match
            }
        }

        fills
    }

    /// Walk the two crossed best levels in lock-step arrival order.
    ///
    /// Returns true if the walk consumed quantity or removed a level, i.e.
    /// the outer loop should re-examine the top of book.
    fn sweep_best_levels(
        &mut self,
        bid_price: Price,
        ask_price: Price,
        fills: &mut Vec<Fill>,
    ) -> bool {
        let mut progressed = false;
        let mut i = 0; // Position in the bid queue
        let mut j = 0; // Position in the ask queue

        loop {
            let Some(bid_level) = self.bids.get_level_mut(bid_price) else {
                break;
            };
            let Some(ask_level) = self.asks.get_level_mut(ask_price) else {
                break;
            };
            let (Some(bid), Some(ask)) = (bid_level.get(i), ask_level.get(j)) else {
                break; // One queue exhausted without emptying its level
            };

            let bid = Entry {
                id: bid.id,
                price: bid.price,
                timestamp: bid.timestamp,
                remaining: bid.remaining_quantity,
                external: bid.is_external(),
            };
            let ask = Entry {
                id: ask.id,
                price: ask.price,
                timestamp: ask.timestamp,
                remaining: ask.remaining_quantity,
                external: ask.is_external(),
            };

            if bid.external && ask.external {
                // This crossing already netted inside the exchange; how much
                // of each aggregate survived is unknowable here. Skip the
                // pair without consuming quantity.
                if i + 1 < bid_level.order_count() {
                    i += 1;
                } else if j + 1 < ask_level.order_count() {
                    j += 1;
                } else {
                    break;
                }
                continue;
            }

            let fill_qty = bid.remaining.min(ask.remaining);

            // The feed-driven side is the aggressor; between two locals the
            // later arrival is. Fills execute at the passive side's price.
            let (aggressive, passive) = match (bid.external, ask.external) {
                (true, false) => (bid, ask),
                (false, true) => (ask, bid),
                _ => {
                    if bid.timestamp <= ask.timestamp {
                        (ask, bid)
                    } else {
                        (bid, ask)
                    }
                }
            };

            let bid_consumed = {
                let order = bid_level.get_mut(i).expect("bid position just read");
                order.fill(fill_qty);
                order.is_consumed()
            };
            if bid_consumed {
                let removed = bid_level.remove_at(i);
                if !removed.id.is_external() {
                    self.index.remove(&removed.id);
                }
            }

            let ask_consumed = {
                let order = ask_level.get_mut(j).expect("ask position just read");
                order.fill(fill_qty);
                order.is_consumed()
            };
            if ask_consumed {
                let removed = ask_level.remove_at(j);
                if !removed.id.is_external() {
                    self.index.remove(&removed.id);
                }
            }

            let bid_level_empty = bid_level.is_empty();
            let ask_level_empty = ask_level.is_empty();

            let timestamp = self.next_timestamp();
            tracing::debug!(
                aggressor = %aggressive.id,
                passive = %passive.id,
                price = passive.price.value(),
                quantity = fill_qty,
                "virtual match"
            );
            fills.push(Fill::new(
                passive.price,
                fill_qty,
                aggressive.id,
                passive.id,
                timestamp,
            ));
            progressed = true;

            if bid_level_empty {
                self.bids.remove_level(bid_price);
            }
            if ask_level_empty {
                self.asks.remove_level(ask_price);
            }
            if bid_level_empty || ask_level_empty {
                break; // Outer loop re-reads the top of book
            }
        }

        progressed
    }
}
