//! Single-instrument limit order book with external feed reconciliation.
//!
//! Two order flows share one pair of price ladders:
//!
//! - **Local orders** submitted by the application, matched under
//!   price-time priority and resting on the book when not fully filled.
//! - **External depth** from an exchange feed, kept as one synthetic
//!   aggregate entry per price level carrying [`OrderId::EXTERNAL`].
//!
//! When a feed update crosses the book against local resting liquidity,
//! the cross-sweep emits virtual fills, telling the caller what would have
//! executed on the exchange. Crosses between two external aggregates are
//! left alone; the exchange has already netted those.
//!
//! # Local matching
//!
//! ```
//! use crossbook::{OrderBook, OrderId, Price, RestingState, Side, Symbol};
//!
//! let mut book = OrderBook::new(Symbol::new("BTC-USD"));
//!
//! // A sell rests, then is cancelled
//! book.submit(OrderId(5), Side::Sell, Price::new(12.0), 10.0).unwrap();
//! let cancel = book.cancel(OrderId(5));
//! assert!(cancel.found);
//! assert_eq!(book.best_ask(), None);
//!
//! // An aggressive sell executes at the resting bid's price
//! book.submit(OrderId(1), Side::Buy, Price::new(10.0), 100.0).unwrap();
//! let result = book.submit(OrderId(3), Side::Sell, Price::new(9.0), 100.0).unwrap();
//! assert_eq!(result.resting_state, RestingState::FullyFilled);
//! assert_eq!(result.fills[0].price, Price::new(10.0));
//! assert_eq!(result.fills[0].quantity, 100.0);
//! ```
//!
//! # Feed reconciliation and virtual fills
//!
//! ```
//! use crossbook::{
//!     FeedEvent, FeedReconciler, OrderBook, OrderId, Price, Side, Symbol,
//! };
//!
//! let mut book = OrderBook::new(Symbol::new("BTC-USD"));
//! let mut feed = FeedReconciler::new();
//!
//! feed.apply(&mut book, &FeedEvent::Snapshot {
//!     seq_id: 1,
//!     bids: vec![(Price::new(100.0), 5.0)],
//!     asks: vec![],
//! });
//! book.submit(OrderId(1), Side::Buy, Price::new(100.0), 3.0).unwrap();
//!
//! // The feed reports an ask at 100: crossed against our local bid
//! let result = feed.apply(&mut book, &FeedEvent::Incremental {
//!     seq_id: 2,
//!     prev_seq_id: 1,
//!     bids: vec![],
//!     asks: vec![(Price::new(100.0), 5.0)],
//! });
//!
//! assert_eq!(result.fills.len(), 1);
//! assert_eq!(result.fills[0].quantity, 3.0);
//! assert_eq!(result.fills[0].passive_order_id, OrderId(1));
//! assert_eq!(result.fills[0].aggressive_order_id, OrderId::EXTERNAL);
//! // The external ask keeps the unmatched remainder
//! let level = book.asks().get_level(Price::new(100.0)).unwrap();
//! assert_eq!(level.total_quantity(), 2.0);
//! ```
//!
//! For sharing one book between a feed thread and a trading thread, see
//! [`SharedBook`].

mod book;
mod error;
mod feed;
mod fill;
mod ladder;
mod level;
mod matching;
mod order;
mod result;
mod shared;
mod side;
mod snapshot;
mod sweep;
mod types;

pub use book::OrderBook;
pub use error::SubmitError;
pub use feed::{ContinuityFault, FeedApplyResult, FeedEvent, FeedLevel, FeedReconciler, SyncState};
pub use fill::Fill;
pub use ladder::Ladder;
pub use level::Level;
pub use order::{Order, Origin};
pub use result::{CancelResult, RestingState, SubmitResult};
pub use shared::SharedBook;
pub use side::Side;
pub use snapshot::{DepthLevel, DepthSnapshot};
pub use types::{OrderId, Price, Quantity, QTY_EPSILON, SeqId, Symbol, Timestamp, is_negligible};
