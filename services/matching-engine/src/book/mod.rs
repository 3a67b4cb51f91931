//! Order book sides
//!
//! One structure per side, each an incrementally maintained ordered
//! index (`BTreeMap` keyed by price) over FIFO price levels. The bid
//! side serves its highest price first, the ask side its lowest.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{IncomingOrder, Match, PriceLevel};

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};

/// One price level as seen from outside the book (for display/reporting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDepth {
    pub price: Price,
    pub volume: Quantity,
    pub order_count: usize,
}
