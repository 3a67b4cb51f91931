//! Error taxonomy for the order book
//!
//! All variants are recoverable, caller-visible conditions. A failed
//! operation leaves the book exactly as it was before the call.

use crate::ids::OrderId;
use crate::numeric::Quantity;
use thiserror::Error;

/// Errors returned by book operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderBookError {
    /// A market order asked for more size than the opposite side holds.
    /// Checked before any fill is attempted; the book is not touched.
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity {
        requested: Quantity,
        available: Quantity,
    },

    /// Cancellation referenced an id not in the book (already filled,
    /// already cancelled, or never placed)
    #[error("order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// Order size was zero or otherwise unusable
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Order price was malformed
    #[error("invalid price: {0}")]
    InvalidPrice(String),
}
