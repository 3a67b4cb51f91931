//! Types library for the limit order book
//!
//! Core type definitions shared by the matching engine and its callers.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, OwnerId, TradeId) and the
//!   monotonic order-id generator
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Order and side types
//! - `trade`: Trade record types
//! - `errors`: Error taxonomy

pub mod errors;
pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
}
