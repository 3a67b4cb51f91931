//! Trade records
//!
//! A trade is created once per matched pair during a market-order fill
//! and never mutated or deleted afterwards.

use crate::ids::TradeId;
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable record of one completed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// Global monotonic sequence across the trade log
    pub sequence: u64,
    /// Execution price (the resting level's price)
    pub price: Price,
    /// Size exchanged in this match
    pub quantity: Quantity,
    /// Side of the incoming order that triggered the match
    pub aggressor_side: Side,
    /// Execution timestamp (Unix nanos)
    pub executed_at: i64,
}

impl Trade {
    pub fn new(
        sequence: u64,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id: TradeId::new(),
            sequence,
            price,
            quantity,
            aggressor_side,
            executed_at,
        }
    }

    /// Trade value (price × quantity)
    pub fn trade_value(&self) -> Decimal {
        self.quantity.as_decimal() * self.price.as_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_trade_creation() {
        let trade = Trade::new(
            7,
            Price::from_u64(100),
            Quantity::from_u64(3),
            Side::Bid,
            1_708_123_456_789_000_000,
        );

        assert_eq!(trade.sequence, 7);
        assert_eq!(trade.aggressor_side, Side::Bid);
        assert_eq!(trade.trade_value(), Decimal::from(300));
    }

    #[test]
    fn test_trade_serialization() {
        let trade = Trade::new(
            1,
            Price::from_str("100.5").unwrap(),
            Quantity::from_str("0.25").unwrap(),
            Side::Ask,
            1_708_123_456_789_000_000,
        );

        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deserialized);
    }
}
