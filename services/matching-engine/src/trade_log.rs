//! Append-only log of completed trades
//!
//! Records are created once per match during a market-order fill and
//! never mutated or deleted. The log reports the current price (the
//! last execution) and running volume totals.

use rust_decimal::Decimal;

use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

/// In-memory append-only trade history
#[derive(Debug, Default)]
pub struct TradeLog {
    trades: Vec<Trade>,
    sequence: u64,
}

impl TradeLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            trades: Vec::new(),
            sequence: 0,
        }
    }

    /// Append one trade, assigning the next monotonic sequence number
    pub fn record(
        &mut self,
        price: Price,
        quantity: Quantity,
        aggressor_side: Side,
        executed_at: i64,
    ) -> Trade {
        self.sequence += 1;
        let trade = Trade::new(self.sequence, price, quantity, aggressor_side, executed_at);
        self.trades.push(trade.clone());
        trade
    }

    /// All trades in execution order
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Price of the most recent execution
    pub fn last_price(&self) -> Option<Price> {
        self.trades.last().map(|t| t.price)
    }

    /// Total size exchanged across all trades
    pub fn volume_traded(&self) -> Quantity {
        self.trades
            .iter()
            .fold(Quantity::zero(), |acc, t| acc + t.quantity)
    }

    /// Total value exchanged (sum of price × quantity)
    pub fn notional_traded(&self) -> Decimal {
        self.trades.iter().map(|t| t.trade_value()).sum()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_assigns_monotonic_sequence() {
        let mut log = TradeLog::new();
        let a = log.record(Price::from_u64(100), Quantity::from_u64(3), Side::Bid, 1);
        let b = log.record(Price::from_u64(101), Quantity::from_u64(2), Side::Bid, 2);

        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_last_price_tracks_latest_execution() {
        let mut log = TradeLog::new();
        assert_eq!(log.last_price(), None);

        log.record(Price::from_u64(100), Quantity::from_u64(3), Side::Bid, 1);
        log.record(Price::from_u64(101), Quantity::from_u64(2), Side::Bid, 2);
        assert_eq!(log.last_price(), Some(Price::from_u64(101)));
    }

    #[test]
    fn test_volume_and_notional_totals() {
        let mut log = TradeLog::new();
        log.record(Price::from_u64(100), Quantity::from_u64(3), Side::Bid, 1);
        log.record(Price::from_u64(101), Quantity::from_u64(2), Side::Ask, 2);

        assert_eq!(log.volume_traded(), Quantity::from_u64(5));
        assert_eq!(log.notional_traded(), Decimal::from(502));
    }
}
