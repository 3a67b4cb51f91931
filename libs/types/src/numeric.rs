//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic. Binary floating point
//! drifts under repeated partial fills, which would break the exact
//! equality between a level's total volume and the sum of its resting
//! sizes; Decimal keeps those sums exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::errors::OrderBookError;

/// A strictly positive price
///
/// Ordered, so it can key the per-side `BTreeMap` price indexes directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, rejecting zero and negative values
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create from a whole number of quote units
    ///
    /// # Panics
    /// Panics if `value` is zero.
    pub fn from_u64(value: u64) -> Self {
        Self::try_new(Decimal::from(value)).expect("price must be positive")
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = OrderBookError;

    /// Parse from a decimal string, e.g. `"10000.50"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)
            .map_err(|_| OrderBookError::InvalidPrice(format!("not a decimal: {s}")))?;
        Self::try_new(value)
            .ok_or_else(|| OrderBookError::InvalidPrice(format!("must be positive: {s}")))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative order size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity, rejecting negative values
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The zero quantity
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from a whole number of units
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtract, returning `None` if the result would be negative
    pub fn checked_sub(&self, other: Quantity) -> Option<Quantity> {
        Self::try_new(self.0 - other.0)
    }

    /// The smaller of two quantities
    pub fn min(self, other: Quantity) -> Quantity {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

impl FromStr for Quantity {
    type Err = OrderBookError;

    /// Parse from a decimal string, e.g. `"1.5"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)
            .map_err(|_| OrderBookError::InvalidQuantity(format!("not a decimal: {s}")))?;
        Self::try_new(value)
            .ok_or_else(|| OrderBookError::InvalidQuantity(format!("must not be negative: {s}")))
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rejects_non_positive() {
        assert!(Price::try_new(Decimal::ZERO).is_none());
        assert!(Price::try_new(Decimal::from(-1)).is_none());
        assert!(Price::try_new(Decimal::ONE).is_some());
    }

    #[test]
    fn test_price_ordering() {
        let low = Price::from_u64(100);
        let high = Price::from_u64(101);
        assert!(low < high);
    }

    #[test]
    fn test_price_from_str() {
        let price = Price::from_str("10000.50").unwrap();
        assert_eq!(price.as_decimal(), Decimal::from_str("10000.50").unwrap());
        assert!(matches!(
            Price::from_str("-5"),
            Err(OrderBookError::InvalidPrice(_))
        ));
        assert!(matches!(
            Price::from_str("garbage"),
            Err(OrderBookError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_quantity_from_str_rejects_negative() {
        assert_eq!(Quantity::from_str("0"), Ok(Quantity::zero()));
        assert!(matches!(
            Quantity::from_str("-0.5"),
            Err(OrderBookError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_quantity_rejects_negative() {
        assert!(Quantity::try_new(Decimal::from(-1)).is_none());
        assert!(Quantity::try_new(Decimal::ZERO).is_some());
    }

    #[test]
    fn test_quantity_checked_sub() {
        let five = Quantity::from_u64(5);
        let three = Quantity::from_u64(3);
        assert_eq!(five.checked_sub(three), Some(Quantity::from_u64(2)));
        assert_eq!(three.checked_sub(five), None);
    }

    #[test]
    fn test_quantity_min() {
        let five = Quantity::from_u64(5);
        let three = Quantity::from_u64(3);
        assert_eq!(five.min(three), three);
        assert_eq!(three.min(five), three);
    }

    #[test]
    fn test_quantity_add_exact() {
        // 0.1 + 0.2 is exact in decimal, unlike f64
        let a = Quantity::from_str("0.1").unwrap();
        let b = Quantity::from_str("0.2").unwrap();
        assert_eq!(a + b, Quantity::from_str("0.3").unwrap());
    }

    #[test]
    fn test_quantity_serialization() {
        let qty = Quantity::from_str("1.5").unwrap();
        let json = serde_json::to_string(&qty).unwrap();
        let deserialized: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(qty, deserialized);
    }
}
