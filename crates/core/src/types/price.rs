//! Type-safe price representation using decimal arithmetic.
//!
//! The upstream API reports prices as plain JSON numbers in the store
//! currency (Egyptian pounds). `Decimal` keeps the arithmetic exact; display
//! formatting appends the currency suffix the way the storefront renders it.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The total for `quantity` units at this unit price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} EGP", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_is_unit_price_times_quantity() {
        let unit = Price::from(1299u32);
        assert_eq!(unit.times(3), Price::from(3897u32));
        assert_eq!(unit * 1, unit);
    }

    #[test]
    fn display_appends_currency() {
        assert_eq!(Price::from(549u32).to_string(), "549 EGP");
    }

    #[test]
    fn deserializes_from_json_number() {
        let price: Price = serde_json::from_str("1299").expect("deserialize");
        assert_eq!(price, Price::from(1299u32));
    }

    #[test]
    fn sums_to_subtotal() {
        let subtotal: Price = [Price::from(10u32), Price::from(20u32)].into_iter().sum();
        assert_eq!(subtotal, Price::from(30u32));
    }
}
