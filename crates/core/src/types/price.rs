//! Type-safe price representation using decimal arithmetic.
//!
//! All storefront prices are in the store currency (USD), so a [`Price`] is
//! just a non-negative [`Decimal`]. Decimal arithmetic keeps currency values
//! exact: `0.1 + 0.2` is `0.3`, and a half cent always rounds up.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// Round a currency amount to two decimal places, half away from zero.
///
/// Prices are never negative, so this is round-half-up: `123.43456` becomes
/// `123.43` and `1.005` becomes `1.01`.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u64) -> Self {
        Self(Decimal::from_i128_with_scale(i128::from(cents), 2))
    }

    /// Create a price from a whole number of dollars.
    #[must_use]
    pub fn from_dollars(dollars: u32) -> Self {
        Self(Decimal::from(dollars))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a rate such as a tax rate.
    ///
    /// Negative rates clamp the result to zero so the price stays valid.
    #[must_use]
    pub fn times_rate(self, rate: Decimal) -> Self {
        Self(self.0.saturating_mul(rate).max(Decimal::ZERO))
    }

    /// This price rounded to cents (see [`round2`]).
    #[must_use]
    pub fn round2(self) -> Self {
        Self(round2(self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::str::FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

// Arithmetic saturates at `Decimal::MAX` instead of panicking on overflow.

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
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

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_round2_truncates_below_half_cent() {
        assert_eq!(round2(dec("123.43456")), dec("123.43"));
    }

    #[test]
    fn test_round2_rounds_half_cent_up() {
        assert_eq!(round2(dec("1.005")), dec("1.01"));
        assert_eq!(round2(dec("2.675")), dec("2.68"));
        assert_eq!(round2(dec("0.125")), dec("0.13"));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), dec("19.99"));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_dollars(180).to_string(), "$180.00");
        assert_eq!(Price::from_cents(705).to_string(), "$7.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!("$12.50".parse::<Price>(), Ok(Price::from_cents(1250)));
        assert!("abc".parse::<Price>().is_err());
        assert!("-3".parse::<Price>().is_err());
    }

    #[test]
    fn test_times_rate() {
        let rate = dec("0.15");
        assert_eq!(Price::from_dollars(180).times_rate(rate), Price::from_dollars(27));
        assert_eq!(Price::from_dollars(10).times_rate(dec("-1")), Price::ZERO);
    }

    #[test]
    fn test_arithmetic() {
        let total: Price = [Price::from_dollars(50) * 2, Price::from_dollars(80)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_dollars(180));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX).unwrap_or_default();

        assert_eq!((max * 2).amount(), Decimal::MAX);
        assert_eq!((max + Price::from_dollars(1)).amount(), Decimal::MAX);
        assert_eq!(max.times_rate(dec("1.5")).amount(), Decimal::MAX);
    }

    #[test]
    fn test_deserialize_accepts_numbers_and_strings() {
        let from_number: Result<Price, _> = serde_json::from_str("70");
        let from_string: Result<Price, _> = serde_json::from_str("\"70.5\"");
        let negative: Result<Price, _> = serde_json::from_str("-1");

        assert_eq!(from_number.ok(), Some(Price::from_dollars(70)));
        assert_eq!(from_string.ok(), Some(Price::from_cents(7050)));
        assert!(negative.is_err());
    }
}
