//! # Money Module
//!
//! Provides the `Money` type for product prices.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer hundredths                                       │
//! │    "1190.50" is parsed digit by digit into 119050                      │
//! │    and stored in an INTEGER column; no float ever touches a price      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Prices travel as decimal strings with two fraction digits (`"1190.00"`),
//! the shape the client pages already `parseFloat`. Incoming prices may be
//! JSON numbers or numeric strings.
//!
//! ## Usage
//! ```rust
//! use maestro_core::money::Money;
//!
//! let net: Money = "1000".parse().unwrap();
//! let gross = Money::from_cents(119_000);
//!
//! assert_eq!(net.cents(), 100_000);
//! assert_eq!(gross.to_string(), "1190.00");
//! assert_eq!(gross.format_clp(), "$ 1.190");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in hundredths of the currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: display and parsing handle negative amounts; the
///   price rule rejects them separately with [`Money::parse_non_negative`]
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

/// Errors produced when parsing a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    /// Not a decimal number at all.
    #[error("not a number")]
    NotNumeric,

    /// Below zero, reported by [`Money::parse_non_negative`].
    #[error("must not be negative")]
    Negative,

    /// Does not fit in the storage type.
    #[error("amount is too large")]
    Overflow,
}

impl Money {
    /// Creates a Money value from hundredths.
    ///
    /// ## Example
    /// ```rust
    /// use maestro_core::money::Money;
    ///
    /// let price = Money::from_cents(119_050); // 1190.50
    /// assert_eq!(price.cents(), 119_050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Returns the value in hundredths.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the fraction portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Formats the amount as Chilean pesos for display.
    ///
    /// ## Rules
    /// - No decimals: fractions round half away from zero
    /// - `.` as thousands separator
    /// - `$ ` prefix, `-` before the symbol for negatives
    ///
    /// ## Example
    /// ```rust
    /// use maestro_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(1_234_567).format_clp(), "$ 1.234.567");
    /// assert_eq!(Money::from_cents(99_950).format_clp(), "$ 1.000");
    /// assert_eq!(Money::zero().format_clp(), "$ 0");
    /// ```
    pub fn format_clp(&self) -> String {
        let rounded = (self.0.unsigned_abs() + 50) / 100;
        let digits = rounded.to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 && rounded > 0 { "-" } else { "" };
        format!("{}$ {}", sign, grouped)
    }

    /// Parses a decimal string such as `"1190"`, `"1190.5"`, `"-3.25"` or
    /// `"1.19e3"`.
    ///
    /// Amounts round half away from zero to the hundredth, the way a
    /// two-decimal column stores them: `"1.555"` and `"1.555e0"` are both
    /// `1.56`. Rounding works on the digits, never through a float.
    pub fn parse_decimal(input: &str) -> Result<Money, MoneyParseError> {
        let (negative, cents) = parse_rounded(input)?;
        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Like [`Money::parse_decimal`], failing with
    /// [`MoneyParseError::Negative`] for any amount below zero, including
    /// ones that would round to zero (`"-0.004"`).
    pub fn parse_non_negative(input: &str) -> Result<Money, MoneyParseError> {
        match parse_rounded(input)? {
            (true, _) => Err(MoneyParseError::Negative),
            (false, cents) => Ok(Money(cents)),
        }
    }
}

/// Exponents are clamped here; anything beyond already overflows or
/// rounds to zero.
const MAX_EXPONENT: i64 = 1_000;

/// Splits a decimal into its sign and its magnitude in hundredths.
///
/// The sign is `true` only for values strictly below zero.
fn parse_rounded(input: &str) -> Result<(bool, i64), MoneyParseError> {
    let s = input.trim();
    let (negative, body) = match s.as_bytes().first() {
        None => return Err(MoneyParseError::NotNumeric),
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        Some(_) => (false, s),
    };

    let (mantissa, exponent) = match body.split_once(['e', 'E']) {
        Some((m, e)) => (m, parse_exponent(e)?),
        None => (body, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty())
        || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(MoneyParseError::NotNumeric);
    }

    // value = 0.<digits> * 10^point
    let all_digits = format!("{whole}{fraction}");
    let digits = all_digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok((false, 0));
    }
    let point = whole.len() as i64 + exponent - (all_digits.len() - digits.len()) as i64;

    // Digits that land left of the hundredths position.
    let kept = point + 2;
    if kept < 0 {
        return Ok((negative, 0));
    }
    if kept > 19 {
        return Err(MoneyParseError::Overflow);
    }
    let kept = kept as usize;

    let head = &digits[..kept.min(digits.len())];
    let mut cents: i64 = if head.is_empty() {
        0
    } else {
        head.parse().map_err(|_| MoneyParseError::Overflow)?
    };
    for _ in head.len()..kept {
        cents = cents.checked_mul(10).ok_or(MoneyParseError::Overflow)?;
    }
    if digits.as_bytes().get(kept).is_some_and(|d| *d >= b'5') {
        cents = cents.checked_add(1).ok_or(MoneyParseError::Overflow)?;
    }

    Ok((negative, cents))
}

fn parse_exponent(e: &str) -> Result<i64, MoneyParseError> {
    let (negative, digits) = match e.as_bytes().first() {
        Some(b'-') => (true, &e[1..]),
        Some(b'+') => (false, &e[1..]),
        _ => (false, e),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MoneyParseError::NotNumeric);
    }
    let magnitude = digits
        .parse::<i64>()
        .map_or(MAX_EXPONENT, |v| v.min(MAX_EXPONENT));
    Ok(if negative { -magnitude } else { magnitude })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Canonical decimal rendering, two fraction digits: `1190.00`, `-3.25`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.units().abs(),
            self.cents_part()
        )
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a decimal amount as a number or string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(100)
                    .map(Money)
                    .ok_or_else(|| E::custom(MoneyParseError::Overflow))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .map_err(|_| E::custom(MoneyParseError::Overflow))
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Money::parse_decimal(&v.to_string()).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Money::parse_decimal(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(119_050);
        assert_eq!(money.cents(), 119_050);
        assert_eq!(money.units(), 1190);
        assert_eq!(money.cents_part(), 50);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("1000").unwrap().cents(), 100_000);
        assert_eq!(Money::parse_decimal("1190.5").unwrap().cents(), 119_050);
        assert_eq!(Money::parse_decimal(" 0.99 ").unwrap().cents(), 99);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("10.500").unwrap().cents(), 1050);
        assert_eq!(Money::parse_decimal("-3.25").unwrap().cents(), -325);
        assert_eq!(Money::parse_decimal("1e3").unwrap().cents(), 100_000);
        assert_eq!(Money::parse_decimal("1.19E+3").unwrap().cents(), 119_000);
        assert_eq!(Money::parse_decimal("5e-1").unwrap().cents(), 50);
    }

    #[test]
    fn test_rounding_is_the_same_in_both_notations() {
        for (plain, exponent, cents) in [
            ("1.555", "1.555e0", 156),
            ("1.554", "155.4e-2", 155),
            ("0.005", "5e-3", 1),
            ("0.0049", "4.9e-3", 0),
            ("-1.555", "-1555e-3", -156),
        ] {
            assert_eq!(Money::parse_decimal(plain).unwrap().cents(), cents, "{plain}");
            assert_eq!(Money::parse_decimal(exponent).unwrap().cents(), cents, "{exponent}");
        }
        assert_eq!(Money::parse_decimal("1e-5000").unwrap().cents(), 0);
        assert_eq!(Money::parse_decimal("0.30000000000000004").unwrap().cents(), 30);
    }

    #[test]
    fn test_parse_non_negative() {
        assert_eq!(Money::parse_non_negative("0").unwrap().cents(), 0);
        assert_eq!(Money::parse_non_negative("-0.00").unwrap().cents(), 0);
        assert_eq!(Money::parse_non_negative("12.345").unwrap().cents(), 1235);
        assert_eq!(Money::parse_non_negative("-1"), Err(MoneyParseError::Negative));
        assert_eq!(Money::parse_non_negative("-0.004"), Err(MoneyParseError::Negative));
        assert_eq!(Money::parse_non_negative("-4e-3"), Err(MoneyParseError::Negative));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(Money::parse_decimal(""), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("abc"), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("1.2.3"), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("."), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("1,5"), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("1e"), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("e3"), Err(MoneyParseError::NotNumeric));
        assert_eq!(Money::parse_decimal("1e3.5"), Err(MoneyParseError::NotNumeric));
        assert_eq!(
            Money::parse_decimal("99999999999999999999"),
            Err(MoneyParseError::Overflow)
        );
        assert_eq!(Money::parse_decimal("1e400"), Err(MoneyParseError::Overflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(119_000).to_string(), "1190.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_format_clp() {
        assert_eq!(Money::from_units(1190).format_clp(), "$ 1.190");
        assert_eq!(Money::from_units(100).format_clp(), "$ 100");
        assert_eq!(Money::from_units(1_000_000).format_clp(), "$ 1.000.000");
        assert_eq!(Money::from_cents(149).format_clp(), "$ 1");
        assert_eq!(Money::from_cents(150).format_clp(), "$ 2");
        assert_eq!(Money::from_units(-2500).format_clp(), "-$ 2.500");
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&Money::from_units(1190)).unwrap();
        assert_eq!(json, "\"1190.00\"");

        let from_str: Money = serde_json::from_str("\"1190.50\"").unwrap();
        assert_eq!(from_str.cents(), 119_050);
        let from_int: Money = serde_json::from_str("1000").unwrap();
        assert_eq!(from_int.cents(), 100_000);
        let from_float: Money = serde_json::from_str("12.5").unwrap();
        assert_eq!(from_float.cents(), 1250);
        let js_sum: Money = serde_json::from_value(serde_json::json!(0.1 + 0.2)).unwrap();
        assert_eq!(js_sum.cents(), 30);
    }
}
