//! # Money Module
//!
//! Provides the `Money` type for prices, subtotals and payments.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A draft total computed in floats drifts:                               │
//! │    3 × 0.1 = 0.30000000000000004                                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (centavos, cents, ...)               │
//! │    3 × 10 = 30 minor units, exactly, every time                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The currency itself is not part of the value: a draft carries one
//! currency code for all of its amounts.
//!
//! ## Range
//! Operators saturate at [`Money::MAX`] / [`Money::MIN`] and never panic.
//! Code that must tell an overflow apart from a real amount uses the
//! `checked_*` methods, which return `None` instead.
//!
//! ## Usage
//! ```rust
//! use bizdesk_core::money::Money;
//!
//! let price = Money::from_minor(1050);          // 10.50
//! let subtotal = price.multiply_quantity(3);    // 31.50
//! assert_eq!(subtotal.to_string(), "31.50");
//!
//! let parsed: Money = "31.5".parse().unwrap();
//! assert_eq!(parsed, subtotal);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;

/// Minor units per major unit (two decimal places).
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units of the draft's currency.
///
/// Serialized as a bare integer, so the persisted draft reads
/// `"unitPrice": 1050` for 10.50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Largest representable amount; saturating arithmetic stops here.
    pub const MAX: Money = Money(i64::MAX);

    /// Smallest representable amount.
    pub const MIN: Money = Money(i64::MIN);

    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units (`from_major(10)` is 10.00).
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the whole major units, truncated toward zero.
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Replaces negative values with zero.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(-500).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_minor(500).clamp_non_negative().minor_units(), 500);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Line: Cement 50kg @ 52.00
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: 156.00
    /// ```
    ///
    /// Saturates at [`Money::MAX`] / [`Money::MIN`]; see
    /// [`checked_multiply_quantity`](Money::checked_multiply_quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// `unit_price × qty`, or `None` if the result does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use bizdesk_core::money::Money;
    ///
    /// assert_eq!(
    ///     Money::from_minor(5200).checked_multiply_quantity(3),
    ///     Some(Money::from_minor(15600))
    /// );
    /// assert_eq!(Money::MAX.checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount typed by a user.
///
/// Accepts `.` or `,` as the decimal separator and at most two decimals:
/// `"12"`, `"12.5"`, `"12,50"`, `"-3.25"`.
impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidAmount {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        if digits.is_empty() {
            return Err(invalid("empty amount"));
        }

        let (major_str, minor_str) = match digits.find(['.', ',']) {
            Some(pos) => (&digits[..pos], &digits[pos + 1..]),
            None => (digits, ""),
        };

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(major_str) || !all_digits(minor_str) {
            return Err(invalid("only digits and one decimal separator are allowed"));
        }
        if major_str.is_empty() && minor_str.is_empty() {
            return Err(invalid("empty amount"));
        }
        if minor_str.len() > 2 {
            return Err(invalid("at most two decimals are allowed"));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match minor_str.len() {
            0 => 0,
            1 => minor_str.parse::<i64>().map_err(|_| invalid("bad decimals"))? * 10,
            _ => minor_str.parse().map_err(|_| invalid("bad decimals"))?,
        };

        let total = major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -total } else { total }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with two decimals and no currency symbol.
///
/// Symbol placement is a display concern handled by the session layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major_part().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Multiplication by a quantity (saturating, like [`Money::multiply_quantity`]).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Sums subtotals: `lines.iter().map(|l| l.subtotal).sum()`.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
