//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing a day of fees in floating point:                               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ drawer is "off" by dust          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Clients send dollars (JSON numbers). Each amount is rounded to      │
//! │    whole cents ONCE at the boundary; every sum after that is exact.    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use emis_core::money::Money;
//!
//! let starting = Money::from_cents(10_000); // $100.00
//! let cash_fee = Money::from_dollars(40.0).unwrap();
//!
//! let expected = starting + cash_fee;
//! assert_eq!(expected.to_dollars(), 140.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds are entered as negative fees
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as cents**: the HTTP layer converts to dollars explicitly
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  DailyLog.starting_cash ─────────────────────────┐                      │
/// │                                                   ▼                     │
/// │  Transaction.total_amount ──► cash_sales ──► expected_drawer_cash       │
/// │          │                                        │                     │
/// │          └──► total_sales                         ▼                     │
/// │                                       closing_cash - expected           │
/// │                                          = over_short                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use emis_core::money::Money;
    ///
    /// let fee = Money::from_cents(2500); // $25.00
    /// assert_eq!(fee.cents(), 2500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a dollar amount to Money, rounding to the nearest cent
    /// (half away from zero).
    ///
    /// Returns `None` for NaN, infinities, or values that do not fit in
    /// `i64` cents. Range limits for specific fields live in
    /// [`crate::validation`].
    ///
    /// ## Example
    /// ```rust
    /// use emis_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(25.5).unwrap().cents(), 2550);
    /// assert_eq!(Money::from_dollars(0.1 + 0.2).unwrap().cents(), 30);
    /// assert_eq!(Money::from_dollars(-12.0).unwrap().cents(), -1200);
    /// assert!(Money::from_dollars(f64::NAN).is_none());
    /// ```
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() {
            return None;
        }

        let cents = (dollars * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the value in dollars for the JSON wire format.
    ///
    /// ## Example
    /// ```rust
    /// use emis_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(6500).to_dollars(), 65.0);
    /// assert_eq!(Money::from_cents(-199).to_dollars(), -1.99);
    /// ```
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money as `$140.00` or `-$5.50`.
///
/// ## Note
/// Used for log lines. Clients format amounts themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

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
