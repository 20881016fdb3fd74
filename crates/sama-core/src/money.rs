//! # Money Module
//!
//! Provides the `Money` and `Discount` types for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    3 × 99.99 = 299.96999999999997  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    3 × 9999 cents = 29997 cents = 299.97                               │
//! │                                                                         │
//! │  Discounts are basis points, so a discounted line is still integer     │
//! │  math until the single final rounding to cents.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sama_core::money::{Discount, Money};
//!
//! let price = Money::from_major_minor(99, 99); // 99.99
//! assert_eq!(price.discounted_total(3, Discount::none()).unwrap().to_string(), "299.97");
//!
//! let quarter_off = Discount::from_bps(2500);
//! assert_eq!(price.discounted_total(2, quarter_off).unwrap().cents(), 14999);
//!
//! // Amounts that do not fit in i64 cents are reported, never wrapped.
//! assert!(Money::from_cents(i64::MAX).discounted_total(2, Discount::none()).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis points in 100%.
const FULL_BPS: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between totals can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: prices enter the system as cents only
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use sama_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `qty × self × (1 − discount)` rounded to the nearest cent,
    /// or `None` if the amount does not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use sama_core::money::{Discount, Money};
    ///
    /// let price = Money::from_cents(10000); // 100.00
    /// let total = price.discounted_total(3, Discount::from_bps(1000)); // 10% off
    /// assert_eq!(total, Some(Money::from_cents(27000)));
    /// ```
    pub fn discounted_total(&self, qty: i64, discount: Discount) -> Option<Money> {
        round_basis(discounted_basis(*self, qty, discount)?)
    }

    /// Sums discounted lines and rounds once at the end.
    ///
    /// Rounding each line first can drift by a cent per line, so cart totals
    /// go through this instead of adding up `discounted_total` results.
    /// Returns `None` if any step overflows.
    pub fn sum_discounted<I>(lines: I) -> Option<Money>
    where
        I: IntoIterator<Item = (Money, i64, Discount)>,
    {
        let raw = lines
            .into_iter()
            .try_fold(0i128, |acc, (price, qty, discount)| {
                acc.checked_add(discounted_basis(price, qty, discount)?)
            })?;
        round_basis(raw)
    }
}

/// Amount in cents × 10000 (cent basis points), exact.
fn discounted_basis(price: Money, qty: i64, discount: Discount) -> Option<i128> {
    let keep = FULL_BPS - i128::from(discount.bps());
    i128::from(price.0)
        .checked_mul(i128::from(qty))?
        .checked_mul(keep)
}

/// Half away from zero, `None` when the result leaves `i64`.
fn round_basis(raw: i128) -> Option<Money> {
    let half = FULL_BPS / 2;
    let cents = if raw >= 0 {
        raw.checked_add(half)? / FULL_BPS
    } else {
        raw.checked_sub(half)? / FULL_BPS
    };
    i64::try_from(cents).ok().map(Money::from_cents)
}

// =============================================================================
// Discount
// =============================================================================

/// Fraction taken off a price, in basis points (2500 = 25% = 0.25).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, enough for any shelf discount and still
/// integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Discount(u32);

impl Discount {
    /// Largest valid discount: everything off.
    pub const MAX_BPS: u32 = 10_000;

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Discount(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn none() -> Self {
        Discount(0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two decimals, no currency symbol; the app decides how to label amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

/// Rendered as a fraction, e.g. `0.25`.
impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 10_000, (self.0 % 10_000) / 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
