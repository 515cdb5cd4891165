//! # Money Module
//!
//! Provides the `Money` and `TaxRate` types for handling monetary values and
//! tax percentages safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004            │
//! │                                                                 │
//! │  OUR SOLUTION: Integer Cents                                    │
//! │    $10.99 is stored as 1099. The store, the tax math and the    │
//! │    receipts all use cents; only a UI would format dollars.      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::{Money, TaxRate};
//!
//! let price = Money::from_cents(1000);      // $10.00
//! let rate = TaxRate::from_bps(1000);       // 10%
//!
//! let tax = price.tax_amount(rate);
//! assert_eq!(tax.cents(), 100);             // $1.00
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use serde::{Deserialize, Serialize};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for adjustments and refunds in later versions
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde as bare integer**: persisted records carry plain cent counts
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
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

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates the tax amount for this price at the given rate, cash
    /// rounded.
    ///
    /// ## Cash Rounding
    /// The raw product `price × rate` is rounded **half-up to the nearest
    /// 5 cents** — the smallest increment cash registers settle in. The
    /// arithmetic is exact: with the rate in basis points the raw tax is
    /// `cents·bps / 10_000`, so in nickel units it is `cents·bps / 50_000`,
    /// and rounding half-up means flooring after adding one half:
    ///
    /// ```text
    /// nickels = (2·cents·bps + 50_000) / 100_000
    /// tax     = 5 · nickels
    /// ```
    ///
    /// i128 intermediates keep large line amounts from overflowing.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::{Money, TaxRate};
    ///
    /// // $14.99 at 10% = $1.499 → $1.50
    /// let tax = Money::from_cents(1499).tax_amount(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 150);
    /// ```
    pub fn tax_amount(&self, rate: TaxRate) -> Money {
        debug_assert!(self.0 >= 0, "tax_amount expects a catalog price");
        let nickels = (2 * self.0 as i128 * rate.bps() as i128 + 50_000) / 100_000;
        Money::from_cents((nickels * 5) as i64)
    }

    /// Multiplies money by a line quantity.
    #[inline]
    pub const fn times(&self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

/// Display implementation shows money in a human-readable format.
/// For debugging and log output; a UI would localize properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0 * count)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%. Integer bps keep stacked rates
/// exact: eligible taxes sum their rates before any rounding happens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from whole percent (5 → 5%).
    #[inline]
    pub const fn from_percent(pct: u32) -> Self {
        TaxRate(pct * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

impl Add for TaxRate {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        TaxRate(self.0 + other.0)
    }
}

/// Eligible rates stack by summation before the single rounding step.
impl Sum for TaxRate {
    fn sum<I: Iterator<Item = TaxRate>>(iter: I) -> Self {
        iter.fold(TaxRate(0), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
