//! # Money Module
//!
//! Provides the `Money` type for handling rupiah amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Rupiah                                           │
//! │    The rupiah has no minor unit in day-to-day retail, so every          │
//! │    amount in the system is a whole-rupiah i64. No cents, no floats.    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nota_core::money::Money;
//!
//! let price = Money::from_rupiah(15_000);
//! let line_total = price * 2;
//!
//! // Indonesian thousands grouping with a dot:
//! assert_eq!(line_total.to_string(), "Rp 30.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: the spreadsheet store occasionally holds garbage; a
///   signed carrier lets the reconciler clamp instead of wrapping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support so boundary records deserialize directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    ///
    /// ## Example
    /// ```rust
    /// use nota_core::money::Money;
    ///
    /// let price = Money::from_rupiah(15_000);
    /// assert_eq!(price.rupiah(), 15_000);
    /// ```
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Clamps negative amounts to zero.
    ///
    /// The canonical total invariant is `total >= 0`; stored totals that
    /// arrive negative from the spreadsheet are treated as zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use nota_core::money::Money;
    ///
    /// let unit_price = Money::from_rupiah(10_000);
    /// assert_eq!(unit_price.multiply_quantity(2).rupiah(), 20_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation renders the id-ID retail format: `Rp 40.000`.
///
/// ## Note
/// This is the exact string embedded into receipts, QR payloads, and
/// WhatsApp messages, so grouping uses a dot (Indonesian convention),
/// never a comma.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rp {}", sign, group_thousands(self.0.unsigned_abs()))
    }
}

/// Groups a magnitude with dots every three digits: 1234567 -> "1.234.567".
fn group_thousands(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut groups: Vec<String> = Vec::new();
    while value > 0 {
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    // The leading group keeps no zero padding.
    let mut out = groups
        .pop()
        .map(|g| g.trim_start_matches('0').to_string())
        .unwrap_or_default();
    if out.is_empty() {
        out.push('0');
    }
    for group in groups.iter().rev() {
        out.push('.');
        out.push_str(group);
    }
    out
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rupiah() {
        let money = Money::from_rupiah(15_000);
        assert_eq!(money.rupiah(), 15_000);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Money::from_rupiah(500).to_string(), "Rp 500");
        assert_eq!(Money::from_rupiah(40_000).to_string(), "Rp 40.000");
        assert_eq!(Money::from_rupiah(1_234_567).to_string(), "Rp 1.234.567");
        assert_eq!(Money::from_rupiah(-5_500).to_string(), "-Rp 5.500");
    }

    #[test]
    fn test_display_group_with_internal_zeros() {
        // 1.000.050 exercises zero-padded middle groups
        assert_eq!(Money::from_rupiah(1_000_050).to_string(), "Rp 1.000.050");
        assert_eq!(Money::from_rupiah(10_005).to_string(), "Rp 10.005");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(10_000);
        let b = Money::from_rupiah(5_000);

        assert_eq!((a + b).rupiah(), 15_000);
        assert_eq!((a - b).rupiah(), 5_000);
        assert_eq!((a * 3).rupiah(), 30_000);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_rupiah(-750).clamp_non_negative().rupiah(), 0);
        assert_eq!(Money::from_rupiah(750).clamp_non_negative().rupiah(), 750);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_rupiah(15_000);
        assert_eq!(unit_price.multiply_quantity(2).rupiah(), 30_000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());

        let positive = Money::from_rupiah(100);
        assert!(positive.is_positive());
    }
}
