//! Exact rational arithmetic.
//!
//! Every price and slippage computation in this crate runs on
//! arbitrary-precision fractions that are never auto-reduced, so the
//! numerator/denominator pairs compose exactly the way the on-chain
//! integer math does. Conversions back to integers always name their
//! rounding direction; there is no ambiguous "truncate" anywhere.

use num_bigint::{BigInt, BigUint};
use num_integer::{Integer, Roots};
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Rounding direction for fraction-to-integer conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
}

/// An exact rational number. The denominator is kept strictly positive;
/// the sign lives on the numerator.
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Builds a fraction, normalizing the sign onto the numerator.
    ///
    /// # Panics
    /// Panics if `denominator` is zero.
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        let numerator = numerator.into();
        let denominator = denominator.into();
        assert!(!denominator.is_zero(), "fraction denominator is zero");
        if denominator.is_negative() {
            Self { numerator: -numerator, denominator: -denominator }
        } else {
            Self { numerator, denominator }
        }
    }

    pub fn zero() -> Self {
        Self::new(0, 1)
    }

    pub fn one() -> Self {
        Self::new(1, 1)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Reciprocal of this fraction.
    ///
    /// # Panics
    /// Panics if the fraction is zero.
    pub fn invert(&self) -> Self {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    /// Integer part, rounded toward negative infinity.
    pub fn quotient_floor(&self) -> BigInt {
        self.numerator.div_floor(&self.denominator)
    }

    /// Integer part, rounded toward positive infinity.
    pub fn quotient_ceil(&self) -> BigInt {
        self.numerator.div_ceil(&self.denominator)
    }

    /// Decimal rendering with exactly `places` fractional digits.
    pub fn to_fixed(&self, places: u32, rounding: Rounding) -> String {
        let scale = BigInt::from(10u32).pow(places);
        let scaled = self * &Fraction::new(scale.clone(), 1);
        let units = match rounding {
            Rounding::Floor => scaled.quotient_floor(),
            Rounding::Ceil => scaled.quotient_ceil(),
        };
        let negative = units.is_negative();
        let magnitude = units.magnitude();
        let (int_part, frac_part) = magnitude.div_rem(scale.magnitude());
        let sign = if negative { "-" } else { "" };
        if places == 0 {
            format!("{sign}{int_part}")
        } else {
            format!("{sign}{int_part}.{frac_part:0>width$}", width = places as usize)
        }
    }
}

impl From<BigUint> for Fraction {
    fn from(value: BigUint) -> Self {
        Self::new(BigInt::from(value), 1)
    }
}

impl From<&BigUint> for Fraction {
    fn from(value: &BigUint) -> Self {
        Self::new(BigInt::from(value.clone()), 1)
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Self::new(value, 1)
    }
}

impl Add for &Fraction {
    type Output = Fraction;

    fn add(self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator + &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }
}

impl Sub for &Fraction {
    type Output = Fraction;

    fn sub(self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction::new(&self.numerator - &other.numerator, self.denominator.clone());
        }
        Fraction::new(
            &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            &self.denominator * &other.denominator,
        )
    }
}

impl Mul for &Fraction {
    type Output = Fraction;

    fn mul(self, other: &Fraction) -> Fraction {
        Fraction::new(
            &self.numerator * &other.numerator,
            &self.denominator * &other.denominator,
        )
    }
}

impl Div for &Fraction {
    type Output = Fraction;

    fn div(self, other: &Fraction) -> Fraction {
        Fraction::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        // Unreduced forms compare by cross-multiplication, not field-wise.
        &self.numerator * &other.denominator == &other.numerator * &self.denominator
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // Denominators are strictly positive, so the cross products order
        // the same way the fractions do.
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A fraction interpreted as a share of one, e.g. slippage tolerance or
/// price impact. `Percent::new(1, 100)` is 1%.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percent(Fraction);

impl Percent {
    pub fn new(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        Self(Fraction::new(numerator, denominator))
    }

    pub fn zero() -> Self {
        Self(Fraction::zero())
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Rendering in percentage points, e.g. "0.30" for a 3/1000 fee.
    pub fn to_fixed(&self, places: u32, rounding: Rounding) -> String {
        (&self.0 * &Fraction::new(100, 1)).to_fixed(places, rounding)
    }
}

impl From<Fraction> for Percent {
    fn from(fraction: Fraction) -> Self {
        Self(fraction)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2, Rounding::Floor))
    }
}

/// Integer (floor) square root.
pub fn isqrt(value: &BigUint) -> BigUint {
    value.sqrt()
}
