//! Scalar types the simplex engine can run over.
//!
//! The engine is written once against [`Scalar`] and instantiated for
//! floating point ([`Real`]) or exact rationals ([`BigRational`]).
//! Floating tableaus are cleaned with [`Scalar::round_noise`] after every
//! pivot so that accumulated rounding error is never mistaken for a sign
//! change. Rationals are exact and the cleaning step is a no-op.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Num, Signed, ToPrimitive, Zero};
use std::fmt::{Debug, Display};

/// Default floating scalar.
pub type Real = f64;

/// Magnitude above which an `f64` has no fractional bits left to round.
const MAX_ROUNDABLE: f64 = 4_503_599_627_370_496.0;

/// Numeric field the tableau is built over.
pub trait Scalar: Num + Signed + Clone + PartialOrd + Debug + Display {
    /// Convert an integer input coefficient.
    fn from_int(value: i64) -> Self;

    /// Lossy conversion used for printing and reporting.
    fn as_f64(&self) -> f64;

    /// Clamp `|self| < tolerance` to zero and round the rest to `digits`
    /// fractional digits.
    fn round_noise(&mut self, tolerance: f64, digits: u32);

    /// Equality up to `tolerance`.
    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool;

    /// Whether the value is below `-tolerance`.
    fn is_negative_beyond(&self, tolerance: f64) -> bool;

    /// Whether the value is above `tolerance`.
    fn is_positive_beyond(&self, tolerance: f64) -> bool;

    /// Whether the value is a finite number (neither infinite nor NaN).
    fn is_finite(&self) -> bool;
}

impl Scalar for f64 {
    fn from_int(value: i64) -> Self {
        value as f64
    }

    fn as_f64(&self) -> f64 {
        *self
    }

    fn round_noise(&mut self, tolerance: f64, digits: u32) {
        if self.abs() < tolerance {
            *self = 0.0;
            return;
        }
        let scale = 10f64.powi(digits as i32);
        let scaled = *self * scale;
        if scaled.abs() < MAX_ROUNDABLE {
            *self = scaled.round() / scale;
        }
    }

    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self - other).abs() <= tolerance
    }

    fn is_negative_beyond(&self, tolerance: f64) -> bool {
        *self < -tolerance
    }

    fn is_positive_beyond(&self, tolerance: f64) -> bool {
        *self > tolerance
    }

    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

impl Scalar for BigRational {
    fn from_int(value: i64) -> Self {
        BigRational::from_integer(BigInt::from(value))
    }

    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }

    fn round_noise(&mut self, _tolerance: f64, _digits: u32) {}

    fn approx_eq(&self, other: &Self, _tolerance: f64) -> bool {
        self == other
    }

    fn is_negative_beyond(&self, _tolerance: f64) -> bool {
        self.is_negative()
    }

    fn is_positive_beyond(&self, _tolerance: f64) -> bool {
        self.is_positive()
    }

    fn is_finite(&self) -> bool {
        true
    }
}

/// Inner product of two equally long slices.
pub fn dot<T: Scalar>(lhs: &[T], rhs: &[T]) -> T {
    lhs.iter()
        .zip(rhs)
        .fold(T::zero(), |acc, (a, b)| acc + a.clone() * b.clone())
}

/// Apply [`Scalar::round_noise`] to every entry of a row.
pub(crate) fn round_row_noise<T: Scalar>(row: &mut [T], tolerance: f64, digits: u32) {
    for value in row.iter_mut() {
        value.round_noise(tolerance, digits);
    }
}

/// Whether every entry of `values` is zero.
pub(crate) fn all_zero<T: Scalar>(values: &[T]) -> bool {
    values.iter().all(Zero::is_zero)
}
