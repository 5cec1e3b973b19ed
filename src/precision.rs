//! Numeric precision backends.
//!
//! The mapper, store and rasterizer are generic over a [`Precision`] backend
//! rather than being written twice for exact and floating arithmetic. The
//! exact backend computes with arbitrary-precision rationals and rounds
//! inexact operations (square roots, trigonometry) at a configured order of
//! magnitude; the floating backend uses `f64` with a tolerance for
//! comparisons.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Roots;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

/// Numeric field operations required of a backend's scalar type.
///
/// Blanket-implemented; `f64` and [`BigRational`] both qualify.
pub trait Scalar:
    Clone
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
}

impl<T> Scalar for T where
    T: Clone
        + Debug
        + PartialEq
        + PartialOrd
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Neg<Output = T>
{
}

/// Rounding applied when the exact backend must approximate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Toward zero.
    Down,
    /// Away from zero.
    Up,
    /// Nearest, ties away from zero.
    #[default]
    HalfUp,
    /// Nearest, ties to even.
    HalfEven,
}

/// A numeric precision backend: scalar construction, approximation and
/// comparison tolerance.
pub trait Precision: Clone + Debug {
    /// The scalar type computations run on.
    type Scalar: Scalar;

    /// Scalar from an integer.
    fn from_i64(&self, v: i64) -> Self::Scalar;

    /// Scalar from a float.
    fn from_f64(&self, v: f64) -> Self::Scalar;

    /// Scalar from an integer ratio `num / den`.
    fn ratio(&self, num: i64, den: i64) -> Self::Scalar;

    /// Approximate float value of a scalar.
    fn to_f64(&self, x: &Self::Scalar) -> f64;

    /// Truncate toward zero to an integer, saturating on overflow.
    fn trunc(&self, x: &Self::Scalar) -> i64;

    /// Square root, computed to the backend's precision. Negative inputs
    /// (which only arise from rounding noise on squared lengths) clamp to
    /// zero.
    fn sqrt(&self, x: &Self::Scalar) -> Self::Scalar;

    /// Comparison tolerance. Zero in the exact backend.
    fn eps(&self) -> Self::Scalar;

    /// Sine and cosine of an angle in radians, to the backend's precision.
    fn sin_cos(&self, theta: &Self::Scalar) -> (Self::Scalar, Self::Scalar);

    /// The scalar zero.
    fn zero(&self) -> Self::Scalar {
        self.from_i64(0)
    }

    /// The scalar one.
    fn one(&self) -> Self::Scalar {
        self.from_i64(1)
    }

    /// Absolute value.
    fn abs(&self, x: &Self::Scalar) -> Self::Scalar {
        if *x < self.zero() {
            -x.clone()
        } else {
            x.clone()
        }
    }

    /// Whether `x` is zero within the backend tolerance.
    fn is_zero(&self, x: &Self::Scalar) -> bool {
        self.abs(x) <= self.eps()
    }

    /// Sign of `x` under the backend tolerance: -1, 0 or 1.
    fn sign(&self, x: &Self::Scalar) -> i8 {
        if self.is_zero(x) {
            0
        } else if *x < self.zero() {
            -1
        } else {
            1
        }
    }
}

/// Floating-point backend: `f64` scalars with a fixed comparison tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPrecision {
    /// Comparison tolerance.
    pub epsilon: f64,
}

impl FloatPrecision {
    /// Create a backend with the given tolerance.
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl Default for FloatPrecision {
    fn default() -> Self {
        Self::new(1e-9)
    }
}

impl Precision for FloatPrecision {
    type Scalar = f64;

    fn from_i64(&self, v: i64) -> f64 {
        v as f64
    }

    fn from_f64(&self, v: f64) -> f64 {
        v
    }

    fn ratio(&self, num: i64, den: i64) -> f64 {
        num as f64 / den as f64
    }

    fn to_f64(&self, x: &f64) -> f64 {
        *x
    }

    fn trunc(&self, x: &f64) -> i64 {
        x.trunc() as i64
    }

    fn sqrt(&self, x: &f64) -> f64 {
        x.max(0.0).sqrt()
    }

    fn eps(&self) -> f64 {
        self.epsilon
    }

    fn sin_cos(&self, theta: &f64) -> (f64, f64) {
        theta.sin_cos()
    }
}

/// Exact backend: arbitrary-precision rational scalars.
///
/// `oom` is the order of magnitude at which inexact operations round: `-8`
/// rounds to `1e-8`. Field arithmetic stays exact; only square roots,
/// trigonometry and float conversion round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationalPrecision {
    /// Order of magnitude of the precision for inexact operations.
    pub oom: i32,
    /// Rounding mode for inexact operations.
    pub rounding: Rounding,
}

impl RationalPrecision {
    /// Create a backend rounding inexact operations at `10^oom`.
    #[must_use]
    pub const fn new(oom: i32, rounding: Rounding) -> Self {
        Self { oom, rounding }
    }

    /// The scale factor `10^(-oom)` as a rational.
    fn scale(&self) -> BigRational {
        let ten = BigInt::from(10);
        if self.oom <= 0 {
            BigRational::from(num_traits::pow(ten, self.oom.unsigned_abs() as usize))
        } else {
            BigRational::new(BigInt::from(1), num_traits::pow(ten, self.oom as usize))
        }
    }

    /// Round a rational to the backend's order of magnitude, ties away from
    /// zero.
    fn round_to_oom(&self, x: BigRational) -> BigRational {
        let s = self.scale();
        BigRational::from((x * &s).round().to_integer()) / s
    }
}

impl Default for RationalPrecision {
    fn default() -> Self {
        Self::new(-8, Rounding::HalfUp)
    }
}

impl Precision for RationalPrecision {
    type Scalar = BigRational;

    fn from_i64(&self, v: i64) -> BigRational {
        BigRational::from(BigInt::from(v))
    }

    fn from_f64(&self, v: f64) -> BigRational {
        BigRational::from_float(v).unwrap_or_else(BigRational::zero)
    }

    fn ratio(&self, num: i64, den: i64) -> BigRational {
        BigRational::new(BigInt::from(num), BigInt::from(den))
    }

    fn to_f64(&self, x: &BigRational) -> f64 {
        x.to_f64().unwrap_or(f64::NAN)
    }

    fn trunc(&self, x: &BigRational) -> i64 {
        x.to_integer().to_i64().unwrap_or_else(|| {
            if x.is_negative() {
                i64::MIN
            } else {
                i64::MAX
            }
        })
    }

    fn sqrt(&self, x: &BigRational) -> BigRational {
        if x.is_negative() || x.is_zero() {
            return BigRational::zero();
        }
        let s = self.scale();
        // sqrt(x) ~= k * 10^oom where k = isqrt(x * 10^(-2*oom)), adjusted
        // for the rounding mode against the integer remainder.
        let scaled = (x * &s * &s).floor().to_integer();
        let root = scaled.sqrt();
        let r2 = &root * &root;
        let bump = match self.rounding {
            Rounding::Down => false,
            Rounding::Up => r2 < scaled,
            Rounding::HalfUp | Rounding::HalfEven => (&scaled - &r2) > root,
        };
        let root = if bump { root + BigInt::from(1) } else { root };
        BigRational::from(root) / s
    }

    fn eps(&self) -> BigRational {
        BigRational::zero()
    }

    fn sin_cos(&self, theta: &BigRational) -> (BigRational, BigRational) {
        let (sin, cos) = self.to_f64(theta).sin_cos();
        (
            self.round_to_oom(self.from_f64(sin)),
            self.round_to_oom(self.from_f64(cos)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_float_basics() {
        let ctx = FloatPrecision::default();
        assert_eq!(ctx.from_i64(3), 3.0);
        assert_eq!(ctx.ratio(1, 4), 0.25);
        assert_eq!(ctx.trunc(&-2.9), -2);
        assert!(ctx.is_zero(&1e-12));
        assert!(!ctx.is_zero(&1e-3));
        assert_eq!(ctx.sign(&-0.5), -1);
    }

    #[test]
    fn test_rational_exact_arithmetic() {
        let ctx = RationalPrecision::default();
        let third = ctx.ratio(1, 3);
        let sum = third.clone() + third.clone() + third;
        assert_eq!(sum, ctx.one());
    }

    #[test]
    fn test_rational_sqrt_perfect_square() {
        let ctx = RationalPrecision::default();
        let four = ctx.from_i64(4);
        assert_eq!(ctx.sqrt(&four), ctx.from_i64(2));
    }

    #[test]
    fn test_rational_sqrt_two() {
        let ctx = RationalPrecision::new(-8, Rounding::HalfUp);
        let root = ctx.sqrt(&ctx.from_i64(2));
        assert_relative_eq!(ctx.to_f64(&root), std::f64::consts::SQRT_2, epsilon = 1e-7);
    }

    #[test]
    fn test_rational_sqrt_rounding_modes() {
        // sqrt(2) at oom 0: 1 (down), 2 (up), 1 (half up: 1.414... < 1.5).
        let two = BigRational::from(BigInt::from(2));
        assert_eq!(
            RationalPrecision::new(0, Rounding::Down).sqrt(&two),
            BigRational::from(BigInt::from(1))
        );
        assert_eq!(
            RationalPrecision::new(0, Rounding::Up).sqrt(&two),
            BigRational::from(BigInt::from(2))
        );
        assert_eq!(
            RationalPrecision::new(0, Rounding::HalfUp).sqrt(&two),
            BigRational::from(BigInt::from(1))
        );
    }

    #[test]
    fn test_rational_trunc() {
        let ctx = RationalPrecision::default();
        assert_eq!(ctx.trunc(&ctx.ratio(-7, 2)), -3);
        assert_eq!(ctx.trunc(&ctx.ratio(7, 2)), 3);
    }

    #[test]
    fn test_rational_sin_cos_rounds_at_oom() {
        let ctx = RationalPrecision::default();
        let (sin, cos) = ctx.sin_cos(&ctx.from_f64(std::f64::consts::FRAC_PI_2));
        assert_relative_eq!(ctx.to_f64(&sin), 1.0, epsilon = 1e-7);
        assert!(ctx.to_f64(&cos).abs() < 1e-7);
    }

    #[test]
    fn test_positive_oom_scale() {
        // oom = 1 rounds square roots to multiples of 10.
        let ctx = RationalPrecision::new(1, Rounding::HalfUp);
        let v = ctx.from_i64(400);
        assert_eq!(ctx.sqrt(&v), ctx.from_i64(20));
    }
}
