//! Numeric kernel: complex arithmetic helpers shared by the evaluator
//!
//! # Branch cuts and residues
//!
//! Floating evaluation of multi-valued functions leaves tiny residual parts
//! where the exact result is purely real or purely imaginary (for instance
//! `sqrt(-1)` computed in polar form gives `6e-17 + 1i`). Two helpers snap
//! those residues to exactly zero:
//!
//! - [`truncate_real_or_imaginary_part_according_to_argument`] compares the
//!   result's argument with multiples of π/2, relative to the argument of the
//!   operand the result was computed from.
//! - [`neglect_real_or_imaginary_part_if_negligible`] compares each part with
//!   the magnitude of the input (used by trigonometric functions, so that
//!   `sin(π)` is exactly 0).

use num_complex::Complex;

use crate::traits::{MathScalar, from_f64, is_integer, precision};

pub mod matrix;
mod robustness_tests;
pub mod trigonometry;

pub use matrix::Matrix;

/// Complex NaN, the numeric "no value"
#[inline]
pub fn complex_nan<T: MathScalar>() -> Complex<T> {
    Complex::new(T::nan(), T::nan())
}

#[inline]
pub fn is_complex_nan<T: MathScalar>(c: Complex<T>) -> bool {
    c.re.is_nan() || c.im.is_nan()
}

#[inline]
pub fn is_complex_zero<T: MathScalar>(c: Complex<T>) -> bool {
    c.re == T::zero() && c.im == T::zero()
}

/// `-0.0` parts become `+0.0`, so a negated real stays above the cut
#[inline]
pub fn without_negative_zero<T: MathScalar>(c: Complex<T>) -> Complex<T> {
    Complex::new(c.re + T::zero(), c.im + T::zero())
}

/// Negation that never produces a `-0.0` part
#[inline]
pub fn negate_complex<T: MathScalar>(c: Complex<T>) -> Complex<T> {
    without_negative_zero(-c)
}

/// `x` is negligible next to a value of magnitude `norm`
#[inline]
pub fn is_negligible<T: MathScalar>(x: T, precision: T, norm: T) -> bool {
    norm > T::zero() && x.abs() <= precision * norm
}

/// Snap a part of `result` that is negligible relative to `|input|`.
pub fn neglect_real_or_imaginary_part_if_negligible<T: MathScalar>(
    result: Complex<T>,
    input: Complex<T>,
) -> Complex<T> {
    let magnitude = input.norm();
    let precision = precision::<T>();
    let mut corrected = result;
    if is_negligible(result.re, precision, magnitude) {
        corrected.re = T::zero();
    }
    if is_negligible(result.im, precision, magnitude) {
        corrected.im = T::zero();
    }
    corrected
}

/// Branch-cut correction.
///
/// If the argument of `c` is within the expected evaluation error of a
/// multiple of π the imaginary part becomes exactly zero; if it is within
/// that error of an odd multiple of π/2 the real part does. The error grows
/// with `|input_argument|`, the argument of the operand `c` was derived from.
pub fn truncate_real_or_imaginary_part_according_to_argument<T: MathScalar>(
    c: Complex<T>,
    input_argument: T,
) -> Complex<T> {
    if is_complex_nan(c) {
        return c;
    }
    let tolerance = precision::<T>() * input_argument.abs().max(T::one());
    let argument = c.arg();
    let mut corrected = c;
    if argument.sin().abs() <= tolerance {
        corrected.im = T::zero();
    }
    if argument.cos().abs() <= tolerance {
        corrected.re = T::zero();
    }
    corrected
}

/// Principal square root with branch-cut correction
pub fn complex_sqrt<T: MathScalar>(c: Complex<T>) -> Complex<T> {
    if is_complex_nan(c) {
        return complex_nan();
    }
    let c = without_negative_zero(c);
    truncate_real_or_imaginary_part_according_to_argument(c.sqrt(), c.arg())
}

/// Complex power `base^exponent`.
///
/// `0^0` and `0` raised to a non-positive real part are NaN. Real integer
/// exponents use repeated multiplication so that exact results stay exact.
pub fn complex_power<T: MathScalar>(base: Complex<T>, exponent: Complex<T>) -> Complex<T> {
    if is_complex_nan(base) || is_complex_nan(exponent) {
        return complex_nan();
    }
    let base = without_negative_zero(base);
    if is_complex_zero(base) {
        return if exponent.im == T::zero() && exponent.re > T::zero() {
            Complex::new(T::zero(), T::zero())
        } else {
            complex_nan()
        };
    }
    if exponent.im == T::zero() {
        if exponent.re == from_f64::<T>(0.5) {
            return complex_sqrt(base);
        }
        if is_integer(exponent.re) && exponent.re.abs() <= from_f64::<T>(f64::from(i32::MAX)) {
            let n = exponent.re.to_i32().unwrap_or(0);
            if base.im == T::zero() {
                return Complex::new(base.re.powi(n), T::zero());
            }
            return base.powi(n);
        }
    }
    let result = base.powc(exponent);
    truncate_real_or_imaginary_part_according_to_argument(result, base.arg() * exponent.norm())
}

/// Division with an exact zero divisor mapped to NaN
pub fn complex_divide<T: MathScalar>(numerator: Complex<T>, denominator: Complex<T>) -> Complex<T> {
    if is_complex_zero(denominator) {
        return complex_nan();
    }
    numerator / denominator
}
