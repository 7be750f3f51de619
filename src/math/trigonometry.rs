//! Trigonometric functions on complex values with angle-unit conversion

use num_complex::Complex;

use super::{
    complex_nan, is_complex_nan, is_complex_zero, neglect_real_or_imaginary_part_if_negligible,
};
use crate::ast::TrigFunction;
use crate::preferences::AngleUnit;
use crate::traits::{MathScalar, from_f64};

/// Factor turning an angle in `unit` into radians
#[inline]
pub fn radians_per_unit<T: MathScalar>(unit: AngleUnit) -> T {
    match unit {
        AngleUnit::Radian => T::one(),
        AngleUnit::Degree => T::PI() / from_f64::<T>(180.0),
    }
}

pub fn convert_to_radian<T: MathScalar>(c: Complex<T>, unit: AngleUnit) -> Complex<T> {
    match unit {
        AngleUnit::Radian => c,
        AngleUnit::Degree => c * radians_per_unit::<T>(unit),
    }
}

pub fn convert_from_radian<T: MathScalar>(c: Complex<T>, unit: AngleUnit) -> Complex<T> {
    match unit {
        AngleUnit::Radian => c,
        AngleUnit::Degree => c / radians_per_unit::<T>(unit),
    }
}

/// sin, cos or tan of an angle expressed in `unit`.
///
/// Residues negligible next to the angle are dropped, so `sin(π)` and
/// `cos(90°)` are exactly zero and `tan` is NaN on its poles.
pub fn compute_direct_on_complex<T: MathScalar>(
    function: TrigFunction,
    c: Complex<T>,
    unit: AngleUnit,
) -> Complex<T> {
    if is_complex_nan(c) {
        return complex_nan();
    }
    let angle = convert_to_radian(c, unit);
    let sine = || {
        let raw = real_aware(angle, T::sin, Complex::sin);
        neglect_real_or_imaginary_part_if_negligible(raw, angle)
    };
    let cosine = || {
        let raw = real_aware(angle, T::cos, Complex::cos);
        neglect_real_or_imaginary_part_if_negligible(raw, angle)
    };
    match function {
        TrigFunction::Sine => sine(),
        TrigFunction::Cosine => cosine(),
        TrigFunction::Tangent => {
            let cos = cosine();
            if is_complex_zero(cos) {
                complex_nan()
            } else {
                sine() / cos
            }
        }
        TrigFunction::ArcSine | TrigFunction::ArcCosine | TrigFunction::ArcTangent => {
            compute_inverse_on_complex(function, c, unit)
        }
    }
}

/// asin, acos or atan, result expressed in `unit`.
///
/// Real inputs inside the real domain give real results.
pub fn compute_inverse_on_complex<T: MathScalar>(
    function: TrigFunction,
    c: Complex<T>,
    unit: AngleUnit,
) -> Complex<T> {
    if is_complex_nan(c) {
        return complex_nan();
    }
    let real_in_unit_disk = c.im == T::zero() && c.re.abs() <= T::one();
    let result = match function {
        TrigFunction::ArcSine if real_in_unit_disk => Complex::new(c.re.asin(), T::zero()),
        TrigFunction::ArcSine => c.asin(),
        TrigFunction::ArcCosine if real_in_unit_disk => Complex::new(c.re.acos(), T::zero()),
        TrigFunction::ArcCosine => c.acos(),
        TrigFunction::ArcTangent if c.im == T::zero() => Complex::new(c.re.atan(), T::zero()),
        TrigFunction::ArcTangent => {
            // atan has poles at ±i
            if c.re == T::zero() && c.im.abs() == T::one() {
                return complex_nan();
            }
            c.atan()
        }
        TrigFunction::Sine | TrigFunction::Cosine | TrigFunction::Tangent => {
            return compute_direct_on_complex(function, c, unit);
        }
    };
    neglect_real_or_imaginary_part_if_negligible(convert_from_radian(result, unit), c)
}

/// Evaluate with the real function when the input is real
fn real_aware<T: MathScalar>(
    c: Complex<T>,
    real: fn(T) -> T,
    complex: fn(Complex<T>) -> Complex<T>,
) -> Complex<T> {
    if c.im == T::zero() {
        Complex::new(real(c.re), T::zero())
    } else {
        complex(c)
    }
}
