use num_traits::{Float, FloatConst, FromPrimitive, ToPrimitive};
use std::fmt::{Debug, Display};
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

/// A trait comprising all operations required for the numeric kernel.
///
/// This aggregates `num_traits::Float` (providing sin, cos, sqrt, etc.),
/// `FloatConst` (PI, E), and standard arithmetic/debug traits. It is
/// implemented for `f32` (single precision) and `f64` (double precision).
pub trait MathScalar:
    Float
    + FloatConst
    + FromPrimitive
    + ToPrimitive
    + Debug
    + Display
    + Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Rem<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + RemAssign
    + Send
    + Sync
    + 'static
{
}

// Blanket implementation for any type that satisfies the bounds
impl<T> MathScalar for T where
    T: Float
        + FloatConst
        + FromPrimitive
        + ToPrimitive
        + Debug
        + Display
        + Copy
        + Clone
        + PartialEq
        + PartialOrd
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Div<Output = T>
        + Rem<Output = T>
        + Neg<Output = T>
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + RemAssign
        + Send
        + Sync
        + 'static
{
}

// ===== Conversion helpers =====
// Float-to-float conversions never fail in num-traits, the NaN fallback
// only keeps call sites free of unwraps.

/// Convert an `f64` into the working precision
#[inline]
pub(crate) fn from_f64<T: MathScalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// Widen a working-precision value back to `f64`
#[inline]
pub(crate) fn to_f64<T: MathScalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Convert an `i64` into the working precision
#[inline]
pub(crate) fn from_i64<T: MathScalar>(value: i64) -> T {
    T::from_i64(value).unwrap_or_else(T::nan)
}

/// Relative precision used when deciding that a residual part is noise:
/// ten machine epsilons of the working precision.
#[inline]
pub(crate) fn precision<T: MathScalar>() -> T {
    from_f64::<T>(10.0) * T::epsilon()
}

/// Check whether a value has no fractional part (and is finite)
#[inline]
pub(crate) fn is_integer<T: MathScalar>(value: T) -> bool {
    value.is_finite() && value.fract() == T::zero()
}
