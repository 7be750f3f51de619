//! Ridders' adaptive numeric differentiation
//!
//! Centered differences with a shrinking step fill the first row of a
//! table; Richardson extrapolation fills the rest, and the entry with the
//! smallest error estimate wins. Estimates whose relative error stays too
//! large are rejected as NaN rather than returned inaccurately.

use tracing::debug;

use super::{Evaluation, evaluate};
use crate::ast::DERIVATIVE_VARIABLE;
use crate::context::Context;
use crate::preferences::Preferences;
use crate::traits::{MathScalar, from_f64, to_f64};
use crate::Expr;

/// Step used when `x` is too small to scale from
const MIN_INITIAL_RATE: f64 = 0.01;
/// Step shrink factor between columns
const RATE_STEP_SIZE: f64 = 2.0;
/// Largest accepted relative error of the final estimate
const MAX_ERROR_RATE_ON_APPROXIMATION: f64 = 0.001;
/// Side of the extrapolation table
const TABLE_SIZE: usize = 10;

/// Derivative of `f` at `x`, or NaN when it cannot be estimated reliably.
///
/// Returns NaN without building the table when `x` or `f(x)` is NaN.
///
/// # Example
/// ```ignore
/// let d = numeric_derivative(|t: f64| t * t, 3.0);
/// assert!((d - 6.0).abs() < 1e-9);
/// ```
pub fn numeric_derivative<T: MathScalar>(mut f: impl FnMut(T) -> T, x: T) -> T {
    if x.is_nan() {
        return T::nan();
    }
    let fx = f(x);
    if fx.is_nan() {
        return T::nan();
    }
    ridders(f, x, fx)
}

/// Centered slope `(f(x+h) - f(x-h)) / 2h`
fn growth_rate_around_abscissa<T: MathScalar>(f: &mut impl FnMut(T) -> T, x: T, h: T) -> T {
    (f(x + h) - f(x - h)) / (from_f64::<T>(2.0) * h)
}

fn ridders<T: MathScalar>(mut f: impl FnMut(T) -> T, x: T, fx: T) -> T {
    let min = T::min_positive_value();
    let min_rate = from_f64::<T>(MIN_INITIAL_RATE);
    let two = from_f64::<T>(2.0);

    let h = if x.abs() < min {
        min_rate
    } else {
        x / from_f64(1000.0)
    };

    // Step scaled to the local curvature
    let mut f2 = f(x + h) - two * fx + f(x - h);
    if f2.abs() < min {
        f2 = min_rate;
    }
    let mut hh = (fx / (f2 / (h * h))).abs().sqrt() / from_f64(10.0);
    if hh.abs() < min {
        hh = min_rate;
    }
    // x + hh and x - hh must be exact so the step is really 2*hh
    hh = (x + hh) - x;

    let step = from_f64::<T>(RATE_STEP_SIZE);
    let step_squared = step * step;
    let mut a = [[T::one(); TABLE_SIZE]; TABLE_SIZE];
    a[0][0] = growth_rate_around_abscissa(&mut f, x, hh);
    let mut err = T::max_value();
    let mut ans = T::zero();

    for i in 1..TABLE_SIZE {
        hh = hh / step;
        hh = (x + hh) - x;
        a[0][i] = growth_rate_around_abscissa(&mut f, x, hh);
        let mut fac = step_squared;
        for j in 1..=i {
            a[j][i] = (a[j - 1][i] * fac - a[j - 1][i - 1]) / (fac - T::one());
            fac = fac * step_squared;
            let errt = (a[j][i] - a[j - 1][i])
                .abs()
                .max((a[j][i] - a[j - 1][i - 1]).abs());
            if errt < err {
                err = errt;
                ans = a[j][i];
            }
        }
        // higher orders stopped helping
        if (a[i][i] - a[i - 1][i - 1]).abs() > two * err {
            break;
        }
    }

    if (err / ans).abs() > from_f64(MAX_ERROR_RATE_ON_APPROXIMATION) || err.is_nan() {
        debug!(target: "derivative", x = %x, err = %err, ans = %ans, "estimate rejected");
        return T::nan();
    }
    if err < min {
        return ans;
    }
    // Round to the digits the error estimate vouches for
    let ten = from_f64::<T>(10.0);
    let magnitude = ten.powf(err.abs().log10().trunc() + two);
    (ans / magnitude).round() * magnitude
}

/// Evaluate `diff(function, point)`: `function` is sampled with `x` bound in
/// a fresh child context for every abscissa.
pub(super) fn evaluate_derivative<T: MathScalar>(
    function: &Expr,
    point: &Expr,
    context: &Context,
    preferences: &Preferences,
) -> Evaluation<T> {
    let x = evaluate::<T>(point, context, preferences).to_scalar();
    let sample = |t: T| {
        let mut scope = Context::with_parent(context);
        scope.bind(DERIVATIVE_VARIABLE, Expr::float(to_f64(t)));
        evaluate::<T>(function, &scope, preferences).to_scalar()
    };
    Evaluation::real(numeric_derivative(sample, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_square_at_three() {
        let d = numeric_derivative(|t: f64| t * t, 3.0);
        assert!((d - 6.0).abs() < 1e-9, "got {}", d);
    }

    #[test]
    fn test_single_precision() {
        let d = numeric_derivative(|t: f32| t * t, 3.0);
        assert!((d - 6.0).abs() < 1e-3, "got {}", d);
    }

    #[test]
    fn test_nan_value_samples_once() {
        let calls = Cell::new(0);
        let d = numeric_derivative(
            |_t: f64| {
                calls.set(calls.get() + 1);
                f64::NAN
            },
            1.0,
        );
        assert!(d.is_nan());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_nan_abscissa_never_samples() {
        let calls = Cell::new(0);
        let d = numeric_derivative(
            |t: f64| {
                calls.set(calls.get() + 1);
                t
            },
            f64::NAN,
        );
        assert!(d.is_nan());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_jump_is_rejected() {
        // centered slopes double at every step, no estimate converges
        let d = numeric_derivative(|t: f64| if t > 0.0 { 1.0 } else { 0.0 }, 0.0);
        assert!(d.is_nan());
    }

    #[test]
    fn test_flat_function_at_origin() {
        let d = numeric_derivative(|t: f64| t * t, 0.0);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_sine_derivative() {
        let d = numeric_derivative(f64::sin, 1.0);
        assert!((d - 1.0f64.cos()).abs() < 1e-6, "got {}", d);
    }
}
