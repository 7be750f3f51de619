//! Numeric evaluation of expression trees
//!
//! Every node evaluates its children first and then combines their
//! [`Evaluation`]s. Binary operators describe the combination through
//! `BinaryOperation`, which has one entry point per operand shape:
//!
//! ```text
//!             right: complex            right: matrix
//! left: complex   on_complexes            on_complex_and_matrix
//! left: matrix    on_matrix_and_complex   on_matrices
//! ```
//!
//! NaN is total: any NaN operand (a matrix counts as NaN when one of its
//! entries is) makes the whole result NaN.
//!
//! # Example
//!
//! ```ignore
//! use symb_calc::{Context, Expr, Preferences, approximate};
//!
//! let e = Expr::square_root(Expr::integer(-1));
//! let value = approximate::<f64>(&e, &Context::new(), &Preferences::new());
//! assert_eq!(value.as_complex().unwrap().re, 0.0);
//! ```

use num_complex::Complex;
use std::sync::Arc;

use crate::ast::{Constant, ExprKind};
use crate::context::Context;
use crate::math::trigonometry::compute_direct_on_complex;
use crate::math::{
    Matrix, complex_divide, complex_power, complex_sqrt, is_complex_nan, negate_complex,
};
use crate::preferences::{Precision, Preferences};
use crate::traits::{MathScalar, from_f64, from_i64, is_integer};
use crate::Expr;

mod derivative;
mod evaluation;
mod range;

pub use derivative::numeric_derivative;
pub use evaluation::Evaluation;
pub use range::characteristic_x_range;

/// Approximate `expr` in precision `T`
pub fn approximate<T: MathScalar>(
    expr: &Expr,
    context: &Context,
    preferences: &Preferences,
) -> Evaluation<T> {
    evaluate(expr, context, preferences)
}

/// Approximate in the precision selected by `preferences`, widened to `f64`
pub fn approximate_to_f64(
    expr: &Expr,
    context: &Context,
    preferences: &Preferences,
) -> Evaluation<f64> {
    match preferences.precision {
        Precision::Single => evaluate::<f32>(expr, context, preferences).to_f64(),
        Precision::Double => evaluate::<f64>(expr, context, preferences),
    }
}

/// Approximate with `variable` bound to `value` in a fresh child context
pub fn approximate_at(
    expr: &Expr,
    variable: &str,
    value: f64,
    context: &Context,
    preferences: &Preferences,
) -> Evaluation<f64> {
    let mut scope = Context::with_parent(context);
    scope.bind(variable, Expr::float(value));
    approximate_to_f64(expr, &scope, preferences)
}

/// Sample `expr` at each point, one context per sample
pub fn approximate_at_points(
    expr: &Expr,
    variable: &str,
    points: &[f64],
    context: &Context,
    preferences: &Preferences,
) -> Vec<Evaluation<f64>> {
    points
        .iter()
        .map(|p| approximate_at(expr, variable, *p, context, preferences))
        .collect()
}

pub(crate) fn evaluate<T: MathScalar>(
    expr: &Expr,
    context: &Context,
    preferences: &Preferences,
) -> Evaluation<T> {
    let eval = |e: &Arc<Expr>| evaluate::<T>(e, context, preferences);
    match &expr.kind {
        ExprKind::Undefined | ExprKind::Unit(_) => Evaluation::nan(),
        ExprKind::Rational(r) => {
            Evaluation::real(from_i64::<T>(*r.numer()) / from_i64::<T>(*r.denom()))
        }
        ExprKind::Float(v) => Evaluation::real(from_f64(*v)),
        ExprKind::Complex { re, im } => Evaluation::complex(from_f64(*re), from_f64(*im)),
        ExprKind::Constant(c) => match c {
            Constant::Pi => Evaluation::real(T::PI()),
            Constant::E => Evaluation::real(T::E()),
            Constant::I => Evaluation::complex(T::zero(), T::one()),
        },
        ExprKind::Symbol(name) => match context.resolve(name) {
            Some((value, scope)) => evaluate(value, &scope, preferences),
            None => Evaluation::nan(),
        },
        ExprKind::Matrix {
            rows,
            cols,
            entries,
        } => {
            let mut values = Vec::with_capacity(entries.len());
            for entry in entries {
                match eval(entry) {
                    Evaluation::Complex(c) if !is_complex_nan(c) => values.push(c),
                    _ => return Evaluation::nan(),
                }
            }
            Evaluation::matrix(*rows, *cols, values).unwrap_or_else(|_| Evaluation::nan())
        }
        ExprKind::Add(a, b) => map_binary(eval(a), eval(b), &Addition),
        ExprKind::Sub(a, b) => map_binary(eval(a), eval(b), &Subtraction),
        ExprKind::Mul(a, b) => map_binary(eval(a), eval(b), &Multiplication),
        ExprKind::Div(a, b) => map_binary(eval(a), eval(b), &Division),
        ExprKind::Pow(a, b) => map_binary(eval(a), eval(b), &Power),
        ExprKind::Opposite(a) => match eval(a) {
            e if e.is_nan() => Evaluation::nan(),
            Evaluation::Complex(c) => Evaluation::Complex(negate_complex(c)),
            Evaluation::Matrix(m) => Evaluation::Matrix(m.opposite()),
        },
        ExprKind::SquareRoot(a) => map_scalar(eval(a), complex_sqrt),
        ExprKind::Trig(function, a) => map_scalar(eval(a), |c| {
            compute_direct_on_complex(*function, c, preferences.angle_unit)
        }),
        ExprKind::Derivative { function, point } => {
            derivative::evaluate_derivative(function, point, context, preferences)
        }
    }
}

/// Scalar-only unary function: matrices and NaN give NaN
fn map_scalar<T: MathScalar>(
    operand: Evaluation<T>,
    f: impl Fn(Complex<T>) -> Complex<T>,
) -> Evaluation<T> {
    match operand {
        Evaluation::Complex(c) if !is_complex_nan(c) => Evaluation::Complex(f(c)),
        _ => Evaluation::nan(),
    }
}

// ===== Binary operations =====

/// How a binary operator combines each pair of operand shapes
pub(crate) trait BinaryOperation<T: MathScalar> {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T>;

    fn on_matrix_and_complex(&self, m: &Matrix<T>, c: Complex<T>) -> Evaluation<T> {
        Evaluation::Matrix(m.map(|entry| self.on_complexes(entry, c)))
    }

    fn on_complex_and_matrix(&self, c: Complex<T>, m: &Matrix<T>) -> Evaluation<T> {
        Evaluation::Matrix(m.map(|entry| self.on_complexes(c, entry)))
    }

    fn on_matrices(&self, m: &Matrix<T>, n: &Matrix<T>) -> Evaluation<T> {
        m.zip_with(n, |a, b| self.on_complexes(a, b))
            .map_or_else(Evaluation::nan, Evaluation::Matrix)
    }
}

pub(crate) fn map_binary<T: MathScalar>(
    left: Evaluation<T>,
    right: Evaluation<T>,
    operation: &impl BinaryOperation<T>,
) -> Evaluation<T> {
    if left.is_nan() || right.is_nan() {
        return Evaluation::nan();
    }
    let result = match (&left, &right) {
        (Evaluation::Complex(c), Evaluation::Complex(d)) => {
            Evaluation::Complex(operation.on_complexes(*c, *d))
        }
        (Evaluation::Matrix(m), Evaluation::Complex(c)) => operation.on_matrix_and_complex(m, *c),
        (Evaluation::Complex(c), Evaluation::Matrix(m)) => operation.on_complex_and_matrix(*c, m),
        (Evaluation::Matrix(m), Evaluation::Matrix(n)) => operation.on_matrices(m, n),
    };
    if result.is_nan() {
        Evaluation::nan()
    } else {
        result
    }
}

pub(crate) struct Addition;

impl<T: MathScalar> BinaryOperation<T> for Addition {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T> {
        c + d
    }
}

pub(crate) struct Subtraction;

impl<T: MathScalar> BinaryOperation<T> for Subtraction {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T> {
        Complex::new(c.re - d.re, c.im - d.im)
    }

    /// `c - M` is computed as `-(M - c)`
    fn on_complex_and_matrix(&self, c: Complex<T>, m: &Matrix<T>) -> Evaluation<T> {
        match self.on_matrix_and_complex(m, c) {
            Evaluation::Matrix(difference) => Evaluation::Matrix(difference.opposite()),
            other => other,
        }
    }
}

pub(crate) struct Multiplication;

impl<T: MathScalar> BinaryOperation<T> for Multiplication {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T> {
        c * d
    }

    fn on_matrices(&self, m: &Matrix<T>, n: &Matrix<T>) -> Evaluation<T> {
        m.multiply(n).map_or_else(|_| Evaluation::nan(), Evaluation::Matrix)
    }
}

pub(crate) struct Division;

impl<T: MathScalar> BinaryOperation<T> for Division {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T> {
        complex_divide(c, d)
    }

    // no matrix inversion
    fn on_complex_and_matrix(&self, _c: Complex<T>, _m: &Matrix<T>) -> Evaluation<T> {
        Evaluation::nan()
    }

    fn on_matrices(&self, _m: &Matrix<T>, _n: &Matrix<T>) -> Evaluation<T> {
        Evaluation::nan()
    }
}

pub(crate) struct Power;

impl<T: MathScalar> BinaryOperation<T> for Power {
    fn on_complexes(&self, c: Complex<T>, d: Complex<T>) -> Complex<T> {
        complex_power(c, d)
    }

    /// Square matrices raised to a non-negative integer
    fn on_matrix_and_complex(&self, m: &Matrix<T>, c: Complex<T>) -> Evaluation<T> {
        if c.im != T::zero() || !is_integer(c.re) || c.re < T::zero() {
            return Evaluation::nan();
        }
        c.re.to_u32()
            .and_then(|n| m.pow(n))
            .map_or_else(Evaluation::nan, Evaluation::Matrix)
    }

    fn on_complex_and_matrix(&self, _c: Complex<T>, _m: &Matrix<T>) -> Evaluation<T> {
        Evaluation::nan()
    }

    fn on_matrices(&self, _m: &Matrix<T>, _n: &Matrix<T>) -> Evaluation<T> {
        Evaluation::nan()
    }
}
