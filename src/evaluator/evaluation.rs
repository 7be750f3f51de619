//! Result of numeric evaluation: a complex scalar or a complex matrix

use num_complex::Complex;

use crate::Expr;
use crate::error::ExprError;
use crate::math::{Matrix, complex_nan, is_complex_nan};
use crate::traits::{MathScalar, to_f64};

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation<T: MathScalar> {
    Complex(Complex<T>),
    Matrix(Matrix<T>),
}

impl<T: MathScalar> Evaluation<T> {
    /// The "no computable value" evaluation
    pub fn nan() -> Self {
        Evaluation::Complex(complex_nan())
    }

    pub fn real(value: T) -> Self {
        Evaluation::Complex(Complex::new(value, T::zero()))
    }

    pub fn complex(re: T, im: T) -> Self {
        Evaluation::Complex(Complex::new(re, im))
    }

    pub fn matrix(rows: usize, cols: usize, entries: Vec<Complex<T>>) -> Result<Self, ExprError> {
        Matrix::new(rows, cols, entries).map(Evaluation::Matrix)
    }

    /// NaN scalar, or a matrix with at least one NaN entry
    pub fn is_nan(&self) -> bool {
        match self {
            Evaluation::Complex(c) => is_complex_nan(*c),
            Evaluation::Matrix(m) => m.is_nan(),
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, Evaluation::Matrix(_))
    }

    pub fn as_complex(&self) -> Option<Complex<T>> {
        match self {
            Evaluation::Complex(c) => Some(*c),
            Evaluation::Matrix(_) => None,
        }
    }

    /// Real value of a real scalar; NaN for non-real scalars and matrices
    pub fn to_scalar(&self) -> T {
        match self {
            Evaluation::Complex(c) if c.im == T::zero() => c.re,
            _ => T::nan(),
        }
    }

    /// Widen to double precision
    pub fn to_f64(&self) -> Evaluation<f64> {
        match self {
            Evaluation::Complex(c) => Evaluation::Complex(Complex::new(to_f64(c.re), to_f64(c.im))),
            Evaluation::Matrix(m) => Evaluation::Matrix(m.to_f64()),
        }
    }

    /// Literal expression carrying this value: Undefined for NaN, a Float
    /// for real values, a complex literal otherwise, a matrix of those.
    pub fn to_expr(&self) -> Expr {
        match self {
            Evaluation::Complex(c) => complex_literal(to_f64(c.re), to_f64(c.im)),
            Evaluation::Matrix(m) => {
                if m.is_nan() {
                    return Expr::undefined();
                }
                let entries = m
                    .entries()
                    .iter()
                    .map(|c| complex_literal(to_f64(c.re), to_f64(c.im)))
                    .collect();
                Expr::matrix(m.rows(), m.cols(), entries).unwrap_or_else(|_| Expr::undefined())
            }
        }
    }
}

fn complex_literal(re: f64, im: f64) -> Expr {
    if re.is_nan() || im.is_nan() {
        Expr::undefined()
    } else if im == 0.0 {
        Expr::float(re)
    } else {
        Expr::complex(re, im)
    }
}

impl<T: MathScalar> From<Complex<T>> for Evaluation<T> {
    fn from(c: Complex<T>) -> Self {
        Evaluation::Complex(c)
    }
}

impl<T: MathScalar> From<Matrix<T>> for Evaluation<T> {
    fn from(m: Matrix<T>) -> Self {
        Evaluation::Matrix(m)
    }
}
