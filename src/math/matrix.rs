//! Complex matrices for evaluation results

use num_complex::Complex;

use super::{is_complex_nan, negate_complex};
use crate::error::ExprError;
use crate::traits::MathScalar;

/// Row-major rectangular matrix of complex values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: MathScalar> {
    rows: usize,
    cols: usize,
    entries: Vec<Complex<T>>,
}

impl<T: MathScalar> Matrix<T> {
    pub fn new(rows: usize, cols: usize, entries: Vec<Complex<T>>) -> Result<Self, ExprError> {
        let expected = rows * cols;
        if rows == 0 || cols == 0 || entries.len() != expected {
            return Err(ExprError::MatrixShape {
                rows,
                cols,
                expected,
                got: entries.len(),
            });
        }
        Ok(Matrix {
            rows,
            cols,
            entries,
        })
    }

    /// n×n identity
    pub fn identity(n: usize) -> Self {
        let one = Complex::new(T::one(), T::zero());
        let zero = Complex::new(T::zero(), T::zero());
        let entries = (0..n * n)
            .map(|k| if k / n == k % n { one } else { zero })
            .collect();
        Matrix {
            rows: n,
            cols: n,
            entries,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn entries(&self) -> &[Complex<T>] {
        &self.entries
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Complex<T>> {
        if row < self.rows && col < self.cols {
            Some(self.entries[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// A matrix with any NaN entry counts as NaN
    pub fn is_nan(&self) -> bool {
        self.entries.iter().any(|c| is_complex_nan(*c))
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    pub fn map(&self, f: impl Fn(Complex<T>) -> Complex<T>) -> Self {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            entries: self.entries.iter().map(|c| f(*c)).collect(),
        }
    }

    /// Elementwise combination; `None` when shapes differ
    pub fn zip_with(
        &self,
        other: &Self,
        f: impl Fn(Complex<T>, Complex<T>) -> Complex<T>,
    ) -> Option<Self> {
        if !self.same_shape(other) {
            return None;
        }
        Some(Matrix {
            rows: self.rows,
            cols: self.cols,
            entries: self
                .entries
                .iter()
                .zip(&other.entries)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    pub fn opposite(&self) -> Self {
        self.map(negate_complex)
    }

    /// Matrix product; fails when `self.cols != other.rows`
    pub fn multiply(&self, other: &Self) -> Result<Self, ExprError> {
        if self.cols != other.rows {
            return Err(ExprError::IncompatibleMatrices {
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: other.rows,
                right_cols: other.cols,
            });
        }
        let mut entries = Vec::with_capacity(self.rows * other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = Complex::new(T::zero(), T::zero());
                for k in 0..self.cols {
                    sum = sum + self.entries[i * self.cols + k] * other.entries[k * other.cols + j];
                }
                entries.push(sum);
            }
        }
        Ok(Matrix {
            rows: self.rows,
            cols: other.cols,
            entries,
        })
    }

    /// Non-negative integer power of a square matrix by repeated squaring
    pub fn pow(&self, exponent: u32) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let mut result = Matrix::identity(self.rows);
        let mut base = self.clone();
        let mut n = exponent;
        while n > 0 {
            if n & 1 == 1 {
                result = result.multiply(&base).ok()?;
            }
            n >>= 1;
            if n > 0 {
                base = base.multiply(&base).ok()?;
            }
        }
        Some(result)
    }

    /// Widen to double precision
    pub fn to_f64(&self) -> Matrix<f64> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            entries: self
                .entries
                .iter()
                .map(|c| {
                    Complex::new(
                        crate::traits::to_f64(c.re),
                        crate::traits::to_f64(c.im),
                    )
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn real(entries: &[f64]) -> Vec<Complex<f64>> {
        entries.iter().map(|v| Complex::new(*v, 0.0)).collect()
    }

    #[test]
    fn test_shape_checked() {
        assert!(Matrix::<f64>::new(2, 2, real(&[1.0, 2.0, 3.0])).is_err());
        assert!(Matrix::<f64>::new(1, 3, real(&[1.0, 2.0, 3.0])).is_ok());
    }

    #[test]
    fn test_multiply() {
        let a = Matrix::new(2, 2, real(&[1.0, 2.0, 3.0, 4.0])).unwrap();
        let b = Matrix::new(2, 1, real(&[5.0, 6.0])).unwrap();
        let p = a.multiply(&b).unwrap();
        assert_eq!(p.rows(), 2);
        assert_eq!(p.cols(), 1);
        assert_eq!(p.entries(), real(&[17.0, 39.0]).as_slice());
        assert!(b.multiply(&b).is_err());
    }

    #[test]
    fn test_pow() {
        let a = Matrix::new(2, 2, real(&[1.0, 1.0, 0.0, 1.0])).unwrap();
        let cube = a.pow(3).unwrap();
        assert_eq!(cube.entries(), real(&[1.0, 3.0, 0.0, 1.0]).as_slice());
        assert_eq!(a.pow(0).unwrap(), Matrix::identity(2));
        let row = Matrix::new(1, 2, real(&[1.0, 2.0])).unwrap();
        assert!(row.pow(2).is_none());
    }

    #[test]
    fn test_nan_entry_poisons_matrix() {
        let m = Matrix::new(1, 2, real(&[1.0, f64::NAN])).unwrap();
        assert!(m.is_nan());
        assert!(!m.opposite().get(0, 0).unwrap().re.is_nan());
    }
}
