//! Typed symbol handles and operator overloading for building trees in code
//!
//! # Example
//! ```ignore
//! use symb_calc::{sym, Expr};
//!
//! let x = sym("x");
//! let expr = x.clone().pow(2) + x.sin();  // x^2 + sin(x)
//! ```
//!
//! Integer literals build exact rationals, `f64` literals build floats.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::Expr;
use crate::ast::{ExprKind, TrigFunction};

/// Handle on a free variable
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Symbol(Arc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn to_expr(&self) -> Expr {
        Expr::new(ExprKind::Symbol(Arc::clone(&self.0)))
    }

    /// Raise to a power
    pub fn pow(self, exponent: impl Into<Expr>) -> Expr {
        Expr::pow(self.to_expr(), exponent.into())
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate unary function methods for a type
/// - For Symbol: converts via to_expr() first
/// - For Expr: uses self directly
macro_rules! impl_math_functions {
    ($type:ty, $converter:expr) => {
        impl $type {
            pub fn sin(self) -> Expr {
                Expr::trig(TrigFunction::Sine, $converter(self))
            }
            pub fn cos(self) -> Expr {
                Expr::trig(TrigFunction::Cosine, $converter(self))
            }
            pub fn tan(self) -> Expr {
                Expr::trig(TrigFunction::Tangent, $converter(self))
            }
            pub fn asin(self) -> Expr {
                Expr::trig(TrigFunction::ArcSine, $converter(self))
            }
            pub fn acos(self) -> Expr {
                Expr::trig(TrigFunction::ArcCosine, $converter(self))
            }
            pub fn atan(self) -> Expr {
                Expr::trig(TrigFunction::ArcTangent, $converter(self))
            }
            pub fn sqrt(self) -> Expr {
                Expr::square_root($converter(self))
            }
        }
    };
}

impl_math_functions!(Symbol, |s: Symbol| s.to_expr());
impl_math_functions!(Expr, |e: Expr| e);

impl Expr {
    /// Raise to a power; `Expr::pow(base, exponent)` is the two-operand form
    #[inline]
    pub fn pow_of(self, exponent: impl Into<Expr>) -> Expr {
        Expr::pow(self, exponent.into())
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.to_expr()
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        s.to_expr()
    }
}

// ===== Operators =====

macro_rules! impl_binary_ops {
    ($lhs:ty, $rhs:ty) => {
        impl Add<$rhs> for $lhs {
            type Output = Expr;
            fn add(self, rhs: $rhs) -> Expr {
                Expr::add_expr(self.into(), rhs.into())
            }
        }
        impl Sub<$rhs> for $lhs {
            type Output = Expr;
            fn sub(self, rhs: $rhs) -> Expr {
                Expr::sub_expr(self.into(), rhs.into())
            }
        }
        impl Mul<$rhs> for $lhs {
            type Output = Expr;
            fn mul(self, rhs: $rhs) -> Expr {
                Expr::mul_expr(self.into(), rhs.into())
            }
        }
        impl Div<$rhs> for $lhs {
            type Output = Expr;
            fn div(self, rhs: $rhs) -> Expr {
                Expr::div_expr(self.into(), rhs.into())
            }
        }
    };
}

impl_binary_ops!(Symbol, Symbol);
impl_binary_ops!(Symbol, Expr);
impl_binary_ops!(Symbol, f64);
impl_binary_ops!(Symbol, i32);

impl_binary_ops!(Expr, Expr);
impl_binary_ops!(Expr, Symbol);
impl_binary_ops!(Expr, f64);
impl_binary_ops!(Expr, i32);

impl_binary_ops!(f64, Symbol);
impl_binary_ops!(f64, Expr);
impl_binary_ops!(i32, Symbol);
impl_binary_ops!(i32, Expr);

impl Neg for Symbol {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::opposite(self.to_expr())
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::opposite(self)
    }
}

/// Convenience function to create a Symbol
pub fn sym(name: &str) -> Symbol {
    Symbol::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_basic() {
        let x = sym("x");
        assert_eq!(x.name(), "x");
        assert_eq!(x.to_expr(), Expr::symbol("x"));
    }

    #[test]
    fn test_operators_build_trees() {
        let x = sym("x");
        let y = sym("y");
        assert_eq!(
            x.clone() + y.clone(),
            Expr::add_expr(Expr::symbol("x"), Expr::symbol("y"))
        );
        assert_eq!(
            2 * x.clone(),
            Expr::mul_expr(Expr::integer(2), Expr::symbol("x"))
        );
        assert_eq!(
            x.clone() - 0.5,
            Expr::sub_expr(Expr::symbol("x"), Expr::float(0.5))
        );
        assert_eq!(-y, Expr::opposite(Expr::symbol("y")));
    }

    #[test]
    fn test_functions_and_powers() {
        let x = sym("x");
        assert_eq!(x.clone().sin().to_string(), "sin(x)");
        assert_eq!(x.clone().pow(2).to_string(), "x^2");
        assert_eq!(
            x.clone().sqrt(),
            Expr::square_root(Expr::symbol("x"))
        );
        assert_eq!(
            (x.clone() + 1).pow_of(2).to_string(),
            "(x + 1)^2"
        );
    }
}
