//! Symbolic and numeric core of a computer-algebra calculator
//!
//! Expressions are trees of [`Expr`] nodes. They can be
//! - **reduced**: rewritten bottom-up into a canonical, exact form
//!   (`sqrt(8)` becomes `2*2^(1/2)`, `sin(π/6)` becomes `1/2`), or into
//!   `Undefined` when they provably have no value;
//! - **approximated**: evaluated to a complex scalar or a complex matrix
//!   ([`Evaluation`]) in single or double precision.
//!
//! Free symbols are resolved through a chained [`Context`]. The derivative
//! operator is evaluated numerically with Ridders' extrapolation.
//!
//! # Features
//! - Exact rational arithmetic with float fallback on overflow
//! - Special-angle table for trigonometric functions
//! - Matrix arithmetic with shape checks
//! - Branch-cut corrected complex powers and square roots
//! - **Type-safe expression building** with operator overloading
//! - `parallel` feature: sampling on a Rayon pool
//!
//! # Usage Examples
//!
//! ```ignore
//! use symb_calc::{Context, Preferences, reduce, sym};
//!
//! let x = sym("x");
//! let e = x.clone() * 2 + x * 3;
//! let r = reduce(e, &Context::new(), &Preferences::new());
//! assert_eq!(r.to_string(), "5 * x");
//! ```
//!
//! ```ignore
//! use symb_calc::{Context, Expr, Preferences, approximate};
//!
//! let d = Expr::derivative(Expr::pow(Expr::symbol("x"), Expr::integer(2)), Expr::integer(3));
//! let v = approximate::<f64>(&d, &Context::new(), &Preferences::new());
//! assert!((v.to_scalar() - 6.0).abs() < 1e-9);
//! ```

mod ast;
mod context;
mod display;
mod error;
mod evaluator;
pub(crate) mod math;
mod preferences;
mod reduction;
mod symbol;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Constant, DERIVATIVE_VARIABLE, Expr, ExprKind, ExprType, TrigFunction};
pub use context::Context;
pub use display::{Layout, NONREAL_TEXT, UNDEFINED_TEXT, format_float};
pub use error::ExprError;
pub use evaluator::{
    Evaluation, approximate, approximate_at, approximate_at_points, approximate_to_f64,
    characteristic_x_range, numeric_derivative,
};
pub use math::Matrix;
pub use preferences::{
    AngleUnit, ComplexFormat, DEFAULT_SIGNIFICANT_DIGITS, Precision, Preferences, PrintFloatMode,
};
pub use reduction::{
    DEFAULT_MAX_ITERATIONS, Reducer, SymbolicComputation, reduce, reduce_in_place,
};
pub use symbol::{Symbol, sym};
