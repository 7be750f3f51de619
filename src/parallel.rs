//! Parallel sampling using Rayon
//!
//! Enable with the `parallel` feature:
//! ```toml
//! symb_calc = { version = "0.1", features = ["parallel"] }
//! ```
//!
//! The tree is shared read-only between workers; every sample binds its
//! variable in its own child [`Context`].

use rayon::prelude::*;

use crate::Expr;
use crate::context::Context;
use crate::evaluator::{Evaluation, approximate_at, approximate_to_f64};
use crate::preferences::Preferences;

/// A value bound to the sampled variable.
///
/// # Examples
/// ```ignore
/// use symb_calc::parallel::Value;
///
/// let vals: Vec<Value> = vec![
///     2.0.into(),           // Number
///     expr.into(),          // Expression
///     Value::Skip,          // Leave the variable as the context has it
/// ];
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    Num(f64),
    Expr(Expr),
    Skip,
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(f64::from(n))
    }
}

impl From<Expr> for Value {
    fn from(e: Expr) -> Self {
        Value::Expr(e)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Skip,
        }
    }
}

/// Parallel counterpart of [`crate::approximate_at_points`]
pub fn approximate_at_points_parallel(
    expr: &Expr,
    variable: &str,
    points: &[f64],
    context: &Context,
    preferences: &Preferences,
) -> Vec<Evaluation<f64>> {
    points
        .par_iter()
        .map(|p| approximate_at(expr, variable, *p, context, preferences))
        .collect()
}

/// Evaluate several expressions, each at its own list of values of `variable`.
///
/// `values[i]` holds the samples of `exprs[i]`; the result has the same
/// shape. Expressions and samples are both spread over the pool.
pub fn evaluate_parallel(
    exprs: &[Expr],
    variable: &str,
    values: &[Vec<Value>],
    context: &Context,
    preferences: &Preferences,
) -> Vec<Vec<Evaluation<f64>>> {
    exprs
        .par_iter()
        .zip(values.par_iter())
        .map(|(expr, samples)| {
            samples
                .par_iter()
                .map(|value| {
                    let mut scope = Context::with_parent(context);
                    match value {
                        Value::Num(n) => scope.bind(variable, Expr::float(*n)),
                        Value::Expr(e) => scope.bind(variable, e.clone()),
                        Value::Skip => {}
                    }
                    approximate_to_f64(expr, &scope, preferences)
                })
                .collect()
        })
        .collect()
}
