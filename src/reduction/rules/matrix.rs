use std::sync::Arc;

use crate::Expr;
use crate::ast::{DERIVATIVE_VARIABLE, ExprKind, ExprType};
use crate::context::Context;
use crate::reduction::rules::{Rule, RuleContext};

/// Powers above this are left unreduced instead of expanded
const MAX_EXPANDED_MATRIX_POWER: i64 = 64;

/// An expansion whose partial product outgrows this many nodes is abandoned
const MAX_EXPANDED_MATRIX_NODES: usize = 256;

/// Shape and entries of a matrix literal
struct MatrixView<'e> {
    rows: usize,
    cols: usize,
    entries: &'e [Arc<Expr>],
}

impl<'e> MatrixView<'e> {
    fn of(expr: &'e Expr) -> Option<Self> {
        match &expr.kind {
            ExprKind::Matrix {
                rows,
                cols,
                entries,
            } => Some(MatrixView {
                rows: *rows,
                cols: *cols,
                entries,
            }),
            _ => None,
        }
    }

    fn at(&self, row: usize, col: usize) -> &Expr {
        &self.entries[row * self.cols + col]
    }

    fn same_shape(&self, other: &MatrixView) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// New matrix of the same shape, each entry built then reduced
    fn map(&self, context: &RuleContext, f: impl Fn(&Expr) -> Expr) -> Expr {
        let entries = self
            .entries
            .iter()
            .map(|e| Arc::new(context.reduce(f(e))))
            .collect();
        Expr::matrix_from_arcs(self.rows, self.cols, entries)
    }
}

fn identity(size: usize) -> Expr {
    let entries = (0..size * size)
        .map(|i| Arc::new(Expr::integer(i64::from(i / size == i % size))))
        .collect();
    Expr::matrix_from_arcs(size, size, entries)
}

/// Matrix product, `None` when the inner dimensions differ
fn product(a: &MatrixView, b: &MatrixView, context: &RuleContext) -> Option<Expr> {
    if a.cols != b.rows {
        return None;
    }
    let mut entries = Vec::with_capacity(a.rows * b.cols);
    for i in 0..a.rows {
        for j in 0..b.cols {
            let sum = (1..a.cols).fold(
                Expr::mul_expr(a.at(i, 0).clone(), b.at(0, j).clone()),
                |acc, k| Expr::add_expr(acc, Expr::mul_expr(a.at(i, k).clone(), b.at(k, j).clone())),
            );
            entries.push(Arc::new(context.reduce(sum)));
        }
    }
    Some(Expr::matrix_from_arcs(a.rows, b.cols, entries))
}

rule!(
    NestedMatrixRule,
    "nested_matrix",
    140,
    Matrix,
    &[ExprType::Matrix],
    |expr: &Expr, context: &RuleContext| {
        let view = MatrixView::of(expr)?;
        view.entries
            .iter()
            .any(|e| context.is_matrix(e))
            .then(Expr::undefined)
    }
);

rule!(
    MatrixAdditionRule,
    "matrix_addition",
    130,
    Matrix,
    &[ExprType::Addition, ExprType::Subtraction],
    |expr: &Expr, context: &RuleContext| {
        let (a, b, subtract) = match &expr.kind {
            ExprKind::Add(a, b) => (a, b, false),
            ExprKind::Sub(a, b) => (a, b, true),
            _ => return None,
        };
        let combine = |x: &Expr, y: &Expr| {
            if subtract {
                Expr::sub_expr(x.clone(), y.clone())
            } else {
                Expr::add_expr(x.clone(), y.clone())
            }
        };
        match (MatrixView::of(a), MatrixView::of(b)) {
            (Some(m), Some(n)) => {
                if !m.same_shape(&n) {
                    return Some(Expr::undefined());
                }
                let entries = m
                    .entries
                    .iter()
                    .zip(n.entries)
                    .map(|(x, y)| Arc::new(context.reduce(combine(x, y))))
                    .collect();
                Some(Expr::matrix_from_arcs(m.rows, m.cols, entries))
            }
            (Some(m), None) if !context.is_matrix(b) => Some(m.map(context, |x| combine(x, b))),
            (None, Some(n)) if !context.is_matrix(a) => Some(if subtract {
                // s - M = -(M - s)
                n.map(context, |y| Expr::opposite(Expr::sub_expr(y.clone(), (**a).clone())))
            } else {
                n.map(context, |y| Expr::add_expr((**a).clone(), y.clone()))
            }),
            _ => None,
        }
    }
);

rule!(
    MatrixMultiplicationRule,
    "matrix_multiplication",
    130,
    Matrix,
    &[ExprType::Multiplication],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Mul(a, b) = &expr.kind else {
            return None;
        };
        match (MatrixView::of(a), MatrixView::of(b)) {
            (Some(m), Some(n)) => Some(product(&m, &n, context).unwrap_or_else(Expr::undefined)),
            (Some(m), None) if !context.is_matrix(b) => {
                Some(m.map(context, |x| Expr::mul_expr((**b).clone(), x.clone())))
            }
            (None, Some(n)) if !context.is_matrix(a) => {
                Some(n.map(context, |y| Expr::mul_expr((**a).clone(), y.clone())))
            }
            _ => None,
        }
    }
);

rule!(
    MatrixDivisionRule,
    "matrix_division",
    130,
    Matrix,
    &[ExprType::Division],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Div(a, b) = &expr.kind else {
            return None;
        };
        if context.is_matrix(b) {
            return Some(Expr::undefined());
        }
        let m = MatrixView::of(a)?;
        Some(m.map(context, |x| Expr::div_expr(x.clone(), (**b).clone())))
    }
);

rule!(
    MatrixPowerRule,
    "matrix_power",
    130,
    Matrix,
    &[ExprType::Power],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Pow(base, exponent) = &expr.kind else {
            return None;
        };
        if context.is_matrix(exponent) {
            return Some(Expr::undefined());
        }
        let m = MatrixView::of(base)?;
        // non-integer and symbolic exponents stay as written
        let n = exponent.as_integer()?;
        if n < 0 || m.rows != m.cols {
            return Some(Expr::undefined());
        }
        if n > MAX_EXPANDED_MATRIX_POWER {
            return None;
        }
        if n == 0 {
            return Some(identity(m.rows));
        }
        let mut result = (**base).clone();
        for _ in 1..n {
            let current = MatrixView::of(&result)?;
            result = product(&current, &m, context)?;
            if result.node_count() > MAX_EXPANDED_MATRIX_NODES {
                return None;
            }
        }
        Some(result)
    }
);

rule!(
    DerivativeOfMatrixRule,
    "derivative_of_matrix",
    130,
    Matrix,
    &[ExprType::Derivative],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Derivative { function, point } = &expr.kind else {
            return None;
        };
        let mut scope = Context::with_parent(context.context);
        scope.hide(DERIVATIVE_VARIABLE);
        (function.deep_is_matrix(&scope) || context.is_matrix(point)).then(Expr::undefined)
    }
);

pub(crate) fn get_matrix_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(NestedMatrixRule),
        Arc::new(MatrixAdditionRule),
        Arc::new(MatrixMultiplicationRule),
        Arc::new(MatrixDivisionRule),
        Arc::new(MatrixPowerRule),
        Arc::new(DerivativeOfMatrixRule),
    ]
}
