use num_traits::{CheckedAdd, Zero};
use std::sync::Arc;

use crate::Expr;
use crate::ast::{ExprKind, ExprType};
use crate::reduction::helpers::{
    checked_recip, fold_approximate_literals, negate, rational_difference, rational_product,
    rational_quotient, rational_sum, split_coefficient, with_coefficient,
};
use crate::reduction::rules::Rule;

// ===== Literal folding =====

rule!(
    FoldApproximateLiteralsRule,
    "fold_approximate_literals",
    120,
    Numeric,
    &[
        ExprType::Addition,
        ExprType::Subtraction,
        ExprType::Multiplication,
        ExprType::Division,
        ExprType::Power,
        ExprType::Opposite,
        ExprType::Trigonometric,
    ],
    |expr: &Expr, context: &RuleContext| { fold_approximate_literals(expr, context) }
);

rule!(
    SubtractComplexLiteralsRule,
    "subtract_complex_literals",
    130,
    Numeric,
    &[ExprType::Subtraction],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Sub(a, b) = &expr.kind
            && (matches!(a.kind, ExprKind::Complex { .. }) || matches!(b.kind, ExprKind::Complex { .. }))
            && let (Some((re1, im1)), Some((re2, im2))) = (a.as_complex_parts(), b.as_complex_parts())
        {
            let (re, im) = (re1 - re2, im1 - im2);
            if re.is_nan() || im.is_nan() {
                return Some(Expr::undefined());
            }
            return Some(if im == 0.0 {
                Expr::float(re)
            } else {
                Expr::complex(re, im)
            });
        }
        None
    }
);

// ===== Addition =====

rule!(
    AddRationalsRule,
    "add_rationals",
    110,
    Algebraic,
    &[ExprType::Addition],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Add(a, b) = &expr.kind {
            return Some(rational_sum(a.as_rational()?, b.as_rational()?));
        }
        None
    }
);

rule!(
    AddZeroRule,
    "add_zero",
    95,
    Algebraic,
    &[ExprType::Addition],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Add(a, b) = &expr.kind {
            if a.is_rational_zero() {
                return Some((**b).clone());
            }
            if b.is_rational_zero() {
                return Some((**a).clone());
            }
        }
        None
    }
);

rule!(
    AddLikeTermsRule,
    "add_like_terms",
    70,
    Algebraic,
    &[ExprType::Addition],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Add(a, b) = &expr.kind {
            let (c1, t1) = split_coefficient(a);
            let (c2, t2) = split_coefficient(b);
            let term = t1.filter(|t| Some(*t) == t2)?;
            let sum = c1.checked_add(&c2)?;
            // 0*M is a zero matrix, not the scalar 0
            if sum.is_zero() && context.is_matrix(term) {
                return None;
            }
            return Some(with_coefficient(sum, Some(term)));
        }
        None
    }
);

rule!(
    AddCollectConstantsRule,
    "add_collect_constants",
    40,
    Algebraic,
    &[ExprType::Addition],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Add(a, b) = &expr.kind else {
            return None;
        };
        // r1 + (r2 + x) = (r1 + r2) + x
        if let Some(r1) = a.as_rational()
            && let ExprKind::Add(inner_a, inner_b) = &b.kind
            && let Some(r2) = inner_a.as_rational()
        {
            return Some(Expr::add_expr(rational_sum(r1, r2), (**inner_b).clone()));
        }
        // (r + x) + y = r + (x + y)
        if let ExprKind::Add(inner_a, inner_b) = &a.kind
            && let Some(r) = inner_a.as_rational()
        {
            let rest = context.reduce(Expr::add_expr((**inner_b).clone(), (**b).clone()));
            return Some(Expr::add_expr(Expr::from_rational(r), rest));
        }
        // x + (r + y) = r + (x + y)
        if a.as_rational().is_none()
            && let ExprKind::Add(inner_a, inner_b) = &b.kind
            && let Some(r) = inner_a.as_rational()
        {
            let rest = context.reduce(Expr::add_expr((**a).clone(), (**inner_b).clone()));
            return Some(Expr::add_expr(Expr::from_rational(r), rest));
        }
        None
    }
);

rule!(
    AddConstantFirstRule,
    "add_constant_first",
    30,
    Algebraic,
    &[ExprType::Addition],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Add(a, b) = &expr.kind
            && b.as_rational().is_some()
            && a.as_rational().is_none()
        {
            return Some(Expr::new(ExprKind::Add(Arc::clone(b), Arc::clone(a))));
        }
        None
    }
);

// ===== Subtraction =====

rule!(
    SubRationalsRule,
    "subtract_rationals",
    110,
    Algebraic,
    &[ExprType::Subtraction],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Sub(a, b) = &expr.kind {
            return Some(rational_difference(a.as_rational()?, b.as_rational()?));
        }
        None
    }
);

rule!(
    SubSelfRule,
    "subtract_self",
    80,
    Algebraic,
    &[ExprType::Subtraction],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Sub(a, b) = &expr.kind
            && a == b
            && !context.is_matrix(a)
        {
            return Some(Expr::integer(0));
        }
        None
    }
);

rule!(
    SubToAdditionRule,
    "subtraction_to_addition",
    10,
    Algebraic,
    &[ExprType::Subtraction],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Sub(a, b) = &expr.kind {
            let negated = context.reduce(negate(b));
            return Some(Expr::add_expr((**a).clone(), negated));
        }
        None
    }
);

// ===== Multiplication =====

rule!(
    MulRationalsRule,
    "multiply_rationals",
    110,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Mul(a, b) = &expr.kind {
            return Some(rational_product(a.as_rational()?, b.as_rational()?));
        }
        None
    }
);

rule!(
    MulZeroRule,
    "multiply_zero",
    95,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Mul(a, b) = &expr.kind
            && ((a.is_rational_zero() && !context.is_matrix(b))
                || (b.is_rational_zero() && !context.is_matrix(a)))
        {
            return Some(Expr::integer(0));
        }
        None
    }
);

rule!(
    MulOneRule,
    "multiply_one",
    95,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Mul(a, b) = &expr.kind {
            if a.is_rational_one() {
                return Some((**b).clone());
            }
            if b.is_rational_one() {
                return Some((**a).clone());
            }
        }
        None
    }
);

rule!(
    MulSameBaseRule,
    "multiply_same_base",
    60,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Mul(a, b) = &expr.kind else {
            return None;
        };
        let (base, e1) = base_and_exponent(a);
        let (other, e2) = base_and_exponent(b);
        if base != other || context.is_matrix(base) {
            return None;
        }
        let exponent = context.reduce(Expr::add_expr(e1, e2));
        // Literal bases only merge into integer powers: 2*2^(1/2) stays
        if base.is_numeric_literal() && exponent.as_integer().is_none() {
            return None;
        }
        Some(Expr::pow(base.clone(), exponent))
    }
);

rule!(
    MulCollectCoefficientsRule,
    "multiply_collect_coefficients",
    40,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Mul(a, b) = &expr.kind else {
            return None;
        };
        // c1 * (c2 * x) = (c1 * c2) * x
        if a.is_numeric_literal()
            && let ExprKind::Mul(inner_a, inner_b) = &b.kind
            && inner_a.is_numeric_literal()
        {
            let coefficient = match (a.as_rational(), inner_a.as_rational()) {
                (Some(r1), Some(r2)) => rational_product(r1, r2),
                _ => {
                    let product = Expr::mul_expr((**a).clone(), (**inner_a).clone());
                    fold_approximate_literals(&product, context)?
                }
            };
            return Some(Expr::mul_expr(coefficient, (**inner_b).clone()));
        }
        // (c * x) * y = c * (x * y)
        if let ExprKind::Mul(inner_a, inner_b) = &a.kind
            && inner_a.is_numeric_literal()
        {
            let rest = context.reduce(Expr::mul_expr((**inner_b).clone(), (**b).clone()));
            return Some(Expr::mul_expr((**inner_a).clone(), rest));
        }
        // x * (c * y) = c * (x * y)
        if !a.is_numeric_literal()
            && let ExprKind::Mul(inner_a, inner_b) = &b.kind
            && inner_a.is_numeric_literal()
        {
            let rest = context.reduce(Expr::mul_expr((**a).clone(), (**inner_b).clone()));
            return Some(Expr::mul_expr((**inner_a).clone(), rest));
        }
        None
    }
);

rule!(
    MulCoefficientFirstRule,
    "multiply_coefficient_first",
    30,
    Algebraic,
    &[ExprType::Multiplication],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Mul(a, b) = &expr.kind
            && b.is_numeric_literal()
            && !a.is_numeric_literal()
        {
            return Some(Expr::new(ExprKind::Mul(Arc::clone(b), Arc::clone(a))));
        }
        None
    }
);

// ===== Division =====

rule!(
    DivByZeroRule,
    "divide_by_zero",
    115,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Div(_, b) = &expr.kind
            && b.is_rational_zero()
        {
            return Some(Expr::undefined());
        }
        None
    }
);

rule!(
    DivRationalsRule,
    "divide_rationals",
    110,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Div(a, b) = &expr.kind {
            return Some(rational_quotient(a.as_rational()?, b.as_rational()?));
        }
        None
    }
);

rule!(
    DivZeroNumeratorRule,
    "divide_zero_numerator",
    95,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Div(a, b) = &expr.kind
            && a.is_rational_zero()
            && !context.is_matrix(b)
        {
            return Some(Expr::integer(0));
        }
        None
    }
);

rule!(
    DivOneRule,
    "divide_one",
    95,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Div(a, b) = &expr.kind
            && b.is_rational_one()
        {
            return Some((**a).clone());
        }
        None
    }
);

rule!(
    DivByRationalRule,
    "divide_by_rational",
    50,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Div(a, b) = &expr.kind {
            let inverse = checked_recip(b.as_rational()?)?;
            return Some(Expr::mul_expr(Expr::from_rational(inverse), (**a).clone()));
        }
        None
    }
);

rule!(
    DivToMultiplicationRule,
    "division_to_multiplication",
    10,
    Algebraic,
    &[ExprType::Division],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Div(a, b) = &expr.kind {
            let reciprocal = context.reduce(Expr::pow((**b).clone(), Expr::integer(-1)));
            return Some(Expr::mul_expr((**a).clone(), reciprocal));
        }
        None
    }
);

// ===== Opposite =====

rule!(
    OppositeRule,
    "opposite_to_product",
    50,
    Algebraic,
    &[ExprType::Opposite],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Opposite(a) = &expr.kind {
            return Some(negate(a));
        }
        None
    }
);

/// `(x, n)` for `x^n`, `(x, 1)` otherwise
fn base_and_exponent(expr: &Expr) -> (&Expr, Expr) {
    match &expr.kind {
        ExprKind::Pow(base, exponent) => (base.as_ref(), (**exponent).clone()),
        _ => (expr, Expr::integer(1)),
    }
}

pub(crate) fn get_arithmetic_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        // Literal folding
        Arc::new(FoldApproximateLiteralsRule),
        Arc::new(SubtractComplexLiteralsRule),
        // Addition
        Arc::new(AddRationalsRule),
        Arc::new(AddZeroRule),
        Arc::new(AddLikeTermsRule),
        Arc::new(AddCollectConstantsRule),
        Arc::new(AddConstantFirstRule),
        // Subtraction
        Arc::new(SubRationalsRule),
        Arc::new(SubSelfRule),
        Arc::new(SubToAdditionRule),
        // Multiplication
        Arc::new(MulRationalsRule),
        Arc::new(MulZeroRule),
        Arc::new(MulOneRule),
        Arc::new(MulSameBaseRule),
        Arc::new(MulCollectCoefficientsRule),
        Arc::new(MulCoefficientFirstRule),
        // Division
        Arc::new(DivByZeroRule),
        Arc::new(DivRationalsRule),
        Arc::new(DivZeroNumeratorRule),
        Arc::new(DivOneRule),
        Arc::new(DivByRationalRule),
        Arc::new(DivToMultiplicationRule),
        // Opposite
        Arc::new(OppositeRule),
    ]
}
