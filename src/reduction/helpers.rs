//! Shared helpers for reduction rules: exact rational arithmetic with
//! overflow fallback, coefficients, negation and literal folding.

use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedMul, CheckedSub, One, Signed, Zero};

use super::rules::RuleContext;
use crate::Expr;
use crate::ast::ExprKind;
use crate::evaluator::evaluate;

/// Largest integer whose square factors are extracted from a square root
const SQUARE_FACTOR_SEARCH_LIMIT: i64 = 1_000_000;

#[inline]
pub(crate) fn rational_to_f64(r: Rational64) -> f64 {
    *r.numer() as f64 / *r.denom() as f64
}

/// Exact result when it fits, otherwise a Float approximation
pub(crate) fn exact_or_float(exact: Option<Rational64>, approximate: impl FnOnce() -> f64) -> Expr {
    match exact {
        Some(r) => Expr::from_rational(r),
        None => Expr::float(approximate()),
    }
}

pub(crate) fn rational_sum(a: Rational64, b: Rational64) -> Expr {
    exact_or_float(a.checked_add(&b), || rational_to_f64(a) + rational_to_f64(b))
}

pub(crate) fn rational_difference(a: Rational64, b: Rational64) -> Expr {
    exact_or_float(a.checked_sub(&b), || rational_to_f64(a) - rational_to_f64(b))
}

pub(crate) fn rational_product(a: Rational64, b: Rational64) -> Expr {
    exact_or_float(a.checked_mul(&b), || rational_to_f64(a) * rational_to_f64(b))
}

/// `a/b`, Undefined for a zero divisor
pub(crate) fn rational_quotient(a: Rational64, b: Rational64) -> Expr {
    if b.is_zero() {
        return Expr::undefined();
    }
    let exact = checked_recip(b).and_then(|inverse| a.checked_mul(&inverse));
    exact_or_float(exact, || rational_to_f64(a) / rational_to_f64(b))
}

/// `1/r`, `None` for zero or when the sign flip overflows
pub(crate) fn checked_recip(r: Rational64) -> Option<Rational64> {
    if r.is_zero() || *r.numer() == i64::MIN {
        return None;
    }
    Some(r.recip())
}

/// `base^exponent` computed exactly, `None` on overflow or `0^negative`
pub(crate) fn rational_power(base: Rational64, exponent: i64) -> Option<Rational64> {
    let magnitude = u32::try_from(exponent.unsigned_abs()).ok()?;
    let numer = base.numer().checked_pow(magnitude)?;
    let denom = base.denom().checked_pow(magnitude)?;
    if exponent >= 0 {
        Some(Rational64::new(numer, denom))
    } else if numer == 0 || numer == i64::MIN {
        None
    } else {
        Some(Rational64::new(denom, numer))
    }
}

/// Integer square root of a perfect square
pub(crate) fn exact_isqrt(n: i64) -> Option<i64> {
    if n < 0 {
        return None;
    }
    let guess = (n as f64).sqrt() as i64;
    (guess.saturating_sub(1)..=guess.saturating_add(1))
        .find(|&r| r >= 0 && r.checked_mul(r) == Some(n))
}

/// Square root of a non-negative rational whose terms are perfect squares
pub(crate) fn exact_sqrt(r: Rational64) -> Option<Rational64> {
    if r.is_negative() {
        return None;
    }
    Some(Rational64::new(exact_isqrt(*r.numer())?, exact_isqrt(*r.denom())?))
}

/// Write `n` as `k² * m` with the largest `k > 1`, for moderately sized `n`
pub(crate) fn square_factor(n: i64) -> Option<(i64, i64)> {
    if !(4..=SQUARE_FACTOR_SEARCH_LIMIT).contains(&n) {
        return None;
    }
    let mut best = None;
    let mut k = 2;
    while k * k <= n {
        if n % (k * k) == 0 {
            best = Some((k, n / (k * k)));
        }
        k += 1;
    }
    best
}

/// Rational coefficient and remaining factor: `3*x` is `(3, Some(x))`,
/// `5` is `(5, None)`, anything else has coefficient 1.
pub(crate) fn split_coefficient(expr: &Expr) -> (Rational64, Option<&Expr>) {
    match &expr.kind {
        ExprKind::Rational(r) => (*r, None),
        ExprKind::Mul(a, b) => match a.as_rational() {
            Some(c) => (c, Some(b.as_ref())),
            None => (Rational64::one(), Some(expr)),
        },
        _ => (Rational64::one(), Some(expr)),
    }
}

/// Inverse of [`split_coefficient`]
pub(crate) fn with_coefficient(coefficient: Rational64, term: Option<&Expr>) -> Expr {
    match term {
        None => Expr::from_rational(coefficient),
        Some(_) if coefficient.is_zero() => Expr::integer(0),
        Some(t) if coefficient.is_one() => t.clone(),
        Some(t) => Expr::mul_expr(Expr::from_rational(coefficient), t.clone()),
    }
}

/// Literal negative number or a product with a negative coefficient
pub(crate) fn has_negative_coefficient(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Float(v) => *v < 0.0,
        _ => split_coefficient(expr).0.is_negative(),
    }
}

/// `-expr` in canonical form: negated literal or `(-c)*x`
pub(crate) fn negate(expr: &Expr) -> Expr {
    match &expr.kind {
        ExprKind::Float(v) => Expr::float(-v),
        ExprKind::Complex { re, im } => Expr::complex(-re, -im),
        ExprKind::Opposite(inner) => inner.as_ref().clone(),
        _ => {
            let (coefficient, term) = split_coefficient(expr);
            match Rational64::zero().checked_sub(&coefficient) {
                Some(negated) => with_coefficient(negated, term),
                None => Expr::mul_expr(Expr::integer(-1), expr.clone()),
            }
        }
    }
}

/// Numeric value of an operator whose operands are all literals or
/// constants, at least one of them approximate. NaN folds to Undefined.
pub(crate) fn fold_approximate_literals(expr: &Expr, context: &RuleContext) -> Option<Expr> {
    if matches!(expr.kind, ExprKind::Matrix { .. } | ExprKind::Derivative { .. }) {
        return None;
    }
    let children = expr.children();
    let is_literal = |c: &&Expr| c.is_numeric_literal() || matches!(c.kind, ExprKind::Constant(_));
    if children.is_empty()
        || !children.iter().all(is_literal)
        || !children.iter().any(|c| c.is_approximate_literal())
    {
        return None;
    }
    Some(evaluate::<f64>(expr, context.context, context.preferences).to_expr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_falls_back_to_float() {
        let big = Rational64::from_integer(i64::MAX);
        let sum = rational_sum(big, big);
        assert!(matches!(sum.kind, ExprKind::Float(v) if v > 1e18));
        assert_eq!(
            rational_sum(Rational64::new(1, 2), Rational64::new(1, 3)),
            Expr::rational(5, 6)
        );
    }

    #[test]
    fn test_rational_power() {
        assert_eq!(
            rational_power(Rational64::new(2, 3), 3),
            Some(Rational64::new(8, 27))
        );
        assert_eq!(
            rational_power(Rational64::new(-2, 3), -1),
            Some(Rational64::new(-3, 2))
        );
        assert_eq!(rational_power(Rational64::zero(), -2), None);
        assert_eq!(rational_power(Rational64::from_integer(10), 40), None);
    }

    #[test]
    fn test_exact_square_roots() {
        assert_eq!(exact_sqrt(Rational64::new(9, 4)), Some(Rational64::new(3, 2)));
        assert_eq!(exact_sqrt(Rational64::from_integer(2)), None);
        assert_eq!(exact_sqrt(Rational64::from_integer(-4)), None);
        assert_eq!(exact_isqrt(0), Some(0));
        assert_eq!(square_factor(12), Some((2, 3)));
        assert_eq!(square_factor(72), Some((6, 2)));
        assert_eq!(square_factor(7), None);
    }

    #[test]
    fn test_negate() {
        let x = Expr::symbol("x");
        assert_eq!(negate(&Expr::integer(3)), Expr::integer(-3));
        assert_eq!(
            negate(&x),
            Expr::mul_expr(Expr::integer(-1), x.clone())
        );
        assert_eq!(negate(&Expr::mul_expr(Expr::integer(-1), x.clone())), x);
        assert_eq!(
            negate(&Expr::mul_expr(Expr::integer(2), x.clone())),
            Expr::mul_expr(Expr::integer(-2), x)
        );
    }
}
