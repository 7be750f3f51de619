use num_rational::Rational64;
use num_traits::{CheckedSub, Signed, Zero};
use std::sync::Arc;

use crate::Expr;
use crate::ast::{Constant, ExprKind, ExprType};
use crate::reduction::helpers::{
    exact_or_float, exact_sqrt, rational_power, rational_to_f64, square_factor,
};
use crate::reduction::rules::Rule;

rule!(
    SquareRootRule,
    "square_root_to_power",
    50,
    Power,
    &[ExprType::SquareRoot],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::SquareRoot(operand) = &expr.kind else {
            return None;
        };
        if context.is_matrix(operand) {
            return Some(Expr::undefined());
        }
        Some(Expr::pow((**operand).clone(), Expr::rational(1, 2)))
    }
);

rule!(
    PowerOfZeroRule,
    "power_of_zero",
    100,
    Power,
    &[ExprType::Power],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && base.is_rational_zero()
        {
            let exponent = exponent.as_rational()?;
            return Some(if exponent.is_positive() {
                Expr::integer(0)
            } else {
                Expr::undefined()
            });
        }
        None
    }
);

rule!(
    PowerOfRationalsRule,
    "power_of_rationals",
    105,
    Power,
    &[ExprType::Power],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && let Some(b) = base.as_rational()
            && let Some(n) = exponent.as_integer()
        {
            if b.is_zero() && n <= 0 {
                return Some(Expr::undefined());
            }
            return Some(exact_or_float(rational_power(b, n), || {
                rational_to_f64(b).powf(n as f64)
            }));
        }
        None
    }
);

rule!(
    PowerOneRule,
    "power_one",
    95,
    Power,
    &[ExprType::Power],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && exponent.is_rational_one()
        {
            return Some((**base).clone());
        }
        None
    }
);

rule!(
    PowerZeroRule,
    "power_zero",
    95,
    Power,
    &[ExprType::Power],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && exponent.is_rational_zero()
            && !context.is_matrix(base)
        {
            return Some(Expr::integer(1));
        }
        None
    }
);

rule!(
    OneToPowerRule,
    "one_to_power",
    95,
    Power,
    &[ExprType::Power],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && base.is_rational_one()
            && !context.is_matrix(exponent)
        {
            return Some(Expr::integer(1));
        }
        None
    }
);

rule!(
    PowerOfImaginaryUnitRule,
    "power_of_i",
    90,
    Power,
    &[ExprType::Power],
    |expr: &Expr, _context: &RuleContext| {
        if let ExprKind::Pow(base, exponent) = &expr.kind
            && matches!(base.kind, ExprKind::Constant(Constant::I))
        {
            let i = || Expr::constant(Constant::I);
            return Some(match exponent.as_integer()?.rem_euclid(4) {
                0 => Expr::integer(1),
                1 => i(),
                2 => Expr::integer(-1),
                _ => Expr::mul_expr(Expr::integer(-1), i()),
            });
        }
        None
    }
);

rule!(
    ExactRootRule,
    "exact_root",
    90,
    Power,
    &[ExprType::Power],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Pow(base, exponent) = &expr.kind else {
            return None;
        };
        let b = base.as_rational()?;
        let e = exponent.as_rational()?;
        if *e.denom() != 2 {
            return None;
        }
        if b.is_negative() {
            // sqrt(-r) = sqrt(r)*i
            if e != Rational64::new(1, 2) {
                return None;
            }
            let positive = Rational64::zero().checked_sub(&b)?;
            let magnitude =
                context.reduce(Expr::pow(Expr::from_rational(positive), exponent.as_ref().clone()));
            return Some(context.reduce(Expr::mul_expr(magnitude, Expr::constant(Constant::I))));
        }
        if let Some(root) = exact_sqrt(b) {
            let p = *e.numer();
            return Some(exact_or_float(rational_power(root, p), || {
                rational_to_f64(root).powf(p as f64)
            }));
        }
        // sqrt(k²m) = k*sqrt(m)
        if e == Rational64::new(1, 2)
            && b.is_integer()
            && let Some((k, m)) = square_factor(b.to_integer())
        {
            return Some(Expr::mul_expr(
                Expr::integer(k),
                Expr::pow(Expr::integer(m), Expr::rational(1, 2)),
            ));
        }
        None
    }
);

rule!(
    PowerOfPowerRule,
    "power_of_power",
    70,
    Power,
    &[ExprType::Power],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Pow(inner, outer) = &expr.kind
            && outer.as_integer().is_some()
            && let ExprKind::Pow(base, exponent) = &inner.kind
            && !context.is_matrix(base)
        {
            let combined = context.reduce(Expr::mul_expr(
                exponent.as_ref().clone(),
                outer.as_ref().clone(),
            ));
            return Some(Expr::pow(base.as_ref().clone(), combined));
        }
        None
    }
);

pub(crate) fn get_power_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(SquareRootRule),
        Arc::new(PowerOfZeroRule),
        Arc::new(PowerOfRationalsRule),
        Arc::new(PowerOneRule),
        Arc::new(PowerZeroRule),
        Arc::new(OneToPowerRule),
        Arc::new(PowerOfImaginaryUnitRule),
        Arc::new(ExactRootRule),
        Arc::new(PowerOfPowerRule),
    ]
}

#[cfg(test)]
mod tests {
    use crate::Expr;
    use crate::ast::Constant;
    use crate::context::Context;
    use crate::preferences::Preferences;
    use crate::reduction::reduce;

    fn r(e: Expr) -> Expr {
        reduce(e, &Context::new(), &Preferences::new())
    }

    fn i() -> Expr {
        Expr::constant(Constant::I)
    }

    #[test]
    fn test_square_root_desugars() {
        assert_eq!(r(Expr::square_root(Expr::integer(4))), Expr::integer(2));
        assert_eq!(
            r(Expr::square_root(Expr::integer(-4))),
            Expr::mul_expr(Expr::integer(2), i())
        );
        assert_eq!(r(Expr::square_root(Expr::integer(-1))), i());
        assert_eq!(
            r(Expr::square_root(Expr::integer(12))),
            Expr::mul_expr(
                Expr::integer(2),
                Expr::pow(Expr::integer(3), Expr::rational(1, 2))
            )
        );
        let x = Expr::symbol("x");
        assert_eq!(
            r(Expr::square_root(x.clone())),
            Expr::pow(x, Expr::rational(1, 2))
        );
    }

    #[test]
    fn test_rational_powers() {
        assert_eq!(
            r(Expr::pow(Expr::rational(2, 3), Expr::integer(-2))),
            Expr::rational(9, 4)
        );
        assert_eq!(
            r(Expr::pow(Expr::integer(4), Expr::rational(3, 2))),
            Expr::integer(8)
        );
        assert!(r(Expr::pow(Expr::integer(0), Expr::integer(0))).is_undefined());
        assert!(r(Expr::pow(Expr::integer(0), Expr::integer(-1))).is_undefined());
        let big = r(Expr::pow(Expr::integer(10), Expr::integer(30)));
        assert!(big.is_approximate_literal());
    }

    #[test]
    fn test_identities() {
        let x = Expr::symbol("x");
        assert_eq!(r(Expr::pow(x.clone(), Expr::integer(1))), x);
        assert_eq!(r(Expr::pow(x.clone(), Expr::integer(0))), Expr::integer(1));
        assert_eq!(r(Expr::pow(Expr::integer(1), x.clone())), Expr::integer(1));
        assert_eq!(
            r(Expr::pow(Expr::pow(x.clone(), Expr::integer(2)), Expr::integer(3))),
            Expr::pow(x, Expr::integer(6))
        );
    }

    #[test]
    fn test_powers_of_i() {
        assert_eq!(r(Expr::pow(i(), Expr::integer(2))), Expr::integer(-1));
        assert_eq!(r(Expr::pow(i(), Expr::integer(5))), i());
        assert_eq!(
            r(Expr::pow(i(), Expr::integer(-1))),
            Expr::mul_expr(Expr::integer(-1), i())
        );
        assert_eq!(r(Expr::mul_expr(i(), i())), Expr::integer(-1));
    }
}
