use super::{approximate_at, numeric_derivative};
use crate::ast::{DERIVATIVE_VARIABLE, ExprKind};
use crate::context::Context;
use crate::preferences::{AngleUnit, Preferences};
use crate::Expr;

/// Width of `x` over which the expression shows its characteristic
/// behaviour, used to pick a default plotting window.
///
/// A direct trigonometric function of `a*x + b` has period `2π/|a|` (or
/// `360/|a|` in degrees). Other nodes take the largest range of their
/// children. NaN means there is nothing periodic to show.
pub fn characteristic_x_range(expr: &Expr, context: &Context, angle_unit: AngleUnit) -> f64 {
    match &expr.kind {
        ExprKind::Trig(function, argument) if function.is_direct() => {
            if argument.polynomial_degree(DERIVATIVE_VARIABLE) != Some(1) {
                return f64::NAN;
            }
            let preferences = Preferences::new().angle_unit(angle_unit);
            let slope = numeric_derivative(
                |t: f64| {
                    approximate_at(argument, DERIVATIVE_VARIABLE, t, context, &preferences)
                        .to_scalar()
                },
                0.0,
            );
            if slope.is_nan() || slope == 0.0 {
                return f64::NAN;
            }
            let half_turn = match angle_unit {
                AngleUnit::Radian => std::f64::consts::PI,
                AngleUnit::Degree => 180.0,
            };
            2.0 * half_turn / slope.abs()
        }
        // f64::max ignores NaN operands
        _ => expr
            .children()
            .iter()
            .map(|child| characteristic_x_range(child, context, angle_unit))
            .fold(f64::NAN, f64::max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::TrigFunction;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_period_of_scaled_sine() {
        let e = Expr::trig(TrigFunction::Sine, Expr::mul_expr(Expr::integer(2), x()));
        let range = characteristic_x_range(&e, &Context::new(), AngleUnit::Radian);
        assert!((range - std::f64::consts::PI).abs() < 1e-12);
        let degrees = characteristic_x_range(&e, &Context::new(), AngleUnit::Degree);
        assert!((degrees - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_largest_child_wins() {
        let slow = Expr::trig(TrigFunction::Cosine, Expr::div_expr(x(), Expr::integer(2)));
        let fast = Expr::trig(TrigFunction::Sine, x());
        let sum = Expr::add_expr(slow, fast);
        let range = characteristic_x_range(&sum, &Context::new(), AngleUnit::Radian);
        assert!((range - 4.0 * std::f64::consts::PI).abs() < 1e-9);
    }

    #[test]
    fn test_non_periodic_is_nan() {
        let constant = Expr::trig(TrigFunction::Sine, Expr::integer(3));
        assert!(characteristic_x_range(&constant, &Context::new(), AngleUnit::Radian).is_nan());
        let squared = Expr::trig(TrigFunction::Sine, Expr::pow(x(), Expr::integer(2)));
        assert!(characteristic_x_range(&squared, &Context::new(), AngleUnit::Radian).is_nan());
        assert!(characteristic_x_range(&x(), &Context::new(), AngleUnit::Radian).is_nan());
    }
}
