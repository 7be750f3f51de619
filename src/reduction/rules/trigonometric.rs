use num_rational::Rational64;
use std::sync::Arc;

use crate::Expr;
use crate::ast::{ExprKind, ExprType, TrigFunction};
use crate::reduction::helpers::{has_negative_coefficient, negate};
use crate::reduction::rules::Rule;
use crate::reduction::trig_table::{
    angle_expression, angle_in_degrees, is_equivalent_to_tangent, lookup_direct, lookup_inverse,
    principal_range,
};

rule!(
    TrigMatrixArgumentRule,
    "trig_matrix_argument",
    130,
    Trigonometric,
    &[ExprType::Trigonometric],
    |expr: &Expr, context: &RuleContext| {
        if let ExprKind::Trig(_, argument) = &expr.kind
            && context.is_matrix(argument)
        {
            return Some(Expr::undefined());
        }
        None
    }
);

rule!(
    SpecialAngleRule,
    "special_angle",
    90,
    Trigonometric,
    &[ExprType::Trigonometric],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Trig(function, argument) = &expr.kind else {
            return None;
        };
        let unit = context.preferences.angle_unit;
        if function.is_direct() {
            lookup_direct(*function, argument, unit)
        } else {
            lookup_inverse(*function, argument, unit)
        }
    }
);

rule!(
    DirectOfInverseRule,
    "direct_of_inverse",
    85,
    Trigonometric,
    &[ExprType::Trigonometric],
    |expr: &Expr, _context: &RuleContext| {
        // sin(asin(x)) = x
        if let ExprKind::Trig(outer, argument) = &expr.kind
            && outer.is_direct()
            && let ExprKind::Trig(inner, x) = &argument.kind
            && *inner == outer.inverse()
        {
            return Some((**x).clone());
        }
        None
    }
);

rule!(
    InverseOfDirectRule,
    "inverse_of_direct",
    85,
    Trigonometric,
    &[ExprType::Trigonometric],
    |expr: &Expr, context: &RuleContext| {
        // asin(sin(a)) = a only when a is in the principal range
        let ExprKind::Trig(outer, argument) = &expr.kind else {
            return None;
        };
        let ExprKind::Trig(inner, angle) = &argument.kind else {
            return None;
        };
        if outer.is_direct() || *inner != outer.inverse() {
            return None;
        }
        let degrees = angle_in_degrees(angle, context.preferences.angle_unit)?;
        let (low, high) = principal_range(*outer)?;
        let open_at_ends = *outer == TrigFunction::ArcTangent;
        let inside = if open_at_ends {
            low < degrees && degrees < high
        } else {
            low <= degrees && degrees <= high
        };
        inside.then(|| (**angle).clone())
    }
);

rule!(
    TrigParityRule,
    "trig_parity",
    60,
    Trigonometric,
    &[ExprType::Trigonometric],
    |expr: &Expr, context: &RuleContext| {
        let ExprKind::Trig(function, argument) = &expr.kind else {
            return None;
        };
        if !has_negative_coefficient(argument) {
            return None;
        }
        let positive = negate(argument);
        match function {
            TrigFunction::Cosine => Some(Expr::trig(TrigFunction::Cosine, positive)),
            // acos(-x) = half turn - acos(x)
            TrigFunction::ArcCosine => {
                let unit = context.preferences.angle_unit;
                let half_turn = angle_expression(Rational64::from_integer(180), unit);
                let acos = context.reduce(Expr::trig(TrigFunction::ArcCosine, positive));
                Some(Expr::sub_expr(half_turn, acos))
            }
            // Odd functions
            _ => Some(negate(&context.reduce(Expr::trig(*function, positive)))),
        }
    }
);

rule!(
    SineOverCosineRule,
    "sine_over_cosine",
    80,
    Trigonometric,
    &[ExprType::Division, ExprType::Multiplication],
    |expr: &Expr, _context: &RuleContext| {
        let argument = is_equivalent_to_tangent(expr)?;
        Some(Expr::trig(TrigFunction::Tangent, argument.clone()))
    }
);

pub(crate) fn get_trigonometric_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(TrigMatrixArgumentRule),
        Arc::new(SpecialAngleRule),
        Arc::new(DirectOfInverseRule),
        Arc::new(InverseOfDirectRule),
        Arc::new(TrigParityRule),
        Arc::new(SineOverCosineRule),
    ]
}
