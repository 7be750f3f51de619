//! Exact values of sin, cos and tan at special angles
//!
//! The table holds the 37 angles of [-90°, 180°] that are multiples of 15°,
//! 18° or 22.5°. Values are stored already reduced so they compare
//! structurally with reduced arguments of inverse functions.

use num_rational::Rational64;
use num_traits::{CheckedMul, Signed, Zero};
use std::sync::OnceLock;

use super::helpers::negate;
use crate::Expr;
use crate::ast::{Constant, ExprKind, TrigFunction};
use crate::context::Context;
use crate::preferences::{AngleUnit, Preferences};

/// Number of special angles
pub(crate) const TABLE_LEN: usize = 37;

/// Angles with larger terms are left alone so the turn arithmetic fits in i64
const MAX_REDUCED_ANGLE: u64 = 1 << 40;

#[derive(Debug, Clone)]
pub(crate) struct TrigEntry {
    /// Angle in degrees
    pub degrees: Rational64,
    pub sine: Expr,
    pub cosine: Expr,
    pub tangent: Expr,
}

impl TrigEntry {
    fn value(&self, function: TrigFunction) -> Option<&Expr> {
        match function {
            TrigFunction::Sine => Some(&self.sine),
            TrigFunction::Cosine => Some(&self.cosine),
            TrigFunction::Tangent => Some(&self.tangent),
            _ => None,
        }
    }
}

/// The table, sorted by angle
pub(crate) fn table() -> &'static [TrigEntry] {
    static TABLE: OnceLock<Vec<TrigEntry>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn sqrt(n: i64) -> Expr {
    Expr::square_root(Expr::integer(n))
}

fn quarter(e: Expr) -> Expr {
    Expr::div_expr(e, Expr::integer(4))
}

fn half(e: Expr) -> Expr {
    Expr::div_expr(e, Expr::integer(2))
}

/// `(sin, tan)` of the special angles of [0°, 90°], in tenths of a degree
fn first_quadrant() -> Vec<(i64, Expr, Expr)> {
    let two_plus_sqrt_two = || Expr::add_expr(Expr::integer(2), sqrt(2));
    let two_minus_sqrt_two = || Expr::sub_expr(Expr::integer(2), sqrt(2));
    let ten_sqrt_five = |sign: i64| {
        Expr::add_expr(
            Expr::integer(10),
            Expr::mul_expr(Expr::integer(2 * sign), sqrt(5)),
        )
    };
    let tan_of_fifths = |a: i64, b: i64| {
        Expr::square_root(Expr::add_expr(
            Expr::integer(a),
            Expr::mul_expr(Expr::integer(b), sqrt(5)),
        ))
    };
    vec![
        (0, Expr::integer(0), Expr::integer(0)),
        (
            150,
            quarter(Expr::sub_expr(sqrt(6), sqrt(2))),
            Expr::sub_expr(Expr::integer(2), sqrt(3)),
        ),
        (
            180,
            quarter(Expr::sub_expr(sqrt(5), Expr::integer(1))),
            Expr::div_expr(tan_of_fifths(25, -10), Expr::integer(5)),
        ),
        (
            225,
            half(Expr::square_root(two_minus_sqrt_two())),
            Expr::sub_expr(sqrt(2), Expr::integer(1)),
        ),
        (300, Expr::rational(1, 2), Expr::div_expr(sqrt(3), Expr::integer(3))),
        (
            360,
            quarter(Expr::square_root(ten_sqrt_five(-1))),
            tan_of_fifths(5, -2),
        ),
        (450, half(sqrt(2)), Expr::integer(1)),
        (
            540,
            quarter(Expr::add_expr(sqrt(5), Expr::integer(1))),
            Expr::div_expr(tan_of_fifths(25, 10), Expr::integer(5)),
        ),
        (600, half(sqrt(3)), sqrt(3)),
        (
            675,
            half(Expr::square_root(two_plus_sqrt_two())),
            Expr::add_expr(sqrt(2), Expr::integer(1)),
        ),
        (
            720,
            quarter(Expr::square_root(ten_sqrt_five(1))),
            tan_of_fifths(5, 2),
        ),
        (
            750,
            quarter(Expr::add_expr(sqrt(6), sqrt(2))),
            Expr::add_expr(Expr::integer(2), sqrt(3)),
        ),
        (900, Expr::integer(1), Expr::undefined()),
    ]
}

fn build_table() -> Vec<TrigEntry> {
    let base = first_quadrant();
    let sine_of = |tenths: i64| base.iter().find(|(t, _, _)| *t == tenths).map(|(_, s, _)| s);

    let mut raw = Vec::with_capacity(TABLE_LEN);
    for (tenths, sine, tangent) in &base {
        let tenths = *tenths;
        let Some(cosine) = sine_of(900 - tenths) else {
            continue;
        };
        raw.push((tenths, sine.clone(), cosine.clone(), tangent.clone()));
        if tenths > 0 {
            // -θ: sine and tangent are odd, cosine even
            raw.push((
                -tenths,
                Expr::opposite(sine.clone()),
                cosine.clone(),
                Expr::opposite(tangent.clone()),
            ));
        }
        if tenths < 900 {
            // 180° - θ: sine kept, cosine and tangent flip
            raw.push((
                1800 - tenths,
                sine.clone(),
                Expr::opposite(cosine.clone()),
                Expr::opposite(tangent.clone()),
            ));
        }
    }

    // Values contain no trigonometric node, so reducing them never reads
    // this table.
    let context = Context::new();
    let preferences = Preferences::new();
    let reduce = |e: Expr| super::reduce(e, &context, &preferences);

    let mut entries: Vec<TrigEntry> = raw
        .into_iter()
        .map(|(tenths, sine, cosine, tangent)| TrigEntry {
            degrees: Rational64::new(tenths, 10),
            sine: reduce(sine),
            cosine: reduce(cosine),
            tangent: reduce(tangent),
        })
        .collect();
    entries.sort_by(|a, b| a.degrees.cmp(&b.degrees));
    entries
}

/// Angle in degrees of a special-angle argument: `k*π` in radians, a
/// rational in degrees.
pub(crate) fn angle_in_degrees(argument: &Expr, unit: AngleUnit) -> Option<Rational64> {
    match unit {
        AngleUnit::Degree => argument.as_rational(),
        AngleUnit::Radian => match &argument.kind {
            ExprKind::Rational(r) if r.is_zero() => Some(*r),
            ExprKind::Constant(Constant::Pi) => Some(Rational64::from_integer(180)),
            ExprKind::Mul(a, b) if matches!(b.kind, ExprKind::Constant(Constant::Pi)) => {
                a.as_rational()?.checked_mul(&Rational64::from_integer(180))
            }
            _ => None,
        },
    }
}

/// Expression of an angle given in degrees, in `unit`
pub(crate) fn angle_expression(degrees: Rational64, unit: AngleUnit) -> Expr {
    match unit {
        AngleUnit::Degree => Expr::from_rational(degrees),
        AngleUnit::Radian => {
            let turns = degrees / Rational64::from_integer(180);
            if turns.is_zero() {
                Expr::integer(0)
            } else if turns == Rational64::from_integer(1) {
                Expr::pi()
            } else {
                Expr::mul_expr(Expr::from_rational(turns), Expr::pi())
            }
        }
    }
}

/// Exact value of a direct function at `argument`, when it is a special angle
pub(crate) fn lookup_direct(
    function: TrigFunction,
    argument: &Expr,
    unit: AngleUnit,
) -> Option<Expr> {
    let degrees = angle_in_degrees(argument, unit)?;
    if degrees.numer().unsigned_abs() > MAX_REDUCED_ANGLE || *degrees.denom() > MAX_REDUCED_ANGLE as i64 {
        return None;
    }
    // Bring the angle into (-180°, 180°]
    let full_turn = Rational64::from_integer(360);
    let mut angle = degrees - full_turn * (degrees / full_turn).floor();
    if angle > Rational64::from_integer(180) {
        angle = angle - full_turn;
    }
    // Below -90° shift by a half turn: sin and cos flip, tan is unchanged
    let mut flip = false;
    if angle < Rational64::from_integer(-90) {
        angle = angle + Rational64::from_integer(180);
        flip = function != TrigFunction::Tangent;
    }
    let entry = table().iter().find(|e| e.degrees == angle)?;
    let value = entry.value(function)?;
    Some(if flip { negate(value) } else { value.clone() })
}

/// Principal angle whose direct function equals `value`, when `value` is a
/// table entry
pub(crate) fn lookup_inverse(
    function: TrigFunction,
    value: &Expr,
    unit: AngleUnit,
) -> Option<Expr> {
    let direct = function.inverse();
    let (low, high) = principal_range(function)?;
    table()
        .iter()
        .filter(|e| e.degrees >= low && e.degrees <= high)
        .filter(|e| {
            // atan's range is open
            direct != TrigFunction::Tangent || e.degrees.abs() != Rational64::from_integer(90)
        })
        .find(|e| e.value(direct) == Some(value))
        .map(|e| angle_expression(e.degrees, unit))
}

/// Closed principal range of an inverse function, in degrees
pub(crate) fn principal_range(function: TrigFunction) -> Option<(Rational64, Rational64)> {
    let r = Rational64::from_integer;
    match function {
        TrigFunction::ArcSine | TrigFunction::ArcTangent => Some((r(-90), r(90))),
        TrigFunction::ArcCosine => Some((r(0), r(180))),
        _ => None,
    }
}

/// Argument `a` when `expr` is `sin(a)/cos(a)` or `sin(a)*cos(a)^-1`
pub(crate) fn is_equivalent_to_tangent(expr: &Expr) -> Option<&Expr> {
    let (numerator, denominator) = match &expr.kind {
        ExprKind::Div(a, b) => (a.as_ref(), b.as_ref()),
        ExprKind::Mul(a, b) => match (reciprocal_base(a), reciprocal_base(b)) {
            (_, Some(base)) => (a.as_ref(), base),
            (Some(base), None) => (b.as_ref(), base),
            (None, None) => return None,
        },
        _ => return None,
    };
    match (&numerator.kind, &denominator.kind) {
        (ExprKind::Trig(TrigFunction::Sine, a), ExprKind::Trig(TrigFunction::Cosine, b))
            if a == b =>
        {
            Some(a.as_ref())
        }
        _ => None,
    }
}

/// `b` when `expr` is `b^-1`
fn reciprocal_base(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Pow(base, exponent) if exponent.as_integer() == Some(-1) => Some(base.as_ref()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_37_sorted_angles() {
        let t = table();
        assert_eq!(t.len(), TABLE_LEN);
        assert!(t.windows(2).all(|w| w[0].degrees < w[1].degrees));
        assert_eq!(t[0].degrees, Rational64::from_integer(-90));
        assert_eq!(t[TABLE_LEN - 1].degrees, Rational64::from_integer(180));
        for e in t {
            let multiple = |step: Rational64| (e.degrees / step).is_integer();
            assert!(
                multiple(Rational64::from_integer(15))
                    || multiple(Rational64::from_integer(18))
                    || multiple(Rational64::new(45, 2))
            );
        }
    }

    #[test]
    fn test_values_are_reduced() {
        let context = Context::new();
        let preferences = Preferences::new();
        for e in table() {
            for v in [&e.sine, &e.cosine, &e.tangent] {
                assert_eq!(&super::super::reduce(v.clone(), &context, &preferences), v);
            }
        }
    }

    #[test]
    fn test_direct_lookup() {
        let sixth = Expr::mul_expr(Expr::rational(1, 6), Expr::pi());
        assert_eq!(
            lookup_direct(TrigFunction::Sine, &sixth, AngleUnit::Radian),
            Some(Expr::rational(1, 2))
        );
        assert_eq!(
            lookup_direct(TrigFunction::Cosine, &Expr::integer(360), AngleUnit::Degree),
            Some(Expr::integer(1))
        );
        // 210° = -150° shifted: sin is -1/2
        assert_eq!(
            lookup_direct(TrigFunction::Sine, &Expr::integer(210), AngleUnit::Degree),
            Some(Expr::rational(-1, 2))
        );
        assert!(
            lookup_direct(TrigFunction::Tangent, &Expr::integer(90), AngleUnit::Degree)
                .is_some_and(|t| t.is_undefined())
        );
        assert_eq!(
            lookup_direct(TrigFunction::Sine, &Expr::integer(7), AngleUnit::Degree),
            None
        );
    }

    #[test]
    fn test_inverse_lookup_uses_principal_range() {
        assert_eq!(
            lookup_inverse(TrigFunction::ArcSine, &Expr::rational(1, 2), AngleUnit::Degree),
            Some(Expr::integer(30))
        );
        assert_eq!(
            lookup_inverse(TrigFunction::ArcCosine, &Expr::rational(-1, 2), AngleUnit::Degree),
            Some(Expr::integer(120))
        );
        assert_eq!(
            lookup_inverse(TrigFunction::ArcTangent, &Expr::integer(1), AngleUnit::Radian),
            Some(Expr::mul_expr(Expr::rational(1, 4), Expr::pi()))
        );
    }

    #[test]
    fn test_tangent_equivalence() {
        let x = Expr::symbol("x");
        let sin = Expr::trig(TrigFunction::Sine, x.clone());
        let cos = Expr::trig(TrigFunction::Cosine, x.clone());
        let quotient = Expr::div_expr(sin.clone(), cos.clone());
        assert_eq!(is_equivalent_to_tangent(&quotient), Some(&x));
        let product = Expr::mul_expr(sin.clone(), Expr::pow(cos, Expr::integer(-1)));
        assert_eq!(is_equivalent_to_tangent(&product), Some(&x));
        let other = Expr::div_expr(
            sin,
            Expr::trig(TrigFunction::Cosine, Expr::symbol("y")),
        );
        assert_eq!(is_equivalent_to_tangent(&other), None);
    }
}
