use num_complex::Complex;

use crate::{
    AngleUnit, ComplexFormat, Context, Evaluation, Expr, Precision, Preferences, PrintFloatMode,
    TrigFunction, approximate, approximate_to_f64, characteristic_x_range, reduce,
};

fn eval(e: &Expr) -> Evaluation<f64> {
    approximate::<f64>(e, &Context::new(), &Preferences::new())
}

fn matrix(rows: usize, cols: usize, values: &[i64]) -> Expr {
    Expr::matrix(rows, cols, values.iter().map(|&v| Expr::integer(v)).collect()).unwrap()
}

fn real_matrix(rows: usize, cols: usize, values: &[f64]) -> Evaluation<f64> {
    Evaluation::matrix(
        rows,
        cols,
        values.iter().map(|&v| Complex::new(v, 0.0)).collect(),
    )
    .unwrap()
}

#[test]
fn test_square_root_of_minus_one_is_exactly_i() {
    let value = eval(&Expr::square_root(Expr::integer(-1)));
    assert_eq!(value, Evaluation::complex(0.0, 1.0));
    let half = eval(&Expr::pow(Expr::integer(-4), Expr::rational(1, 2)));
    assert_eq!(half, Evaluation::complex(0.0, 2.0));
}

#[test]
fn test_square_root_of_negated_literal_is_principal() {
    let negated = || Expr::opposite(Expr::integer(4));
    assert_eq!(eval(&Expr::square_root(negated())), Evaluation::complex(0.0, 2.0));
    let power = Expr::pow(Expr::opposite(Expr::integer(9)), Expr::rational(1, 2));
    assert_eq!(eval(&power), Evaluation::complex(0.0, 3.0));
    let float = Expr::square_root(Expr::opposite(Expr::float(2.25)));
    assert_eq!(eval(&float), Evaluation::complex(0.0, 1.5));

    let reduced = reduce(
        Expr::square_root(negated()),
        &Context::new(),
        &Preferences::new(),
    );
    assert_eq!(eval(&reduced), Evaluation::complex(0.0, 2.0));
}

#[test]
fn test_scalar_minus_matrix() {
    let e = Expr::sub_expr(Expr::integer(1), matrix(1, 2, &[3, 5]));
    assert_eq!(eval(&e), real_matrix(1, 2, &[-2.0, -4.0]));
    let e = Expr::sub_expr(matrix(1, 2, &[3, 5]), Expr::integer(1));
    assert_eq!(eval(&e), real_matrix(1, 2, &[2.0, 4.0]));
}

#[test]
fn test_matrix_operations() {
    let product = Expr::mul_expr(matrix(2, 2, &[1, 2, 3, 4]), matrix(2, 1, &[1, 1]));
    assert_eq!(eval(&product), real_matrix(2, 1, &[3.0, 7.0]));

    let mismatch = Expr::add_expr(matrix(1, 2, &[1, 2]), matrix(2, 1, &[1, 2]));
    assert!(eval(&mismatch).is_nan());

    let power = Expr::pow(matrix(2, 2, &[1, 1, 0, 1]), Expr::integer(4));
    assert_eq!(eval(&power), real_matrix(2, 2, &[1.0, 4.0, 0.0, 1.0]));

    let by_matrix = Expr::div_expr(Expr::integer(1), matrix(1, 1, &[2]));
    assert!(eval(&by_matrix).is_nan());

    let sine = Expr::trig(TrigFunction::Sine, matrix(1, 1, &[0]));
    assert!(eval(&sine).is_nan());
}

#[test]
fn test_nan_propagates_through_every_operator() {
    let nan = Expr::undefined();
    let x = Expr::integer(2);
    let operators = vec![
        Expr::add_expr(nan.clone(), x.clone()),
        Expr::sub_expr(x.clone(), nan.clone()),
        Expr::mul_expr(nan.clone(), matrix(1, 1, &[1])),
        Expr::div_expr(x.clone(), nan.clone()),
        Expr::pow(nan.clone(), x.clone()),
        Expr::opposite(nan.clone()),
        Expr::square_root(nan.clone()),
        Expr::trig(TrigFunction::ArcTangent, nan.clone()),
        Expr::matrix(1, 2, vec![x, nan]).unwrap(),
    ];
    for e in operators {
        assert!(eval(&e).is_nan(), "{} should be NaN", e);
    }
}

#[test]
fn test_domain_errors_are_nan() {
    assert!(eval(&Expr::div_expr(Expr::integer(1), Expr::integer(0))).is_nan());
    assert!(eval(&Expr::pow(Expr::integer(0), Expr::integer(0))).is_nan());
    assert!(eval(&Expr::pow(Expr::integer(0), Expr::integer(-2))).is_nan());
    let half_turn = Expr::div_expr(Expr::pi(), Expr::integer(2));
    assert!(eval(&Expr::trig(TrigFunction::Tangent, half_turn)).is_nan());
    assert!(eval(&Expr::symbol("unbound")).is_nan());
    assert!(eval(&Expr::unit("_s")).is_nan());
}

#[test]
fn test_trigonometry_in_both_units() {
    let sin_pi = eval(&Expr::trig(TrigFunction::Sine, Expr::pi()));
    assert_eq!(sin_pi, Evaluation::real(0.0));

    let degrees = Preferences::new().angle_unit(AngleUnit::Degree);
    let cos_60 = approximate::<f64>(
        &Expr::trig(TrigFunction::Cosine, Expr::integer(60)),
        &Context::new(),
        &degrees,
    );
    assert!((cos_60.to_scalar() - 0.5).abs() < 1e-15);
    let acos_half = approximate::<f64>(
        &Expr::trig(TrigFunction::ArcCosine, Expr::rational(1, 2)),
        &Context::new(),
        &degrees,
    );
    assert!((acos_half.to_scalar() - 60.0).abs() < 1e-12);
}

#[test]
fn test_symbols_resolve_through_context_chain() {
    let mut globals = Context::new();
    globals.bind("a", Expr::integer(2));
    let mut local = Context::with_parent(&globals);
    local.bind("b", Expr::mul_expr(Expr::symbol("a"), Expr::integer(3)));
    let e = Expr::add_expr(Expr::symbol("b"), Expr::integer(1));
    let value = approximate::<f64>(&e, &local, &Preferences::new());
    assert_eq!(value, Evaluation::real(7.0));
    // a self-referential definition sees the name as free
    local.bind("c", Expr::add_expr(Expr::symbol("c"), Expr::integer(1)));
    assert!(approximate::<f64>(&Expr::symbol("c"), &local, &Preferences::new()).is_nan());
}

#[test]
fn test_single_precision_is_widened() {
    let prefs = Preferences::new().precision(Precision::Single);
    let third = Expr::div_expr(Expr::integer(1), Expr::integer(3));
    let value = approximate_to_f64(&third, &Context::new(), &prefs).to_scalar();
    assert_eq!(value, f64::from(1.0f32 / 3.0));
    assert_ne!(value, 1.0 / 3.0);
}

#[test]
fn test_serialization_of_results() {
    let d = PrintFloatMode::Decimal;
    let z = eval(&Expr::square_root(Expr::integer(-4)));
    assert_eq!(z.serialize(ComplexFormat::Cartesian, d, 10), "2*i");
    assert_eq!(z.serialize(ComplexFormat::Real, d, 10), "nonreal");
    assert_eq!(z.serialize(ComplexFormat::Polar, d, 4), "2*e^(1.571*i)");
    let m = eval(&matrix(1, 2, &[1, 2]));
    assert_eq!(m.to_string(), "[[1,2]]");
    assert_eq!(eval(&Expr::undefined()).to_string(), "undef");
}

#[test]
fn test_characteristic_range_reads_context() {
    let mut ctx = Context::new();
    ctx.bind("k", Expr::integer(4));
    let e = Expr::trig(
        TrigFunction::Cosine,
        Expr::mul_expr(Expr::symbol("k"), Expr::symbol("x")),
    );
    let range = characteristic_x_range(&e, &ctx, AngleUnit::Radian);
    assert!((range - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
}
