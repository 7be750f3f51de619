use crate::{
    AngleUnit, Constant, Context, Expr, Preferences, Reducer, SymbolicComputation, TrigFunction,
    reduce,
};

fn r(e: Expr) -> Expr {
    reduce(e, &Context::new(), &Preferences::new())
}

fn rd(e: Expr) -> Expr {
    reduce(
        e,
        &Context::new(),
        &Preferences::new().angle_unit(AngleUnit::Degree),
    )
}

fn sqrt_of(n: i64) -> Expr {
    Expr::pow(Expr::integer(n), Expr::rational(1, 2))
}

fn matrix(values: &[i64]) -> Expr {
    Expr::matrix(1, values.len(), values.iter().map(|&v| Expr::integer(v)).collect()).unwrap()
}

#[test]
fn test_special_values() {
    let sixth = Expr::div_expr(Expr::pi(), Expr::integer(6));
    assert_eq!(
        r(Expr::trig(TrigFunction::Sine, sixth)),
        Expr::rational(1, 2)
    );
    assert_eq!(
        rd(Expr::trig(TrigFunction::Cosine, Expr::integer(45))),
        Expr::mul_expr(Expr::rational(1, 2), sqrt_of(2))
    );
    assert_eq!(
        r(Expr::trig(TrigFunction::ArcSine, Expr::rational(1, 2))),
        Expr::mul_expr(Expr::rational(1, 6), Expr::pi())
    );
    let third = Expr::div_expr(Expr::pi(), Expr::integer(3));
    assert_eq!(r(Expr::trig(TrigFunction::Tangent, third)), sqrt_of(3));
}

#[test]
fn test_special_values_round_trip_through_inverse() {
    // asin(sin(a)) for every table angle in the principal range of asin
    for degrees in [-90, -60, -45, -30, -18, 0, 15, 36, 54, 72, 90] {
        let e = Expr::trig(
            TrigFunction::ArcSine,
            Expr::trig(TrigFunction::Sine, Expr::integer(degrees)),
        );
        assert_eq!(rd(e), Expr::integer(degrees), "angle {}", degrees);
    }
}

#[test]
fn test_periodicity_of_special_angles() {
    let angle = |d: i64| Expr::trig(TrigFunction::Sine, Expr::integer(d));
    assert_eq!(rd(angle(390)), Expr::rational(1, 2));
    assert_eq!(rd(angle(-330)), Expr::rational(1, 2));
    assert_eq!(rd(angle(210)), Expr::rational(-1, 2));
}

#[test]
fn test_tangent_detection_after_canonicalization() {
    let x = Expr::symbol("x");
    let sine = Expr::trig(TrigFunction::Sine, x.clone());
    let cosine = Expr::trig(TrigFunction::Cosine, x.clone());
    let product = Expr::mul_expr(sine, Expr::pow(cosine, Expr::integer(-1)));
    assert_eq!(r(product), Expr::trig(TrigFunction::Tangent, x));
}

#[test]
fn test_square_root_of_matrix_is_undefined() {
    assert!(r(Expr::square_root(matrix(&[4, 9]))).is_undefined());

    let mut ctx = Context::new();
    ctx.bind("m", matrix(&[4, 9]));
    let kept = Reducer::new()
        .symbolic_computation(SymbolicComputation::KeepSymbols)
        .reduce(Expr::square_root(Expr::symbol("m")), &ctx)
        .unwrap();
    assert!(kept.is_undefined());
}

#[test]
fn test_complex_subtraction() {
    let e = Expr::sub_expr(Expr::complex(1.5, 2.0), Expr::float(0.5));
    assert_eq!(r(e), Expr::complex(1.0, 2.0));
}

#[test]
fn test_units() {
    let metre = Expr::unit("_m");
    let scaled = Expr::mul_expr(Expr::integer(3), metre.clone());
    assert_eq!(r(scaled.clone()), scaled);
    assert!(r(Expr::add_expr(metre.clone(), Expr::integer(1))).is_undefined());
    assert!(r(Expr::square_root(metre.clone())).is_undefined());
    assert!(r(Expr::trig(TrigFunction::Sine, metre)).is_undefined());
}

#[test]
fn test_undefined_reaches_the_root() {
    let e = Expr::add_expr(
        Expr::symbol("y"),
        Expr::mul_expr(
            Expr::integer(2),
            Expr::div_expr(Expr::integer(1), Expr::integer(0)),
        ),
    );
    assert!(r(e).is_undefined());
    assert!(r(Expr::pow(Expr::integer(0), Expr::integer(0))).is_undefined());
}

#[test]
fn test_defined_symbols_are_substituted() {
    let mut ctx = Context::new();
    ctx.bind("a", Expr::integer(3));
    ctx.bind("b", Expr::mul_expr(Expr::symbol("a"), Expr::integer(2)));
    let e = Expr::add_expr(Expr::symbol("b"), Expr::symbol("y"));
    assert_eq!(
        reduce(e, &ctx, &Preferences::new()),
        Expr::add_expr(Expr::integer(6), Expr::symbol("y"))
    );
}

#[test]
fn test_derivative_is_kept_with_reduced_children() {
    let mut ctx = Context::new();
    ctx.bind("x", Expr::integer(10));
    let x = Expr::symbol("x");
    let e = Expr::derivative(
        Expr::mul_expr(x.clone(), x.clone()),
        Expr::add_expr(Expr::integer(1), Expr::integer(2)),
    );
    assert_eq!(
        reduce(e, &ctx, &Preferences::new()),
        Expr::derivative(Expr::pow(x, Expr::integer(2)), Expr::integer(3))
    );
}

#[test]
fn test_display_of_reduced_forms() {
    let x = Expr::symbol("x");
    let e = Expr::add_expr(
        Expr::mul_expr(x.clone(), Expr::integer(2)),
        Expr::mul_expr(Expr::integer(3), x.clone()),
    );
    assert_eq!(r(e).to_string(), "5 * x");
    assert_eq!(r(Expr::square_root(Expr::integer(8))).to_string(), "2 * 2^(1/2)");
    assert_eq!(
        r(Expr::square_root(Expr::integer(-9))).to_string(),
        "3 * i"
    );
    assert_eq!(r(Expr::sub_expr(x, Expr::integer(1))).to_string(), "-1 + x");
}

#[test]
fn test_reduction_is_idempotent_on_samples() {
    let x = Expr::symbol("x");
    let samples = vec![
        Expr::square_root(Expr::integer(72)),
        Expr::trig(TrigFunction::Cosine, Expr::div_expr(Expr::pi(), Expr::integer(5))),
        Expr::sub_expr(
            Expr::pow(x.clone(), Expr::integer(2)),
            Expr::mul_expr(x.clone(), x.clone()),
        ),
        Expr::div_expr(
            Expr::add_expr(x.clone(), Expr::integer(1)),
            Expr::pow(x.clone(), Expr::rational(1, 2)),
        ),
        Expr::mul_expr(Expr::constant(Constant::I), Expr::square_root(Expr::integer(-4))),
        Expr::trig(TrigFunction::ArcCosine, Expr::opposite(x)),
    ];
    for e in samples {
        let once = r(e.clone());
        assert_eq!(r(once.clone()), once, "not idempotent: {}", e);
    }
}

#[test]
fn test_reducer_limits() {
    let mut deep = Expr::symbol("x");
    for _ in 0..30 {
        deep = Expr::trig(TrigFunction::Sine, deep);
    }
    let strict = Reducer::new().max_depth(10).reduce(deep.clone(), &Context::new());
    assert!(strict.is_err());
    assert!(Reducer::new().max_depth(40).reduce(deep, &Context::new()).is_ok());
}
