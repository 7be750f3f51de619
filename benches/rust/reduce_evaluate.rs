//! Reduction and Evaluation Benchmark
//!
//! Mixed expressions with N terms: reduction, approximation, sampling and
//! the numeric derivative.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use symb_calc::{
    AngleUnit, Context, Expr, Preferences, TrigFunction, approximate, approximate_at_points,
    reduce,
};

// =============================================================================
// Expression Generator
// =============================================================================

/// Sum of N mixed terms in `x`: polynomials, special angles, radicals and
/// quotients
fn generate_mixed(n: i64) -> Expr {
    let x = || Expr::symbol("x");
    let mut sum = Expr::integer(0);
    for i in 1..=n {
        let term = match i % 4 {
            0 => Expr::mul_expr(Expr::integer(i), Expr::pow(x(), Expr::integer(i % 5 + 1))),
            1 => Expr::mul_expr(
                Expr::trig(TrigFunction::Sine, Expr::mul_expr(Expr::integer(i), x())),
                Expr::trig(
                    TrigFunction::Cosine,
                    Expr::div_expr(Expr::pi(), Expr::integer(i % 6 + 1)),
                ),
            ),
            2 => Expr::square_root(Expr::add_expr(
                Expr::integer(i * i),
                Expr::pow(x(), Expr::integer(2)),
            )),
            _ => Expr::div_expr(
                Expr::add_expr(Expr::pow(x(), Expr::integer(2)), Expr::integer(i)),
                Expr::add_expr(x(), Expr::integer(i)),
            ),
        };
        sum = if i % 3 == 1 {
            Expr::sub_expr(sum, term)
        } else {
            Expr::add_expr(sum, term)
        };
    }
    sum
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_reduce_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_expressions_100");
    group.sample_size(20);

    let expr = generate_mixed(100);
    let ctx = Context::new();
    let prefs = Preferences::new();

    group.bench_function("reduce_mixed_100", |b| {
        b.iter(|| reduce(black_box(expr.clone()), &ctx, &prefs))
    });

    let reduced = reduce(expr.clone(), &ctx, &prefs);
    let mut at_point = Context::new();
    at_point.bind("x", Expr::float(2.5));

    group.bench_function("approximate_unreduced", |b| {
        b.iter(|| approximate::<f64>(black_box(&expr), &at_point, &prefs))
    });

    group.bench_function("approximate_reduced", |b| {
        b.iter(|| approximate::<f64>(black_box(&reduced), &at_point, &prefs))
    });

    let points: Vec<f64> = (0..256).map(|i| f64::from(i) / 32.0).collect();
    group.bench_function("sample_256_points", |b| {
        b.iter(|| approximate_at_points(black_box(&reduced), "x", &points, &ctx, &prefs))
    });

    group.finish();

    let mut group = c.benchmark_group("special_values");
    let degrees = Preferences::new().angle_unit(AngleUnit::Degree);
    let angles: Vec<Expr> = (0..360)
        .step_by(15)
        .map(|d| Expr::trig(TrigFunction::Cosine, Expr::integer(d)))
        .collect();
    group.bench_function("cosine_table_24_angles", |b| {
        b.iter(|| {
            for angle in &angles {
                black_box(reduce(angle.clone(), &ctx, &degrees));
            }
        })
    });

    let derivative = Expr::derivative(
        Expr::trig(TrigFunction::Sine, Expr::pow(Expr::symbol("x"), Expr::integer(2))),
        Expr::float(1.5),
    );
    group.bench_function("ridders_derivative", |b| {
        b.iter(|| approximate::<f64>(black_box(&derivative), &ctx, &prefs))
    });
    group.finish();
}

criterion_group!(benches, bench_reduce_evaluate);

criterion_main!(benches);
