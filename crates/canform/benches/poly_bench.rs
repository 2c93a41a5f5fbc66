//! Benchmarks for canonical-form arithmetic, GCDs, resultants and
//! determinants.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use canform_linalg::{determinant, CFMatrix};
use canform_poly::{gcd, resultant, AlgebraContext, CanonicalForm, GcdStrategy, Variable};

fn x() -> CanonicalForm {
    CanonicalForm::from(Variable::named(1, 'x'))
}

fn y() -> CanonicalForm {
    CanonicalForm::from(Variable::named(2, 'y'))
}

fn z() -> CanonicalForm {
    CanonicalForm::from(Variable::named(3, 'z'))
}

/// Dense univariate polynomial with deterministic coefficients in [-50, 50).
fn dense_univariate(degree: u32) -> CanonicalForm {
    (0..=degree)
        .map(|i| x().pow(i) * (i64::from(i * 37 % 100) - 50))
        .sum()
}

/// `(x + y + z + 1)^n`, dense in three variables.
fn trivariate_power(n: u32) -> CanonicalForm {
    (x() + y() + z() + 1).pow(n)
}

fn bench_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("cf_mul");

    for degree in [16, 64, 256] {
        let f = dense_univariate(degree);
        let g = dense_univariate(degree + 1);
        group.bench_with_input(BenchmarkId::new("univariate", degree), &degree, |b, _| {
            b.iter(|| black_box(&f * &g))
        });
    }

    for n in [3, 5, 7] {
        let f = trivariate_power(n);
        let g = trivariate_power(n) + x();
        group.bench_with_input(BenchmarkId::new("trivariate", n), &n, |b, _| {
            b.iter(|| black_box(&f * &g))
        });
    }

    group.finish();
}

fn bench_gcd_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("cf_gcd");

    let common = x() * y() + z().pow(2) - 3;
    let f = &common * (x().pow(3) + y() * z() + 1);
    let g = &common * (x() * z() - y().pow(3) + 2);

    for strategy in [GcdStrategy::Classic, GcdStrategy::Modular, GcdStrategy::Ezgcd] {
        let mut ctx = AlgebraContext::new();
        ctx.set_gcd_strategy(strategy);
        group.bench_function(format!("{strategy:?}"), |b| {
            b.iter(|| black_box(gcd(&f, &g, &ctx)))
        });
    }

    group.finish();
}

fn bench_resultant(c: &mut Criterion) {
    let mut group = c.benchmark_group("cf_resultant");
    let yv = Variable::named(2, 'y');

    for n in [2, 4, 6] {
        let f = (x() + y()).pow(n) - 2;
        let g = y().pow(n + 1) - x() * y() + 1;
        group.bench_with_input(BenchmarkId::new("bivariate", n), &n, |b, _| {
            b.iter(|| black_box(resultant(&f, &g, &yv)))
        });
    }

    group.finish();
}

fn bench_determinant(c: &mut Criterion) {
    let mut group = c.benchmark_group("cf_determinant");

    for n in [4usize, 8, 12] {
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        let e = u32::try_from((i + j) % 3).unwrap_or(0);
                        x().pow(e) + CanonicalForm::from(i64::try_from(i * n + j).unwrap_or(0))
                    })
                    .collect()
            })
            .collect();
        let m = CFMatrix::from_rows(rows);
        group.bench_with_input(BenchmarkId::new("polynomial_entries", n), &n, |b, &n| {
            b.iter(|| black_box(determinant(&m, n)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_multiplication,
    bench_gcd_strategies,
    bench_resultant,
    bench_determinant,
);
criterion_main!(benches);
