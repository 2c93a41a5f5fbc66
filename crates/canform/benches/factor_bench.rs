//! Benchmarks for factorization.
//!
//! Includes:
//! - Zassenhaus over Z, including a recombination-heavy input
//! - Cantor-Zassenhaus against Berlekamp over `F_p`
//! - Multivariate factorization by lifting

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use canform_factor::{factorize, sqr_free};
use canform_poly::{AlgebraContext, CanonicalForm, Switch, Variable};

fn x() -> CanonicalForm {
    CanonicalForm::from(Variable::named(1, 'x'))
}

fn y() -> CanonicalForm {
    CanonicalForm::from(Variable::named(2, 'y'))
}

/// `prod_{i < n} (x^2 + i x - (i + 1))`.
fn quadratic_product(n: i64) -> CanonicalForm {
    (0..n).map(|i| x().pow(2) + x() * i - (i + 1)).product()
}

fn bench_univariate_z(c: &mut Criterion) {
    let mut group = c.benchmark_group("factor_z");
    let ctx = AlgebraContext::new();

    for n in [2, 4, 6] {
        let f = quadratic_product(n);
        group.bench_with_input(BenchmarkId::new("quadratics", n), &n, |b, _| {
            b.iter(|| black_box(factorize(&f, &ctx)))
        });
    }

    // splits into linear factors modulo every prime
    let swinnerton_dyer = x().pow(4) - x().pow(2) * 10 + 1;
    group.bench_function("x4_minus_10x2_plus_1", |b| {
        b.iter(|| black_box(factorize(&swinnerton_dyer, &ctx)))
    });

    group.finish();
}

fn bench_finite_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("factor_fp");
    let cz = AlgebraContext::with_characteristic(32_003).expect("32003 is prime");
    let mut bk = cz.clone();
    bk.on(Switch::Berlekamp);

    for degree in [8u32, 16, 32] {
        let f = cz
            .map_into(&((x().pow(degree) - 1) * (x().pow(degree / 2) + x() + 3)))
            .expect("integers embed into F_p");
        group.bench_with_input(BenchmarkId::new("cantor_zassenhaus", degree), &degree, |b, _| {
            b.iter(|| black_box(factorize(&f, &cz)))
        });
        group.bench_with_input(BenchmarkId::new("berlekamp", degree), &degree, |b, _| {
            b.iter(|| black_box(factorize(&f, &bk)))
        });
    }

    group.finish();
}

fn bench_multivariate(c: &mut Criterion) {
    let mut group = c.benchmark_group("factor_multivariate");
    let ctx = AlgebraContext::new();

    let f = (x().pow(2) * y() + y().pow(3) - 1) * (x() * y().pow(2) + x() + 7) * (x() - y());
    group.bench_function("bivariate_three_factors", |b| {
        b.iter(|| black_box(factorize(&f, &ctx)))
    });

    let g = (x() + y()).pow(3) * (x() * y() - 1).pow(2);
    group.bench_function("sqr_free_bivariate", |b| {
        b.iter(|| black_box(sqr_free(&g, &ctx)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_univariate_z,
    bench_finite_field,
    bench_multivariate,
);
criterion_main!(benches);
