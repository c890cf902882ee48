//! Benchmarks for circuit construction and satisfiability checking

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use zktls_circuits::evaluate;

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    group.bench_function("aes128_block", |b| {
        b.iter(|| {
            let report = evaluate::eval_aes128().unwrap();
            black_box(report)
        });
    });

    group.bench_function("sha256_block", |b| {
        b.iter(|| {
            let report = evaluate::eval_shacal2().unwrap();
            black_box(report)
        });
    });

    group.bench_function("kdc_derive", |b| {
        b.iter(|| {
            let report = evaluate::eval_kdc().unwrap();
            black_box(report)
        });
    });

    group.finish();
}

fn bench_gcm_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("gcm");
    group.sample_size(10); // full key expansion per record, so few samples

    for size in [16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let report = evaluate::eval_gcm(size).unwrap();
                black_box(report)
            });
        });
    }

    group.finish();
}

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sessions");
    group.sample_size(10);

    group.bench_function("record", |b| {
        b.iter(|| {
            let report = evaluate::eval_record().unwrap();
            black_box(report)
        });
    });

    group.bench_function("oracle", |b| {
        b.iter(|| {
            let report = evaluate::eval_oracle().unwrap();
            black_box(report)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_primitives, bench_gcm_sizes, bench_sessions);
criterion_main!(benches);
