use criterion::{criterion_group, criterion_main, Criterion};
use interpreter::evaluate;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("mixed operators", |b| {
        b.iter(|| evaluate("+ 11 ** ((+ 1000 //  +8) %+ 10) - (23.45 / 5.0) * -9.87").unwrap())
    });

    c.bench_function("long chain", |b| {
        let source = vec!["1.5 * 2 - 3 // 4"; 200].join(" + ");
        b.iter(|| evaluate(&source).unwrap())
    });

    c.bench_function("nested parentheses", |b| {
        let source = format!("{}2 ** -1{}", "(".repeat(150), ")".repeat(150));
        b.iter(|| evaluate(&source).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
