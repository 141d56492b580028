use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use txmine::{mine, TransactionalDatabase};

/// Generate synthetic transactions over `num_items` labels.
///
/// Low item numbers are drawn more often so the data has a few dense items
/// and a long sparse tail.
fn generate_transactions(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
) -> Vec<Vec<String>> {
    let mut rng = rand::thread_rng();

    (0..num_transactions)
        .map(|_| {
            let random_factor: f64 = rng.gen();
            let size = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;
            (0..size.max(1))
                .map(|_| {
                    let skew: f64 = rng.gen();
                    let item = ((skew * skew) * num_items as f64) as usize;
                    format!("item{}", item.min(num_items - 1))
                })
                .collect()
        })
        .collect()
}

fn bench_mine(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine");

    for &num_transactions in &[1_000, 10_000] {
        let transactions = generate_transactions(num_transactions, 200, 8);
        let min_support = num_transactions / 50;

        group.bench_with_input(
            BenchmarkId::from_parameter(num_transactions),
            &transactions,
            |b, transactions| b.iter(|| mine(black_box(transactions), min_support)),
        );
    }

    group.finish();
}

fn bench_support(c: &mut Criterion) {
    let database = TransactionalDatabase::from_transactions(generate_transactions(10_000, 200, 8));
    let patterns: Vec<Vec<String>> = (0..100)
        .map(|i| vec![format!("item{}", i % 10), format!("item{}", i % 7 + 10)])
        .collect();

    c.bench_function("supports_100_pairs", |b| {
        b.iter(|| database.supports(black_box(&patterns)))
    });
}

criterion_group!(benches, bench_mine, bench_support);
criterion_main!(benches);
