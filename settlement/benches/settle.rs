//! Greedy pass vs. bounded exhaustive search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use settlement::{SettleEntry, Settler};

/// `n` creditors and `n` debtors with uneven, zero-sum balances
fn balanced_group(n: usize) -> Vec<SettleEntry<usize>> {
    let mut entries = Vec::with_capacity(2 * n);
    let mut total = 0i64;
    for i in 0..n {
        let cents = 1_000 + (i as i64 * 737) % 5_000;
        total += cents;
        entries.push(SettleEntry::new(i, Decimal::new(cents, 2)));
    }

    let share = total / n as i64;
    for i in 0..n {
        let cents = if i + 1 == n { total - share * (n as i64 - 1) } else { share };
        entries.push(SettleEntry::new(n + i, Decimal::new(-cents, 2)));
    }
    entries
}

fn bench_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle");

    for n in [2usize, 3, 4] {
        let settler = Settler::new(balanced_group(n)).unwrap();

        group.bench_with_input(BenchmarkId::new("greedy", 2 * n), &settler, |b, s| {
            b.iter(|| black_box(s.greedy_moves().unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("exhaustive", 2 * n), &settler, |b, s| {
            b.iter(|| black_box(s.search(2 * n, false).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_settle);
criterion_main!(benches);
