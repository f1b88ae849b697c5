use criterion::{black_box, criterion_group, criterion_main, Criterion};

use aureus_core::ledger::{Ledger, Wallet};
use aureus_core::reward::{reward, reward_description};

fn bench_reward(c: &mut Criterion) {
    let mut group = c.benchmark_group("reward");

    group.bench_function("perfect", |b| {
        b.iter(|| reward(black_box(3), black_box(3)))
    });

    group.bench_function("partial", |b| {
        b.iter(|| reward(black_box(2), black_box(3)))
    });

    group.bench_function("description", |b| {
        b.iter(|| reward_description(black_box(2), black_box(3)))
    });

    group.finish();
}

fn bench_wallet_credit(c: &mut Criterion) {
    let mut group = c.benchmark_group("wallet");

    group.bench_function("credit", |b| {
        let wallet = Wallet::default();
        b.iter(|| wallet.credit(black_box(50), black_box("Oracle's Challenge Reward (3/3)")))
    });

    group.bench_function("recent_7", |b| {
        let wallet = Wallet::default();
        for _ in 0..100 {
            wallet.credit(20, "Oracle's Challenge Reward (2/3)");
        }
        b.iter(|| wallet.recent(black_box(7)))
    });

    group.finish();
}

criterion_group!(benches, bench_reward, bench_wallet_credit);
criterion_main!(benches);
