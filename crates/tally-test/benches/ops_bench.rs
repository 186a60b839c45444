//! Benchmarks for ledger operations

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use tally_core::{AccountId, Operation, ScriptHash};
use tally_ops::{MetricsRegistry, OperationContext, OperationFrame};
use tally_state::{LedgerConfig, LedgerState, LedgerTxn, LedgerView};
use tally_test::{LedgerSimulator, SimulationConfig};

fn root() -> AccountId {
    AccountId::from_seed(0)
}

fn bench_create_account_apply(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();
    let frame = OperationFrame::from_operation(
        &Operation::create_account(AccountId::from_seed(1), 1_000, ScriptHash::ZERO),
        root(),
    );

    c.bench_function("create_account_apply", |b| {
        b.iter_batched(
            || LedgerState::genesis(LedgerConfig::local(), root()),
            |mut state| {
                let ctx = OperationContext::new(&metrics);
                black_box(frame.run(&ctx, &mut state).ok())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_create_account_already_exists(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();
    let ctx = OperationContext::new(&metrics);
    let frame = OperationFrame::from_operation(
        &Operation::create_account(AccountId::from_seed(1), 1_000, ScriptHash::ZERO),
        root(),
    );
    let mut state = LedgerState::genesis(LedgerConfig::local(), root());
    let _ = frame.run(&ctx, &mut state);

    c.bench_function("create_account_already_exists", |b| {
        b.iter(|| black_box(frame.run(&ctx, &mut state).ok()))
    });
}

fn bench_txn_batch_commit(c: &mut Criterion) {
    let metrics = MetricsRegistry::new();
    let frames: Vec<OperationFrame> = (1..=64)
        .map(|i| {
            OperationFrame::from_operation(
                &Operation::create_account(AccountId::from_seed(i), 1_000, ScriptHash::ZERO),
                root(),
            )
        })
        .collect();

    c.bench_function("txn_batch_64_commit", |b| {
        b.iter_batched(
            || LedgerState::genesis(LedgerConfig::local(), root()),
            |mut state| {
                let ctx = OperationContext::new(&metrics);
                let mut txn = LedgerTxn::new(&mut state);
                for frame in &frames {
                    let _ = frame.run(&ctx, &mut txn);
                }
                black_box(txn.header().ledger_seq);
                black_box(txn.commit().ok().map(|d| d.len()))
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_light_simulation(c: &mut Criterion) {
    c.bench_function("simulation_light", |b| {
        b.iter(|| {
            let mut sim = LedgerSimulator::new(SimulationConfig::light());
            black_box(sim.run().ok())
        })
    });
}

criterion_group!(
    benches,
    bench_create_account_apply,
    bench_create_account_already_exists,
    bench_txn_batch_commit,
    bench_light_simulation,
);
criterion_main!(benches);
