use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, TimeZone, Utc};
use shopledger_accounting::{
    BusinessEvent, ClosingPolicy, LedgerMovement, RecordedEntry, compute_balances, project,
};
use shopledger_core::{ClientId, EntryId, Money};

/// One client's history: alternating sales and payments, a close every 50 entries.
fn history(client: ClientId, len: usize) -> Vec<LedgerMovement> {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap();
    let mut owed = 0i64;

    (0..len)
        .map(|i| {
            let occurred_at = start + Duration::hours(i as i64 * 7);
            let event = if i % 50 == 49 {
                let e = BusinessEvent::PeriodClose {
                    client_id: client,
                    balance: Money::from_minor(owed),
                    occurred_at,
                };
                owed = 0;
                e
            } else if i % 2 == 0 {
                owed += 12_345;
                BusinessEvent::SaleOnAccount {
                    client_id: client,
                    amount: Money::from_minor(12_345),
                    concept: format!("venta {i}"),
                    occurred_at,
                }
            } else {
                owed -= 10_000;
                BusinessEvent::PaymentReceived {
                    client_id: client,
                    amount: Money::from_minor(10_000),
                    concept: None,
                    occurred_at,
                }
            };
            let entry = event.into_entry(EntryId::new()).unwrap();
            RecordedEntry::new(i as u64 + 1, entry).unwrap()
        })
        .flat_map(|rec| project(&rec))
        .collect()
}

fn bench_compute_balances(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_balances");
    let client = ClientId::new();

    for size in [100usize, 1_000, 10_000] {
        let mut movements = history(client, size);
        movements.reverse();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("official", size), &movements, |b, m| {
            b.iter(|| compute_balances(black_box(m.clone())).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("working", size), &movements, |b, m| {
            b.iter(|| compute_balances(ClosingPolicy::Exclude.apply(black_box(m.clone()))).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_balances);
criterion_main!(benches);
