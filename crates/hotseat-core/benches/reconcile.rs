use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hotseat_core::{reconcile, Container, ItemIdentity, ItemInfo, PredictionSet, SlotRow, UserId};
use hotseat_grid::{GridSpec, RowOrientation};

const CAPACITY_SAMPLES: &[usize] = &[4, 8, 16, 32];

struct RowFixture {
    row: SlotRow,
    predictions: PredictionSet,
    capacity: usize,
    grid: GridSpec,
}

impl RowFixture {
    /// A row at `capacity` with every third slot pinned and the rest
    /// holding yesterday's predictions, reconciled against a fully fresh
    /// ranking (the worst case: every slot churns).
    fn churning(capacity: usize) -> Self {
        let mut row = SlotRow::new();
        for rank in 0..capacity {
            let container = if rank % 3 == 2 {
                Container::Pinned
            } else {
                Container::Prediction
            };
            let mut item = ItemInfo::predicted(ItemIdentity::new(
                format!("stale-{rank}"),
                UserId::new(0),
            ));
            item.container = container;
            item.rank = rank;
            item.screen_id = rank;
            row.attach(item);
        }
        let predictions: PredictionSet = (0..capacity)
            .map(|rank| {
                ItemInfo::predicted(ItemIdentity::new(format!("fresh-{rank}"), UserId::new(0)))
            })
            .collect();
        Self {
            row,
            predictions,
            capacity,
            grid: GridSpec::new(RowOrientation::Horizontal),
        }
    }
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for &capacity in CAPACITY_SAMPLES {
        let fixture = RowFixture::churning(capacity);
        group.bench_with_input(
            BenchmarkId::new("churning_row", capacity),
            &fixture,
            |b, fixture| {
                b.iter(|| {
                    black_box(reconcile(
                        &fixture.row,
                        &fixture.predictions,
                        fixture.capacity,
                        fixture.grid,
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
