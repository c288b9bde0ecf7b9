//! Benchmarks for field reconciliation and chip measurement.
//!
//! Run with: cargo bench -p chipbox-widgets

use chipbox_widgets::ChipBox;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

// ============================================================================
// Value rewrites
// ============================================================================

fn make_field(pool: usize) -> ChipBox<usize> {
    ChipBox::new().with_items(0..pool)
}

fn bench_value_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/rewrite");

    for pool in [10usize, 100, 1000] {
        let mut field = make_field(pool);
        let evens: Vec<usize> = (0..pool).step_by(2).collect();
        let odds: Vec<usize> = (1..pool).step_by(2).collect();

        group.bench_with_input(
            BenchmarkId::new("full_churn", pool),
            &(),
            |b, _| {
                let mut flip = false;
                b.iter(|| {
                    flip = !flip;
                    field.set_value(if flip { evens.clone() } else { odds.clone() });
                    black_box(field.chips().len());
                })
            },
        );
    }

    group.finish();
}

fn bench_single_gesture(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/gesture");

    for pool in [10usize, 100, 1000] {
        let mut field = make_field(pool);
        let half: Vec<usize> = (0..pool / 2).collect();
        field.set_value(half);

        group.bench_with_input(
            BenchmarkId::new("select_then_delete", pool),
            &(),
            |b, _| {
                b.iter(|| {
                    field.select(pool - 1);
                    let id = field
                        .chips()
                        .last()
                        .map(|chip| chip.id())
                        .unwrap();
                    field.delete_chip(id);
                    black_box(field.value().len());
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Pool replacement
// ============================================================================

fn bench_pool_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("field/pool_swap");

    for pool in [10usize, 100, 1000] {
        let mut field = make_field(pool);
        // Value lives in the overlap of the two pools so each swap keeps it
        // and exercises the quiet adopt-and-refresh path.
        let overlap: Vec<usize> = (pool / 2..pool).collect();
        field.set_value(overlap);
        let low: Vec<usize> = (0..pool).collect();
        let high: Vec<usize> = (pool / 2..pool + pool / 2).collect();

        group.bench_with_input(
            BenchmarkId::new("overlapping", pool),
            &(),
            |b, _| {
                let mut flip = false;
                b.iter(|| {
                    flip = !flip;
                    field.set_items(if flip { high.clone() } else { low.clone() });
                    black_box(field.picker().options().len());
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Chip measurement
// ============================================================================

fn make_label_field(label_len: usize) -> ChipBox<String> {
    let items: Vec<String> = (0..8)
        .map(|i| {
            let body: String = "mixed 宽字 text ".chars().cycle().take(label_len).collect();
            format!("{i}-{body}")
        })
        .collect();
    let mut field = ChipBox::new().with_items(items.clone());
    field.set_value(items);
    field
}

fn bench_chip_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("chip/measure");

    for (label_len, label) in [(12, "12ch"), (60, "60ch"), (240, "240ch")] {
        let field = make_label_field(label_len);

        group.bench_with_input(BenchmarkId::new("width", label), &field, |b, field| {
            b.iter(|| {
                let total: usize = field.chips().iter().map(|chip| chip.display_width()).sum();
                black_box(total);
            })
        });

        group.bench_with_input(BenchmarkId::new("truncate", label), &field, |b, field| {
            b.iter(|| {
                for chip in field.chips() {
                    black_box(chip.truncated_label(16));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_value_rewrite,
    bench_single_gesture,
    bench_pool_swap,
    bench_chip_measure,
);

criterion_main!(benches);
