//! Seat selection benchmarks.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use seat_booking::{
    models::{FreeSeat, SeatLayout},
    services::select_seats,
};

fn layout(rows: usize, seats_per_row: u32) -> SeatLayout {
    SeatLayout::new(vec![seats_per_row; rows]).expect("non-empty layout")
}

/// Каждое второе место занято: ни один ряд не даёт блока из двух и больше,
/// селектор всегда уходит в фолбэк.
fn checkerboard(layout: &SeatLayout) -> Vec<FreeSeat> {
    layout
        .seats()
        .iter()
        .filter(|s| s.id % 2 == 0)
        .map(FreeSeat::from)
        .collect()
}

fn bench_same_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_same_row");
    for rows in [12usize, 100, 1_000] {
        let free: Vec<FreeSeat> = layout(rows, 20).seats().iter().map(FreeSeat::from).collect();
        group.bench_with_input(BenchmarkId::from_parameter(rows), &free, |b, free| {
            b.iter(|| select_seats(black_box(free), black_box(7)))
        });
    }
    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_closest_span");
    for rows in [12usize, 100, 1_000] {
        let free = checkerboard(&layout(rows, 20));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &free, |b, free| {
            b.iter(|| select_seats(black_box(free), black_box(7)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_same_row, bench_fallback);
criterion_main!(benches);
