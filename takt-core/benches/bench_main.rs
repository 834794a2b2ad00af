use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use takt_core::prelude::*;

fn trip_times(id: usize, departure: Time) -> Arc<TripTimes> {
    let trip = Arc::new(Trip::new(
        FeedScopedId::new("bench", format!("t{id}")),
        FeedScopedId::new("bench", "route-1"),
        Direction::Outbound,
    ));
    let rows = (0..20)
        .map(|stop| StopTime::new(departure + stop * 120, departure + stop * 120))
        .collect();
    Arc::new(TripTimes::new(trip, rows).unwrap())
}

fn pattern() -> Arc<TripPattern> {
    Arc::new(TripPattern::new(
        FeedScopedId::new("bench", "p1"),
        FeedScopedId::new("bench", "route-1"),
        (0..20)
            .map(|i| FeedScopedId::new("bench", format!("stop-{i}")))
            .collect(),
    ))
}

fn seeded_builder(trips: usize) -> TimetableBuilder {
    let mut builder = Timetable::builder();
    builder.with_pattern(pattern());
    for i in 0..trips {
        builder
            .add(trip_times(i, 18000 + (i as Time * 37) % 43200))
            .unwrap();
    }
    builder
}

fn bench_build(c: &mut Criterion) {
    let builder = seeded_builder(1000);
    c.bench_function("build_1000_trips", |b| {
        b.iter(|| black_box(builder.clone().build().unwrap()));
    });
}

fn bench_update_cycle(c: &mut Criterion) {
    let timetable = seeded_builder(1000).build().unwrap();
    c.bench_function("seed_replace_rebuild", |b| {
        b.iter(|| {
            let mut next = timetable.copy_on_write();
            next.add_or_replace(trip_times(500, 30000));
            black_box(next.build().unwrap())
        });
    });
}

fn bench_departure_search(c: &mut Criterion) {
    let timetable = seeded_builder(1000).build().unwrap();
    c.bench_function("first_departure_at_or_after", |b| {
        b.iter(|| black_box(timetable.first_departure_at_or_after(36000)));
    });
}

criterion_group!(benches, bench_build, bench_update_cycle, bench_departure_search);
criterion_main!(benches);
