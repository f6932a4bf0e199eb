//! Dispatch throughput benchmarks.
//!
//! The registry routes by scanning registrations and comparing each handle's
//! current value against the entry's target, so dispatch cost is
//! O(registrations) per entry. These benches size that constant for
//! registration counts spanning a small widget cluster up to a large
//! observed tree, under full-batch storms (every element changed) and
//! single-entry trickles.
//!
//! Run with: cargo bench -p sizewatch-runtime --bench dispatch_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sizewatch_core::{ElementHandle, ElementId, ObserveOptions, Rect, ResizeEntry};
use sizewatch_runtime::binding::ResizeBinding;
use sizewatch_runtime::headless::HeadlessHost;
use sizewatch_runtime::registry::SharedObserver;
use std::hint::black_box;

fn registered_registry(n: u64) -> (SharedObserver, Vec<ResizeBinding>) {
    let host = HeadlessHost::new();
    let registry = SharedObserver::new(host.factory());
    let bindings = (1..=n)
        .map(|id| {
            let handle = ElementHandle::attached(ElementId::from_raw(id));
            ResizeBinding::bind(&registry, handle, ObserveOptions::default(), |entry| {
                black_box(entry.content_rect);
            })
        })
        .collect();
    (registry, bindings)
}

fn full_batch(n: u64) -> Vec<ResizeEntry> {
    (1..=n)
        .map(|id| ResizeEntry::new(ElementId::from_raw(id), Rect::sized(100.0, 50.0)))
        .collect()
}

fn bench_full_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_full_batch");
    for n in [10u64, 100, 400] {
        let (registry, _bindings) = registered_registry(n);
        let batch = full_batch(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| registry.dispatch(black_box(&batch)));
        });
    }
    group.finish();
}

fn bench_single_entry(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_single_entry");
    for n in [10u64, 100, 400] {
        let (registry, _bindings) = registered_registry(n);
        // Worst case for the scan: the entry matches the last registration.
        let batch = vec![ResizeEntry::new(
            ElementId::from_raw(n),
            Rect::sized(100.0, 50.0),
        )];
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| registry.dispatch(black_box(&batch)));
        });
    }
    group.finish();
}

fn bench_orphan_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_orphan_batch");
    for n in [10u64, 100, 400] {
        let (registry, _bindings) = registered_registry(n);
        // Entries for elements nobody observes: pure scan cost, no callbacks.
        let batch: Vec<ResizeEntry> = (1..=n)
            .map(|id| ResizeEntry::new(ElementId::from_raw(n + id), Rect::sized(100.0, 50.0)))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| registry.dispatch(black_box(&batch)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_full_batch,
    bench_single_entry,
    bench_orphan_batch
);
criterion_main!(benches);
