//! Dispatch-storm regression tests.
//!
//! A layout thrash (window resize, container reflow) makes the platform
//! deliver large coalesced batches in quick succession while consumers mount
//! and unmount underneath. These tests drive that pattern end to end through
//! bindings and adapters and check the registry's accounting afterwards:
//! exactly one platform instance for the whole storm, exact per-consumer
//! delivery counts, and a clean teardown.

use pretty_assertions::assert_eq;
use sizewatch_core::{BoxEdge, ElementHandle, ElementId, ObserveOptions, Rect, ResizeEntry};
use sizewatch_runtime::adapters::ObservedSize;
use sizewatch_runtime::binding::ResizeBinding;
use sizewatch_runtime::headless::HeadlessHost;
use sizewatch_runtime::registry::SharedObserver;
use std::cell::Cell;
use std::rc::Rc;

const CONSUMERS: u64 = 100;
const BATCHES: usize = 50;

fn entry_for(id: u64, step: usize) -> ResizeEntry {
    ResizeEntry::new(
        ElementId::from_raw(id),
        Rect::sized(100.0 + step as f64, 50.0 + step as f64),
    )
}

#[test]
fn burst_storm_delivers_exactly_once_per_consumer_per_batch() {
    let host = HeadlessHost::new();
    let registry = SharedObserver::new(host.factory());

    let counts: Vec<Rc<Cell<u64>>> = (0..CONSUMERS).map(|_| Rc::new(Cell::new(0))).collect();
    let bindings: Vec<ResizeBinding> = (0..CONSUMERS)
        .map(|i| {
            let handle = ElementHandle::attached(ElementId::from_raw(i + 1));
            let sink = Rc::clone(&counts[i as usize]);
            ResizeBinding::bind(&registry, handle, ObserveOptions::default(), move |_| {
                sink.set(sink.get() + 1);
            })
        })
        .collect();

    for step in 0..BATCHES {
        let batch: Vec<ResizeEntry> = (1..=CONSUMERS).map(|id| entry_for(id, step)).collect();
        registry.dispatch(&batch);
    }

    assert_eq!(host.instances_created(), 1);
    for count in &counts {
        assert_eq!(count.get(), BATCHES as u64);
    }

    drop(bindings);
    assert_eq!(registry.registration_count(), 0);
    assert!(!registry.is_live());
}

#[test]
fn churn_storm_half_the_consumers_leave_mid_storm() {
    let host = HeadlessHost::new();
    let registry = SharedObserver::new(host.factory());

    let counts: Vec<Rc<Cell<u64>>> = (0..CONSUMERS).map(|_| Rc::new(Cell::new(0))).collect();
    let mut bindings: Vec<Option<ResizeBinding>> = (0..CONSUMERS)
        .map(|i| {
            let handle = ElementHandle::attached(ElementId::from_raw(i + 1));
            let sink = Rc::clone(&counts[i as usize]);
            Some(ResizeBinding::bind(
                &registry,
                handle,
                ObserveOptions::default(),
                move |_| {
                    sink.set(sink.get() + 1);
                },
            ))
        })
        .collect();

    let half = BATCHES / 2;
    for step in 0..BATCHES {
        if step == half {
            // Odd consumers unmount between two batches.
            for i in (1..CONSUMERS as usize).step_by(2) {
                bindings[i] = None;
            }
        }
        let batch: Vec<ResizeEntry> = (1..=CONSUMERS).map(|id| entry_for(id, step)).collect();
        registry.dispatch(&batch);
    }

    // One instance for the whole storm; departures never tore it down
    // because even consumers stayed registered throughout.
    assert_eq!(host.instances_created(), 1);
    for (i, count) in counts.iter().enumerate() {
        let expected = if i % 2 == 0 { BATCHES } else { half };
        assert_eq!(count.get(), expected as u64, "consumer {i}");
    }

    bindings.clear();
    assert!(!registry.is_live());
    assert_eq!(host.live_instances(), 0);
}

#[test]
fn storm_with_mixed_box_edges_extracts_per_consumer() {
    let host = HeadlessHost::new();
    let registry = SharedObserver::new(host.factory());

    let handle_a = ElementHandle::attached(ElementId::from_raw(1));
    let handle_b = ElementHandle::attached(ElementId::from_raw(1));
    let content = ObservedSize::bind(&registry, handle_a, ObserveOptions::default());
    let border = ObservedSize::bind(
        &registry,
        handle_b,
        ObserveOptions::new(BoxEdge::BorderBox),
    );

    // Border-box measurement absent: the border-box consumer must fall back
    // to zero while the content-box consumer tracks the rect.
    registry.dispatch(&[ResizeEntry::new(
        ElementId::from_raw(1),
        Rect::sized(120.0, 80.0),
    )]);
    assert_eq!(content.get().width, 120.0);
    assert_eq!(content.get().height, 80.0);
    assert_eq!(border.get().width, 0.0);
    assert_eq!(border.get().height, 0.0);

    assert_eq!(host.instances_created(), 1);
    assert_eq!(
        host.watch_count(),
        1,
        "fan-out consumers share one platform watch"
    );
}

#[test]
fn teardown_and_reinit_between_storms() {
    let host = HeadlessHost::new();
    let registry = SharedObserver::new(host.factory());

    for round in 0..3u64 {
        let handle = ElementHandle::attached(ElementId::from_raw(round + 1));
        let seen = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&seen);
        let binding =
            ResizeBinding::bind(&registry, handle, ObserveOptions::default(), move |_| {
                sink.set(sink.get() + 1);
            });

        for step in 0..BATCHES {
            registry.dispatch(&[entry_for(round + 1, step)]);
        }
        assert_eq!(seen.get(), BATCHES as u64);

        drop(binding);
        assert!(!registry.is_live());
    }

    // A fresh primitive per round, never a resurrected one.
    assert_eq!(host.instances_created(), 3);
    assert_eq!(host.disconnects(), 3);
    assert_eq!(host.live_instances(), 0);
}
