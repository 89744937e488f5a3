use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_closure_is_an_alert_sink() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let sink = move || {
        counter.fetch_add(1, Ordering::SeqCst);
    };
    sink.fire();
    sink.fire();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fanout_fires_every_sink_once() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let (a, b) = (Arc::clone(&first), Arc::clone(&second));

    let fanout = AlertFanout::new()
        .with_sink(Arc::new(move || {
            a.fetch_add(1, Ordering::SeqCst);
        }))
        .with_sink(Arc::new(move || {
            b.fetch_add(1, Ordering::SeqCst);
        }))
        .with_sink(Arc::new(LogAlert));

    assert!(!fanout.is_empty());
    fanout.fire();
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_fanout_is_a_no_op() {
    let fanout = AlertFanout::new();
    assert!(fanout.is_empty());
    fanout.fire();
}
