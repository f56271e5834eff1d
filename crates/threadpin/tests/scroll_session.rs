//! End-to-end scroll session over the public facade: a threaded page is
//! scrolled through, a thread collapses, the viewport resizes, and the
//! presentation stays consistent at every step.

use std::time::{Duration, Instant};
use threadpin::prelude::*;
use threadpin_core::testing::{FakeDocument, RecordingPresenter};

/// Two threads, 40px rows:
///
/// ```text
/// 0:   head A        top    0
/// 1:     reply A1    top   40
/// 2:       reply A2  top   80
/// 1:     reply A3    top  400
/// 0:   head B        top 1000
/// ```
fn page() -> (FakeDocument, [usize; 5]) {
    let mut doc = FakeDocument::new();
    let a = doc.push_row(0, 0.0, 40.0);
    let a1 = doc.push_row(1, 40.0, 40.0);
    let a2 = doc.push_row(2, 80.0, 40.0);
    let a3 = doc.push_row(1, 400.0, 40.0);
    let b = doc.push_row(0, 1000.0, 40.0);
    (doc, [a, a1, a2, a3, b])
}

#[test]
fn scrolling_through_a_thread_pins_and_releases_heads() {
    let (mut doc, [a, a1, a2, a3, b]) = page();
    let mut engine = StickyEngine::new(EngineConfig::default());
    let mut presenter = RecordingPresenter::new();
    engine.rebuild(&mut doc, &mut presenter).unwrap();

    // Unscrolled: nothing is displaced, nothing pinned.
    assert!(engine.layout().is_empty());

    // Scroll into the middle of thread A: the head pins at the viewport
    // top and the reply chain A1/A2 stacks banner under banner, with A3
    // (natural top 200) as the pending pusher at A1's level.
    doc.set_scroll(200.0);
    engine
        .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
        .unwrap();
    assert_eq!(engine.sticky_top(a), Some(0.0));
    assert_eq!(engine.sticky_top(a1), Some(40.0));
    assert_eq!(engine.sticky_top(a2), Some(80.0));
    assert!(engine.sticky_top(a3).is_none());
    assert!(engine.sticky_top(b).is_none());

    // Deeper: A3 scrolls up over the boundary and takes A1's slot in the
    // stack; A1 and A2 are released.
    doc.set_scroll(380.0);
    engine
        .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
        .unwrap();
    assert_eq!(engine.sticky_top(a), Some(0.0));
    assert_eq!(engine.sticky_top(a3), Some(40.0));
    assert!(engine.sticky_top(a1).is_none());
    assert_eq!(presenter.clear_count(a1), 1);
    assert_eq!(presenter.clear_count(a2), 1);

    // Head B arrives and shoves the whole banner stack out: B's natural
    // top is 10, so every 40px banner is clamped to 10 - 40 = -30.
    doc.set_scroll(990.0);
    engine
        .handle_event(HostEvent::Scroll, Instant::now(), &mut doc, &mut presenter)
        .unwrap();
    let a_pos = engine.layout().get(a).unwrap();
    assert!(a_pos.pushed);
    assert_eq!(a_pos.top, -30.0);
    let a3_pos = engine.layout().get(a3).unwrap();
    assert!(a3_pos.pushed);
    assert_eq!(a3_pos.top, -30.0);
}

#[test]
fn collapse_resize_and_recovery() {
    let (mut doc, [a, a1, a2, a3, _b]) = page();
    doc.set_scroll(200.0);

    let config = EngineConfig::default()
        .with_settle(SettleConfig::default().with_delay(Duration::from_millis(50)));
    let mut engine = StickyEngine::new(config);
    let mut presenter = RecordingPresenter::new();
    engine.rebuild(&mut doc, &mut presenter).unwrap();
    assert_eq!(engine.sticky_top(a), Some(0.0));
    assert_eq!(engine.sticky_top(a1), Some(40.0));
    assert_eq!(engine.sticky_top(a2), Some(80.0));

    // Thread A folds: its replies leave the visible sequence. The rebuild
    // waits out the settle delay.
    let toggle_at = Instant::now();
    for reply in [a1, a2, a3] {
        doc.set_visible(reply, false);
    }
    engine
        .handle_event(HostEvent::FoldToggled, toggle_at, &mut doc, &mut presenter)
        .unwrap();
    assert_eq!(engine.sticky_top(a1), Some(40.0), "not rebuilt yet");

    engine
        .poll(toggle_at + Duration::from_millis(60), &mut doc, &mut presenter)
        .unwrap();
    assert!(engine.sticky_top(a1).is_none());
    assert_eq!(presenter.clear_count(a1), 1);
    assert_eq!(presenter.clear_count(a2), 1);
    assert_eq!(engine.forest().len(), 2);
    assert_eq!(engine.sticky_top(a), Some(0.0), "head stays pinned");

    // Resize: geometry is remeasured from scratch.
    doc.reset_marker_reads();
    engine
        .handle_event(HostEvent::Resize, Instant::now(), &mut doc, &mut presenter)
        .unwrap();
    assert!(doc.marker_reads() > 0);

    // Unfold restores the replies and the banner stack.
    for reply in [a1, a2, a3] {
        doc.set_visible(reply, true);
    }
    engine
        .handle_event(
            HostEvent::RowsChanged,
            Instant::now(),
            &mut doc,
            &mut presenter,
        )
        .unwrap();
    assert_eq!(engine.forest().len(), 5);
    assert_eq!(engine.sticky_top(a1), Some(40.0));
    assert_eq!(engine.sticky_top(a2), Some(80.0));
}
