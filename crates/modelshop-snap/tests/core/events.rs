use modelshop_core::{shared, EventType, Point, SnapEvent, WidgetRegistry};
use modelshop_snap::EventProcessor;
use std::cell::RefCell;
use std::rc::Rc;

fn processor() -> EventProcessor {
    EventProcessor::new(shared(WidgetRegistry::new()))
}

#[test]
fn move_storm_accepts_fewer_than_fed() {
    let mut processor = processor();

    // 100 synthetic moves, 1 ms apart, under 2 px of travel each.
    let mut accepted = 0;
    for i in 0..100 {
        let event = SnapEvent::pointer_moved(Point::new(i as f64 * 1.0, 0.0), i as f64);
        if processor.process_event(event) {
            accepted += 1;
        }
    }
    assert!(accepted < 100, "debouncer must suppress a 1 kHz move storm");
    assert!(accepted >= 1, "the first move is always accepted");
}

#[test]
fn last_move_flushes_before_subsequent_non_move() {
    let mut processor = processor();
    let log: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = log.clone();
    processor.subscribe(EventType::PointerMoved, move |event| {
        sink.borrow_mut().push(format!("move:{}", event.position.x));
    });
    let sink = log.clone();
    processor.subscribe(EventType::PointerReleased, move |_| {
        sink.borrow_mut().push("release".to_string());
    });

    processor.process_event(SnapEvent::pointer_moved(Point::new(0.0, 0.0), 0.0));
    // Suppressed: too soon and too close.
    processor.process_event(SnapEvent::pointer_moved(Point::new(0.4, 0.0), 1.0));
    processor.process_event(SnapEvent::pointer_moved(Point::new(0.9, 0.0), 2.0));

    processor.process_event(SnapEvent::pointer_released(Point::new(0.9, 0.0), 3.0));

    // The deferred moves reached the handlers before the release, in order.
    let log = log.borrow();
    assert_eq!(
        *log,
        vec![
            "move:0".to_string(),
            "move:0.4".to_string(),
            "move:0.9".to_string(),
            "release".to_string(),
        ]
    );
}

#[test]
fn widely_spaced_moves_all_accepted() {
    let mut processor = processor();
    let mut accepted = 0;
    for i in 0..10 {
        let event = SnapEvent::pointer_moved(Point::new(i as f64 * 100.0, 0.0), i as f64 * 100.0);
        if processor.process_event(event) {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 10);
}

#[test]
fn stats_reflect_pipeline() {
    let mut processor = processor();
    processor.process_event(SnapEvent::pointer_moved(Point::new(0.0, 0.0), 0.0));
    processor.process_event(SnapEvent::pointer_moved(Point::new(0.5, 0.0), 1.0));
    processor.process_event(SnapEvent::pointer_released(Point::new(0.5, 0.0), 2.0));

    let stats = processor.stats();
    assert_eq!(stats.received, 3);
    assert_eq!(stats.suppressed, 1);
    assert_eq!(stats.flushed, 1);
    // Accepted move + flushed move + release.
    assert_eq!(stats.dispatched, 3);
}
