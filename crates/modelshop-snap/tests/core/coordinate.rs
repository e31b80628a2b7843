use modelshop_core::{shared, CoordinateSystem, Point, Rect, WidgetId, WidgetInfo, WidgetRegistry};
use modelshop_snap::CoordinateManager;
use proptest::prelude::*;

const SYSTEMS: [CoordinateSystem; 5] = [
    CoordinateSystem::Screen,
    CoordinateSystem::Client,
    CoordinateSystem::Widget,
    CoordinateSystem::Dock,
    CoordinateSystem::Unified,
];

fn manager_with_widget() -> (CoordinateManager, WidgetId) {
    let registry = shared(WidgetRegistry::new());
    let widget = registry.borrow_mut().insert(WidgetInfo::new(
        "outliner",
        Rect::new(220.0, 140.0, 360.0, 720.0),
    ));
    let manager = CoordinateManager::with_geometry(
        registry,
        Rect::new(100.0, 50.0, 1600.0, 1000.0),
        Rect::new(0.0, 0.0, 2560.0, 1440.0),
    );
    (manager, widget)
}

proptest! {
    #[test]
    fn identity_transform_is_exact(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
        let (mut manager, widget) = manager_with_widget();
        let p = Point::new(x, y);
        for system in SYSTEMS {
            let context = system.needs_context().then_some(widget);
            let result = manager.transform_point(p, system, system, context);
            prop_assert_eq!(result.point, p);
            prop_assert_eq!(result.confidence, 1.0);
        }
    }

    #[test]
    fn screen_client_round_trip(x in -5000.0f64..5000.0, y in -5000.0f64..5000.0) {
        let (mut manager, _) = manager_with_widget();
        let p = Point::new(x, y);
        let there = manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);
        let back = manager.transform_point(
            there.point,
            CoordinateSystem::Client,
            CoordinateSystem::Screen,
            None,
        );
        prop_assert!((back.point.x - p.x).abs() < 1e-9);
        prop_assert!((back.point.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn widget_round_trips_through_every_anchor(
        x in -2000.0f64..2000.0,
        y in -2000.0f64..2000.0,
    ) {
        let (mut manager, widget) = manager_with_widget();
        let p = Point::new(x, y);
        for anchor in [CoordinateSystem::Screen, CoordinateSystem::Client, CoordinateSystem::Unified] {
            for local in [CoordinateSystem::Widget, CoordinateSystem::Dock] {
                let there = manager.transform_point(p, anchor, local, Some(widget));
                let back = manager.transform_point(there.point, local, anchor, Some(widget));
                prop_assert!((back.point.x - p.x).abs() < 1e-9);
                prop_assert!((back.point.y - p.y).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn cached_results_are_bit_identical_within_ttl() {
    let (mut manager, _) = manager_with_widget();
    let p = Point::new(733.25, 412.125);

    let first = manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);
    let second =
        manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);

    assert_eq!(first.point.x.to_bits(), second.point.x.to_bits());
    assert_eq!(first.point.y.to_bits(), second.point.y.to_bits());
    assert_eq!(first.timestamp, second.timestamp);
    assert_eq!(manager.stats().hits, 1);
}

#[test]
fn geometry_change_forces_recomputation() {
    let (mut manager, _) = manager_with_widget();
    let p = Point::new(500.0, 400.0);

    let before =
        manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);
    assert_eq!(before.point, Point::new(400.0, 350.0));

    manager.update_main_window_geometry(Rect::new(0.0, 0.0, 1600.0, 1000.0));
    let after =
        manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);

    // Fresh result, new geometry, and the second call was a miss.
    assert_eq!(after.point, p);
    assert_eq!(manager.stats().hits, 0);
    assert_eq!(manager.stats().misses, 2);
}

#[test]
fn screen_geometry_change_also_invalidates() {
    let (mut manager, _) = manager_with_widget();
    let p = Point::new(10.0, 10.0);
    manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Client, None);
    assert_eq!(manager.cache_len(), 1);
    manager.update_screen_geometry(Rect::new(0.0, 0.0, 3840.0, 2160.0));
    assert_eq!(manager.cache_len(), 0);
}

#[test]
fn context_dependent_entries_are_cached_separately() {
    let registry = shared(WidgetRegistry::new());
    let a = registry
        .borrow_mut()
        .insert(WidgetInfo::new("a", Rect::new(100.0, 0.0, 50.0, 50.0)));
    let b = registry
        .borrow_mut()
        .insert(WidgetInfo::new("b", Rect::new(200.0, 0.0, 50.0, 50.0)));
    let mut manager = CoordinateManager::with_geometry(
        registry,
        Rect::new(0.0, 0.0, 1600.0, 1000.0),
        Rect::new(0.0, 0.0, 2560.0, 1440.0),
    );

    let p = Point::new(300.0, 20.0);
    let in_a = manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Widget, Some(a));
    let in_b = manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Widget, Some(b));
    assert_eq!(in_a.point, Point::new(200.0, 20.0));
    assert_eq!(in_b.point, Point::new(100.0, 20.0));
    // Two distinct cache entries, no false hit.
    assert_eq!(manager.stats().misses, 2);
    assert_eq!(manager.stats().hits, 0);
}

#[test]
fn disposed_widget_degrades_to_zero_confidence() {
    let registry = shared(WidgetRegistry::new());
    let widget = registry
        .borrow_mut()
        .insert(WidgetInfo::new("panel", Rect::new(0.0, 0.0, 100.0, 100.0)));
    let mut manager = CoordinateManager::with_geometry(
        registry.clone(),
        Rect::new(0.0, 0.0, 1600.0, 1000.0),
        Rect::new(0.0, 0.0, 2560.0, 1440.0),
    );
    registry.borrow_mut().remove(widget);

    let p = Point::new(50.0, 50.0);
    let result =
        manager.transform_point(p, CoordinateSystem::Screen, CoordinateSystem::Widget, Some(widget));
    assert_eq!(result.point, p);
    assert_eq!(result.confidence, 0.0);
}
