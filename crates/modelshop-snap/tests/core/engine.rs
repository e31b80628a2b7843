use modelshop_core::{shared, CoordinateSystem, Point, Rect, Shared, WidgetRegistry};
use modelshop_settings::{SnapConfig, SnapZone};
use modelshop_snap::{CoordinateManager, SnapEngine, SnapType};
use proptest::prelude::*;

fn engine_for(config: SnapConfig) -> (SnapEngine, Shared<SnapConfig>) {
    let config = shared(config);
    let coords = shared(CoordinateManager::with_geometry(
        shared(WidgetRegistry::new()),
        Rect::new(0.0, 0.0, 1600.0, 1000.0),
        Rect::new(0.0, 0.0, 2560.0, 1440.0),
    ));
    (SnapEngine::new(config.clone(), coords), config)
}

fn left_edge_config() -> SnapConfig {
    let mut config = SnapConfig::new();
    config
        .add_snap_zone(
            SnapZone::new("left_edge", Rect::new(0.0, 0.0, 48.0, 1000.0))
                .with_magnetism(0.8)
                .with_threshold(56.0)
                .with_priority(1),
        )
        .unwrap();
    config
}

#[test]
fn left_edge_end_to_end() {
    let (mut engine, _) = engine_for(left_edge_config());

    let result = engine.calculate_snap(
        Point::new(50.0, 500.0),
        CoordinateSystem::Unified,
        None,
        None,
    );

    assert!(result.snap_applied);
    let candidate = result.candidate.as_ref().unwrap();
    assert_eq!(candidate.zone, "left_edge");
    assert_eq!(candidate.snap_type, SnapType::Edge);
    assert_eq!(candidate.position, Point::new(48.0, 500.0));
    assert!((candidate.distance - 2.0).abs() < 1e-9);

    let expected_fraction = 0.8 * (1.0 - 2.0 / 56.0);
    let expected_x = 50.0 + (48.0 - 50.0) * expected_fraction;
    assert!((result.position.x - expected_x).abs() < 1e-9);
    assert!(result.candidates_evaluated > 0);
}

#[test]
fn no_zones_means_no_snap_ever() {
    let (mut engine, _) = engine_for(SnapConfig::new());
    for x in [0.0, 10.0, 500.0, 1500.0] {
        let cursor = Point::new(x, 400.0);
        let result = engine.calculate_snap(cursor, CoordinateSystem::Unified, None, None);
        assert!(!result.snap_applied);
        assert_eq!(result.candidates_evaluated, 0);
        assert_eq!(result.position, cursor);
    }
}

#[test]
fn hysteresis_suppresses_recalculation() {
    let (mut engine, _) = engine_for(left_edge_config());

    let first = engine.calculate_snap(
        Point::new(50.0, 500.0),
        CoordinateSystem::Unified,
        None,
        None,
    );
    // Move by less than the hysteresis threshold relative to the snapped
    // position: identical answer, reported as not applied.
    let nudge = Point::new(first.position.x + 1.0, first.position.y - 1.0);
    let second = engine.calculate_snap(nudge, CoordinateSystem::Unified, None, None);

    assert_eq!(second.position, first.position);
    assert!(!second.snap_applied);
    assert_eq!(second.candidates_evaluated, 0);
}

#[test]
fn disabled_zone_does_not_attract() {
    let mut config = left_edge_config();
    config
        .update_snap_zone(
            "left_edge",
            &modelshop_settings::SnapZoneUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    let (mut engine, _) = engine_for(config);

    let result = engine.calculate_snap(
        Point::new(50.0, 500.0),
        CoordinateSystem::Unified,
        None,
        None,
    );
    assert!(!result.snap_applied);
}

#[test]
fn zone_crud_reflected_after_index_rebuild() {
    let (mut engine, config) = engine_for(SnapConfig::new());

    let miss = engine.calculate_snap(
        Point::new(50.0, 500.0),
        CoordinateSystem::Unified,
        None,
        None,
    );
    assert!(!miss.snap_applied);

    config
        .borrow_mut()
        .add_snap_zone(
            SnapZone::new("left_edge", Rect::new(0.0, 0.0, 48.0, 1000.0))
                .with_threshold(56.0),
        )
        .unwrap();
    engine.rebuild_index();

    // Outside the hysteresis radius of the previous answer.
    let hit = engine.calculate_snap(
        Point::new(52.0, 300.0),
        CoordinateSystem::Unified,
        None,
        None,
    );
    assert!(hit.snap_applied);
}

#[test]
fn source_position_is_normalized_to_unified() {
    // Window client origin at (100, 50): a client-space cursor lands in the
    // zone only after translation to unified (= screen) coordinates.
    let mut config = SnapConfig::new();
    config
        .add_snap_zone(
            SnapZone::new("left_edge", Rect::new(100.0, 50.0, 48.0, 1000.0))
                .with_threshold(56.0),
        )
        .unwrap();
    let config = shared(config);
    let coords = shared(CoordinateManager::with_geometry(
        shared(WidgetRegistry::new()),
        Rect::new(100.0, 50.0, 1600.0, 1000.0),
        Rect::new(0.0, 0.0, 2560.0, 1440.0),
    ));
    let mut engine = SnapEngine::new(config, coords);

    let result = engine.calculate_snap(
        Point::new(50.0, 450.0),
        CoordinateSystem::Client,
        None,
        None,
    );
    assert!(result.snap_applied);
    assert_eq!(result.original, Point::new(150.0, 500.0));
    assert_eq!(
        result.candidate.unwrap().position,
        Point::new(148.0, 500.0)
    );
}

proptest! {
    // Magnetism interpolation: for a single zone at distance d < threshold
    // with magnetism m in (0, 1), the snapped position lies strictly
    // between the original position and the candidate.
    #[test]
    fn snapped_position_strictly_between(
        d in 5.0f64..50.0,
        m in 0.1f64..0.9,
    ) {
        let mut config = SnapConfig::new();
        config
            .add_snap_zone(
                SnapZone::new("left_edge", Rect::new(0.0, 0.0, 48.0, 1000.0))
                    .with_magnetism(m)
                    .with_threshold(56.0),
            )
            .unwrap();
        let (mut engine, _) = engine_for(config);

        let cursor = Point::new(48.0 + d, 500.0);
        let result = engine.calculate_snap(cursor, CoordinateSystem::Unified, None, None);

        prop_assert!(result.snap_applied);
        let candidate = result.candidate.as_ref().unwrap();
        prop_assert_eq!(candidate.position, Point::new(48.0, 500.0));
        // Strictly between: neither endpoint.
        prop_assert!(result.position.x < cursor.x);
        prop_assert!(result.position.x > candidate.position.x);
        prop_assert!(result.strength > 0.0 && result.strength < 1.0);
    }
}
