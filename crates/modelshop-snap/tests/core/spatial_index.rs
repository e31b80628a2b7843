use modelshop_core::{Point, Rect};
use modelshop_settings::SnapZone;
use modelshop_snap::SpatialIndex;

fn zone(name: &str, x: f64, y: f64, w: f64, h: f64) -> SnapZone {
    SnapZone::new(name, Rect::new(x, y, w, h))
}

#[test]
fn test_index_creation() {
    let index = SpatialIndex::default();
    let stats = index.stats();
    assert_eq!(stats.zones, 0);
    assert_eq!(stats.cells, 0);
    assert!(index.is_empty());
}

#[test]
fn test_insert_and_query() {
    let mut index = SpatialIndex::default();
    index.add_zone(&zone("a", 0.0, 0.0, 48.0, 1000.0));
    index.add_zone(&zone("b", 1552.0, 0.0, 48.0, 1000.0));

    let results = index.find_nearby_zones(Point::new(60.0, 500.0), 120.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "a");

    let results = index.find_nearby_zones(Point::new(1540.0, 500.0), 120.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "b");
}

#[test]
fn test_clear() {
    let mut index = SpatialIndex::default();
    index.add_zone(&zone("a", 0.0, 0.0, 48.0, 1000.0));
    assert!(!index.find_nearby_zones(Point::new(24.0, 500.0), 100.0).is_empty());

    index.clear();
    assert!(index.find_nearby_zones(Point::new(24.0, 500.0), 100.0).is_empty());
    assert_eq!(index.stats().zones, 0);
}

#[test]
fn test_stats_count_multi_cell_zones() {
    let mut index = SpatialIndex::default();
    for i in 0..20 {
        let offset = i as f64 * 50.0;
        index.add_zone(&zone(&format!("z{}", i), offset, offset, 120.0, 120.0));
    }
    let stats = index.stats();
    assert_eq!(stats.zones, 20);
    assert!(stats.cells > 1);
    // Every zone spans at least two cells in each axis.
    assert!(stats.total_entries >= 20 * 4);
}

#[test]
fn test_stress_many_zones() {
    let mut index = SpatialIndex::default();
    for i in 0..1000 {
        let x = (i % 50) as f64 * 10.0;
        let y = (i / 50) as f64 * 10.0;
        index.add_zone(&zone(&format!("z{}", i), x, y, 5.0, 5.0));
    }
    assert_eq!(index.stats().zones, 1000);

    // A tight query touches a small neighborhood, not the whole set.
    let results = index.find_nearby_zones(Point::new(250.0, 100.0), 30.0);
    assert!(!results.is_empty());
    assert!(results.len() < 1000);
}

#[test]
fn test_large_coordinates() {
    let mut index = SpatialIndex::default();
    index.add_zone(&zone("far", 50000.0, -50000.0, 10.0, 10.0));

    let results = index.find_nearby_zones(Point::new(50005.0, -49995.0), 20.0);
    assert_eq!(results.len(), 1, "should find the zone at (50000, -50000)");

    let results = index.find_nearby_zones(Point::new(0.0, 0.0), 20.0);
    assert!(results.is_empty());
}

#[test]
fn test_custom_cell_size() {
    let mut index = SpatialIndex::new(25.0);
    assert_eq!(index.cell_size(), 25.0);
    index.add_zone(&zone("a", 0.0, 0.0, 100.0, 100.0));
    // 100x100 zone over 25 px cells occupies a 5x5 block of cells
    // (inclusive of the boundary cell).
    assert!(index.stats().total_entries >= 16);
    assert_eq!(
        index.find_nearby_zones(Point::new(50.0, 50.0), 10.0).len(),
        1
    );
}
