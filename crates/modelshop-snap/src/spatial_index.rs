//! Grid-bucketed spatial index over snap zones.
//!
//! Buckets zone rectangles into fixed-size grid cells so proximity queries
//! during a drag touch a handful of cells instead of scanning every zone.
//! Zone counts are small (tens), so removal may scan all cells and the
//! acceptance test favors cheapness over exactness.

use modelshop_core::constants::DEFAULT_CELL_SIZE;
use modelshop_core::Point;
use modelshop_settings::SnapZone;
use std::collections::{HashMap, HashSet};

/// Index statistics, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialIndexStats {
    /// Number of occupied grid cells
    pub cells: usize,
    /// Total cell entries (a zone occupies every cell it overlaps)
    pub total_entries: usize,
    /// Number of distinct zones indexed
    pub zones: usize,
}

/// Grid-bucketed set of snap zones supporting proximity queries.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<String>>,
    zones: HashMap<String, SnapZone>,
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialIndex {
    /// Creates an index with the given grid cell size in pixels.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 {
                cell_size
            } else {
                DEFAULT_CELL_SIZE
            },
            cells: HashMap::new(),
            zones: HashMap::new(),
        }
    }

    /// The grid cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Inserts a zone into every grid cell its rectangle overlaps.
    ///
    /// Re-inserting a zone with the same name replaces the previous entry.
    pub fn add_zone(&mut self, zone: &SnapZone) {
        if self.zones.contains_key(&zone.name) {
            self.remove_zone(&zone.name);
        }
        let (min_cx, max_cx) = self.cell_span(zone.area.left(), zone.area.right());
        let (min_cy, max_cy) = self.cell_span(zone.area.top(), zone.area.bottom());
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                self.cells
                    .entry((cx, cy))
                    .or_default()
                    .push(zone.name.clone());
            }
        }
        self.zones.insert(zone.name.clone(), zone.clone());
    }

    /// Removes a zone by name, scanning all cells.
    ///
    /// Returns true if the zone was present.
    pub fn remove_zone(&mut self, name: &str) -> bool {
        if self.zones.remove(name).is_none() {
            return false;
        }
        self.cells.retain(|_, names| {
            names.retain(|n| n != name);
            !names.is_empty()
        });
        true
    }

    /// Drops every zone.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.zones.clear();
    }

    /// Rebuilds the index from a zone collection.
    pub fn rebuild<'a>(&mut self, zones: impl IntoIterator<Item = &'a SnapZone>) {
        self.clear();
        for zone in zones {
            self.add_zone(zone);
        }
    }

    /// Zones within `radius` of `point`.
    ///
    /// Scans the cell range covered by the radius, dedups zones that occupy
    /// several cells, then applies a deliberately loose distance test:
    /// center distance <= radius + half the zone's larger dimension. This
    /// admits some zones an exact AABB-circle test would reject; the snap
    /// engine's per-zone threshold filter discards them cheaply afterward.
    pub fn find_nearby_zones(&self, point: Point, radius: f64) -> Vec<SnapZone> {
        if radius < 0.0 || !point.is_finite() {
            return Vec::new();
        }
        let (min_cx, max_cx) = self.cell_span(point.x - radius, point.x + radius);
        let (min_cy, max_cy) = self.cell_span(point.y - radius, point.y + radius);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        for cx in min_cx..=max_cx {
            for cy in min_cy..=max_cy {
                let Some(names) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                for name in names {
                    if !seen.insert(name.as_str()) {
                        continue;
                    }
                    let Some(zone) = self.zones.get(name) else {
                        continue;
                    };
                    let accept = point.distance_to(&zone.area.center())
                        <= radius + zone.area.half_max_dimension();
                    if accept {
                        result.push(zone.clone());
                    }
                }
            }
        }
        result
    }

    /// Number of distinct zones indexed.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the index holds no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Index statistics.
    pub fn stats(&self) -> SpatialIndexStats {
        SpatialIndexStats {
            cells: self.cells.len(),
            total_entries: self.cells.values().map(Vec::len).sum(),
            zones: self.zones.len(),
        }
    }

    /// Inclusive cell-index span covering `[lo, hi]`.
    fn cell_span(&self, lo: f64, hi: f64) -> (i64, i64) {
        (
            (lo / self.cell_size).floor() as i64,
            (hi / self.cell_size).floor() as i64,
        )
    }
}
