//! The snap decision engine.
//!
//! Given a drag position, finds nearby snap zones, generates edge/center/
//! corner candidates, scores them, and applies a magnetism pull toward the
//! winner. Two suppression mechanisms keep the hot path cheap and stable:
//! hysteresis (sub-threshold movement re-uses the previous decision) and a
//! per-frame calculation budget.
//!
//! The engine never fails during a drag: bad input degrades to a
//! passthrough result with `snap_applied = false`.

use crate::coordinate::CoordinateManager;
use crate::history::{EngineStats, SnapHistory};
use crate::spatial_index::{SpatialIndex, SpatialIndexStats};
use crate::types::{SnapCandidate, SnapResult, SnapType};
use modelshop_core::constants::{DEFAULT_MAX_CANDIDATES, FRAME_WINDOW_MS};
use modelshop_core::{CoordinateSystem, Point, Shared, WidgetId};
use modelshop_settings::{SnapConfig, SnapZone};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::time::Instant;

/// Scores candidates and applies magnetism for docked-window snapping.
pub struct SnapEngine {
    config: Shared<SnapConfig>,
    coords: Shared<CoordinateManager>,
    index: SpatialIndex,
    history: SnapHistory,
    /// Anchor for the hysteresis check: the last returned snapped position.
    last_snap_position: Option<Point>,
    frame_started: Option<Instant>,
    calculations_this_frame: u32,
    stats: EngineStats,
}

impl SnapEngine {
    /// Creates an engine over shared configuration and coordinate state.
    ///
    /// The spatial index is built from the configuration's current zones;
    /// call [`rebuild_index`](Self::rebuild_index) after zone CRUD.
    pub fn new(config: Shared<SnapConfig>, coords: Shared<CoordinateManager>) -> Self {
        let mut engine = Self {
            config,
            coords,
            index: SpatialIndex::default(),
            history: SnapHistory::new(),
            last_snap_position: None,
            frame_started: None,
            calculations_this_frame: 0,
            stats: EngineStats::default(),
        };
        engine.rebuild_index();
        engine
    }

    /// Rebuilds the spatial index from the configuration's zones.
    pub fn rebuild_index(&mut self) {
        let config = self.config.borrow();
        self.index.rebuild(config.zones().iter());
        tracing::debug!("Spatial index rebuilt with {} zones", self.index.len());
    }

    /// Calculates a snapped position for a drag point.
    ///
    /// `position` is interpreted in `source` coordinates and normalized to
    /// the unified space first. `context` resolves widget-local sources.
    /// Never fails; any degenerate input yields a passthrough result.
    pub fn calculate_snap(
        &mut self,
        position: Point,
        source: CoordinateSystem,
        context: Option<WidgetId>,
        max_candidates: Option<usize>,
    ) -> SnapResult {
        let started = Instant::now();
        let max_candidates = max_candidates.unwrap_or(DEFAULT_MAX_CANDIDATES);

        if !position.is_finite() {
            tracing::warn!("Non-finite drag position {}; skipping snap", position);
            return SnapResult::passthrough(position, started.elapsed(), 0);
        }

        let transform = self.coords.borrow_mut().transform_point(
            position,
            source,
            CoordinateSystem::Unified,
            context,
        );
        let unified = transform.point;

        let (enabled, hysteresis, budget) = {
            let config = self.config.borrow();
            (
                config.enabled,
                config.performance.hysteresis_threshold,
                config.performance.max_snap_calculations_per_frame,
            )
        };

        if !enabled {
            return SnapResult::passthrough(unified, started.elapsed(), 0);
        }

        // Hysteresis: sub-threshold movement relative to the last decision
        // returns the previous position without re-deciding.
        if let Some(last) = self.last_snap_position {
            if unified.distance_to(&last) < hysteresis {
                self.stats.hysteresis_hits += 1;
                return SnapResult {
                    position: last,
                    original: unified,
                    candidate: None,
                    snap_applied: false,
                    strength: 0.0,
                    duration: started.elapsed(),
                    candidates_evaluated: 0,
                };
            }
        }

        // Frame budget: past the cap inside one frame window, answer with a
        // passthrough and let the next frame recompute.
        if !self.consume_frame_budget(started, budget) {
            self.stats.budget_skips += 1;
            return SnapResult::passthrough(unified, started.elapsed(), 0);
        }

        let result = self.decide(unified, transform.confidence, max_candidates, started);

        self.stats.calculations += 1;
        if result.snap_applied {
            self.stats.snaps_applied += 1;
        }
        self.stats.total_duration += result.duration;
        self.last_snap_position = Some(result.position);
        self.history.push(result.clone());
        result
    }

    /// Core decision: query, candidate generation, scoring, magnetism.
    fn decide(
        &self,
        cursor: Point,
        confidence: f64,
        max_candidates: usize,
        started: Instant,
    ) -> SnapResult {
        let config = self.config.borrow();
        let radius = 2.0 * config.max_active_threshold();
        if radius <= 0.0 {
            return SnapResult::passthrough(cursor, started.elapsed(), 0);
        }

        let nearby: Vec<SnapZone> = if config.performance.spatial_index_enabled {
            self.index.find_nearby_zones(cursor, radius)
        } else {
            config.zones().to_vec()
        };
        drop(config);

        // Candidate plus the zone fields the magnetism pull needs later.
        struct Scored {
            candidate: SnapCandidate,
            magnetism: f64,
            threshold: f64,
        }

        let mut candidates: Vec<Scored> = Vec::new();
        for zone in nearby.iter().filter(|z| z.enabled) {
            let targets: SmallVec<[(SnapType, Point); 3]> = SmallVec::from_buf([
                (SnapType::Edge, zone.area.nearest_boundary_point(&cursor)),
                (SnapType::Center, zone.area.center()),
                (SnapType::Corner, zone.area.nearest_corner(&cursor)),
            ]);
            for (snap_type, target) in targets {
                let distance = cursor.distance_to(&target);
                if distance > zone.snap_threshold {
                    continue;
                }
                let score = (zone.snap_threshold - distance).max(0.0)
                    * zone.magnetism
                    * (1.0 + zone.priority as f64 * 0.1)
                    * snap_type.weight();
                candidates.push(Scored {
                    candidate: SnapCandidate {
                        zone: zone.name.clone(),
                        zone_area: zone.area,
                        snap_type,
                        position: target,
                        distance,
                        score,
                        confidence,
                    },
                    magnetism: zone.magnetism,
                    threshold: zone.snap_threshold,
                });
            }
        }
        let evaluated = candidates.len();

        // Closest-first, capped, then the best score among the survivors
        // (not necessarily the closest).
        candidates.sort_by(|a, b| {
            a.candidate
                .distance
                .partial_cmp(&b.candidate.distance)
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(max_candidates);
        let best = candidates
            .into_iter()
            .max_by(|a, b| match a.candidate.score.partial_cmp(&b.candidate.score) {
                // Score tie: prefer the closer candidate.
                Some(Ordering::Equal) | None => b
                    .candidate
                    .distance
                    .partial_cmp(&a.candidate.distance)
                    .unwrap_or(Ordering::Equal),
                Some(ordering) => ordering,
            });

        let Some(best) = best else {
            return SnapResult::passthrough(cursor, started.elapsed(), evaluated);
        };

        // Magnetism pull: interpolate toward the candidate rather than
        // teleporting, stronger the closer the cursor already is.
        let proximity = if best.threshold > 0.0 {
            1.0 - best.candidate.distance / best.threshold
        } else {
            1.0
        };
        let strength = (best.magnetism * proximity).clamp(0.0, 1.0);
        let snapped = cursor.lerp(&best.candidate.position, strength);

        SnapResult {
            position: snapped,
            original: cursor,
            candidate: Some(best.candidate),
            snap_applied: true,
            strength,
            duration: started.elapsed(),
            candidates_evaluated: evaluated,
        }
    }

    /// Advances the frame window and charges one calculation against it.
    ///
    /// Returns false when the budget for the current window is spent.
    fn consume_frame_budget(&mut self, now: Instant, budget: u32) -> bool {
        let window_elapsed = self
            .frame_started
            .map(|t| now.duration_since(t).as_secs_f64() * 1000.0)
            .unwrap_or(f64::INFINITY);
        if window_elapsed >= FRAME_WINDOW_MS {
            self.frame_started = Some(now);
            self.calculations_this_frame = 0;
        }
        if self.calculations_this_frame >= budget {
            return false;
        }
        self.calculations_this_frame += 1;
        true
    }

    /// Forgets the hysteresis anchor (e.g. on drag end).
    pub fn reset_hysteresis(&mut self) {
        self.last_snap_position = None;
    }

    /// Engine counters.
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Recent results, oldest first.
    pub fn history(&self) -> &SnapHistory {
        &self.history
    }

    /// Spatial index statistics.
    pub fn index_stats(&self) -> SpatialIndexStats {
        self.index.stats()
    }
}
