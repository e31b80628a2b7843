//! Snap calculation data types: candidates and results.

use modelshop_core::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The kind of position a candidate snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapType {
    /// Nearest point on a zone edge
    Edge,
    /// Zone center
    Center,
    /// Nearest zone corner
    Corner,
    /// Grid intersection
    Grid,
    /// Host-defined custom target
    Custom,
}

impl SnapType {
    /// Score multiplier for this snap type.
    ///
    /// Edges are the most predictable snap target for window docking, so
    /// they outrank everything else; corners are the least expected.
    pub fn weight(&self) -> f64 {
        match self {
            SnapType::Edge => 1.0,
            SnapType::Grid => 0.9,
            SnapType::Center => 0.8,
            SnapType::Custom => 0.7,
            SnapType::Corner => 0.6,
        }
    }
}

/// A scored snap target produced during one calculation.
///
/// Candidates are transient: they exist only inside and on the result of a
/// single `calculate_snap` call and are never persisted. They serialize so
/// the host can log snap decisions, but never deserialize back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapCandidate {
    /// Name of the zone that produced this candidate
    pub zone: String,
    /// The zone rectangle (kept for guide rendering)
    pub zone_area: Rect,
    /// What the candidate snaps to
    pub snap_type: SnapType,
    /// Candidate position in unified coordinates
    pub position: Point,
    /// Distance from the cursor to the candidate, >= 0
    pub distance: f64,
    /// Computed score, >= 0 (higher wins)
    pub score: f64,
    /// Confidence inherited from the coordinate transform, in [0, 1]
    pub confidence: f64,
}

/// The outcome of one snap calculation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapResult {
    /// Position after snapping (equals `original` when nothing applied)
    pub position: Point,
    /// The raw input position in unified coordinates
    pub original: Point,
    /// The winning candidate, if any
    pub candidate: Option<SnapCandidate>,
    /// Whether snapping changed the position
    pub snap_applied: bool,
    /// Magnetism pull strength actually applied, in [0, 1]
    pub strength: f64,
    /// How long the calculation took
    pub duration: Duration,
    /// Number of candidates evaluated
    pub candidates_evaluated: usize,
}

impl SnapResult {
    /// A result that leaves the position untouched.
    pub fn passthrough(position: Point, duration: Duration, candidates_evaluated: usize) -> Self {
        Self {
            position,
            original: position,
            candidate: None,
            snap_applied: false,
            strength: 0.0,
            duration,
            candidates_evaluated,
        }
    }
}
