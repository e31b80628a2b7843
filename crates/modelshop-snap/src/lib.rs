//! # Modelshop Snap
//!
//! The dock-snapping engine for Modelshop: the algorithmic core behind
//! docked-panel snapping during window drag operations.
//!
//! ## Core Components
//!
//! - **CoordinateManager**: converts points between named coordinate spaces
//!   (screen, client, widget, dock, unified) with a TTL + LRU result cache
//!   invalidated on geometry changes.
//! - **SpatialIndex**: grid-bucketed proximity index over snap zones.
//! - **SnapEngine**: candidate generation, scoring, magnetism pull, and
//!   hysteresis for stable per-frame snap decisions.
//! - **EventProcessor / EventDebouncer**: normalized event pipeline with
//!   dual-threshold move debouncing and ordered flush.
//! - **SnapGuideRenderer**: guide primitive computation and fade animation
//!   (painting stays in the host toolkit).
//!
//! ## Data Flow
//!
//! ```text
//! toolkit event
//!   -> EventProcessor (debounce, dispatch)
//!   -> CoordinateManager (normalize to unified space)
//!   -> SnapEngine (spatial query + scoring + magnetism)
//!   -> snapped position back to the drag handler
//!   -> SnapGuideRenderer (visual feedback primitives)
//! ```
//!
//! Everything runs synchronously on the UI thread; the engine is designed
//! for sub-millisecond decisions well inside a 16 ms frame budget.

pub mod coordinate;
pub mod engine;
pub mod events;
pub mod guides;
pub mod history;
pub mod spatial_index;
pub mod types;

pub use coordinate::{CacheStats, CoordinateManager, TransformationResult};
pub use engine::SnapEngine;
pub use events::{DragState, EventDebouncer, EventProcessor, HandlerId, ProcessorStats};
pub use guides::{GuidePrimitive, SnapGuideRenderer};
pub use history::{EngineStats, SnapHistory};
pub use spatial_index::{SpatialIndex, SpatialIndexStats};
pub use types::{SnapCandidate, SnapResult, SnapType};
