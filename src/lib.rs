//! # Modelshop Snapping
//!
//! The dock-snapping subsystem of Modelshop, a desktop 3D-model workshop.
//! Docked panels (outliner, material editor, lighting, file browser) snap to
//! window edges and to each other during drag operations; this workspace
//! implements the algorithmic core behind that behavior, independent of the
//! widget toolkit that paints it.
//!
//! ## Architecture
//!
//! The subsystem is organized as a workspace with multiple crates:
//!
//! 1. **modelshop-core** - Geometry, coordinate spaces, widget handles,
//!    events, errors
//! 2. **modelshop-settings** - Snap zones, visual/performance settings,
//!    JSON/TOML persistence
//! 3. **modelshop-snap** - Coordinate manager, spatial index, snap engine,
//!    event pipeline, guide renderer
//! 4. **modelshop** - This crate: per-window wiring and the host-facing API
//!
//! ## Usage
//!
//! ```rust,no_run
//! use modelshop::{SnapSubsystem, Rect, Point, CoordinateSystem};
//!
//! let mut snapping = SnapSubsystem::new(
//!     Rect::new(0.0, 0.0, 1600.0, 1000.0),
//!     Rect::new(0.0, 0.0, 2560.0, 1440.0),
//! )?;
//!
//! // In the drag handler:
//! let result = snapping.calculate_snap(
//!     Point::new(52.0, 500.0),
//!     CoordinateSystem::Unified,
//!     None,
//! );
//! if result.snap_applied {
//!     // move the dragged panel to result.position
//! }
//!
//! // In the paint handler:
//! for primitive in snapping.render(16.0) {
//!     // draw the guide primitive
//! }
//! # Ok::<(), modelshop::SettingsError>(())
//! ```
//!
//! The whole subsystem is single-threaded by design: every call happens on
//! the UI thread in response to toolkit callbacks, and a full snap decision
//! stays far under the 16 ms frame budget.

mod subsystem;

pub use subsystem::{SnapSubsystem, SubsystemStats};

pub use modelshop_core::{
    CoordinateSystem, Error, EventType, Modifiers, MouseButtons, Point, Rect, Result, SnapEvent,
    SnapEventKind, TransformError, WidgetId, WidgetInfo, WidgetRegistry, ZoneValidationError,
};
pub use modelshop_settings::{
    GuideStyle, PerformanceSettings, Rgba, SettingsError, SettingsPersistence, SnapConfig,
    SnapZone, SnapZoneUpdate, VisualSettings,
};
pub use modelshop_snap::{
    CoordinateManager, EngineStats, EventDebouncer, EventProcessor, GuidePrimitive, HandlerId,
    SnapCandidate, SnapEngine, SnapGuideRenderer, SnapResult, SnapType, SpatialIndex,
    SpatialIndexStats, TransformationResult,
};

/// Build timestamp injected by build.rs.
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Initialize logging for the host application.
///
/// Respects `RUST_LOG`; defaults to `info`. Call once at startup, before
/// constructing any [`SnapSubsystem`].
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    Ok(())
}
