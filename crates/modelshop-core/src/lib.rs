//! # Modelshop Core
//!
//! Core types for the Modelshop dock-snapping subsystem.
//! Provides the geometry primitives, coordinate-space model, widget handle
//! arena, normalized event model, and error taxonomy shared by the
//! settings and snap-engine crates.

pub mod constants;
pub mod coords;
pub mod error;
pub mod event;
pub mod geometry;
pub mod types;
pub mod widget;

pub use coords::CoordinateSystem;
pub use error::{Error, Result, TransformError, ZoneValidationError};
pub use event::{EventType, Modifiers, MouseButtons, SnapEvent, SnapEventKind};
pub use geometry::{Point, Rect};
pub use types::{shared, shared_none, shared_some, Shared, SharedHashMap, SharedOption, SharedVec};
pub use widget::{WidgetId, WidgetInfo, WidgetRegistry};
