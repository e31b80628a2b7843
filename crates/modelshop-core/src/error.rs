//! Error handling for the Modelshop snapping subsystem.
//!
//! Provides error types for the two layers that can actually fail:
//! - Transformation errors (coordinate mapping, stale widget handles)
//! - Zone validation errors (invalid snap-zone fields)
//!
//! All error types use `thiserror` for ergonomic error handling. Note that
//! the interactive transform/snap path never surfaces these to callers: it
//! degrades to an identity/zero-confidence result and logs instead (see the
//! coordinate manager and snap engine). Configuration APIs are stricter and
//! do return them.

use crate::coords::CoordinateSystem;
use crate::widget::WidgetId;
use thiserror::Error;

/// Transformation error type
///
/// Represents failures while mapping a point between coordinate systems.
/// These are caught inside the coordinate manager and degraded; they exist
/// as a type so internal code can use `?` and tests can assert on causes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A widget/dock transform was requested without a context widget
    #[error("Transform {source} -> {target} requires a context widget")]
    MissingContext {
        /// The source coordinate system.
        source: CoordinateSystem,
        /// The target coordinate system.
        target: CoordinateSystem,
    },

    /// The context widget handle no longer resolves to a live widget
    #[error("Context widget {widget} is no longer registered")]
    StaleWidget {
        /// The handle that failed the liveness check.
        widget: WidgetId,
    },

    /// Window or screen geometry has not been provided yet
    #[error("No {what} geometry available")]
    MissingGeometry {
        /// Which geometry table was empty ("window" or "screen").
        what: &'static str,
    },

    /// A coordinate was NaN or infinite
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinitePoint {
        /// The offending x coordinate.
        x: f64,
        /// The offending y coordinate.
        y: f64,
    },
}

/// Snap-zone validation error type
///
/// Raised synchronously by configuration-mutation APIs; a zone that fails
/// validation is never inserted or committed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZoneValidationError {
    /// Zone name is empty
    #[error("Snap zone name must not be empty")]
    EmptyName,

    /// Magnetism outside [0, 1]
    #[error("Snap zone '{name}': magnetism {value} outside [0, 1]")]
    MagnetismOutOfRange {
        /// The zone name.
        name: String,
        /// The rejected magnetism value.
        value: f64,
    },

    /// Snap threshold below zero
    #[error("Snap zone '{name}': snap threshold {value} must be >= 0")]
    NegativeThreshold {
        /// The zone name.
        name: String,
        /// The rejected threshold value.
        value: f64,
    },

    /// Zone rectangle has a non-finite or negative dimension
    #[error("Snap zone '{name}': invalid area {detail}")]
    InvalidArea {
        /// The zone name.
        name: String,
        /// What was wrong with the rectangle.
        detail: String,
    },
}

/// Main error type for the snapping subsystem
///
/// A unified error type that can represent any error from the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Coordinate transformation error
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Snap-zone validation error
    #[error(transparent)]
    Validation(#[from] ZoneValidationError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a transformation error
    pub fn is_transform_error(&self) -> bool {
        matches!(self, Error::Transform(_))
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
