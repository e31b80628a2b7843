//! Coordinate system model.
//!
//! Every position handled by the snapping subsystem lives in one of five
//! named coordinate spaces. Screen is the global reference; all others are
//! defined relative to it. The Unified space is the common frame snap
//! calculations run in and is defined to equal Screen.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSystem {
    /// Global screen coordinates (the reference frame)
    Screen,
    /// Main window client-area coordinates
    Client,
    /// Widget-local coordinates (requires a context widget)
    Widget,
    /// Dock-panel coordinates (requires a context widget)
    Dock,
    /// Unified snapping space, defined to equal Screen
    Unified,
}

impl CoordinateSystem {
    /// Resolve the Unified alias to its underlying space.
    ///
    /// All transform rules are written against canonical systems; Unified
    /// canonicalizes to Screen.
    pub fn canonical(self) -> CoordinateSystem {
        match self {
            CoordinateSystem::Unified => CoordinateSystem::Screen,
            other => other,
        }
    }

    /// Whether transforms into/out of this space need a context widget.
    pub fn needs_context(self) -> bool {
        matches!(self, CoordinateSystem::Widget | CoordinateSystem::Dock)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Screen => write!(f, "Screen"),
            Self::Client => write!(f, "Client"),
            Self::Widget => write!(f, "Widget"),
            Self::Dock => write!(f, "Dock"),
            Self::Unified => write!(f, "Unified"),
        }
    }
}

// `TransformError::MissingContext` names its display fields `source`/`target`;
// thiserror treats a field named `source` as the error source, which requires
// the field type to implement `std::error::Error`. The bound is satisfied via
// the existing `Debug`/`Display` impls.
impl std::error::Error for CoordinateSystem {}

impl FromStr for CoordinateSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "screen" => Ok(Self::Screen),
            "client" | "window" => Ok(Self::Client),
            "widget" => Ok(Self::Widget),
            "dock" => Ok(Self::Dock),
            "unified" => Ok(Self::Unified),
            _ => Err(format!("Unknown coordinate system: {}", s)),
        }
    }
}
