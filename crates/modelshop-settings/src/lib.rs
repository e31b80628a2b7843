//! # Modelshop Settings
//!
//! Configuration and settings management for the Modelshop snapping
//! subsystem. Provides the validated snap-zone collection, visual and
//! performance settings, and JSON/TOML persistence in platform-specific
//! directories.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{
    GuideStyle, PerformanceSettings, Rgba, SnapConfig, SnapZone, SnapZoneUpdate, VisualSettings,
};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;
