//! Snap configuration for Modelshop.
//!
//! Provides the snap-zone collection plus visual and performance settings,
//! with validation and JSON/TOML (de)serialization. Configuration is
//! organized into logical sections:
//! - Subsystem master switch (`enabled`)
//! - Visual settings (guide colors, styles, animation timing)
//! - Performance settings (cache sizes, debounce, frame budget)
//! - Snap zones (named rectangular attractors in unified coordinates)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use modelshop_core::constants::{
    DEFAULT_CACHE_SIZE, DEFAULT_DEBOUNCE_MS, DEFAULT_HYSTERESIS_PX, DEFAULT_MAGNETISM,
    DEFAULT_SNAP_THRESHOLD_PX, EDGE_BAND_PX,
};
use modelshop_core::{Rect, ZoneValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// An RGBA color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Creates a color from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// Guide line rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideStyle {
    /// Continuous line
    Solid,
    /// Dashed line
    Dashed,
    /// Dotted line
    Dotted,
}

impl Default for GuideStyle {
    fn default() -> Self {
        Self::Dashed
    }
}

impl fmt::Display for GuideStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid => write!(f, "solid"),
            Self::Dashed => write!(f, "dashed"),
            Self::Dotted => write!(f, "dotted"),
        }
    }
}

impl FromStr for GuideStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            _ => Err(format!("Unknown guide style: {}", s)),
        }
    }
}

/// Visual settings for snap guide feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualSettings {
    /// Whether guides are drawn at all
    pub show_guides: bool,
    /// Guide line color
    pub guide_color: Rgba,
    /// Guide line width in pixels
    pub guide_width: f64,
    /// Guide line style
    #[serde(default)]
    pub guide_style: GuideStyle,
    /// Zone highlight fill color
    pub highlight_color: Rgba,
    /// Zone highlight opacity in [0, 1]
    pub highlight_opacity: f64,
    /// Guide fade-in duration in milliseconds
    pub animation_duration_ms: u64,
    /// Guide fade-out duration in milliseconds
    pub fade_duration_ms: u64,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_guides: true,
            guide_color: Rgba::new(64, 128, 255, 255),
            guide_width: 1.5,
            guide_style: GuideStyle::default(),
            highlight_color: Rgba::new(64, 128, 255, 96),
            highlight_opacity: 0.35,
            animation_duration_ms: 120,
            fade_duration_ms: 200,
        }
    }
}

impl VisualSettings {
    /// Validates field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.highlight_opacity) {
            return Err(ConfigError::ValueOutOfRange {
                key: "highlight_opacity".to_string(),
                value: self.highlight_opacity.to_string(),
            });
        }
        if !self.guide_width.is_finite() || self.guide_width <= 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "guide_width".to_string(),
                value: self.guide_width.to_string(),
            });
        }
        Ok(())
    }
}

/// Performance tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSettings {
    /// Snap calculations allowed per 16 ms frame window, >= 1
    pub max_snap_calculations_per_frame: u32,
    /// Whether the grid spatial index is used (falls back to linear scan)
    pub spatial_index_enabled: bool,
    /// Transform cache capacity in entries, >= 1
    pub cache_size: usize,
    /// Hysteresis radius in pixels, >= 0
    pub hysteresis_threshold: f64,
    /// Move-event debounce interval in milliseconds, >= 1
    pub update_debounce_ms: u64,
    /// Whether the host may composite guides on the GPU
    pub enable_hardware_acceleration: bool,
    /// Soft memory ceiling for caches and history, >= 1
    pub max_memory_usage_mb: u32,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            max_snap_calculations_per_frame: 120,
            spatial_index_enabled: true,
            cache_size: DEFAULT_CACHE_SIZE,
            hysteresis_threshold: DEFAULT_HYSTERESIS_PX,
            update_debounce_ms: DEFAULT_DEBOUNCE_MS,
            enable_hardware_acceleration: false,
            max_memory_usage_mb: 64,
        }
    }
}

impl PerformanceSettings {
    /// Validates field ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_snap_calculations_per_frame < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "max_snap_calculations_per_frame".to_string(),
                value: self.max_snap_calculations_per_frame.to_string(),
            });
        }
        if self.cache_size < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "cache_size".to_string(),
                value: self.cache_size.to_string(),
            });
        }
        if !self.hysteresis_threshold.is_finite() || self.hysteresis_threshold < 0.0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "hysteresis_threshold".to_string(),
                value: self.hysteresis_threshold.to_string(),
            });
        }
        if self.update_debounce_ms < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "update_debounce_ms".to_string(),
                value: self.update_debounce_ms.to_string(),
            });
        }
        if self.max_memory_usage_mb < 1 {
            return Err(ConfigError::ValueOutOfRange {
                key: "max_memory_usage_mb".to_string(),
                value: self.max_memory_usage_mb.to_string(),
            });
        }
        Ok(())
    }
}

/// A rectangular snap attractor in unified coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapZone {
    /// Unique zone name
    pub name: String,
    /// Zone rectangle in unified coordinates
    pub area: Rect,
    /// Pull strength in [0, 1]
    pub magnetism: f64,
    /// Activation distance in pixels, >= 0
    pub snap_threshold: f64,
    /// Priority; higher wins score ties
    pub priority: u32,
    /// Whether the zone participates in snapping
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl SnapZone {
    /// Creates an enabled zone with the default magnetism and threshold.
    pub fn new(name: impl Into<String>, area: Rect) -> Self {
        Self {
            name: name.into(),
            area,
            magnetism: DEFAULT_MAGNETISM,
            snap_threshold: DEFAULT_SNAP_THRESHOLD_PX,
            priority: 1,
            enabled: true,
        }
    }

    /// Sets the magnetism (validated on insertion).
    pub fn with_magnetism(mut self, magnetism: f64) -> Self {
        self.magnetism = magnetism;
        self
    }

    /// Sets the activation threshold (validated on insertion).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.snap_threshold = threshold;
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Disables the zone.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Validates the zone invariants.
    pub fn validate(&self) -> Result<(), ZoneValidationError> {
        if self.name.is_empty() {
            return Err(ZoneValidationError::EmptyName);
        }
        if !self.magnetism.is_finite() || !(0.0..=1.0).contains(&self.magnetism) {
            return Err(ZoneValidationError::MagnetismOutOfRange {
                name: self.name.clone(),
                value: self.magnetism,
            });
        }
        if !self.snap_threshold.is_finite() || self.snap_threshold < 0.0 {
            return Err(ZoneValidationError::NegativeThreshold {
                name: self.name.clone(),
                value: self.snap_threshold,
            });
        }
        if !self.area.is_valid() {
            return Err(ZoneValidationError::InvalidArea {
                name: self.name.clone(),
                detail: self.area.to_string(),
            });
        }
        Ok(())
    }
}

/// Partial update to a snap zone; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SnapZoneUpdate {
    pub area: Option<Rect>,
    pub magnetism: Option<f64>,
    pub snap_threshold: Option<f64>,
    pub priority: Option<u32>,
    pub enabled: Option<bool>,
}

impl SnapZoneUpdate {
    fn apply_to(&self, zone: &mut SnapZone) {
        if let Some(area) = self.area {
            zone.area = area;
        }
        if let Some(magnetism) = self.magnetism {
            zone.magnetism = magnetism;
        }
        if let Some(threshold) = self.snap_threshold {
            zone.snap_threshold = threshold;
        }
        if let Some(priority) = self.priority {
            zone.priority = priority;
        }
        if let Some(enabled) = self.enabled {
            zone.enabled = enabled;
        }
    }
}

/// The snap configuration: master switch, settings sections, zone collection.
///
/// Zones are keyed by name and kept in insertion order; the order is the
/// stable tie-break between equal-priority zones.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapConfig {
    /// Master switch for the whole subsystem
    pub enabled: bool,
    /// Guide rendering settings
    pub visual: VisualSettings,
    /// Performance tuning
    pub performance: PerformanceSettings,
    zones: Vec<SnapZone>,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            visual: VisualSettings::default(),
            performance: PerformanceSettings::default(),
            zones: Vec::new(),
        }
    }
}

impl SnapConfig {
    /// Creates a configuration with no zones.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a zone after validating it.
    ///
    /// Fails on a duplicate name or invalid fields; existing state is never
    /// mutated on failure.
    pub fn add_snap_zone(&mut self, zone: SnapZone) -> SettingsResult<()> {
        zone.validate()?;
        if self.zones.iter().any(|z| z.name == zone.name) {
            return Err(SettingsError::DuplicateZone(zone.name));
        }
        self.zones.push(zone);
        Ok(())
    }

    /// Applies a partial update to a named zone.
    ///
    /// The update is validated on a copy and committed only if it passes, so
    /// callers never observe a partially-written or invalid zone.
    pub fn update_snap_zone(&mut self, name: &str, update: &SnapZoneUpdate) -> SettingsResult<()> {
        let index = self
            .zones
            .iter()
            .position(|z| z.name == name)
            .ok_or_else(|| SettingsError::UnknownZone(name.to_string()))?;
        let mut updated = self.zones[index].clone();
        update.apply_to(&mut updated);
        updated.validate()?;
        self.zones[index] = updated;
        Ok(())
    }

    /// Removes a zone by name.
    pub fn remove_snap_zone(&mut self, name: &str) -> SettingsResult<SnapZone> {
        let index = self
            .zones
            .iter()
            .position(|z| z.name == name)
            .ok_or_else(|| SettingsError::UnknownZone(name.to_string()))?;
        Ok(self.zones.remove(index))
    }

    /// Looks up a zone by name.
    pub fn get_snap_zone(&self, name: &str) -> Option<&SnapZone> {
        self.zones.iter().find(|z| z.name == name)
    }

    /// All zones in insertion order.
    pub fn zones(&self) -> &[SnapZone] {
        &self.zones
    }

    /// Enabled zones, priority descending, insertion order as tie-break.
    ///
    /// `Vec::sort_by` is stable, which is what makes the tie-break hold.
    pub fn get_active_snap_zones(&self) -> Vec<&SnapZone> {
        let mut active: Vec<&SnapZone> = self.zones.iter().filter(|z| z.enabled).collect();
        active.sort_by(|a, b| b.priority.cmp(&a.priority));
        active
    }

    /// Largest activation threshold among enabled zones (0 when none).
    pub fn max_active_threshold(&self) -> f64 {
        self.zones
            .iter()
            .filter(|z| z.enabled)
            .map(|z| z.snap_threshold)
            .fold(0.0, f64::max)
    }

    /// Seeds the four default window-edge zones if no zones exist.
    ///
    /// Each zone is a 48 px band along one edge of `window`, magnetism 0.8,
    /// threshold 56 px, priority 1. Returns true if seeding happened.
    pub fn seed_default_zones(&mut self, window: Rect) -> bool {
        if !self.zones.is_empty() {
            return false;
        }
        let (w, h) = (window.width, window.height);
        let bands = [
            ("left_edge", Rect::new(window.x, window.y, EDGE_BAND_PX, h)),
            (
                "right_edge",
                Rect::new(window.right() - EDGE_BAND_PX, window.y, EDGE_BAND_PX, h),
            ),
            ("top_edge", Rect::new(window.x, window.y, w, EDGE_BAND_PX)),
            (
                "bottom_edge",
                Rect::new(window.x, window.bottom() - EDGE_BAND_PX, w, EDGE_BAND_PX),
            ),
        ];
        for (name, area) in bands {
            self.zones.push(SnapZone::new(name, area));
        }
        tracing::debug!("Seeded {} default edge zones for {}", self.zones.len(), window);
        true
    }

    /// Validates the whole configuration.
    pub fn validate(&self) -> SettingsResult<()> {
        self.visual.validate()?;
        self.performance.validate()?;
        for zone in &self.zones {
            zone.validate()?;
        }
        Ok(())
    }

    /// Serializes to the on-disk JSON layout (zones as a name-keyed map).
    pub fn to_json_value(&self) -> serde_json::Value {
        let zones: BTreeMap<&str, &SnapZone> =
            self.zones.iter().map(|z| (z.name.as_str(), z)).collect();
        serde_json::json!({
            "enabled": self.enabled,
            "visual": self.visual,
            "performance": self.performance,
            "snap_zones": zones,
        })
    }

    /// Pretty-printed JSON for persistence.
    pub fn to_json_string(&self) -> SettingsResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_json_value())?)
    }

    /// Builds a configuration from the on-disk JSON layout.
    ///
    /// Loading is defensive: each zone that fails to parse or validate is
    /// skipped with a warning rather than failing the whole load. Top-level
    /// sections fall back to defaults when absent.
    pub fn from_json_value(value: serde_json::Value) -> SettingsResult<Self> {
        #[derive(Deserialize)]
        struct ConfigFile {
            #[serde(default = "default_true")]
            enabled: bool,
            #[serde(default)]
            visual: VisualSettings,
            #[serde(default)]
            performance: PerformanceSettings,
            #[serde(default)]
            snap_zones: BTreeMap<String, serde_json::Value>,
        }

        let file: ConfigFile = serde_json::from_value(value)?;
        let mut config = Self {
            enabled: file.enabled,
            visual: file.visual,
            performance: file.performance,
            zones: Vec::new(),
        };
        config.visual.validate()?;
        config.performance.validate()?;

        for (name, zone_value) in file.snap_zones {
            match serde_json::from_value::<SnapZone>(zone_value) {
                Ok(mut zone) => {
                    if zone.name != name {
                        tracing::warn!(
                            "Snap zone key '{}' disagrees with its name field '{}'; using the key",
                            name,
                            zone.name
                        );
                        zone.name = name;
                    }
                    match zone.validate() {
                        Ok(()) => config.zones.push(zone),
                        Err(err) => {
                            tracing::warn!("Skipping invalid snap zone '{}': {}", zone.name, err)
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("Skipping unparseable snap zone '{}': {}", name, err);
                }
            }
        }
        Ok(config)
    }

    /// Parses the JSON on-disk layout.
    pub fn from_json_str(text: &str) -> SettingsResult<Self> {
        Self::from_json_value(serde_json::from_str(text)?)
    }

    /// Parses the TOML on-disk layout (same shape as the JSON one).
    pub fn from_toml_str(text: &str) -> SettingsResult<Self> {
        let value: toml::Value = toml::from_str(text)?;
        let json = serde_json::to_value(value)?;
        Self::from_json_value(json)
    }
}
