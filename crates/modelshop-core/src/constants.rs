//! Subsystem-wide default values and tuning constants.

/// Transform cache time-to-live in milliseconds.
pub const DEFAULT_CACHE_TTL_MS: u64 = 1000;

/// Transform cache capacity (entries) when the configuration does not say.
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Spatial index grid cell size in pixels.
pub const DEFAULT_CELL_SIZE: f64 = 100.0;

/// Width/height of the default window-edge snap bands in pixels.
pub const EDGE_BAND_PX: f64 = 48.0;

/// Activation threshold of the default edge zones in pixels.
pub const DEFAULT_SNAP_THRESHOLD_PX: f64 = 56.0;

/// Magnetism of the default edge zones.
pub const DEFAULT_MAGNETISM: f64 = 0.8;

/// Minimum Manhattan pointer movement (px) for a move event to be accepted.
pub const MOVE_EPSILON_PX: f64 = 2.0;

/// Move-event time threshold in milliseconds (~60 Hz).
pub const DEFAULT_DEBOUNCE_MS: u64 = 16;

/// Hysteresis radius in pixels: movement below this re-uses the last snap.
pub const DEFAULT_HYSTERESIS_PX: f64 = 3.0;

/// Frame window for the calculation budget, in milliseconds.
pub const FRAME_WINDOW_MS: f64 = 16.0;

/// Candidate cap per snap calculation.
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Snap history ring-buffer capacity.
pub const SNAP_HISTORY_CAP: usize = 100;

/// Deferred (debounced) event queue capacity.
pub const DEFERRED_EVENT_CAP: usize = 50;

/// Event-processor maintenance interval in milliseconds.
pub const MAINTENANCE_INTERVAL_MS: f64 = 5000.0;
