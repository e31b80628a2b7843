//! Per-window wiring of the snapping subsystem.
//!
//! `SnapSubsystem` is constructed once at main-window creation time and
//! passed by reference to the host's drag and paint handlers. There is no
//! process-wide instance: every collaborator receives its dependencies
//! explicitly, and two windows get two fully independent subsystems.

use modelshop_core::{
    shared, CoordinateSystem, Point, Rect, Shared, SnapEvent, WidgetId, WidgetInfo, WidgetRegistry,
};
use modelshop_settings::{
    SettingsPersistence, SettingsResult, SnapConfig, SnapZone, SnapZoneUpdate,
};
use modelshop_snap::{
    CacheStats, CoordinateManager, EngineStats, EventProcessor, GuidePrimitive, ProcessorStats,
    SnapEngine, SnapGuideRenderer, SnapResult, SpatialIndexStats,
};
use std::path::Path;
use std::time::Duration;

/// Combined counters across the subsystem's components.
#[derive(Debug, Clone, Copy)]
pub struct SubsystemStats {
    /// Snap engine counters
    pub engine: EngineStats,
    /// Transform cache counters
    pub cache: CacheStats,
    /// Event pipeline counters
    pub processor: ProcessorStats,
    /// Spatial index occupancy
    pub index: SpatialIndexStats,
}

/// The snapping subsystem for one main window.
pub struct SnapSubsystem {
    config: Shared<SnapConfig>,
    registry: Shared<WidgetRegistry>,
    coords: Shared<CoordinateManager>,
    engine: SnapEngine,
    processor: EventProcessor,
    guides: SnapGuideRenderer,
    persistence: SettingsPersistence,
}

impl SnapSubsystem {
    /// Creates a subsystem using the platform configuration path.
    ///
    /// Loads persisted settings when present; a missing or corrupt file
    /// falls back to defaults with a warning. Seeds the four default
    /// window-edge zones on first run.
    pub fn new(window: Rect, screen: Rect) -> SettingsResult<Self> {
        let persistence = SettingsPersistence::new()?;
        let config = match persistence.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default snap settings: {}", err);
                SnapConfig::default()
            }
        };
        Ok(Self::assemble(config, persistence, window, screen))
    }

    /// Creates a subsystem with an explicit configuration, no file I/O.
    pub fn with_config(config: SnapConfig, window: Rect, screen: Rect) -> Self {
        let persistence = SettingsPersistence::with_path(
            SettingsPersistence::default_config_path()
                .unwrap_or_else(|_| std::path::PathBuf::from("snap.json")),
        );
        Self::assemble(config, persistence, window, screen)
    }

    /// Creates a subsystem persisting to an explicit file path.
    pub fn with_persistence(
        persistence: SettingsPersistence,
        window: Rect,
        screen: Rect,
    ) -> Self {
        let config = match persistence.load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Using default snap settings: {}", err);
                SnapConfig::default()
            }
        };
        Self::assemble(config, persistence, window, screen)
    }

    fn assemble(
        mut config: SnapConfig,
        persistence: SettingsPersistence,
        window: Rect,
        screen: Rect,
    ) -> Self {
        config.seed_default_zones(window);

        let registry = shared(WidgetRegistry::new());
        let mut coords = CoordinateManager::with_geometry(registry.clone(), window, screen);
        coords.set_cache_limits(Duration::from_secs(1), config.performance.cache_size);

        let mut processor = EventProcessor::new(registry.clone());
        processor
            .debouncer_mut()
            .set_time_threshold_ms(config.performance.update_debounce_ms as f64);

        let config = shared(config);
        let coords = shared(coords);
        let engine = SnapEngine::new(config.clone(), coords.clone());
        let guides = SnapGuideRenderer::new(config.clone());

        Self {
            config,
            registry,
            coords,
            engine,
            processor,
            guides,
            persistence,
        }
    }

    // ---- widgets -----------------------------------------------------------

    /// Registers a widget with its screen-space frame.
    pub fn register_widget(&mut self, info: WidgetInfo) -> WidgetId {
        self.registry.borrow_mut().insert(info)
    }

    /// Unregisters a widget; its handles go stale immediately.
    pub fn unregister_widget(&mut self, id: WidgetId) {
        self.registry.borrow_mut().remove(id);
    }

    /// Updates a widget's screen-space frame from a host layout callback.
    pub fn update_widget_frame(&mut self, id: WidgetId, frame: Rect) -> bool {
        self.registry.borrow_mut().set_frame(id, frame)
    }

    /// The shared widget registry, for host-side wiring.
    pub fn widgets(&self) -> Shared<WidgetRegistry> {
        self.registry.clone()
    }

    // ---- the interactive path ----------------------------------------------

    /// Runs one event through the debounced pipeline.
    pub fn process_event(&mut self, event: SnapEvent) -> bool {
        self.processor.process_event(event)
    }

    /// Calculates a snapped position for a drag point and refreshes the
    /// guide feedback from the result.
    pub fn calculate_snap(
        &mut self,
        position: Point,
        source: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> SnapResult {
        let result = self.engine.calculate_snap(position, source, context, None);
        self.guides.update(&result);
        result
    }

    /// Advances guide animation by `dt_ms` and returns the primitives the
    /// host should paint this frame.
    pub fn render(&mut self, dt_ms: f64) -> Vec<GuidePrimitive> {
        self.guides.advance(dt_ms);
        self.guides.render()
    }

    /// Signals that the active drag ended: hysteresis resets and guides
    /// start fading out.
    pub fn drag_ended(&mut self) {
        self.engine.reset_hysteresis();
        self.guides.begin_fade_out();
    }

    /// The event processor, for handler subscriptions.
    pub fn events_mut(&mut self) -> &mut EventProcessor {
        &mut self.processor
    }

    // ---- geometry ----------------------------------------------------------

    /// Propagates a main-window move/resize; all cached transforms drop.
    pub fn update_window_geometry(&mut self, window: Rect) {
        self.coords.borrow_mut().update_main_window_geometry(window);
    }

    /// Propagates a screen change; all cached transforms drop.
    pub fn update_screen_geometry(&mut self, screen: Rect) {
        self.coords.borrow_mut().update_screen_geometry(screen);
    }

    // ---- zone CRUD ---------------------------------------------------------

    /// Adds a snap zone and refreshes the spatial index.
    pub fn add_snap_zone(&mut self, zone: SnapZone) -> SettingsResult<()> {
        self.config.borrow_mut().add_snap_zone(zone)?;
        self.engine.rebuild_index();
        Ok(())
    }

    /// Applies a partial update to a zone and refreshes the spatial index.
    pub fn update_snap_zone(&mut self, name: &str, update: &SnapZoneUpdate) -> SettingsResult<()> {
        self.config.borrow_mut().update_snap_zone(name, update)?;
        self.engine.rebuild_index();
        Ok(())
    }

    /// Removes a zone and refreshes the spatial index.
    pub fn remove_snap_zone(&mut self, name: &str) -> SettingsResult<SnapZone> {
        let removed = self.config.borrow_mut().remove_snap_zone(name)?;
        self.engine.rebuild_index();
        Ok(removed)
    }

    /// Snapshot of all configured zones in insertion order.
    pub fn snap_zones(&self) -> Vec<SnapZone> {
        self.config.borrow().zones().to_vec()
    }

    /// Enables or disables the whole subsystem.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.borrow_mut().enabled = enabled;
    }

    /// Whether snapping is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.borrow().enabled
    }

    // ---- persistence -------------------------------------------------------

    /// Saves the current configuration to the subsystem's settings file.
    pub fn save_settings(&self) -> SettingsResult<()> {
        self.persistence.save(&self.config.borrow())
    }

    /// Reloads the configuration from disk.
    ///
    /// On failure the in-memory configuration is left untouched.
    pub fn load_settings(&mut self) -> SettingsResult<()> {
        let loaded = self.persistence.load()?;
        self.apply_config(loaded);
        Ok(())
    }

    /// Exports the configuration (with metadata) to a user-chosen file.
    pub fn export_settings(&self, path: &Path) -> SettingsResult<()> {
        self.persistence.export_to(path, &self.config.borrow())
    }

    /// Imports a configuration from a user-chosen file and applies it.
    pub fn import_settings(&mut self, path: &Path) -> SettingsResult<()> {
        let imported = self.persistence.import_from(path)?;
        self.apply_config(imported);
        Ok(())
    }

    fn apply_config(&mut self, config: SnapConfig) {
        let cache_size = config.performance.cache_size;
        let debounce_ms = config.performance.update_debounce_ms as f64;
        *self.config.borrow_mut() = config;
        self.engine.rebuild_index();
        self.coords
            .borrow_mut()
            .set_cache_limits(Duration::from_secs(1), cache_size);
        self.processor
            .debouncer_mut()
            .set_time_threshold_ms(debounce_ms);
    }

    // ---- diagnostics -------------------------------------------------------

    /// Combined performance counters.
    pub fn performance_stats(&self) -> SubsystemStats {
        SubsystemStats {
            engine: self.engine.stats(),
            cache: self.coords.borrow().stats(),
            processor: self.processor.stats(),
            index: self.engine.index_stats(),
        }
    }
}
