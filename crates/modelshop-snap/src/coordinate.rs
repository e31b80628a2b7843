//! Coordinate transformation with result caching.
//!
//! Converts points and rectangles between the named coordinate spaces
//! (screen, client window, widget-local, dock-panel, unified). Transform
//! results are cached keyed by (source, target, point, context) with a TTL
//! and strict-LRU eviction; any geometry change drops the whole cache since
//! every prior transform may be stale.
//!
//! The interactive contract: `transform_point` never fails. Internal errors
//! (missing context, stale widget handle, absent geometry) are logged and
//! answered with the original point at confidence 0.0.

use modelshop_core::constants::{DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL_MS};
use modelshop_core::{
    CoordinateSystem, Point, Rect, Shared, TransformError, WidgetId, WidgetRegistry,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The outcome of a coordinate transformation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationResult {
    /// The transformed point (the original point on failure)
    pub point: Point,
    /// Source coordinate system
    pub source: CoordinateSystem,
    /// Target coordinate system
    pub target: CoordinateSystem,
    /// When the transform was computed
    pub timestamp: Instant,
    /// Context widget the transform was resolved against
    pub context: Option<WidgetId>,
    /// Confidence in [0, 1]; 0.0 means the transform failed and degraded
    pub confidence: f64,
}

/// Cache key: systems, bit-exact point, context identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    source: CoordinateSystem,
    target: CoordinateSystem,
    x_bits: u64,
    y_bits: u64,
    context: Option<WidgetId>,
}

impl CacheKey {
    fn new(
        source: CoordinateSystem,
        target: CoordinateSystem,
        point: Point,
        context: Option<WidgetId>,
    ) -> Self {
        Self {
            source,
            target,
            x_bits: point.x.to_bits(),
            y_bits: point.y.to_bits(),
            context,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: TransformationResult,
    inserted: Instant,
    last_access: Instant,
}

/// Transform cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Cache hits within the TTL window
    pub hits: u64,
    /// Misses (computed fresh)
    pub misses: u64,
    /// Entries evicted by the LRU policy
    pub evictions: u64,
}

/// Converts points between coordinate spaces, caching results.
#[derive(Debug)]
pub struct CoordinateManager {
    registry: Shared<WidgetRegistry>,
    /// Main-window client area in screen coordinates
    window: Option<Rect>,
    /// Screen bounds (kept for host queries; Screen is the reference frame)
    screen: Option<Rect>,
    cache: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    stats: CacheStats,
}

impl CoordinateManager {
    /// Creates a manager with no geometry yet.
    ///
    /// Client transforms fail (and degrade) until
    /// [`update_main_window_geometry`](Self::update_main_window_geometry)
    /// provides the window rect.
    pub fn new(registry: Shared<WidgetRegistry>) -> Self {
        Self {
            registry,
            window: None,
            screen: None,
            cache: HashMap::new(),
            ttl: Duration::from_millis(DEFAULT_CACHE_TTL_MS),
            capacity: DEFAULT_CACHE_SIZE,
            stats: CacheStats::default(),
        }
    }

    /// Creates a manager with initial window and screen geometry.
    pub fn with_geometry(registry: Shared<WidgetRegistry>, window: Rect, screen: Rect) -> Self {
        let mut manager = Self::new(registry);
        manager.window = Some(window);
        manager.screen = Some(screen);
        manager
    }

    /// Overrides the cache TTL and capacity.
    pub fn set_cache_limits(&mut self, ttl: Duration, capacity: usize) {
        self.ttl = ttl;
        self.capacity = capacity.max(1);
    }

    /// Transforms a point between coordinate systems. Never fails.
    pub fn transform_point(
        &mut self,
        point: Point,
        source: CoordinateSystem,
        target: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> TransformationResult {
        let key = CacheKey::new(source, target, point, context);
        let now = Instant::now();

        if let Some(entry) = self.cache.get_mut(&key) {
            if now.duration_since(entry.inserted) <= self.ttl {
                entry.last_access = now;
                self.stats.hits += 1;
                return entry.result.clone();
            }
        }
        self.stats.misses += 1;

        let result = match self.compute(point, source, target, context) {
            Ok((transformed, confidence)) => TransformationResult {
                point: transformed,
                source,
                target,
                timestamp: now,
                context,
                confidence,
            },
            Err(err) => {
                tracing::warn!(
                    "Transform {} -> {} failed: {}; returning original point",
                    source,
                    target,
                    err
                );
                TransformationResult {
                    point,
                    source,
                    target,
                    timestamp: now,
                    context,
                    confidence: 0.0,
                }
            }
        };

        // Failed transforms are not cached so a re-registered widget or a
        // late geometry update recovers on the very next call.
        if result.confidence > 0.0 {
            self.insert_cached(key, result.clone(), now);
        }
        result
    }

    /// Transforms a rectangle by transforming its four corners and returning
    /// their axis-aligned bounding box (not a rotated rect).
    pub fn transform_rect(
        &mut self,
        rect: Rect,
        source: CoordinateSystem,
        target: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> Rect {
        let corners = rect.corners();
        let transformed: Vec<Point> = corners
            .iter()
            .map(|corner| {
                self.transform_point(*corner, source, target, context)
                    .point
            })
            .collect();
        Rect::bounding(&transformed)
    }

    /// Updates the main-window client geometry and drops every cached
    /// transform (a geometry change invalidates all prior results).
    pub fn update_main_window_geometry(&mut self, window: Rect) {
        self.window = Some(window);
        self.clear_cache();
        tracing::debug!("Window geometry updated to {}", window);
    }

    /// Updates the screen geometry and drops every cached transform.
    pub fn update_screen_geometry(&mut self, screen: Rect) {
        self.screen = Some(screen);
        self.clear_cache();
        tracing::debug!("Screen geometry updated to {}", screen);
    }

    /// Drops all cached transforms immediately.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Current main-window client geometry.
    pub fn window_geometry(&self) -> Option<Rect> {
        self.window
    }

    /// Current screen geometry.
    pub fn screen_geometry(&self) -> Option<Rect> {
        self.screen
    }

    /// Cache hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of live cache entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Per-pair transform rules. Returns the transformed point and its
    /// confidence, or the error that the public API degrades on.
    fn compute(
        &self,
        point: Point,
        source: CoordinateSystem,
        target: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> Result<(Point, f64), TransformError> {
        if !point.is_finite() {
            return Err(TransformError::NonFinitePoint {
                x: point.x,
                y: point.y,
            });
        }
        if source == target {
            return Ok((point, 1.0));
        }

        use CoordinateSystem::{Client, Dock, Screen, Widget};
        let s = source.canonical();
        let t = target.canonical();
        // Unified is Screen by definition; the pair collapses to identity.
        if s == t {
            return Ok((point, 0.95));
        }

        match (s, t) {
            (Screen, Client) => {
                let window = self.window_or_err()?;
                Ok((point.offset(-window.x, -window.y), 0.95))
            }
            (Client, Screen) => {
                let window = self.window_or_err()?;
                Ok((point.offset(window.x, window.y), 0.95))
            }
            (Screen, Widget | Dock) => {
                let local = self.screen_to_widget(point, source, target, context)?;
                Ok((local, 0.9))
            }
            (Widget | Dock, Screen) => {
                let screen = self.widget_to_screen(point, source, target, context)?;
                Ok((screen, 0.9))
            }
            (Client, Widget | Dock) => {
                let window = self.window_or_err()?;
                let screen_point = point.offset(window.x, window.y);
                let local = self.screen_to_widget(screen_point, source, target, context)?;
                Ok((local, 0.9))
            }
            (Widget | Dock, Client) => {
                let window = self.window_or_err()?;
                let screen_point = self.widget_to_screen(point, source, target, context)?;
                Ok((screen_point.offset(-window.x, -window.y), 0.9))
            }
            // Widget<->Dock has no direct rule; fall back to identity.
            (a, b) => {
                tracing::warn!(
                    "No transform rule for {} -> {}; falling back to identity",
                    a,
                    b
                );
                Ok((point, 0.7))
            }
        }
    }

    fn window_or_err(&self) -> Result<Rect, TransformError> {
        self.window
            .ok_or(TransformError::MissingGeometry { what: "window" })
    }

    fn screen_to_widget(
        &self,
        point: Point,
        source: CoordinateSystem,
        target: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> Result<Point, TransformError> {
        let id = context.ok_or(TransformError::MissingContext { source, target })?;
        self.registry
            .borrow()
            .screen_to_local(id, point)
            .ok_or(TransformError::StaleWidget { widget: id })
    }

    fn widget_to_screen(
        &self,
        point: Point,
        source: CoordinateSystem,
        target: CoordinateSystem,
        context: Option<WidgetId>,
    ) -> Result<Point, TransformError> {
        let id = context.ok_or(TransformError::MissingContext { source, target })?;
        self.registry
            .borrow()
            .local_to_screen(id, point)
            .ok_or(TransformError::StaleWidget { widget: id })
    }

    /// Inserts a cache entry, purging expired entries opportunistically and
    /// evicting the least-recently-accessed entry when at capacity.
    fn insert_cached(&mut self, key: CacheKey, result: TransformationResult, now: Instant) {
        let ttl = self.ttl;
        self.cache
            .retain(|_, entry| now.duration_since(entry.inserted) <= ttl);

        if self.cache.len() >= self.capacity {
            // Strict LRU; O(n) scan is fine at the target capacity (~1000).
            if let Some(oldest) = self
                .cache
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| *key)
            {
                self.cache.remove(&oldest);
                self.stats.evictions += 1;
            }
        }

        self.cache.insert(
            key,
            CacheEntry {
                result,
                inserted: now,
                last_access: now,
            },
        );
    }
}
