//! Widget handles and the window-owned widget table.
//!
//! The snapping subsystem never owns widgets. It holds `WidgetId` handles —
//! a generational index into a `WidgetRegistry` owned by the window — and
//! checks liveness explicitly before use. A handle whose slot has been
//! reused (same index, newer generation) no longer resolves, so identity
//! stays well-defined across widget teardown and re-creation.

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-owning handle to a widget in a [`WidgetRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetId {
    index: u32,
    generation: u32,
}

impl WidgetId {
    /// Slot index within the registry.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation counter for this slot at handle creation time.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}.{}", self.index, self.generation)
    }
}

/// Descriptive data the subsystem keeps per widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInfo {
    /// Human-readable widget name for logging.
    pub name: String,
    /// Screen-space frame (origin + size) of the widget.
    pub frame: Rect,
    /// Whether this widget participates in dock-drag tracking.
    pub dockable: bool,
}

impl WidgetInfo {
    /// Creates widget info with a screen-space frame.
    pub fn new(name: impl Into<String>, frame: Rect) -> Self {
        Self {
            name: name.into(),
            frame,
            dockable: false,
        }
    }

    /// Marks the widget as a dock-drag participant.
    pub fn dockable(mut self) -> Self {
        self.dockable = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    info: Option<WidgetInfo>,
}

/// Window-owned table of live widgets, keyed by generational handles.
///
/// The registry doubles as the host-toolkit mapping seam: widget-local and
/// dock-panel transforms resolve through the screen-space frame registered
/// here, which the host keeps current from its own layout callbacks.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl WidgetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a widget and returns its handle.
    pub fn insert(&mut self, info: WidgetInfo) -> WidgetId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            tracing::trace!("Widget '{}' registered in reused slot {}", info.name, index);
            slot.info = Some(info);
            return WidgetId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            info: Some(info),
        });
        WidgetId {
            index,
            generation: 0,
        }
    }

    /// Removes a widget; stale handles keep failing liveness checks afterward.
    ///
    /// Returns the widget info if the handle was live.
    pub fn remove(&mut self, id: WidgetId) -> Option<WidgetInfo> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation || slot.info.is_none() {
            return None;
        }
        let info = slot.info.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        if let Some(info) = &info {
            tracing::trace!("Widget '{}' unregistered ({})", info.name, id);
        }
        info
    }

    /// Resolves a handle to its widget info, if still live.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetInfo> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.info.as_ref()
    }

    /// Explicit liveness check for a handle.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Updates a widget's screen-space frame (host layout callback).
    ///
    /// Returns false if the handle is stale.
    pub fn set_frame(&mut self, id: WidgetId, frame: Rect) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation {
            return false;
        }
        match slot.info.as_mut() {
            Some(info) => {
                info.frame = frame;
                true
            }
            None => false,
        }
    }

    /// Screen-space frame of a live widget.
    pub fn frame(&self, id: WidgetId) -> Option<Rect> {
        self.get(id).map(|info| info.frame)
    }

    /// Maps a widget-local point to screen coordinates.
    pub fn local_to_screen(&self, id: WidgetId, point: Point) -> Option<Point> {
        let frame = self.frame(id)?;
        Some(point.offset(frame.x, frame.y))
    }

    /// Maps a screen point to widget-local coordinates.
    pub fn screen_to_local(&self, id: WidgetId, point: Point) -> Option<Point> {
        let frame = self.frame(id)?;
        Some(point.offset(-frame.x, -frame.y))
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no widgets are registered.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over live widgets with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &WidgetInfo)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.info.as_ref().map(|info| {
                (
                    WidgetId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    info,
                )
            })
        })
    }
}
