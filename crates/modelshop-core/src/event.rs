//! Normalized event model for the snapping pipeline.
//!
//! Raw toolkit events are converted into [`SnapEvent`] before they reach the
//! event processor. The payload is a closed tagged union per event type with
//! the few fields the subsystem actually reads (buttons, modifiers, old/new
//! geometry) — there is deliberately no free-form metadata bag. Events are
//! cloneable and serializable for logging/replay.

use crate::geometry::{Point, Rect};
use crate::widget::WidgetId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pressed-button state carried on pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MouseButtons {
    pub left: bool,
    pub right: bool,
    pub middle: bool,
}

impl MouseButtons {
    /// Only the left button pressed (the usual drag configuration).
    pub fn left_only() -> Self {
        Self {
            left: true,
            ..Default::default()
        }
    }

    /// Whether any button is pressed.
    pub fn any(&self) -> bool {
        self.left || self.right || self.middle
    }
}

/// Keyboard modifier state carried on pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

/// Event payload, one variant per event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SnapEventKind {
    /// Pointer button pressed (starts a potential drag)
    PointerPressed {
        buttons: MouseButtons,
        modifiers: Modifiers,
    },
    /// Pointer moved (subject to debouncing)
    PointerMoved {
        buttons: MouseButtons,
        modifiers: Modifiers,
    },
    /// Pointer button released (ends a drag)
    PointerReleased {
        buttons: MouseButtons,
        modifiers: Modifiers,
    },
    /// Double click
    DoubleClick {
        buttons: MouseButtons,
        modifiers: Modifiers,
    },
    /// Main window resized
    WindowResized { old: Rect, new: Rect },
    /// Main window moved
    WindowMoved { old_origin: Point, new_origin: Point },
    /// Dock layout changed (panels added/removed/rearranged)
    LayoutChanged,
    /// Explicit snap recalculation request from the host
    SnapRequested,
}

impl SnapEventKind {
    /// Get the type discriminant of this payload
    pub fn event_type(&self) -> EventType {
        match self {
            SnapEventKind::PointerPressed { .. } => EventType::PointerPressed,
            SnapEventKind::PointerMoved { .. } => EventType::PointerMoved,
            SnapEventKind::PointerReleased { .. } => EventType::PointerReleased,
            SnapEventKind::DoubleClick { .. } => EventType::DoubleClick,
            SnapEventKind::WindowResized { .. } => EventType::WindowResized,
            SnapEventKind::WindowMoved { .. } => EventType::WindowMoved,
            SnapEventKind::LayoutChanged => EventType::LayoutChanged,
            SnapEventKind::SnapRequested => EventType::SnapRequested,
        }
    }
}

/// Fieldless event type, used as the handler-registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    PointerPressed,
    PointerMoved,
    PointerReleased,
    DoubleClick,
    WindowResized,
    WindowMoved,
    LayoutChanged,
    SnapRequested,
}

impl EventType {
    /// All event types, for registering catch-all handlers.
    pub const ALL: [EventType; 8] = [
        EventType::PointerPressed,
        EventType::PointerMoved,
        EventType::PointerReleased,
        EventType::DoubleClick,
        EventType::WindowResized,
        EventType::WindowMoved,
        EventType::LayoutChanged,
        EventType::SnapRequested,
    ];

    /// Whether events of this type bypass the debouncer.
    pub fn is_immediate(&self) -> bool {
        !matches!(self, EventType::PointerMoved)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerPressed => write!(f, "PointerPressed"),
            Self::PointerMoved => write!(f, "PointerMoved"),
            Self::PointerReleased => write!(f, "PointerReleased"),
            Self::DoubleClick => write!(f, "DoubleClick"),
            Self::WindowResized => write!(f, "WindowResized"),
            Self::WindowMoved => write!(f, "WindowMoved"),
            Self::LayoutChanged => write!(f, "LayoutChanged"),
            Self::SnapRequested => write!(f, "SnapRequested"),
        }
    }
}

/// A normalized event flowing through the snapping pipeline
///
/// Widget references are non-owning handles; the event tolerates the
/// referenced widgets disappearing between creation and dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapEvent {
    /// Typed payload
    pub kind: SnapEventKind,
    /// Position in unified coordinates
    pub position: Point,
    /// Widget the event originated from
    pub source: Option<WidgetId>,
    /// Widget being dragged/targeted
    pub target: Option<WidgetId>,
    /// Event timestamp in milliseconds, monotonic within a session, >= 0
    pub timestamp_ms: f64,
    /// Opaque host token identifying the originating platform event, for
    /// pass-through back to the toolkit
    pub platform_event: Option<u64>,
}

impl SnapEvent {
    /// Creates an event with no widget references.
    pub fn new(kind: SnapEventKind, position: Point, timestamp_ms: f64) -> Self {
        debug_assert!(timestamp_ms >= 0.0, "event timestamps must be >= 0");
        Self {
            kind,
            position,
            source: None,
            target: None,
            timestamp_ms,
            platform_event: None,
        }
    }

    /// Attaches the source widget handle.
    pub fn from_widget(mut self, source: WidgetId) -> Self {
        self.source = Some(source);
        self
    }

    /// Attaches the target widget handle.
    pub fn targeting(mut self, target: WidgetId) -> Self {
        self.target = Some(target);
        self
    }

    /// Attaches the host's token for the originating platform event.
    pub fn with_platform_event(mut self, token: u64) -> Self {
        self.platform_event = Some(token);
        self
    }

    /// Pointer press with the left button held.
    pub fn pointer_pressed(position: Point, timestamp_ms: f64) -> Self {
        Self::new(
            SnapEventKind::PointerPressed {
                buttons: MouseButtons::left_only(),
                modifiers: Modifiers::default(),
            },
            position,
            timestamp_ms,
        )
    }

    /// Pointer move with the left button held (drag motion).
    pub fn pointer_moved(position: Point, timestamp_ms: f64) -> Self {
        Self::new(
            SnapEventKind::PointerMoved {
                buttons: MouseButtons::left_only(),
                modifiers: Modifiers::default(),
            },
            position,
            timestamp_ms,
        )
    }

    /// Pointer release.
    pub fn pointer_released(position: Point, timestamp_ms: f64) -> Self {
        Self::new(
            SnapEventKind::PointerReleased {
                buttons: MouseButtons::default(),
                modifiers: Modifiers::default(),
            },
            position,
            timestamp_ms,
        )
    }

    /// Get the type discriminant of this event
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match &self.kind {
            SnapEventKind::PointerPressed { buttons, .. } => {
                format!("press at {} (left={})", self.position, buttons.left)
            }
            SnapEventKind::PointerMoved { .. } => format!("move to {}", self.position),
            SnapEventKind::PointerReleased { .. } => format!("release at {}", self.position),
            SnapEventKind::DoubleClick { .. } => format!("double-click at {}", self.position),
            SnapEventKind::WindowResized { old, new } => {
                format!("resize {}x{} -> {}x{}", old.width, old.height, new.width, new.height)
            }
            SnapEventKind::WindowMoved {
                old_origin,
                new_origin,
            } => format!("window moved {} -> {}", old_origin, new_origin),
            SnapEventKind::LayoutChanged => "layout changed".to_string(),
            SnapEventKind::SnapRequested => format!("snap requested at {}", self.position),
        }
    }
}
