//! Event processing and move debouncing.
//!
//! Raw toolkit callbacks arrive as [`SnapEvent`]s. Non-move events dispatch
//! immediately; pointer moves pass a dual-threshold debouncer (time since
//! the last accepted move, Manhattan movement since its position) and are
//! otherwise deferred. Deferred moves flush, in order, immediately before
//! the next accepted event so handlers never observe reordering.
//!
//! Debouncing is driven by event timestamps rather than wall clock, which
//! keeps replayed and synthetic event streams deterministic.

use modelshop_core::constants::{
    DEFAULT_DEBOUNCE_MS, DEFERRED_EVENT_CAP, MAINTENANCE_INTERVAL_MS, MOVE_EPSILON_PX,
};
use modelshop_core::{EventType, Point, Shared, SnapEvent, SnapEventKind, WidgetId, WidgetRegistry};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use uuid::Uuid;

/// Handle for unsubscribing an event handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({})", &self.0.to_string()[..8])
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn FnMut(&SnapEvent)>;

/// Counter cap before maintenance resets the processor statistics.
const STATS_RESET_CAP: u64 = 1_000_000;

/// Dual-threshold move debouncer.
#[derive(Debug, Clone)]
pub struct EventDebouncer {
    time_threshold_ms: f64,
    movement_threshold: f64,
    last_accepted_ts: Option<f64>,
    last_accepted_pos: Option<Point>,
}

impl Default for EventDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS as f64, MOVE_EPSILON_PX)
    }
}

impl EventDebouncer {
    /// Creates a debouncer with explicit thresholds.
    pub fn new(time_threshold_ms: f64, movement_threshold: f64) -> Self {
        Self {
            time_threshold_ms,
            movement_threshold,
            last_accepted_ts: None,
            last_accepted_pos: None,
        }
    }

    /// Overrides the time threshold (from performance settings).
    pub fn set_time_threshold_ms(&mut self, ms: f64) {
        self.time_threshold_ms = ms.max(0.0);
    }

    /// Whether a move at (`timestamp_ms`, `position`) should be accepted.
    ///
    /// A move is suppressed when too little time has elapsed since the last
    /// accepted move OR it has not traveled far enough from its position.
    /// The first move after a reset is always accepted.
    pub fn should_accept(&self, timestamp_ms: f64, position: Point) -> bool {
        let (Some(last_ts), Some(last_pos)) = (self.last_accepted_ts, self.last_accepted_pos)
        else {
            return true;
        };
        let elapsed = timestamp_ms - last_ts;
        let moved = position.manhattan_distance_to(&last_pos);
        elapsed >= self.time_threshold_ms && moved >= self.movement_threshold
    }

    /// Records an accepted move.
    pub fn note_accepted(&mut self, timestamp_ms: f64, position: Point) {
        self.last_accepted_ts = Some(timestamp_ms);
        self.last_accepted_pos = Some(position);
    }

    /// Forgets prior acceptance so a new interaction starts fresh.
    pub fn reset(&mut self) {
        self.last_accepted_ts = None;
        self.last_accepted_pos = None;
    }
}

/// State of one tracked dock drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    /// When the drag began (event time, ms)
    pub started_ms: f64,
    /// Where the drag began, unified coordinates
    pub origin: Point,
    /// Most recent accepted drag position
    pub last: Point,
}

/// Processor counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Events handed to `process_event`
    pub received: u64,
    /// Events dispatched to handlers (including flushed moves)
    pub dispatched: u64,
    /// Moves suppressed by the debouncer
    pub suppressed: u64,
    /// Deferred moves flushed before a later accepted event
    pub flushed: u64,
    /// Deferred moves dropped because the queue was full
    pub dropped: u64,
}

/// Converts raw events into handler dispatches with move debouncing.
pub struct EventProcessor {
    registry: Shared<WidgetRegistry>,
    handlers: HashMap<EventType, Vec<(HandlerId, EventHandler)>>,
    debouncer: EventDebouncer,
    deferred: VecDeque<SnapEvent>,
    drags: HashMap<WidgetId, DragState>,
    last_maintenance_ms: Option<f64>,
    stats: ProcessorStats,
}

impl EventProcessor {
    /// Creates a processor over the window's widget registry.
    pub fn new(registry: Shared<WidgetRegistry>) -> Self {
        Self {
            registry,
            handlers: HashMap::new(),
            debouncer: EventDebouncer::default(),
            deferred: VecDeque::new(),
            drags: HashMap::new(),
            last_maintenance_ms: None,
            stats: ProcessorStats::default(),
        }
    }

    /// Access the debouncer for threshold configuration.
    pub fn debouncer_mut(&mut self) -> &mut EventDebouncer {
        &mut self.debouncer
    }

    /// Subscribes a handler to one event type.
    ///
    /// Handlers for a type run in subscription order on the processing
    /// thread; they should return quickly.
    pub fn subscribe<F>(&mut self, event_type: EventType, handler: F) -> HandlerId
    where
        F: FnMut(&SnapEvent) + 'static,
    {
        let id = HandlerId::new();
        self.handlers
            .entry(event_type)
            .or_default()
            .push((id, Box::new(handler)));
        tracing::debug!("Subscription {} added for {}", id, event_type);
        id
    }

    /// Removes a handler. Returns true if it was found.
    pub fn unsubscribe(&mut self, id: HandlerId) -> bool {
        let mut removed = false;
        for list in self.handlers.values_mut() {
            let before = list.len();
            list.retain(|(handler_id, _)| *handler_id != id);
            removed |= list.len() != before;
        }
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Number of registered handlers across all event types.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Processes one event.
    ///
    /// Returns true if the event was dispatched immediately, false if it was
    /// deferred by the debouncer (it will flush before the next accepted
    /// event, preserving order).
    pub fn process_event(&mut self, event: SnapEvent) -> bool {
        self.stats.received += 1;
        self.maintain(event.timestamp_ms);

        if event.event_type() == EventType::PointerMoved {
            if !self.debouncer.should_accept(event.timestamp_ms, event.position) {
                self.stats.suppressed += 1;
                if self.deferred.len() >= DEFERRED_EVENT_CAP {
                    self.deferred.pop_front();
                    self.stats.dropped += 1;
                }
                self.deferred.push_back(event);
                return false;
            }
            self.flush_deferred();
            self.debouncer.note_accepted(event.timestamp_ms, event.position);
            self.track_drag_motion(&event);
            self.dispatch(&event);
            return true;
        }

        // Non-move events always process immediately, after draining any
        // deferred moves so order is preserved.
        self.flush_deferred();
        match &event.kind {
            SnapEventKind::PointerPressed { .. } => {
                // A new interaction must not inherit stale debounce timing.
                self.debouncer.reset();
                self.begin_drag(&event);
            }
            SnapEventKind::PointerReleased { .. } => {
                self.end_drag(&event);
            }
            _ => {}
        }
        self.dispatch(&event);
        true
    }

    /// Currently tracked drags.
    pub fn active_drags(&self) -> impl Iterator<Item = (WidgetId, &DragState)> {
        self.drags.iter().map(|(id, state)| (*id, state))
    }

    /// Drag state for one widget, if it is being dragged.
    pub fn drag_state(&self, widget: WidgetId) -> Option<&DragState> {
        self.drags.get(&widget)
    }

    /// Processor counters.
    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    fn flush_deferred(&mut self) {
        while let Some(deferred) = self.deferred.pop_front() {
            self.stats.flushed += 1;
            self.track_drag_motion(&deferred);
            self.dispatch(&deferred);
        }
    }

    fn dispatch(&mut self, event: &SnapEvent) {
        self.stats.dispatched += 1;
        if let Some(list) = self.handlers.get_mut(&event.event_type()) {
            for (_, handler) in list.iter_mut() {
                handler(event);
            }
        }
    }

    fn begin_drag(&mut self, event: &SnapEvent) {
        let Some(target) = event.target else {
            return;
        };
        let dockable = self
            .registry
            .borrow()
            .get(target)
            .is_some_and(|info| info.dockable);
        if !dockable {
            return;
        }
        self.drags.insert(
            target,
            DragState {
                started_ms: event.timestamp_ms,
                origin: event.position,
                last: event.position,
            },
        );
        tracing::trace!("Drag started on {} at {}", target, event.position);
    }

    fn end_drag(&mut self, event: &SnapEvent) {
        match event.target {
            Some(target) => {
                if self.drags.remove(&target).is_some() {
                    tracing::trace!("Drag ended on {}", target);
                }
            }
            // A release with no target ends every tracked drag.
            None => self.drags.clear(),
        }
    }

    fn track_drag_motion(&mut self, event: &SnapEvent) {
        let Some(target) = event.target else {
            return;
        };
        if let Some(drag) = self.drags.get_mut(&target) {
            drag.last = event.position;
        }
    }

    /// Periodic housekeeping, driven by event time and independent of drag
    /// activity: prune drags whose widget vanished, reset runaway counters.
    fn maintain(&mut self, now_ms: f64) {
        let Some(last) = self.last_maintenance_ms else {
            self.last_maintenance_ms = Some(now_ms);
            return;
        };
        if now_ms - last < MAINTENANCE_INTERVAL_MS {
            return;
        }
        self.last_maintenance_ms = Some(now_ms);

        let registry = self.registry.borrow();
        let before = self.drags.len();
        self.drags.retain(|widget, _| registry.contains(*widget));
        let pruned = before - self.drags.len();
        drop(registry);
        if pruned > 0 {
            tracing::debug!("Pruned {} drags with dead widget handles", pruned);
        }

        if self.stats.received > STATS_RESET_CAP {
            self.stats = ProcessorStats::default();
        }
    }
}

impl fmt::Debug for EventProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventProcessor")
            .field("subscribers", &self.subscriber_count())
            .field("deferred", &self.deferred.len())
            .field("drags", &self.drags.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelshop_core::{shared, Rect, WidgetInfo};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn processor() -> EventProcessor {
        EventProcessor::new(shared(WidgetRegistry::new()))
    }

    fn collector(
        processor: &mut EventProcessor,
        event_type: EventType,
    ) -> Rc<RefCell<Vec<SnapEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        processor.subscribe(event_type, move |event| {
            sink.borrow_mut().push(event.clone());
        });
        seen
    }

    #[test]
    fn test_non_move_processes_immediately() {
        let mut processor = processor();
        let seen = collector(&mut processor, EventType::PointerPressed);

        let accepted =
            processor.process_event(SnapEvent::pointer_pressed(Point::new(1.0, 1.0), 0.0));
        assert!(accepted);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_move_storm_is_debounced() {
        let mut processor = processor();
        let seen = collector(&mut processor, EventType::PointerMoved);

        // 100 moves, 1 ms apart, 1 px apart: both thresholds suppress.
        let mut accepted = 0;
        for i in 0..100 {
            let event = SnapEvent::pointer_moved(Point::new(i as f64, 0.0), i as f64);
            if processor.process_event(event) {
                accepted += 1;
            }
        }
        assert!(accepted < 100);
        assert!(accepted >= 1);
        // Every move still reached handlers (accepted now, deferred later).
        assert!(seen.borrow().len() >= accepted);
        assert!(processor.stats().suppressed > 0);
    }

    #[test]
    fn test_deferred_moves_flush_before_non_move_in_order() {
        let mut processor = processor();
        let moves = collector(&mut processor, EventType::PointerMoved);
        let releases = collector(&mut processor, EventType::PointerReleased);

        // First move accepted; next two suppressed (too soon, too close).
        processor.process_event(SnapEvent::pointer_moved(Point::new(0.0, 0.0), 0.0));
        processor.process_event(SnapEvent::pointer_moved(Point::new(0.5, 0.0), 1.0));
        processor.process_event(SnapEvent::pointer_moved(Point::new(1.0, 0.0), 2.0));
        assert_eq!(moves.borrow().len(), 1);

        // The release flushes the two deferred moves first.
        processor.process_event(SnapEvent::pointer_released(Point::new(1.0, 0.0), 3.0));
        assert_eq!(moves.borrow().len(), 3);
        assert_eq!(releases.borrow().len(), 1);

        // Flushed moves kept their order.
        assert_eq!(moves.borrow()[1].position, Point::new(0.5, 0.0));
        assert_eq!(moves.borrow()[2].position, Point::new(1.0, 0.0));
    }

    #[test]
    fn test_deferred_queue_bounded() {
        let mut processor = processor();
        processor.process_event(SnapEvent::pointer_moved(Point::new(0.0, 0.0), 0.0));
        // 60 suppressed moves at the same position.
        for i in 0..60 {
            processor.process_event(SnapEvent::pointer_moved(
                Point::new(0.1, 0.0),
                0.1 * i as f64,
            ));
        }
        let stats = processor.stats();
        assert_eq!(stats.suppressed, 60);
        assert_eq!(stats.dropped, 60 - DEFERRED_EVENT_CAP as u64);
    }

    #[test]
    fn test_press_resets_debouncer() {
        let mut processor = processor();

        assert!(processor.process_event(SnapEvent::pointer_moved(Point::new(0.0, 0.0), 0.0)));
        // Within thresholds: suppressed.
        assert!(!processor.process_event(SnapEvent::pointer_moved(Point::new(0.5, 0.0), 1.0)));

        // A press starts a new interaction...
        processor.process_event(SnapEvent::pointer_pressed(Point::new(0.5, 0.0), 2.0));
        // ...so the very next move is accepted despite being 1 ms later.
        assert!(processor.process_event(SnapEvent::pointer_moved(Point::new(0.6, 0.0), 3.0)));
    }

    #[test]
    fn test_drag_tracking_for_dockable_targets() {
        let registry = shared(WidgetRegistry::new());
        let panel = registry.borrow_mut().insert(
            WidgetInfo::new("panel", Rect::new(0.0, 0.0, 200.0, 400.0)).dockable(),
        );
        let plain = registry
            .borrow_mut()
            .insert(WidgetInfo::new("label", Rect::new(0.0, 0.0, 50.0, 20.0)));
        let mut processor = EventProcessor::new(registry);

        // Dockable target: tracked.
        processor
            .process_event(SnapEvent::pointer_pressed(Point::new(5.0, 5.0), 0.0).targeting(panel));
        assert!(processor.drag_state(panel).is_some());

        // Non-dockable target: ignored.
        processor
            .process_event(SnapEvent::pointer_pressed(Point::new(5.0, 5.0), 1.0).targeting(plain));
        assert!(processor.drag_state(plain).is_none());

        // Motion updates the tracked position.
        processor.process_event(
            SnapEvent::pointer_moved(Point::new(50.0, 60.0), 20.0).targeting(panel),
        );
        assert_eq!(
            processor.drag_state(panel).unwrap().last,
            Point::new(50.0, 60.0)
        );

        // Release ends it.
        processor.process_event(
            SnapEvent::pointer_released(Point::new(50.0, 60.0), 30.0).targeting(panel),
        );
        assert!(processor.drag_state(panel).is_none());
    }

    #[test]
    fn test_maintenance_prunes_dead_drags() {
        let registry = shared(WidgetRegistry::new());
        let panel = registry.borrow_mut().insert(
            WidgetInfo::new("panel", Rect::new(0.0, 0.0, 200.0, 400.0)).dockable(),
        );
        let mut processor = EventProcessor::new(registry.clone());

        processor
            .process_event(SnapEvent::pointer_pressed(Point::new(5.0, 5.0), 0.0).targeting(panel));
        assert!(processor.drag_state(panel).is_some());

        // The widget disappears without a release event.
        registry.borrow_mut().remove(panel);

        // Maintenance fires once the interval has elapsed in event time.
        processor.process_event(SnapEvent::new(
            SnapEventKind::LayoutChanged,
            Point::default(),
            MAINTENANCE_INTERVAL_MS + 1.0,
        ));
        assert!(processor.drag_state(panel).is_none());
    }

    #[test]
    fn test_unsubscribe() {
        let mut processor = processor();
        let seen = Rc::new(RefCell::new(0u32));
        let sink = seen.clone();
        let id = processor.subscribe(EventType::SnapRequested, move |_| {
            *sink.borrow_mut() += 1;
        });
        assert_eq!(processor.subscriber_count(), 1);

        processor.process_event(SnapEvent::new(
            SnapEventKind::SnapRequested,
            Point::default(),
            0.0,
        ));
        assert_eq!(*seen.borrow(), 1);

        assert!(processor.unsubscribe(id));
        assert!(!processor.unsubscribe(id));
        processor.process_event(SnapEvent::new(
            SnapEventKind::SnapRequested,
            Point::default(),
            1.0,
        ));
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_multiple_handlers_in_subscription_order() {
        let mut processor = processor();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let sink = order.clone();
            processor.subscribe(EventType::LayoutChanged, move |_| {
                sink.borrow_mut().push(tag);
            });
        }
        processor.process_event(SnapEvent::new(
            SnapEventKind::LayoutChanged,
            Point::default(),
            0.0,
        ));
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }
}
