//! Listener registry.
//!
//! Listeners register once with the kinds they care about; the bus keeps an
//! index by kind so publishing only visits interested listeners. The bus
//! borrows its listeners, so the caller reads their results once the match
//! is over. Listeners see the state by shared reference only.

use rustc_hash::FxHashMap;

use crate::core::GameState;

use super::event::{EventKind, GameEvent};

/// Observer of lifecycle events.
pub trait MetricsListener {
    /// Kinds this listener wants. Defaults to all of them.
    fn event_kinds(&self) -> Vec<EventKind> {
        EventKind::ALL.to_vec()
    }

    /// Handle one event. `state` is the state after the transition.
    fn on_event(&mut self, event: &GameEvent, state: &GameState);
}

/// Fans events out to subscribed listeners in registration order.
#[derive(Default)]
pub struct EventBus<'a> {
    listeners: Vec<&'a mut dyn MetricsListener>,
    by_kind: FxHashMap<EventKind, Vec<usize>>,
}

impl<'a> EventBus<'a> {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for the kinds it asks for.
    pub fn subscribe(&mut self, listener: &'a mut dyn MetricsListener) {
        let id = self.listeners.len();
        for kind in listener.event_kinds() {
            self.by_kind.entry(kind).or_default().push(id);
        }
        self.listeners.push(listener);
    }

    /// Register a listener (builder pattern).
    #[must_use]
    pub fn with_listener(mut self, listener: &'a mut dyn MetricsListener) -> Self {
        self.subscribe(listener);
        self
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver one event.
    pub fn publish(&mut self, event: &GameEvent, state: &GameState) {
        let Some(ids) = self.by_kind.get(&event.kind()) else {
            return;
        };
        for &id in ids {
            self.listeners[id].on_event(event, state);
        }
    }

    /// Deliver events in order.
    pub fn publish_all(&mut self, events: &[GameEvent], state: &GameState) {
        for event in events {
            self.publish(event, state);
        }
    }
}

impl std::fmt::Debug for EventBus<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("by_kind", &self.by_kind)
            .finish()
    }
}
