//! UI event sink trait and implementations.

use std::sync::{Arc, Mutex};

use super::UiEvent;

/// Trait for receiving UI events.
///
/// `emit()` must not block: implementations queue or print, never await.
pub trait UiEventSink: Send + Sync {
    fn emit(&self, event: UiEvent);
}

/// Sink that discards everything.
#[derive(Clone, Default)]
pub struct NoOpUiEventSink;

impl UiEventSink for NoOpUiEventSink {
    fn emit(&self, _event: UiEvent) {}
}

/// Sink that collects emitted events, used by tests.
#[derive(Clone, Default)]
pub struct MockUiEventSink {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl MockUiEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Last navigation target, if any navigation was emitted.
    pub fn last_route(&self) -> Option<crate::routes::Route> {
        self.events().into_iter().rev().find_map(|event| match event {
            UiEvent::Navigate { route } => Some(route),
            _ => None,
        })
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UiEventSink for MockUiEventSink {
    fn emit(&self, event: UiEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
