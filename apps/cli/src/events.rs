//! Terminal rendition of UI events.

use std::sync::Mutex;

use chama_core::events::{ToastLevel, UiEvent, UiEventSink};
use chama_core::Route;

/// Prints toasts and remembers where the last action wanted to go.
///
/// Error toasts are only logged: the failing command returns the same error
/// and `main` prints it.
#[derive(Default)]
pub struct TerminalEventSink {
    last_route: Mutex<Option<Route>>,
}

impl TerminalEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_route(&self) -> Option<Route> {
        self.last_route.lock().ok().and_then(|r| r.clone())
    }
}

impl UiEventSink for TerminalEventSink {
    fn emit(&self, event: UiEvent) {
        match event {
            UiEvent::Navigate { route } => {
                tracing::debug!("navigate -> {}", route);
                if let Ok(mut last) = self.last_route.lock() {
                    *last = Some(route);
                }
            }
            UiEvent::Toast { level, message } => match level {
                ToastLevel::Success => println!("✔ {}", message),
                ToastLevel::Info => println!("{}", message),
                ToastLevel::Error => tracing::debug!("error toast: {}", message),
            },
        }
    }
}
