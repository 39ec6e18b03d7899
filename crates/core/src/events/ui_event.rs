//! UI event types.

use serde::{Deserialize, Serialize};

use crate::routes::Route;

/// Severity of a toast message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Events emitted by stores and view models after an action completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// The front-end should show this route next.
    Navigate { route: Route },

    /// Short-lived feedback message.
    Toast { level: ToastLevel, message: String },
}

impl UiEvent {
    pub fn navigate(route: Route) -> Self {
        Self::Navigate { route }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::Toast {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }
}
