//! UI events module.
//!
//! Stores and view models never drive a screen directly. They emit
//! navigation requests and toast messages through an injected sink and the
//! front-end decides how to present them.

mod sink;
mod ui_event;

pub use sink::*;
pub use ui_event::*;
