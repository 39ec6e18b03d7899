//! Session module - the signed-in identity and its bearer token.

mod session_store;

pub use session_store::{SessionState, SessionStore};
