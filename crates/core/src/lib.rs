//! Chama Core - Domain models, service traits, client state and view models.
//!
//! This crate holds everything the group-savings client knows without
//! talking to the network. The HTTP implementation of the service traits
//! lives in the `chama-client` crate.

pub mod auth;
pub mod constants;
pub mod context;
pub mod errors;
pub mod events;
pub mod groups;
pub mod loans;
pub mod notifications;
pub mod routes;
pub mod secrets;
pub mod session;
pub mod transactions;
pub mod utils;
pub mod views;
pub mod withdrawals;

pub use context::{AppContext, Services};
pub use routes::Route;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
