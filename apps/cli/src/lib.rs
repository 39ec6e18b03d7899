//! Chama CLI - terminal front-end for the savings group client.

pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod formatting;
pub mod main_lib;
pub mod secrets;

pub use main_lib::{build_context, init_tracing};
