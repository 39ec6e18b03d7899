//! Chama Client - HTTP implementation of the `chama-core` service traits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chama_client::ApiClient;
//! use chama_core::{secrets::MemorySecretStore, Services};
//!
//! let secrets = Arc::new(MemorySecretStore::new());
//! let api = Arc::new(ApiClient::new("http://localhost:5000", secrets.clone()));
//! let services = Services::from_shared(api);
//! ```

mod api;
mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ClientError, Result};
