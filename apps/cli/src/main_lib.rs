use std::sync::Arc;

use chama_client::ApiClient;
use chama_core::events::UiEventSink;
use chama_core::secrets::SecretStore;
use chama_core::{AppContext, Services};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LogFormat};
use crate::events::TerminalEventSink;
use crate::secrets::FileSecretStore;

/// Installs the global subscriber. `log` records from the library crates are
/// forwarded to it.
pub fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Wires the token file, the HTTP client and the shared stores together.
pub fn build_context(config: &Config) -> AppContext {
    let secret_store: Arc<dyn SecretStore> =
        Arc::new(FileSecretStore::new(config.token_file.clone()));
    tracing::debug!("Token file in use: {}", config.token_file.display());

    let api = Arc::new(ApiClient::with_timeout(
        &config.api_url,
        secret_store.clone(),
        config.request_timeout,
    ));
    tracing::debug!("API base URL: {}", api.base_url());

    let events: Arc<dyn UiEventSink> = Arc::new(TerminalEventSink::new());
    AppContext::new(
        Services::from_shared(api),
        secret_store,
        events,
        config.poll_interval,
    )
}
