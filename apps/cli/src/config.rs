use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chama_core::constants::NOTIFICATION_POLL_INTERVAL_SECS;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const TOKEN_DIR: &str = ".chama";
const TOKEN_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Runtime settings of the terminal client.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token_file: PathBuf,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `CHAMA_*` variables, after loading a `.env` file when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = non_empty("CHAMA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_file = non_empty("CHAMA_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_token_file(non_empty("HOME")));

        let timeout_ms = parse_u64(non_empty("CHAMA_REQUEST_TIMEOUT_MS"), "CHAMA_REQUEST_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let poll_secs = parse_u64(non_empty("CHAMA_POLL_INTERVAL_SECS"), "CHAMA_POLL_INTERVAL_SECS")?
            .unwrap_or(NOTIFICATION_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(anyhow!("CHAMA_POLL_INTERVAL_SECS must be greater than zero"));
        }

        let log_format = match non_empty("CHAMA_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) => return Err(anyhow!("CHAMA_LOG_FORMAT must be 'text' or 'json', got '{}'", v)),
            None => LogFormat::Text,
        };

        Ok(Self {
            api_url,
            token_file,
            request_timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_secs(poll_secs),
            log_format,
        })
    }
}

fn parse_u64(raw: Option<String>, key: &str) -> Result<Option<u64>> {
    raw.map(|v| {
        v.trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("{} must be a whole number, got '{}'", key, v))
    })
    .transpose()
}

fn default_token_file(home: Option<String>) -> PathBuf {
    home.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(TOKEN_DIR)
        .join(TOKEN_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("HOME", "/home/amina")]).unwrap();
        assert_eq!(cfg.api_url, "http://localhost:5000");
        assert_eq!(cfg.token_file, PathBuf::from("/home/amina/.chama/session.json"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn without_home_the_token_lives_in_the_working_directory() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.token_file, PathBuf::from("./.chama/session.json"));
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("CHAMA_API_URL", "https://chama.example.com"),
            ("CHAMA_TOKEN_FILE", "/tmp/token.json"),
            ("CHAMA_REQUEST_TIMEOUT_MS", "1500"),
            ("CHAMA_POLL_INTERVAL_SECS", "5"),
            ("CHAMA_LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "https://chama.example.com");
        assert_eq!(cfg.token_file, PathBuf::from("/tmp/token.json"));
        assert_eq!(cfg.request_timeout, Duration::from_millis(1500));
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = config(&[("CHAMA_REQUEST_TIMEOUT_MS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("CHAMA_REQUEST_TIMEOUT_MS"));

        assert!(config(&[("CHAMA_POLL_INTERVAL_SECS", "0")]).is_err());
        assert!(config(&[("CHAMA_LOG_FORMAT", "xml")]).is_err());
    }
}
