//! HTTP client for the savings group REST API.
//!
//! Every request carries the stored bearer token (when there is one) and
//! every non-2xx answer becomes a [`ClientError::Api`] whose message is what
//! the server said, or a generic message for the operation.

use std::sync::Arc;
use std::time::Duration;

use chama_core::constants::TOKEN_KEY;
use chama_core::secrets::SecretStore;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::types::server_message;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the savings group API.
///
/// Implements every service trait of `chama-core`, so one shared instance
/// backs the whole application context.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    secrets: Arc<dyn SecretStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the API, without the `/api` prefix (e.g. "http://localhost:5000")
    /// * `secrets` - Where the bearer token is read from before each request
    pub fn new(base_url: &str, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_timeout(base_url, secrets, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, secrets: Arc<dyn SecretStore>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            secrets,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Headers for a request, authorized with `token` when one is given.
    fn headers(token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = token {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::auth("Invalid access token format"))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        Ok(headers)
    }

    fn stored_token(&self) -> Result<Option<String>> {
        self.secrets
            .get_secret(TOKEN_KEY)
            .map_err(|e| ClientError::auth(e.to_string()))
    }

    /// Builds a request authorized with the stored token.
    pub(crate) fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.stored_token()?;
        self.request_with_token(method, path, token.as_deref())
    }

    /// Builds a request authorized with an explicit token, bypassing the
    /// secret store.
    pub(crate) fn request_with_token(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
    ) -> Result<RequestBuilder> {
        let url = self.url(path);
        debug!("{} {}", method, url);
        Ok(self
            .client
            .request(method, url)
            .headers(Self::headers(token)?))
    }

    /// Sends the request and decodes the JSON body.
    pub(crate) async fn send<T: DeserializeOwned>(
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        Self::parse_response(response, fallback).await
    }

    /// Sends the request, only checking the status.
    pub(crate) async fn send_unit(request: RequestBuilder, fallback: &str) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body, fallback));
        }
        Ok(())
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        Self::send(self.request(Method::GET, path)?, fallback).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(self.request(Method::POST, path)?.json(body), fallback).await
    }

    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B, fallback: &str) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        Self::send_unit(self.request(Method::POST, path)?.json(body), fallback).await
    }

    /// POST without a body (state transitions like approve or leave).
    pub(crate) async fn post_empty(&self, path: &str, fallback: &str) -> Result<()> {
        Self::send_unit(self.request(Method::POST, path)?, fallback).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B, fallback: &str) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::send(self.request(Method::PUT, path)?.json(body), fallback).await
    }

    pub(crate) async fn put_unit<B>(&self, path: &str, body: &B, fallback: &str) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        Self::send_unit(self.request(Method::PUT, path)?.json(body), fallback).await
    }

    pub(crate) async fn delete_unit(&self, path: &str, fallback: &str) -> Result<()> {
        Self::send_unit(self.request(Method::DELETE, path)?, fallback).await
    }

    /// Parse a JSON response body.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body, fallback));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            ClientError::Json(e)
        })
    }

    fn api_error(status: u16, body: &str, fallback: &str) -> ClientError {
        let message = server_message(body).unwrap_or_else(|| fallback.to_string());
        ClientError::api(status, message)
    }
}
