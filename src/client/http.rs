use std::time::Duration;

use log::{debug, error, warn};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::app_config::ApiConfig;
use crate::errors::{ApiError, ValidationDetail};

/// HTTP client for the backend REST API
///
/// Implements every collaborator trait in this module. Authenticated calls
/// take the bearer token explicitly; the client itself holds no session state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// HTTP client for API requests
    client: Client,
    /// Versioned API root, e.g. `http://localhost:8000/api/v1`
    api_root: Url,
    /// Maximum number of retry attempts for idempotent requests
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Body of a request
pub(crate) enum Body<'a, B: Serialize + ?Sized> {
    None,
    Json(&'a B),
    Form(&'a B),
}

impl ApiClient {
    /// Create a client for the given API root with default settings
    pub fn new(api_root: &str) -> Result<Self, ApiError> {
        Self::with_settings(api_root, Duration::from_secs(30), 2, 500)
    }

    /// Create a client from configuration
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::with_settings(
            &config.api_root(),
            Duration::from_secs(config.timeout_secs),
            config.retry_count,
            config.retry_backoff_ms,
        )
    }

    fn with_settings(
        api_root: &str,
        timeout: Duration,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ApiError> {
        let api_root = Url::parse(api_root)
            .map_err(|e| ApiError::Transport(format!("Invalid API root '{}': {}", api_root, e)))?;
        if api_root.cannot_be_a_base() {
            return Err(ApiError::Transport(format!(
                "API root cannot be used as a base URL: {}",
                api_root
            )));
        }

        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            api_root,
            max_retries,
            backoff_base_ms,
        })
    }

    /// The versioned API root
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Build an endpoint URL from path segments; segments are percent-encoded.
    /// A trailing empty segment produces a trailing slash.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode a JSON response
    pub(crate) async fn request<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        bearer: Option<&str>,
        body: Body<'_, B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments);
        let idempotent = method == Method::GET;
        let build = || -> RequestBuilder {
            let mut builder = self.client.request(method.clone(), url.clone());
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(token) = bearer {
                builder = builder.bearer_auth(token);
            }
            match &body {
                Body::None => builder,
                Body::Json(payload) => builder.json(payload),
                Body::Form(payload) => builder.form(payload),
            }
        };

        let max_attempts = if idempotent { self.max_retries + 1 } else { 1 };
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!("{} {} (attempt {}/{})", method, url.path(), attempt, max_attempts);

            match build().send().await {
                Ok(response) => return Self::decode(response).await,
                Err(e) if attempt < max_attempts && (e.is_connect() || e.is_timeout()) => {
                    let backoff = self.backoff_base_ms * 2u64.pow(attempt - 1);
                    warn!(
                        "{} {} failed ({}), retrying in {}ms",
                        method,
                        url.path(),
                        e,
                        backoff
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    error!("{} {} failed: {}", method, url.path(), e);
                    return Err(ApiError::Transport(e.to_string()));
                }
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }

        // Endpoints answering with an empty body still deserialize into `()`
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

/// Map a non-success response to an `ApiError`
///
/// Understands the backend's `{"detail": "..."}` and
/// `{"detail": [{"loc", "msg", "type"}]}` shapes, plus `{"message": ...}`.
pub fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();

    if let Some(details) = json
        .as_ref()
        .and_then(|v| v.get("detail"))
        .filter(|d| d.is_array())
        .and_then(|d| serde_json::from_value::<Vec<ValidationDetail>>(d.clone()).ok())
    {
        if status != StatusCode::UNAUTHORIZED {
            return ApiError::Validation(details);
        }
    }

    let message = json
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| truncate_text(body.trim(), 200));

    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized(message);
    }

    ApiError::Status {
        status_code: status.as_u16(),
        message,
    }
}

fn extract_message(value: &serde_json::Value) -> Option<String> {
    let candidates = [
        value.get("detail"),
        value.get("message"),
        value.get("message").and_then(|m| m.get("details")),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
