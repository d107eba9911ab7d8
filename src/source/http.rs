//! Shared HTTP plumbing for the REST and scrape adapters.
//!
//! Owns the paced GET + status-code translation every adapter needs so the
//! adapters themselves only deal with their native response bodies.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::{ConfigError, SourceError};
use crate::source::limiter::RequestPacer;

/// Fixed per-adapter request timeout.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Maximum number of body bytes carried into a `BadRequest` message.
const ERROR_BODY_LIMIT: usize = 256;

/// A rate-limited HTTP client with adapter-specific default headers.
#[derive(Debug)]
pub(crate) struct SourceHttp {
    client: Client,
    pacer: RequestPacer,
}

impl SourceHttp {
    pub(crate) fn new(
        min_interval: Duration,
        mut headers: HeaderMap,
    ) -> Result<Self, ConfigError> {
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            pacer: RequestPacer::new(min_interval),
        })
    }

    /// Paced GET returning the response once the status line is known good.
    ///
    /// 429 becomes `RateLimited` (with the `Retry-After` hint when the
    /// source provides one), other 4xx become `BadRequest`, and 5xx become
    /// retryable `Transport` errors.
    pub(crate) async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Response, SourceError> {
        self.pacer.pace().await;
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify_transport(url, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(SourceError::RateLimited { retry_after });
        }
        if status.is_client_error() {
            let message = truncated_body(response).await;
            return Err(SourceError::BadRequest {
                status: status.as_u16(),
                message,
            });
        }
        if status.is_server_error() {
            return Err(SourceError::Transport(format!("{url} returned {status}")));
        }

        Ok(response)
    }

    /// Paced GET that deserializes a JSON body.
    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let response = self.get(url, query).await?;
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(url, e))?;
        serde_json::from_str(&body).map_err(|e| SourceError::Format(e.to_string()))
    }

    /// Paced GET that returns the raw body text (scrape path).
    pub(crate) async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String, SourceError> {
        let response = self.get(url, query).await?;
        response
            .text()
            .await
            .map_err(|e| classify_transport(url, e))
    }
}

fn classify_transport(url: &str, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
        }
    } else {
        SourceError::Transport(err.to_string())
    }
}

async fn truncated_body(response: Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > ERROR_BODY_LIMIT {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i < ERROR_BODY_LIMIT)
            .last()
            .map_or(0, |(i, c)| i + c.len_utf8());
        body.truncate(cut);
    }
    body
}
