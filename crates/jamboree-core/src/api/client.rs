//! HTTP client for the inventory backend.
//!
//! `ApiClient` wraps a pooled `reqwest::Client` and the configured base URL.
//! It does no retrying; a failed request is reported once and the caller
//! decides what to show.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, multipart, Client, Response};
use serde_json::Value;
use tracing::debug;

use super::{ApiError, Backend};

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither config nor environment provide one
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the inventory backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Read a JSON body; an empty body (204, or a bare 201) decodes as `null`.
    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, params = query.len(), "GET");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self.client.post(&url).json(&body).send().await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "PUT");

        let response = self.client.put(&url).json(&body).send().await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(url = %url, "DELETE");

        let response = self.client.delete(&url).send().await?;

        Self::check_response(response).await?;
        Ok(())
    }

    async fn upload(
        &self,
        path: &str,
        field: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, file = %file_name, size = bytes.len(), "POST multipart");

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part(field, part);

        let response = self.client.post(&url).multipart(form).send().await?;

        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = ApiClient::new("http://localhost:8001/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8001");
        assert_eq!(api.url("/api/items"), "http://localhost:8001/api/items");
    }
}
