use async_trait::async_trait;
use serde_json::Value;

use super::ApiError;

/// The REST surface the sync layer depends on.
///
/// Paths are absolute on the backend (`/api/items`, `/api/items/7`). Bodies
/// travel as JSON values; typed encoding and decoding happens in
/// [`crate::sync::Dispatcher`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET path?query`
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value, ApiError>;

    /// `POST path` with a JSON body
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// `PUT path` with a JSON body
    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// `DELETE path`
    async fn delete(&self, path: &str) -> Result<(), ApiError>;

    /// Multipart `POST path` carrying a single file field
    async fn upload(
        &self,
        path: &str,
        field: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError>;
}
