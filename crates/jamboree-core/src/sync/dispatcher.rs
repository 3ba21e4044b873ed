//! Typed requests against the backend.
//!
//! The dispatcher turns models into JSON and back. It never touches page
//! state; callers decide what a success or failure means for the screen,
//! usually "refresh the collection" or "put the error in the status line".

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, Backend};
use crate::models::{Category, Collection, Deletable, Group, Resource, Scout, ValidationError};

/// Path of the roster CSV import endpoint
const SCOUT_CSV_PATH: &str = "/api/scouts/upload-csv";

/// Multipart field name the backend reads the CSV from
const SCOUT_CSV_FIELD: &str = "file";

/// Message shown when the backend accepts an upload without saying anything
const DEFAULT_UPLOAD_MESSAGE: &str = "Upload complete";

#[derive(Error, Debug)]
pub enum MutationError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

// ============================================================================
// Delete confirmation
// ============================================================================

/// A delete the user has asked for but not yet confirmed.
///
/// Dropping it is the cancel path; nothing is sent.
#[derive(Debug)]
pub struct DeleteRequest<T> {
    id: i64,
    _kind: PhantomData<fn() -> T>,
}

impl<T> DeleteRequest<T> {
    pub fn id(&self) -> i64 {
        self.id
    }
}

impl<T: Deletable> DeleteRequest<T> {
    pub fn new(id: i64) -> Self {
        Self { id, _kind: PhantomData }
    }

    pub fn confirm(self) -> ConfirmedDelete<T> {
        ConfirmedDelete { id: self.id, _kind: PhantomData }
    }
}

/// A delete the user confirmed. Only obtainable from [`DeleteRequest::confirm`].
#[derive(Debug)]
pub struct ConfirmedDelete<T> {
    id: i64,
    _kind: PhantomData<fn() -> T>,
}

impl<T> ConfirmedDelete<T> {
    pub fn id(&self) -> i64 {
        self.id
    }
}

// ============================================================================
// CSV upload
// ============================================================================

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Result of a roster CSV import, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub message: String,
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Sends fetches and mutations through a [`Backend`].
/// Clone is cheap; the backend is shared.
pub struct Dispatcher<B> {
    backend: Arc<B>,
}

impl<B> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend) }
    }
}

impl<B: Backend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend: Arc::new(backend) }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Fetch a whole collection.
    pub async fn fetch<T: Collection>(&self, query: &T::Query) -> Result<Vec<T>, ApiError> {
        let params = T::query_params(query);
        let value = self.backend.get(T::PATH, &params).await?;
        let rows: Vec<T> = serde_json::from_value(value)?;
        debug!(collection = T::LABEL, count = rows.len(), "Fetched");
        Ok(rows)
    }

    /// Fetch both lookups concurrently.
    pub async fn fetch_lookups(&self) -> (Result<Vec<Group>, ApiError>, Result<Vec<Category>, ApiError>) {
        futures::join!(self.fetch::<Group>(&()), self.fetch::<Category>(&()))
    }

    /// Validate and create a row. Returns the created row when the backend
    /// echoes it back.
    pub async fn create<T: Resource>(&self, draft: &T::Draft) -> Result<Option<T>, MutationError> {
        T::validate(draft)?;

        let body = serde_json::to_value(draft).map_err(ApiError::from)?;
        let value = self.backend.post(T::PATH, body).await?;
        info!(collection = T::LABEL, "Created");

        if value.is_null() {
            return Ok(None);
        }
        match serde_json::from_value::<T>(value) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                warn!(collection = T::LABEL, error = %e, "Create succeeded but response did not decode");
                Ok(None)
            }
        }
    }

    /// Validate and send an edit draft for one row.
    pub async fn update<T: Resource>(&self, id: i64, patch: &T::Patch) -> Result<(), MutationError> {
        T::validate_patch(patch)?;

        let body = serde_json::to_value(patch).map_err(ApiError::from)?;
        let path = format!("{}/{}", T::PATH, id);
        self.backend.put(&path, body).await?;
        info!(collection = T::LABEL, id, "Updated");
        Ok(())
    }

    /// Delete a row the user confirmed.
    pub async fn delete<T: Deletable>(&self, confirmed: ConfirmedDelete<T>) -> Result<(), MutationError> {
        let path = format!("{}/{}", T::PATH, confirmed.id);
        self.backend.delete(&path).await?;
        info!(collection = T::LABEL, id = confirmed.id, "Deleted");
        Ok(())
    }

    /// Upload a roster CSV. Parsing happens on the backend.
    pub async fn upload_scout_csv(&self, file_name: String, bytes: Vec<u8>) -> Result<UploadReport, ApiError> {
        let value = self
            .backend
            .upload(SCOUT_CSV_PATH, SCOUT_CSV_FIELD, file_name, bytes)
            .await?;

        let message = serde_json::from_value::<UploadResponse>(value)
            .ok()
            .and_then(|r| r.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_MESSAGE.to_string());

        info!(collection = Scout::LABEL, message = %message, "CSV uploaded");
        Ok(UploadReport { message })
    }

    /// Read a CSV file from disk and upload it.
    pub async fn upload_scout_csv_file(&self, path: &Path) -> Result<UploadReport, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "roster.csv".to_string());
        self.upload_scout_csv(file_name, bytes).await
    }
}
