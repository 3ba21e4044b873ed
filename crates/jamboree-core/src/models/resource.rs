use serde::{de::DeserializeOwned, Serialize};

use super::form::FormFields;
use thiserror::Error;

/// Client-side rejection of a create or update payload before anything is sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Quantity must be at least 1")]
    Quantity,
}

/// A collection the backend serves as a JSON array.
pub trait Collection: DeserializeOwned + Send + Sync + 'static {
    /// Collection path on the backend, e.g. `/api/items`
    const PATH: &'static str;

    /// Short name for logs and status messages
    const LABEL: &'static str;

    /// Filter state for this collection's page
    type Query: Default + Clone + Send + Sync + 'static;

    /// Request parameters sent with the list request. Collections filtered
    /// server-side return their filter here; the rest return nothing.
    fn query_params(_query: &Self::Query) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Rows to display for the current query. Collections filtered
    /// server-side show the whole snapshot.
    fn visible<'a>(rows: &'a [Self], _query: &Self::Query) -> Vec<&'a Self>
    where
        Self: Sized,
    {
        rows.iter().collect()
    }
}

/// A collection whose rows can be created and edited from the client.
pub trait Resource: Collection + Clone {
    /// Create payload
    type Draft: FormFields + Serialize + Default + Clone + Send + Sync + 'static;

    /// Update payload; only set fields are sent
    type Patch: FormFields + Serialize + Default + Clone + Send + Sync + 'static;

    fn id(&self) -> i64;

    /// Check a create payload before it is sent.
    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Check an update payload. Only fields that are set are looked at.
    fn validate_patch(patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Starting draft for an inline edit of this row.
    fn edit_draft(&self) -> Self::Patch;
}

/// Resources the client may hard-delete.
pub trait Deletable: Resource {}

/// Shared helper for required text fields.
pub(crate) fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// Required text field of an update payload; unset passes.
pub(crate) fn require_if_set(value: &Option<String>, field: &'static str) -> Result<(), ValidationError> {
    match value {
        Some(v) => require(v, field),
        None => Ok(()),
    }
}

/// Shared helper for required group references (0 means "not chosen").
pub(crate) fn require_group(group_id: i64) -> Result<(), ValidationError> {
    if group_id <= 0 {
        Err(ValidationError::Required("Group"))
    } else {
        Ok(())
    }
}
