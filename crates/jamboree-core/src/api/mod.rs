//! REST API module for the inventory backend.
//!
//! `ApiClient` speaks JSON over HTTP to the backend's `/api/*` endpoints.
//! Everything above this module talks to the `Backend` trait instead, so the
//! sync layer can be driven by an in-memory double in tests.

pub mod backend;
pub mod client;
pub mod error;

pub use backend::Backend;
pub use client::ApiClient;
pub use error::ApiError;
