//! Core library for the jamboree gear and roster manager.
//!
//! This crate holds everything that does not touch the terminal:
//!
//! - `api`: REST client for the inventory backend and the `Backend` seam
//! - `models`: items, leaders, scouts and the group/category lookups
//! - `sync`: snapshot stores, filter views, edit sessions, the mutation
//!   dispatcher and per-page state
//! - `auth`: the scout page gate
//! - `config`: user configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod sync;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, Backend};
pub use config::Config;
