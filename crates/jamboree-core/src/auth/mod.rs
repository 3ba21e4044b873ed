//! Scout page gate.

pub mod gate;

pub use gate::{hash_password, verify_password, ScoutGate};
