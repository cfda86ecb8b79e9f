//! `oasis-core` — configuration and shared error types for the OASIS
//! habit-tracking backend.

pub mod config;
pub mod error;

pub use config::OasisConfig;
pub use error::{OasisError, Result};
