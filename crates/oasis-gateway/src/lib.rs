//! `oasis-gateway` — the OASIS HTTP API server.
//!
//! Exposed as a library so integration tests can assemble the full router
//! against a throwaway database; `main.rs` is a thin wrapper.

pub mod app;
pub mod auth;
pub mod http;
pub mod response;

pub use app::{build_router, init_state, AppState};
