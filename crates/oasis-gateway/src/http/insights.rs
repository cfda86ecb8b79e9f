//! Aggregate counters for the landing dashboard.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::app::AppState;
use crate::response::{success, ApiError};

/// GET /api/insights
pub async fn insights_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let users = state.users.count()?;
    let habits = state.habits.count()?;
    Ok(success(json!({
        "total_users": users,
        "total_habits": habits,
    })))
}
