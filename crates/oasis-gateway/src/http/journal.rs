//! Journal endpoints. Entries are free-form text pinned to a calendar date;
//! a user may write several entries on the same day.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::auth::authenticate;
use crate::http::parse_date;
use crate::response::{created, success, ApiError};

#[derive(Deserialize)]
pub struct EntryRequest {
    pub content: String,
    pub entry_date: String,
}

fn validate(req: &EntryRequest) -> Result<(), ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::bad_request("Content is required"));
    }
    if parse_date(&req.entry_date).is_none() {
        return Err(ApiError::bad_request(
            "Invalid entry date (format: YYYY-MM-DD)",
        ));
    }
    Ok(())
}

/// POST /api/journal
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<EntryRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    validate(&req)?;
    let entry = state
        .journal
        .create(req.content.trim(), &req.entry_date, &claims.sub)?;
    Ok(created(json!({ "message": "Entry created", "entry": entry })))
}

/// GET /api/journal/user/{user_id}
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if claims.sub != user_id {
        return Err(ApiError::forbidden("You can only list your own entries"));
    }
    let entries = state.journal.list_for_user(&user_id)?;
    Ok(success(json!(entries)))
}

/// GET /api/journal/user/{user_id}/date/{date}
pub async fn list_entries_for_date(
    State(state): State<Arc<AppState>>,
    Path((user_id, date)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if claims.sub != user_id {
        return Err(ApiError::forbidden("You can only list your own entries"));
    }
    if parse_date(&date).is_none() {
        return Err(ApiError::bad_request("Invalid date (format: YYYY-MM-DD)"));
    }
    let entries = state.journal.list_for_date(&user_id, &date)?;
    Ok(success(json!(entries)))
}

/// GET /api/journal/{id}
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    let entry = state
        .journal
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Entry not found"))?;
    if entry.user_id != claims.sub {
        return Err(ApiError::forbidden("Entry belongs to another user"));
    }
    Ok(success(json!(entry)))
}

/// PUT /api/journal/{id}
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<EntryRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    validate(&req)?;

    let existing = state
        .journal
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Entry not found"))?;
    if existing.user_id != claims.sub {
        return Err(ApiError::forbidden("Entry belongs to another user"));
    }

    let entry = state
        .journal
        .update(&id, req.content.trim(), &req.entry_date)?;
    Ok(success(json!({ "message": "Entry updated", "entry": entry })))
}

/// DELETE /api/journal/{id}
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    state.journal.delete(&id, &claims.sub)?;
    Ok(success(json!({ "message": "Entry deleted" })))
}
