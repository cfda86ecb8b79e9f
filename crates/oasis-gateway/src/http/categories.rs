//! Category endpoints. Creation and deletion are owner-scoped through the
//! bearer token; listings are read-only.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::app::AppState;
use crate::auth::authenticate;
use crate::response::{created, success, ApiError};

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub emoji: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ListFilter {
    pub user_id: Option<String>,
}

/// GET /api/categories — all categories, optionally `?user_id=` filtered.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ListFilter>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authenticate(&state.config.auth.secret, &headers)?;
    let categories = state.categories.list(filter.user_id.as_deref())?;
    Ok(success(json!(categories)))
}

/// GET /api/categories/user/{user_id}
pub async fn list_user_categories(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authenticate(&state.config.auth.secret, &headers)?;
    let categories = state.categories.list(Some(&user_id))?;
    Ok(success(json!(categories)))
}

/// GET /api/categories/{id}
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    authenticate(&state.config.auth.secret, &headers)?;
    let category = state
        .categories
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(success(json!(category)))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if req.emoji.trim().is_empty() {
        return Err(ApiError::bad_request("Emoji is required"));
    }
    let category = state
        .categories
        .create(req.name.trim(), req.emoji.trim(), &claims.sub)?;
    Ok(created(json!({
        "message": "Category created",
        "category": category,
    })))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<CategoryRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if req.emoji.trim().is_empty() {
        return Err(ApiError::bad_request("Emoji is required"));
    }

    let existing = state
        .categories
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    if existing.user_id != claims.sub {
        return Err(ApiError::forbidden("Category belongs to another user"));
    }

    let category = state
        .categories
        .update(&id, req.name.trim(), req.emoji.trim())?;
    Ok(success(json!({
        "message": "Category updated",
        "category": category,
    })))
}

/// DELETE /api/categories/{id} — refused while habits still reference it.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    state.categories.delete(&id, &claims.sub)?;
    Ok(success(json!({ "message": "Category deleted" })))
}
