//! Habit CRUD and the completion toggle.
//!
//! All routes here require a bearer token; the token's subject is the owner
//! for every operation, so a client can never act on another user's habits.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use oasis_habits::{HabitUpdate, NewHabit};
use oasis_schedule::RepetitionKind;

use crate::app::AppState;
use crate::auth::authenticate;
use crate::response::{created, success, ApiError};

#[derive(Deserialize)]
pub struct HabitRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category_id: String,
    #[serde(default)]
    pub repeats: bool,
    #[serde(default)]
    pub repetition: Option<String>,
}

/// Validate the repeats/repetition pair. The calculator only ever sees a
/// kind from the closed enumeration; anything else is rejected here.
fn validated_repetition(
    repeats: bool,
    repetition: Option<&str>,
) -> Result<Option<RepetitionKind>, ApiError> {
    if !repeats {
        return Ok(None);
    }
    match repetition {
        Some(raw) => raw
            .parse::<RepetitionKind>()
            .map(Some)
            .map_err(|_| ApiError::bad_request("Repetition must be daily, weekly or monthly")),
        None => Err(ApiError::bad_request(
            "Repetition is required for a repeating habit",
        )),
    }
}

/// POST /api/habits
pub async fn create_habit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<HabitRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if req.category_id.trim().is_empty() {
        return Err(ApiError::bad_request("Category is required"));
    }
    let repetition = validated_repetition(req.repeats, req.repetition.as_deref())?;

    let category = state
        .categories
        .get(&req.category_id)?
        .ok_or_else(|| ApiError::bad_request("Category not found"))?;
    if category.user_id != claims.sub {
        return Err(ApiError::forbidden("Category belongs to another user"));
    }

    let habit = state.habits.create(
        NewHabit {
            title: req.title.trim().to_string(),
            description: req.description,
            category_id: req.category_id,
            repeats: repetition.is_some(),
            repetition,
            user_id: claims.sub,
        },
        Utc::now().date_naive(),
    )?;

    Ok(created(json!({ "message": "Habit created", "habit": habit })))
}

/// GET /api/habits/user/{user_id}
pub async fn list_habits(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if claims.sub != user_id {
        return Err(ApiError::forbidden("You can only list your own habits"));
    }
    let habits = state.habits.list_for_user(&user_id)?;
    Ok(success(json!(habits)))
}

/// GET /api/habits/{id}
pub async fn get_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    let habit = state
        .habits
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Habit not found"))?;
    if habit.user_id != claims.sub {
        return Err(ApiError::forbidden("Habit belongs to another user"));
    }
    Ok(success(json!(habit)))
}

/// PUT /api/habits/{id}
pub async fn update_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<HabitRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    if req.category_id.trim().is_empty() {
        return Err(ApiError::bad_request("Category is required"));
    }
    let repetition = validated_repetition(req.repeats, req.repetition.as_deref())?;

    let existing = state
        .habits
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Habit not found"))?;
    if existing.user_id != claims.sub {
        return Err(ApiError::forbidden("Habit belongs to another user"));
    }

    // Same category guard as creation — a PUT must not move a habit into a
    // missing category or another user's.
    let category = state
        .categories
        .get(&req.category_id)?
        .ok_or_else(|| ApiError::bad_request("Category not found"))?;
    if category.user_id != claims.sub {
        return Err(ApiError::forbidden("Category belongs to another user"));
    }

    let habit = state.habits.update(
        &id,
        HabitUpdate {
            title: req.title.trim().to_string(),
            description: req.description,
            category_id: req.category_id,
            repeats: repetition.is_some(),
            repetition,
        },
        Utc::now().date_naive(),
    )?;
    Ok(success(json!({ "message": "Habit updated", "habit": habit })))
}

/// DELETE /api/habits/{id}
pub async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    let habit = state
        .habits
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Habit not found"))?;
    if habit.user_id != claims.sub {
        return Err(ApiError::forbidden("Habit belongs to another user"));
    }
    state.habits.delete(&id)?;
    Ok(success(json!({ "message": "Habit deleted" })))
}

/// POST /api/habits/{id}/toggle
pub async fn toggle_habit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    let habit = state
        .habits
        .get(&id)?
        .ok_or_else(|| ApiError::not_found("Habit not found"))?;
    if habit.user_id != claims.sub {
        return Err(ApiError::forbidden("Habit belongs to another user"));
    }
    let habit = state.habits.toggle(&id, Utc::now().date_naive())?;
    Ok(success(json!({ "message": "Habit toggled", "habit": habit })))
}
