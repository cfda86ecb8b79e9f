//! Signup, login, and profile updates.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use oasis_users::{NewUser, ProfileUpdate, PublicUser};

use crate::app::AppState;
use crate::auth::{authenticate, issue_token};
use crate::http::{is_valid_email, parse_date};
use crate::response::{created, success, ApiError};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub birth_date: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

/// POST /api/signup — register a user and seed their default categories.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    if req.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    if let Some(ref birth_date) = req.birth_date {
        if parse_date(birth_date).is_none() {
            return Err(ApiError::bad_request(
                "Invalid birth date (format: YYYY-MM-DD)",
            ));
        }
    }

    let user = state.users.create(NewUser {
        name: req.name.trim().to_string(),
        email: req.email,
        password: req.password,
        birth_date: req.birth_date,
        age: req.age,
        gender: req.gender,
    })?;
    state.categories.seed_defaults(&user.id)?;

    Ok(created(json!({
        "message": "User created",
        "user": PublicUser::from(&user),
    })))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/login — verify credentials and issue a JWT.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::bad_request("Invalid email"));
    }
    if req.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }

    let user = state.users.authenticate(&req.email, &req.password)?;

    let token = issue_token(
        &state.config.auth.secret,
        state.config.auth.token_ttl_days,
        &user.id,
        &user.email,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "token signing failed");
        ApiError::internal("Internal server error")
    })?;

    info!(user_id = %user.id, "login");
    Ok(success(json!({
        "token": token,
        "user": PublicUser::from(&user),
    })))
}

/// Partial update body. Absent fields stay untouched; explicit nulls clear
/// the optional profile fields (hence the nested Options — serde needs the
/// custom deserializer to tell "absent" from "null").
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub birth_date: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub age: Option<Option<u32>>,
    #[serde(deserialize_with = "nullable")]
    pub gender: Option<Option<String>>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// PUT /api/users/{id} — update the authenticated user's own profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Response, ApiError> {
    let claims = authenticate(&state.config.auth.secret, &headers)?;
    if claims.sub != id {
        return Err(ApiError::forbidden("You can only update your own profile"));
    }

    if let Some(ref email) = req.email {
        if !is_valid_email(email) {
            return Err(ApiError::bad_request("Invalid email"));
        }
    }
    if let Some(ref password) = req.password {
        if password.len() < 6 {
            return Err(ApiError::bad_request(
                "Password must be at least 6 characters",
            ));
        }
    }
    if let Some(Some(ref birth_date)) = req.birth_date {
        if parse_date(birth_date).is_none() {
            return Err(ApiError::bad_request(
                "Invalid birth date (format: YYYY-MM-DD)",
            ));
        }
    }

    let update = ProfileUpdate {
        name: req.name,
        email: req.email,
        password: req.password,
        birth_date: req.birth_date,
        age: req.age,
        gender: req.gender,
    };
    if update.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let user = state.users.update_profile(&id, update)?;
    Ok(success(json!({
        "message": "Profile updated",
        "user": PublicUser::from(&user),
    })))
}
