use axum::Json;
use serde_json::{json, Value};

/// GET /health — liveness probe, returns server metadata.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api — API banner with the endpoint map.
pub async fn api_info_handler() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "OASIS API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/login, /api/signup, /api/users/{id}",
            "habits": "/api/habits",
            "categories": "/api/categories",
            "journal": "/api/journal",
            "insights": "/api/insights",
        },
    }))
}
