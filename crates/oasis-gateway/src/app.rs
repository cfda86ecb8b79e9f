use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use oasis_core::OasisConfig;
use oasis_habits::{CategoryStore, HabitStore};
use oasis_journal::JournalStore;
use oasis_users::UserStore;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: OasisConfig,
    pub users: UserStore,
    pub categories: CategoryStore,
    pub habits: HabitStore,
    pub journal: JournalStore,
}

/// Open the database, run all schema migrations, and build the shared state.
///
/// The store handle is constructed here, at process start, and handed to the
/// router explicitly — there is no lazily-initialised global. Each subsystem
/// gets its own connection for thread safety; they all point at the same
/// file.
pub fn init_state(config: OasisConfig) -> anyhow::Result<Arc<AppState>> {
    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = open_db(db_path)?;
    oasis_users::db::init_db(&db)?;
    oasis_habits::db::init_db(&db)?;
    oasis_journal::db::init_db(&db)?;
    info!("database migrations complete");

    let users = UserStore::new(open_db(db_path)?);
    let categories = CategoryStore::new(open_db(db_path)?);
    let habits = HabitStore::new(open_db(db_path)?);
    let journal = JournalStore::new(open_db(db_path)?);

    Ok(Arc::new(AppState {
        config,
        users,
        categories,
        habits,
        journal,
    }))
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    // Same policy as the original deployment: any origin, the four verbs the
    // API uses, JSON bodies and bearer tokens.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/api", get(crate::http::health::api_info_handler))
        .route("/api/signup", post(crate::http::users::signup))
        .route("/api/login", post(crate::http::users::login))
        .route("/api/users/{id}", put(crate::http::users::update_profile))
        .route("/api/insights", get(crate::http::insights::insights_handler))
        .route(
            "/api/habits",
            post(crate::http::habits::create_habit),
        )
        .route(
            "/api/habits/user/{user_id}",
            get(crate::http::habits::list_habits),
        )
        .route(
            "/api/habits/{id}",
            get(crate::http::habits::get_habit)
                .put(crate::http::habits::update_habit)
                .delete(crate::http::habits::delete_habit),
        )
        .route(
            "/api/habits/{id}/toggle",
            post(crate::http::habits::toggle_habit),
        )
        .route(
            "/api/categories",
            get(crate::http::categories::list_categories)
                .post(crate::http::categories::create_category),
        )
        .route(
            "/api/categories/user/{user_id}",
            get(crate::http::categories::list_user_categories),
        )
        .route(
            "/api/categories/{id}",
            get(crate::http::categories::get_category)
                .put(crate::http::categories::update_category)
                .delete(crate::http::categories::delete_category),
        )
        .route("/api/journal", post(crate::http::journal::create_entry))
        .route(
            "/api/journal/user/{user_id}",
            get(crate::http::journal::list_entries),
        )
        .route(
            "/api/journal/user/{user_id}/date/{date}",
            get(crate::http::journal::list_entries_for_date),
        )
        .route(
            "/api/journal/{id}",
            get(crate::http::journal::get_entry)
                .put(crate::http::journal::update_entry)
                .delete(crate::http::journal::delete_entry),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
}

/// Open a connection with the pragmas every handle needs. Foreign-key
/// enforcement is per-connection in SQLite, so each store connection sets it
/// for itself rather than relying on the build's compile-time default.
fn open_db(path: &str) -> rusqlite::Result<rusqlite::Connection> {
    let db = rusqlite::Connection::open(path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(db)
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
