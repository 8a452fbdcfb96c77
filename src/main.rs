use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use lostfound_api::config;
use lostfound_api::database;
use lostfound_api::handlers::{protected, public};
use lostfound_api::middleware::authenticate_user;
use lostfound_api::services::blob::{BlobStore, HttpBlobStore};
use lostfound_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting lost & found API in {:?} mode", config.environment);

    let pool = database::connect_pool(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
    database::run_migrations(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to run migrations: {}", e));

    let blob: Arc<dyn BlobStore> =
        Arc::new(HttpBlobStore::new(&config.blob).expect("blob store client"));

    let app = app(AppState { pool, blob });

    // Allow tests or deployments to override port via env
    let port = std::env::var("LOSTFOUND_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("lost & found API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        // Protected API
        .merge(item_routes())
        .merge(user_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config::config().api.max_request_size_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use axum::routing::post;
    use public::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", get(auth::logout))
}

fn item_routes() -> Router<AppState> {
    use axum::routing::patch;
    use protected::items;

    Router::new()
        // Collection-level operations
        .route(
            "/api/v1/items",
            get(items::get_all_items).post(items::create_item),
        )
        .route("/api/v1/items/my-items", get(items::get_user_items))
        // Claim is a distinct, narrower mutation path than update
        .route("/api/v1/items/claim/:id", patch(items::claim_item))
        // Record-level operations
        .route(
            "/api/v1/items/:id",
            get(items::get_single_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route_layer(axum::middleware::from_fn(authenticate_user))
}

fn user_routes() -> Router<AppState> {
    use axum::routing::patch;
    use protected::user;

    Router::new()
        .route("/api/v1/users/current-user", get(user::current_user))
        .route("/api/v1/users/update-user", patch(user::update_user))
        .route_layer(axum::middleware::from_fn(authenticate_user))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Lost & Found API",
        "version": version,
        "description": "Campus lost and found item tracking API",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/v1/auth/register, /api/v1/auth/login, /api/v1/auth/logout (public)",
            "items": "/api/v1/items[/:id], /api/v1/items/my-items, /api/v1/items/claim/:id (protected)",
            "users": "/api/v1/users/current-user, /api/v1/users/update-user (protected)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
