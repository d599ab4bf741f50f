//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    count_handler, flush_handler, get_handler, health_handler, history_handler, keys_handler,
    page_handler, replay_handler, stats_handler, store_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /store` - Store a value under a generated key
/// - `GET /get/:key` - Retrieve a value (`?as=string|integer|float`)
/// - `GET /page?url=` - Fetch a page through the instrumented cache
/// - `GET /count?url=` - Access count for a page
/// - `GET /history/:op` - Recorded calls to an operation
/// - `GET /replay/:op` - Human-readable call history
/// - `GET /keys?pattern=` - List live keys
/// - `DELETE /flush` - Remove every entry
/// - `GET /stats` - Page cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/store", post(store_handler))
        .route("/get/:key", get(get_handler))
        .route("/page", get(page_handler))
        .route("/count", get(count_handler))
        .route("/history/:op", get(history_handler))
        .route("/replay/:op", get(replay_handler))
        .route("/keys", get(keys_handler))
        .route("/flush", delete(flush_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
