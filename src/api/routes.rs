//! API Routes
//!
//! Configures the Axum router with all tool and administrative endpoints.

use axum::{
    http::Method,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, gem_details_handler, gem_versions_handler, generator_help_handler,
    health_handler, list_generators_handler, purge_cache_handler, reverse_dependencies_handler,
    run_generator_handler, search_gems_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /gems/search?query=` - Search gems
/// - `GET /gems/:name` - Gem details
/// - `GET /gems/:name/versions` - Published versions
/// - `GET /gems/:name/reverse_dependencies` - Dependent gems
/// - `GET /generators` - Available Rails generators
/// - `GET /generators/:name` - Generator help text
/// - `POST /generators/:name` - Run a generator (clears the generators cache)
/// - `DELETE /cache` - Clear both caches
/// - `POST /cache/purge` - Remove expired entries from both caches
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Cross-origin reads only; browsers never get a preflight
///   approval for the endpoints that run generators or drop cache entries
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/gems/search", get(search_gems_handler))
        .route("/gems/:name", get(gem_details_handler))
        .route("/gems/:name/versions", get(gem_versions_handler))
        .route(
            "/gems/:name/reverse_dependencies",
            get(reverse_dependencies_handler),
        )
        .route("/generators", get(list_generators_handler))
        .route(
            "/generators/:name",
            get(generator_help_handler).post(run_generator_handler),
        )
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/purge", post(purge_cache_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
