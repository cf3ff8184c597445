//! API Handlers
//!
//! HTTP request handlers for each tool and administrative endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::clients::{
    GemDetails, GemSummary, GemVersion, Generator, GeneratorRun, GeneratorsClient, GemsClient,
};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    validate_name, CacheStatsResponse, GenerateRequest, HealthResponse, InvalidateResponse,
    SearchQuery, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Each client owns its own response cache.
#[derive(Clone)]
pub struct AppState {
    /// RubyGems API client
    pub gems: Arc<GemsClient>,
    /// Rails generators client
    pub generators: Arc<GeneratorsClient>,
}

impl AppState {
    /// Creates a new AppState with the given clients.
    pub fn new(gems: GemsClient, generators: GeneratorsClient) -> Self {
        Self {
            gems: Arc::new(gems),
            generators: Arc::new(generators),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            GemsClient::from_config(config)?,
            GeneratorsClient::from_config(config)?,
        ))
    }
}

fn check_name(kind: &str, name: &str) -> Result<()> {
    match validate_name(kind, name) {
        Some(msg) => Err(Error::InvalidRequest(msg)),
        None => Ok(()),
    }
}

/// Handler for GET /gems/search?query=
pub async fn search_gems_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<GemSummary>>> {
    if let Some(error_msg) = query.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    Ok(Json(state.gems.search(query.query.trim()).await?))
}

/// Handler for GET /gems/:name
pub async fn gem_details_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GemDetails>> {
    check_name("Gem", &name)?;
    Ok(Json(state.gems.details(&name).await?))
}

/// Handler for GET /gems/:name/versions
pub async fn gem_versions_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<GemVersion>>> {
    check_name("Gem", &name)?;
    Ok(Json(state.gems.versions(&name).await?))
}

/// Handler for GET /gems/:name/reverse_dependencies
pub async fn reverse_dependencies_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>> {
    check_name("Gem", &name)?;
    Ok(Json(state.gems.reverse_dependencies(&name).await?))
}

/// Handler for GET /generators
pub async fn list_generators_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Generator>>> {
    Ok(Json(state.generators.list_generators().await?))
}

/// Handler for GET /generators/:name
pub async fn generator_help_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<String> {
    check_name("Generator", &name)?;
    state.generators.generator_help(&name).await
}

/// Handler for POST /generators/:name
///
/// Runs the generator and invalidates the generators cache.
pub async fn run_generator_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GeneratorRun>> {
    check_name("Generator", &name)?;
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let run = state
        .generators
        .run_generator(&name, &req.args, req.pretend)
        .await?;
    Ok(Json(run))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let gems = state.gems.cache();
    let generators = state.generators.cache();

    Json(StatsResponse {
        gems: CacheStatsResponse::new(gems.is_enabled(), &gems.stats().await),
        generators: CacheStatsResponse::new(generators.is_enabled(), &generators.stats().await),
    })
}

/// Handler for DELETE /cache
///
/// Drops every entry from both caches.
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let gems = state.gems.cache();
    let generators = state.generators.cache();

    let removed = gems.len().await + generators.len().await;
    gems.clear().await;
    generators.clear().await;

    Json(InvalidateResponse::cleared(removed))
}

/// Handler for POST /cache/purge
///
/// Drops only stale entries from both caches.
pub async fn purge_cache_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.gems.cache().purge_expired().await
        + state.generators.cache().purge_expired().await;

    Json(InvalidateResponse::purged(removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
