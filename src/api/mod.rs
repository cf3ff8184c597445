//! API Module
//!
//! HTTP handlers and routing for the tool API.
//!
//! # Endpoints
//! - `/gems/...` - RubyGems lookups (cached)
//! - `/generators/...` - Rails generator listing, help (cached) and runs
//! - `/cache`, `/cache/purge` - Cache invalidation
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
