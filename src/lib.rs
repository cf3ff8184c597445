//! Rails Toolkit - RubyGems and Rails generator tools
//!
//! Exposes RubyGems lookups and `rails generate` as JSON tools. Every
//! upstream call goes through a per-client response cache with TTL expiry.

pub mod api;
pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;

pub use api::{create_router, AppState};
pub use cache::{generate_key, CacheStore, ResponseCache};
pub use config::Config;
pub use error::{Error, Result};
