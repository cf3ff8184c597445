//! Configuration Module
//!
//! Handles loading and managing toolkit configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::str::FromStr;

/// Toolkit configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub server_host: IpAddr,
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in milliseconds for cached RubyGems responses
    pub gems_cache_ttl_ms: u64,
    /// Default TTL in milliseconds for cached generator listings and help
    pub generators_cache_ttl_ms: u64,
    /// Bypass both response caches entirely
    pub cache_disabled: bool,
    /// RubyGems API base URL
    pub rubygems_url: String,
    /// Rails project the generators run in
    pub rails_project_path: PathBuf,
    /// Rails executable, optionally followed by leading arguments
    pub rails_command: String,
    /// Timeout in seconds for RubyGems requests
    pub http_timeout_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Bind address (default: 127.0.0.1)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GEMS_CACHE_TTL_MS` - RubyGems cache TTL (default: 300000)
    /// - `GENERATORS_CACHE_TTL_MS` - Generators cache TTL (default: 600000)
    /// - `CACHE_DISABLED` - `1`, `true` or `yes` disables caching (default: false)
    /// - `RUBYGEMS_URL` - RubyGems base URL (default: https://rubygems.org)
    /// - `RAILS_PROJECT_PATH` - Rails project directory (default: .)
    /// - `RAILS_COMMAND` - Rails executable (default: bin/rails)
    /// - `HTTP_TIMEOUT_SECS` - RubyGems request timeout (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            server_host: parse_var(&lookup, "SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var(&lookup, "SERVER_PORT").unwrap_or(defaults.server_port),
            gems_cache_ttl_ms: parse_var(&lookup, "GEMS_CACHE_TTL_MS")
                .unwrap_or(defaults.gems_cache_ttl_ms),
            generators_cache_ttl_ms: parse_var(&lookup, "GENERATORS_CACHE_TTL_MS")
                .unwrap_or(defaults.generators_cache_ttl_ms),
            cache_disabled: lookup("CACHE_DISABLED")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.cache_disabled),
            rubygems_url: lookup("RUBYGEMS_URL").unwrap_or(defaults.rubygems_url),
            rails_project_path: lookup("RAILS_PROJECT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.rails_project_path),
            rails_command: lookup("RAILS_COMMAND")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.rails_command),
            http_timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS")
                .unwrap_or(defaults.http_timeout_secs),
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            server_port: 3000,
            gems_cache_ttl_ms: 300_000,
            generators_cache_ttl_ms: 600_000,
            cache_disabled: false,
            rubygems_url: "https://rubygems.org".to_string(),
            rails_project_path: PathBuf::from("."),
            rails_command: "bin/rails".to_string(),
            http_timeout_secs: 30,
        }
    }
}
