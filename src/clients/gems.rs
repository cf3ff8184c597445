//! RubyGems Client
//!
//! Typed access to the RubyGems JSON API with every read served through the
//! client's own response cache.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::cache::{generate_key, ResponseCache};
use crate::config::Config;
use crate::error::{Error, Result};

// == Payload Types ==
/// Search hit as returned by `/api/v1/search.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemSummary {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub project_uri: Option<String>,
}

/// One published release from `/api/v1/versions/NAME.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemVersion {
    pub number: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub downloads_count: u64,
    #[serde(default)]
    pub ruby_version: Option<String>,
}

/// A declared dependency on another gem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemDependency {
    pub name: String,
    pub requirements: String,
}

/// Runtime and development dependencies of a gem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GemDependencies {
    #[serde(default)]
    pub runtime: Vec<GemDependency>,
    #[serde(default)]
    pub development: Vec<GemDependency>,
}

/// Gem metadata from `/api/v1/gems/NAME.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemDetails {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub licenses: Option<Vec<String>>,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub version_downloads: u64,
    #[serde(default)]
    pub homepage_uri: Option<String>,
    #[serde(default)]
    pub source_code_uri: Option<String>,
    #[serde(default)]
    pub documentation_uri: Option<String>,
    #[serde(default)]
    pub dependencies: GemDependencies,
}

// == Cached Payload ==
/// Everything the gems client caches, tagged by operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GemPayload {
    Search(Vec<GemSummary>),
    Versions(Vec<GemVersion>),
    Details(Box<GemDetails>),
    ReverseDependencies(Vec<String>),
}

impl GemPayload {
    /// Operation name, also used as the cache key prefix.
    pub fn kind(&self) -> &'static str {
        match self {
            GemPayload::Search(_) => "search",
            GemPayload::Versions(_) => "versions",
            GemPayload::Details(_) => "details",
            GemPayload::ReverseDependencies(_) => "reverse_dependencies",
        }
    }
}

// == Gems Client ==
/// RubyGems API client owning its response cache.
#[derive(Debug, Clone)]
pub struct GemsClient {
    http: Client,
    base_url: String,
    cache: ResponseCache<GemPayload>,
}

impl GemsClient {
    /// Creates a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("rails_toolkit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let cache =
            ResponseCache::new(config.gems_cache_ttl_ms).enabled(!config.cache_disabled);
        Ok(Self::new(http, &config.rubygems_url, cache))
    }

    /// Creates a client from its parts.
    pub fn new(http: Client, base_url: &str, cache: ResponseCache<GemPayload>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    pub fn cache(&self) -> &ResponseCache<GemPayload> {
        &self.cache
    }

    // == Search ==
    /// Searches gems by name or description.
    pub async fn search(&self, query: &str) -> Result<Vec<GemSummary>> {
        let key = generate_key("search", json!({ "query": query }).as_object())?;
        let url = format!("{}/api/v1/search.json", self.base_url);

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                let request = self.http.get(&url).query(&[("query", query)]);
                self.fetch_json(request, query).await.map(GemPayload::Search)
            })
            .await?;

        match payload {
            GemPayload::Search(hits) => Ok(hits),
            other => Err(mismatch(key, &other)),
        }
    }

    // == Versions ==
    /// Lists every published version of a gem, newest first.
    pub async fn versions(&self, name: &str) -> Result<Vec<GemVersion>> {
        let key = generate_key("versions", json!({ "name": name }).as_object())?;
        let url = format!("{}/api/v1/versions/{}.json", self.base_url, name);

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                self.fetch_json(self.http.get(&url), name)
                    .await
                    .map(GemPayload::Versions)
            })
            .await?;

        match payload {
            GemPayload::Versions(versions) => Ok(versions),
            other => Err(mismatch(key, &other)),
        }
    }

    // == Details ==
    /// Fetches metadata for the latest release of a gem.
    pub async fn details(&self, name: &str) -> Result<GemDetails> {
        let key = generate_key("details", json!({ "name": name }).as_object())?;
        let url = format!("{}/api/v1/gems/{}.json", self.base_url, name);

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                self.fetch_json(self.http.get(&url), name)
                    .await
                    .map(|details| GemPayload::Details(Box::new(details)))
            })
            .await?;

        match payload {
            GemPayload::Details(details) => Ok(*details),
            other => Err(mismatch(key, &other)),
        }
    }

    // == Reverse Dependencies ==
    /// Names of gems that depend on `name`.
    pub async fn reverse_dependencies(&self, name: &str) -> Result<Vec<String>> {
        let key = generate_key("reverse_dependencies", json!({ "name": name }).as_object())?;
        let url = format!(
            "{}/api/v1/gems/{}/reverse_dependencies.json",
            self.base_url, name
        );

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                self.fetch_json(self.http.get(&url), name)
                    .await
                    .map(GemPayload::ReverseDependencies)
            })
            .await?;

        match payload {
            GemPayload::ReverseDependencies(names) => Ok(names),
            other => Err(mismatch(key, &other)),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        subject: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "rubygems response");

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("gem '{}'", subject)));
        }
        if !status.is_success() {
            warn!(%status, subject, "rubygems request failed");
            return Err(Error::Upstream(format!(
                "RubyGems returned HTTP {} for '{}'",
                status, subject
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn mismatch(key: String, found: &GemPayload) -> Error {
    Error::PayloadMismatch {
        key,
        found: found.kind(),
    }
}
