//! Integration Tests for the Upstream Clients
//!
//! The gems client talks to a local fake registry; the generators client
//! runs a shell script standing in for `bin/rails`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rails_toolkit::{
    cache::{ManualClock, ResponseCache},
    clients::{GemPayload, GeneratorsClient, GemsClient},
    Error,
};
use serde_json::{json, Value};

// == Fake Registry ==

#[derive(Clone, Default)]
struct Registry {
    calls: Arc<AtomicUsize>,
}

async fn fake_search(
    State(registry): State<Registry>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Json<Value> {
    registry.calls.fetch_add(1, Ordering::SeqCst);
    let query = params.get("query").cloned().unwrap_or_default();
    Json(json!([
        { "name": query, "version": "1.0.0", "info": "fake", "downloads": 10 }
    ]))
}

async fn fake_versions(
    State(registry): State<Registry>,
    Path(file): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    registry.calls.fetch_add(1, Ordering::SeqCst);
    match file.as_str() {
        "rails.json" => Ok(Json(json!([
            { "number": "7.1.3", "platform": "ruby", "prerelease": false },
            { "number": "7.1.0.rc1", "platform": "ruby", "prerelease": true }
        ]))),
        "flaky.json" => Err(StatusCode::SERVICE_UNAVAILABLE),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn fake_details(
    State(registry): State<Registry>,
    Path(file): Path<String>,
) -> Json<Value> {
    registry.calls.fetch_add(1, Ordering::SeqCst);
    let name = file.trim_end_matches(".json");
    Json(json!({
        "name": name,
        "version": "2.0.0",
        "licenses": ["MIT"],
        "dependencies": { "runtime": [], "development": [] }
    }))
}

async fn fake_reverse_dependencies(
    State(registry): State<Registry>,
    Path(_name): Path<String>,
) -> Json<Value> {
    registry.calls.fetch_add(1, Ordering::SeqCst);
    Json(json!(["devise", "sidekiq"]))
}

async fn spawn_registry() -> (String, Registry) {
    let registry = Registry::default();
    let app = Router::new()
        .route("/api/v1/search.json", get(fake_search))
        .route("/api/v1/versions/:file", get(fake_versions))
        .route("/api/v1/gems/:name", get(fake_details))
        .route(
            "/api/v1/gems/:name/reverse_dependencies.json",
            get(fake_reverse_dependencies),
        )
        .with_state(registry.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), registry)
}

fn gems_client(base_url: &str, cache: ResponseCache<GemPayload>) -> GemsClient {
    GemsClient::new(reqwest::Client::new(), base_url, cache)
}

// == Gems Client Tests ==

#[tokio::test]
async fn test_versions_cached_after_first_fetch() {
    let (url, registry) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000));

    let first = client.versions("rails").await.unwrap();
    let second = client.versions("rails").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].number, "7.1.3");
    assert!(first[1].prerelease);
    assert_eq!(registry.calls.load(Ordering::SeqCst), 1);

    let stats = client.cache().stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_distinct_operations_cached_separately() {
    let (url, registry) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000));

    let details = client.details("rack").await.unwrap();
    let dependents = client.reverse_dependencies("rack").await.unwrap();
    client.details("rack").await.unwrap();
    client.reverse_dependencies("rack").await.unwrap();

    assert_eq!(details.name, "rack");
    assert_eq!(dependents, vec!["devise", "sidekiq"]);
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
    assert_eq!(client.cache().len().await, 2);
}

#[tokio::test]
async fn test_search_keys_by_query() {
    let (url, registry) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000));

    let rack = client.search("rack").await.unwrap();
    let puma = client.search("puma").await.unwrap();
    client.search("rack").await.unwrap();

    assert_eq!(rack[0].name, "rack");
    assert_eq!(puma[0].name, "puma");
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let (url, registry) = spawn_registry().await;
    let clock = Arc::new(ManualClock::new(1_000_000));
    let client = gems_client(&url, ResponseCache::with_clock(5_000, clock.clone()));

    client.versions("rails").await.unwrap();
    clock.advance(4_999);
    client.versions("rails").await.unwrap();
    assert_eq!(registry.calls.load(Ordering::SeqCst), 1);

    clock.advance(1);
    client.versions("rails").await.unwrap();
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let (url, registry) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000));

    let first = client.versions("missing").await;
    let second = client.versions("missing").await;

    assert!(matches!(first, Err(Error::NotFound(_))));
    assert!(matches!(second, Err(Error::NotFound(_))));
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_upstream_failure_maps_to_upstream_error() {
    let (url, _) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000));

    let result = client.versions("flaky").await;
    assert!(matches!(result, Err(Error::Upstream(_))));
}

#[tokio::test]
async fn test_disabled_cache_always_fetches() {
    let (url, registry) = spawn_registry().await;
    let client = gems_client(&url, ResponseCache::new(60_000).enabled(false));

    for _ in 0..3 {
        client.versions("rails").await.unwrap();
    }

    assert_eq!(registry.calls.load(Ordering::SeqCst), 3);
    assert!(client.cache().is_empty().await);
}

// == Generators Client Tests ==

/// Shell stand-in for `bin/rails`: `$1` is `generate`, `$2` the generator
/// or `--help`. Every invocation appends a line to `calls.log`.
const FAKE_RAILS: &str = r#"
echo "$@" >> calls.log
if [ "$2" = "--help" ]; then
  printf 'Usage:\n  bin/rails generate GENERATOR\n\nPlease choose a generator below.\n\nRails:\n  controller\n  model\n\nRspec:\n  rspec:model\n'
elif [ "$2" = "broken" ]; then
  echo "Could not find generator 'broken'." >&2
  exit 1
elif [ "$3" = "--help" ]; then
  printf 'Usage:\n  bin/rails generate %s NAME\n' "$2"
else
  echo "create app/models/$3.rb"
fi
"#;

fn project_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "rails_toolkit_{}_{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn generators_client(dir: &std::path::Path) -> GeneratorsClient {
    let command = vec![
        "sh".to_string(),
        "-c".to_string(),
        FAKE_RAILS.to_string(),
        "rails".to_string(),
    ];
    GeneratorsClient::new(command, dir, ResponseCache::new(60_000)).unwrap()
}

fn call_count(dir: &std::path::Path) -> usize {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|log| log.lines().count())
        .unwrap_or(0)
}

#[tokio::test]
async fn test_list_generators_cached() {
    let dir = project_dir("list");
    let client = generators_client(&dir);

    let generators = client.list_generators().await.unwrap();
    client.list_generators().await.unwrap();

    let names: Vec<&str> = generators.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["controller", "model", "rspec:model"]);
    assert_eq!(generators[2].group, "Rspec");
    assert_eq!(call_count(&dir), 1);
}

#[tokio::test]
async fn test_generator_help_cached_per_generator() {
    let dir = project_dir("help");
    let client = generators_client(&dir);

    let model = client.generator_help("model").await.unwrap();
    let controller = client.generator_help("controller").await.unwrap();
    client.generator_help("model").await.unwrap();

    assert!(model.contains("generate model NAME"));
    assert!(controller.contains("generate controller NAME"));
    assert_eq!(call_count(&dir), 2);
}

#[tokio::test]
async fn test_generator_failure_is_command_error() {
    let dir = project_dir("broken");
    let client = generators_client(&dir);

    let err = client.generator_help("broken").await.unwrap_err();
    match err {
        Error::Command { stderr, .. } => assert!(stderr.contains("Could not find generator")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_run_generator_clears_cache() {
    let dir = project_dir("run");
    let client = generators_client(&dir);

    client.list_generators().await.unwrap();
    assert_eq!(client.cache().len().await, 1);

    let run = client
        .run_generator("model", &["post".to_string()], false)
        .await
        .unwrap();

    assert_eq!(run.generator, "model");
    assert!(!run.pretend);
    assert!(run.stdout.contains("create app/models/post.rb"));
    assert!(client.cache().is_empty().await);

    // Listing is fetched again after the run
    client.list_generators().await.unwrap();
    assert_eq!(call_count(&dir), 3);
}

#[tokio::test]
async fn test_pretend_run_keeps_cache() {
    let dir = project_dir("pretend");
    let client = generators_client(&dir);

    client.list_generators().await.unwrap();

    let run = client
        .run_generator("model", &["post".to_string()], true)
        .await
        .unwrap();

    assert!(run.pretend);
    assert_eq!(client.cache().len().await, 1);

    // Listing still served from cache
    client.list_generators().await.unwrap();
    assert_eq!(call_count(&dir), 2);
}

#[tokio::test]
async fn test_failed_run_keeps_cache() {
    let dir = project_dir("failed_run");
    let client = generators_client(&dir);

    client.list_generators().await.unwrap();

    let err = client
        .run_generator("broken", &["post".to_string()], false)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Command { .. }));
    assert_eq!(client.cache().len().await, 1);
    assert!(client.cache().has("list_generators").await);
}
