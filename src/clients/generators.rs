//! Rails Generators Client
//!
//! Runs `rails generate` in a project directory. Listing and help output are
//! cached; running a generator is never cached and invalidates the cache.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde::Serialize;
use serde_json::json;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::cache::{generate_key, ResponseCache};
use crate::config::Config;
use crate::error::{Error, Result};

/// Line that precedes the generator listing in `rails generate --help`.
const LISTING_MARKER: &str = "Please choose a generator below.";

// == Payload Types ==
/// A generator and the group it is listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generator {
    pub name: String,
    pub group: String,
}

/// Captured output of a generator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorRun {
    pub generator: String,
    pub pretend: bool,
    pub stdout: String,
    pub stderr: String,
}

// == Cached Payload ==
/// Everything the generators client caches, tagged by operation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorPayload {
    Listing(Vec<Generator>),
    Help(String),
}

impl GeneratorPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            GeneratorPayload::Listing(_) => "list_generators",
            GeneratorPayload::Help(_) => "generator_help",
        }
    }
}

// == Generators Client ==
/// Subprocess client for the Rails code generators of one project.
#[derive(Debug, Clone)]
pub struct GeneratorsClient {
    /// Program followed by any fixed leading arguments
    command: Vec<String>,
    project_path: PathBuf,
    cache: ResponseCache<GeneratorPayload>,
}

impl GeneratorsClient {
    /// Creates a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let command: Vec<String> = config
            .rails_command
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let cache = ResponseCache::new(config.generators_cache_ttl_ms)
            .enabled(!config.cache_disabled);
        Self::new(command, &config.rails_project_path, cache)
    }

    /// Creates a client running `command` inside `project_path`.
    pub fn new(
        command: Vec<String>,
        project_path: impl AsRef<Path>,
        cache: ResponseCache<GeneratorPayload>,
    ) -> Result<Self> {
        if command.is_empty() {
            return Err(Error::InvalidRequest("rails command cannot be empty".to_string()));
        }
        Ok(Self {
            command,
            project_path: project_path.as_ref().to_path_buf(),
            cache,
        })
    }

    pub fn cache(&self) -> &ResponseCache<GeneratorPayload> {
        &self.cache
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    // == List Generators ==
    /// Lists the generators available in the project.
    pub async fn list_generators(&self) -> Result<Vec<Generator>> {
        let key = generate_key("list_generators", None)?;

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                let stdout = self.run(&["generate", "--help"]).await?.stdout;
                Ok::<_, Error>(GeneratorPayload::Listing(parse_generator_list(&stdout)))
            })
            .await?;

        match payload {
            GeneratorPayload::Listing(generators) => Ok(generators),
            other => Err(mismatch(key, &other)),
        }
    }

    // == Generator Help ==
    /// Returns the help text of one generator.
    pub async fn generator_help(&self, name: &str) -> Result<String> {
        let key = generate_key("generator_help", json!({ "name": name }).as_object())?;

        let payload = self
            .cache
            .get_or_fetch(&key, None, || async {
                let stdout = self.run(&["generate", name, "--help"]).await?.stdout;
                Ok::<_, Error>(GeneratorPayload::Help(stdout))
            })
            .await?;

        match payload {
            GeneratorPayload::Help(text) => Ok(text),
            other => Err(mismatch(key, &other)),
        }
    }

    // == Run Generator ==
    /// Runs a generator. With `pretend`, Rails only reports what it would do.
    ///
    /// A successful real run may add generators or change their help, so
    /// the cache is cleared afterwards. Pretend runs and failed runs leave
    /// it untouched.
    pub async fn run_generator(
        &self,
        name: &str,
        args: &[String],
        pretend: bool,
    ) -> Result<GeneratorRun> {
        let mut argv: Vec<&str> = vec!["generate", name];
        argv.extend(args.iter().map(String::as_str));
        if pretend {
            argv.push("--pretend");
        }

        let output = self.run(&argv).await?;
        if pretend {
            info!(generator = name, "pretend run finished");
        } else {
            self.cache.clear().await;
            info!(generator = name, "generator finished, cache cleared");
        }

        Ok(GeneratorRun {
            generator: name.to_string(),
            pretend,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| Error::InvalidRequest("rails command cannot be empty".to_string()))?;
        debug!(program = %program, ?args, dir = %self.project_path.display(), "running rails command");

        let output = Command::new(program)
            .args(leading)
            .args(args)
            .current_dir(&self.project_path)
            .stdin(Stdio::null())
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(status = %output.status, "rails command failed");
            return Err(Error::Command {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}

struct CommandOutput {
    stdout: String,
    stderr: String,
}

fn mismatch(key: String, found: &GeneratorPayload) -> Error {
    Error::PayloadMismatch {
        key,
        found: found.kind(),
    }
}

// == Listing Parser ==
/// Extracts generators from `rails generate --help` output.
///
/// After the listing marker, an unindented line ending in `:` opens a group
/// and each indented line names a generator in that group.
pub fn parse_generator_list(output: &str) -> Vec<Generator> {
    let mut generators = Vec::new();
    let mut group: Option<String> = None;

    let listing = output
        .lines()
        .skip_while(|line| !line.trim().starts_with(LISTING_MARKER))
        .skip(1);

    for line in listing {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented {
            group = trimmed.strip_suffix(':').map(str::to_string);
            continue;
        }

        if let Some(group) = &group {
            generators.push(Generator {
                name: trimmed.to_string(),
                group: group.clone(),
            });
        }
    }

    generators
}
