//! Upstream Clients
//!
//! Each client owns a [`ResponseCache`](crate::cache::ResponseCache) and routes
//! every cacheable call through it.
//!
//! # Clients
//! - `GemsClient`: RubyGems JSON API over HTTP
//! - `GeneratorsClient`: `rails generate` subprocesses

pub mod gems;
pub mod generators;

pub use gems::{
    GemDependencies, GemDependency, GemDetails, GemPayload, GemSummary, GemVersion, GemsClient,
};
pub use generators::{
    parse_generator_list, Generator, GeneratorPayload, GeneratorRun, GeneratorsClient,
};
