//! Request DTOs for the tool API
//!
//! Defines incoming query strings and bodies along with their validation.

use serde::Deserialize;

/// Maximum length of a gem or generator name.
pub const MAX_NAME_LENGTH: usize = 128;

/// Maximum length of a search query.
pub const MAX_QUERY_LENGTH: usize = 256;

/// Query string for gem search (GET /gems/search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term
    #[serde(default)]
    pub query: String,
}

impl SearchQuery {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        if self.query.len() > MAX_QUERY_LENGTH {
            return Some(format!(
                "Query exceeds maximum length of {} characters",
                MAX_QUERY_LENGTH
            ));
        }
        None
    }
}

/// Request body for running a generator (POST /generators/:name)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    /// Arguments passed after the generator name
    #[serde(default)]
    pub args: Vec<String>,
    /// Only report what would be generated
    #[serde(default)]
    pub pretend: bool,
}

impl GenerateRequest {
    pub fn validate(&self) -> Option<String> {
        if self.args.iter().any(|arg| arg.contains('\0')) {
            return Some("Arguments cannot contain NUL bytes".to_string());
        }
        None
    }
}

/// Validates a gem or generator name taken from the path.
///
/// Allowed: ASCII letters, digits and `_ . : -`, not starting with `-` and
/// never containing `..`.
pub fn validate_name(kind: &str, name: &str) -> Option<String> {
    if name.is_empty() {
        return Some(format!("{} name cannot be empty", kind));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "{} name exceeds maximum length of {} characters",
            kind, MAX_NAME_LENGTH
        ));
    }
    if name.starts_with('-') {
        return Some(format!("{} name cannot start with '-'", kind));
    }
    if name.contains("..") {
        return Some(format!("{} name cannot contain '..'", kind));
    }
    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '-'));
    if !valid {
        return Some(format!("{} name '{}' contains invalid characters", kind, name));
    }
    None
}
