//! Cache Key Module
//!
//! Derives deterministic cache keys from an operation name and its parameters.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Separates the operation name from its serialized parameters.
pub const KEY_DELIMITER: char = '?';

// == Generate Key ==
/// Builds the cache key for `operation` called with `params`.
///
/// Without parameters (absent or empty map) the key is the bare operation
/// name. Otherwise the parameters are appended after [`KEY_DELIMITER`] as
/// canonical JSON, with object keys sorted at every level, so insertion
/// order never changes the key.
///
/// Operation names must be non-empty and must not contain the delimiter.
///
/// # Example
/// ```
/// use rails_toolkit::cache::generate_key;
/// use serde_json::json;
///
/// let key = generate_key("versions", json!({ "name": "rails" }).as_object()).unwrap();
/// assert_eq!(key, r#"versions?{"name":"rails"}"#);
/// ```
pub fn generate_key(operation: &str, params: Option<&Map<String, Value>>) -> Result<String> {
    if operation.is_empty() {
        return Err(Error::InvalidKey("operation name cannot be empty".to_string()));
    }
    if operation.contains(KEY_DELIMITER) {
        return Err(Error::InvalidKey(format!(
            "operation name '{}' contains reserved delimiter '{}'",
            operation, KEY_DELIMITER
        )));
    }

    let params = match params {
        Some(map) if !map.is_empty() => map,
        _ => return Ok(operation.to_string()),
    };

    let mut key = String::with_capacity(operation.len() + 32);
    key.push_str(operation);
    key.push(KEY_DELIMITER);
    write_canonical_object(&mut key, params)?;
    Ok(key)
}

fn write_canonical(out: &mut String, value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => write_canonical_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, item)?;
            }
            out.push(']');
            Ok(())
        }
        scalar => {
            out.push_str(&serde_json::to_string(scalar)?);
            Ok(())
        }
    }
}

fn write_canonical_object(out: &mut String, map: &Map<String, Value>) -> Result<()> {
    let mut fields: Vec<(&String, &Value)> = map.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (name, value)) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::to_string(name)?);
        out.push(':');
        write_canonical(out, value)?;
    }
    out.push('}');
    Ok(())
}
