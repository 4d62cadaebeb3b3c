//! Field helpers shared by every record type.
//!
//! Samanage payloads are loosely typed: the same field can arrive as a
//! string, a number, `null`, or not at all. The deserializers here never
//! fail on shape, so constructing a record never fails on a missing or
//! oddly-typed key. Scalar fields keep the JSON type they arrived with, so
//! a fetched record written back sends the same wire types.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes a text field (a record name) into `Option<String>`.
///
/// Strings pass through, numbers and booleans are rendered as text, `null`
/// becomes `None`. Objects and arrays are kept as their JSON text.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

/// Deserializes a scalar field into `Option<Value>`, keeping its JSON type.
///
/// Strings, numbers and booleans are stored as-is and `null` becomes
/// `None`. Objects and arrays are not scalars; they are kept as a string
/// holding their JSON text.
pub(crate) fn lenient_scalar<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(nested @ (Value::Object(_) | Value::Array(_))) => {
            Some(Value::String(nested.to_string()))
        }
        Some(scalar) => Some(scalar),
    })
}

/// Deserializes a record id that can be an integer or a numeric string.
///
/// Anything else is treated as absent.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Returns true for a string field that should be left out of a dump.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Returns true for a loose JSON field that should be left out of a dump.
pub(crate) fn is_blank_value(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Renders a field value for text display.
///
/// Nested entities (`{"id": 3, "name": "IT"}`) show their name.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}
