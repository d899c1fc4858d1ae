//! Lenient JSON field decoders
//!
//! The backend and the onboarding forms disagree on field shapes: ids arrive
//! as numbers or strings, numeric inputs as numbers or (possibly empty)
//! strings, and allergies as an array or a comma-separated string.

use std::fmt::Display;
use std::str::FromStr;

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Deserialize an ID that can be number or string
pub(crate) fn id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    match value {
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::String(s) => Ok(s),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Deserialize an optional ID that can be number or string
pub(crate) fn optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::String(s)) if s.is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string for id")),
    }
}

/// Deserialize a field where an explicit `null` means the default
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a value given as a number, a numeric string, or an empty string
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    let text = match value {
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::String(s)) => s.trim().to_string(),
        Some(JsonValue::Null) | None => return Ok(None),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected number or string, got {}",
                other
            )))
        }
    };

    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<T>()
        .map(Some)
        .map_err(|e| D::Error::custom(format!("invalid value '{}': {}", text, e)))
}

/// Deserialize a tag list given as an array or a comma-separated string
pub(crate) fn tag_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::String(s)) => Ok(s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()),
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::String(s) => Ok(s),
                other => Err(D::Error::custom(format!("expected string tag, got {}", other))),
            })
            .collect(),
        Some(JsonValue::Null) | None => Ok(Vec::new()),
        Some(other) => Err(D::Error::custom(format!(
            "expected list or comma-separated string, got {}",
            other
        ))),
    }
}

/// JavaScript-style truthiness for allergen flags
pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
