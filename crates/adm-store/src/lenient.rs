//! Forgiving field decoders for records coming out of the mock store.
//!
//! The store is a hand-edited JSON document, so numbers sometimes arrive as
//! strings, lists go missing and enum labels drift. Every decoder here maps
//! whatever it finds onto a usable value instead of rejecting the record:
//! non-numeric or absent numbers become `0`, non-array lists become empty.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::models::RecordId;

/// Coerce a JSON value into a finite `f64`, treating anything non-numeric as `0`.
pub fn coerce_f64(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if number.is_finite() { number } else { 0.0 }
}

/// Coerce a JSON value into an `i64`, truncating fractional parts.
pub fn coerce_i64(value: &Value) -> i64 {
    coerce_f64(value).trunc() as i64
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_i64(&value))
}

pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = text(deserializer)?;
    Ok(Some(value).filter(|s| !s.trim().is_empty()))
}

/// Decode an id of either shape; anything else is the blank id.
pub(crate) fn record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_i64()
            .map(RecordId::Number)
            .unwrap_or_else(|| RecordId::Text(n.to_string())),
        Value::String(s) => RecordId::Text(s),
        _ => RecordId::default(),
    })
}

/// Decode an enum from its label; unknown labels decode as `None`.
pub(crate) fn label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = text(deserializer)?;
    Ok(value.parse().ok())
}

/// Decode a list, dropping entries that cannot be decoded.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(items_of(value))
}

/// Decode every element of a JSON array, skipping malformed elements.
/// Anything other than an array yields an empty list.
pub fn items_of<T: DeserializeOwned>(value: Value) -> Vec<T> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!("Skipping malformed list entry: {e}");
                None
            }
        })
        .collect()
}
