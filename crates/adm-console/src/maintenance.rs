//! One-off maintenance of the store's JSON document.
//!
//! `backfill-created-at` gives every user and product a `createdAt` timestamp
//! so the product list can be ordered newest first. Records without a usable
//! value get `base + index` minutes; parseable values are rewritten in the
//! canonical `yyyy-mm-ddThh:mm:ss.sssZ` form.

use std::{fs, path::Path};

use adm_store::models::parse_timestamp;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ConsoleError;

/// 2025-08-01T12:00:00.000Z
pub const USERS_BASE_MILLIS: i64 = 1_754_049_600_000;
/// 2025-08-02T12:00:00.000Z
pub const PRODUCTS_BASE_MILLIS: i64 = 1_754_136_000_000;

const STEP_MILLIS: i64 = 60_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub users: usize,
    pub products: usize,
    /// Records that received a generated timestamp
    pub filled: usize,
}

fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn generated_at(base_millis: i64, index: usize) -> String {
    let offset = TimeDelta::milliseconds(base_millis + index as i64 * STEP_MILLIS);
    iso_millis(DateTime::<Utc>::UNIX_EPOCH + offset)
}

/// Backfill one collection; returns `(records, generated)`.
fn backfill_collection(document: &mut Value, key: &str, base_millis: i64) -> (usize, usize) {
    let Some(Value::Array(records)) = document.get_mut(key) else {
        return (0, 0);
    };

    let mut generated = 0;
    for (index, record) in records.iter_mut().enumerate() {
        let existing = record
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
            .map(iso_millis);

        let created_at = existing.unwrap_or_else(|| {
            generated += 1;
            generated_at(base_millis, index)
        });

        if !record.is_object() {
            *record = Value::Object(Map::new());
        }
        if let Value::Object(fields) = record {
            fields.insert("createdAt".to_string(), Value::String(created_at));
        }
    }

    (records.len(), generated)
}

/// Populate `createdAt` across the `users` and `products` collections.
pub fn backfill_document(document: &mut Value) -> BackfillReport {
    let (users, users_filled) = backfill_collection(document, "users", USERS_BASE_MILLIS);
    let (products, products_filled) =
        backfill_collection(document, "products", PRODUCTS_BASE_MILLIS);

    BackfillReport {
        users,
        products,
        filled: users_filled + products_filled,
    }
}

/// Backfill a document on disk and write it back with 2-space indentation.
pub fn backfill_file(path: &Path) -> Result<BackfillReport, ConsoleError> {
    if !path.exists() {
        return Err(ConsoleError::NotFound(path.to_path_buf()));
    }

    let raw = fs::read_to_string(path)?;
    let mut document: Value = serde_json::from_str(&raw)?;

    let report = backfill_document(&mut document);
    fs::write(path, serde_json::to_string_pretty(&document)?)?;

    tracing::info!(
        path = %path.display(),
        users = report.users,
        products = report.products,
        filled = report.filled,
        "createdAt backfilled"
    );

    Ok(report)
}
