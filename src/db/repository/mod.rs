//! Repository layer: collection-scoped store operations.
//!
//! One sub-module per collection. Functions take a borrowed
//! `Connection` so callers decide whether they run inside a
//! transaction (`Store::with_transaction`) or not.

mod asha_visit;
mod consultation;
mod emergency_alert;
mod health_record;
mod medicine_request;
mod pharmacy;
mod symptom_check;
mod user;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::DatabaseError;

pub use asha_visit::*;
pub use consultation::*;
pub use emergency_alert::*;
pub use health_record::*;
pub use medicine_request::*;
pub use pharmacy::*;
pub use symptom_check::*;
pub use user::*;

/// Cap for user and health-record listings.
pub const LARGE_LIST_LIMIT: i64 = 1000;
/// Cap for every other listing.
pub const LIST_LIMIT: i64 = 100;

/// Fixed-precision RFC 3339 so stored timestamps sort lexically.
pub(crate) fn ts_to_sql(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn opt_ts_to_sql(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(ts_to_sql)
}

pub(crate) fn json_to_sql<T: Serialize + ?Sized>(value: &T) -> Result<String, DatabaseError> {
    Ok(serde_json::to_string(value)?)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_ts_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| conversion_error(idx, e))
    })
    .transpose()
}

pub(crate) fn json_col<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_json_col<T: DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|raw| serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn enum_col<E>(row: &Row<'_>, idx: usize) -> rusqlite::Result<E>
where
    E: FromStr<Err = DatabaseError>,
{
    let raw: String = row.get(idx)?;
    E::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// Collect mapped rows, surfacing the first failure.
pub(crate) fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>, DatabaseError> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
