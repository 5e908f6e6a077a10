use rusqlite::{params, Connection, ErrorCode, Row};

use super::{collect_rows, enum_col, json_col, json_to_sql, ts_col, ts_to_sql, LARGE_LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::HealthRecord;

const RECORD_COLUMNS: &str = "id, user_id, record_type, title, description, doctor_name,
     medications, attachments, date, is_synced, offline_id";

fn map_record(row: &Row<'_>) -> rusqlite::Result<HealthRecord> {
    Ok(HealthRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        record_type: enum_col(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        doctor_name: row.get(5)?,
        medications: json_col(row, 6)?,
        attachments: json_col(row, 7)?,
        date: ts_col(row, 8)?,
        is_synced: row.get::<_, i32>(9)? != 0,
        offline_id: row.get(10)?,
    })
}

fn record_params(record: &HealthRecord) -> Result<(String, String), DatabaseError> {
    Ok((json_to_sql(&record.medications)?, json_to_sql(&record.attachments)?))
}

/// Insert a record. A duplicate offline id is a constraint violation.
pub fn insert_health_record(conn: &Connection, record: &HealthRecord) -> Result<(), DatabaseError> {
    let (medications, attachments) = record_params(record)?;
    conn.execute(
        "INSERT INTO health_records
         (id, user_id, record_type, title, description, doctor_name,
          medications, attachments, date, is_synced, offline_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id,
            record.user_id,
            record.record_type.as_str(),
            record.title,
            record.description,
            record.doctor_name,
            medications,
            attachments,
            ts_to_sql(&record.date),
            record.is_synced as i32,
            record.offline_id,
        ],
    )
    .map_err(|e| match e.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => DatabaseError::ConstraintViolation(format!(
            "health record with offline id {:?} already exists",
            record.offline_id.as_deref().unwrap_or_default()
        )),
        _ => DatabaseError::from(e),
    })?;
    Ok(())
}

/// Insert unless a record with the same offline id is already stored.
///
/// Returns `true` when a row was written.
pub fn insert_health_record_if_absent(
    conn: &Connection,
    record: &HealthRecord,
) -> Result<bool, DatabaseError> {
    let (medications, attachments) = record_params(record)?;
    let rows_changed = conn.execute(
        "INSERT OR IGNORE INTO health_records
         (id, user_id, record_type, title, description, doctor_name,
          medications, attachments, date, is_synced, offline_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id,
            record.user_id,
            record.record_type.as_str(),
            record.title,
            record.description,
            record.doctor_name,
            medications,
            attachments,
            ts_to_sql(&record.date),
            record.is_synced as i32,
            record.offline_id,
        ],
    )?;
    Ok(rows_changed > 0)
}

/// A user's records, newest first.
pub fn list_health_records(conn: &Connection, user_id: &str) -> Result<Vec<HealthRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM health_records
         WHERE user_id = ?1 ORDER BY date DESC LIMIT {LARGE_LIST_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], map_record)?;
    collect_rows(rows)
}
