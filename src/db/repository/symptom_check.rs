use rusqlite::{params, Connection, Row};

use super::{collect_rows, enum_col, json_col, json_to_sql, ts_col, ts_to_sql, LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::SymptomCheck;

fn map_check(row: &Row<'_>) -> rusqlite::Result<SymptomCheck> {
    Ok(SymptomCheck {
        id: row.get(0)?,
        user_id: row.get(1)?,
        symptoms: json_col(row, 2)?,
        assessment: row.get(3)?,
        severity: enum_col(row, 4)?,
        recommendations: json_col(row, 5)?,
        referral_needed: row.get::<_, i32>(6)? != 0,
        source: enum_col(row, 7)?,
        created_at: ts_col(row, 8)?,
    })
}

pub fn insert_symptom_check(conn: &Connection, check: &SymptomCheck) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptom_checks
         (id, user_id, symptoms, assessment, severity, recommendations, referral_needed, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            check.id,
            check.user_id,
            json_to_sql(&check.symptoms)?,
            check.assessment,
            check.severity.as_str(),
            json_to_sql(&check.recommendations)?,
            check.referral_needed as i32,
            check.source.as_str(),
            ts_to_sql(&check.created_at),
        ],
    )?;
    Ok(())
}

/// A user's triage history, newest first.
pub fn list_symptom_checks(conn: &Connection, user_id: &str) -> Result<Vec<SymptomCheck>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, user_id, symptoms, assessment, severity, recommendations,
                referral_needed, source, created_at
         FROM symptom_checks WHERE user_id = ?1
         ORDER BY created_at DESC LIMIT {LIST_LIMIT}"
    ))?;
    let rows = stmt.query_map(params![user_id], map_check)?;
    collect_rows(rows)
}
