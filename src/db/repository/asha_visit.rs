use rusqlite::{params, Connection, Row};

use super::{
    collect_rows, enum_col, json_col, json_to_sql, opt_ts_col, opt_ts_to_sql, ts_col, ts_to_sql,
    LIST_LIMIT,
};
use crate::db::DatabaseError;
use crate::models::AshaVisit;

const VISIT_COLUMNS: &str = "id, asha_id, patient_id, patient_name, visit_type, findings,
     action_taken, next_visit_date, vital_signs, created_at";

fn map_visit(row: &Row<'_>) -> rusqlite::Result<AshaVisit> {
    Ok(AshaVisit {
        id: row.get(0)?,
        asha_id: row.get(1)?,
        patient_id: row.get(2)?,
        patient_name: row.get(3)?,
        visit_type: enum_col(row, 4)?,
        findings: row.get(5)?,
        action_taken: row.get(6)?,
        next_visit_date: opt_ts_col(row, 7)?,
        vital_signs: json_col(row, 8)?,
        created_at: ts_col(row, 9)?,
    })
}

pub fn insert_asha_visit(conn: &Connection, visit: &AshaVisit) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO asha_visits
         (id, asha_id, patient_id, patient_name, visit_type, findings, action_taken,
          next_visit_date, vital_signs, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            visit.id,
            visit.asha_id,
            visit.patient_id,
            visit.patient_name,
            visit.visit_type.as_str(),
            visit.findings,
            visit.action_taken,
            opt_ts_to_sql(&visit.next_visit_date),
            json_to_sql(&visit.vital_signs)?,
            ts_to_sql(&visit.created_at),
        ],
    )?;
    Ok(())
}

/// Visits recorded by one health worker, newest first.
pub fn list_visits_by_asha(conn: &Connection, asha_id: &str) -> Result<Vec<AshaVisit>, DatabaseError> {
    list_visits_where(conn, "asha_id", asha_id)
}

/// Visits received by one patient, newest first.
pub fn list_visits_by_patient(
    conn: &Connection,
    patient_id: &str,
) -> Result<Vec<AshaVisit>, DatabaseError> {
    list_visits_where(conn, "patient_id", patient_id)
}

fn list_visits_where(
    conn: &Connection,
    column: &'static str,
    value: &str,
) -> Result<Vec<AshaVisit>, DatabaseError> {
    let sql = format!(
        "SELECT {VISIT_COLUMNS} FROM asha_visits
         WHERE {column} = ?1 ORDER BY created_at DESC LIMIT {LIST_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![value], map_visit)?;
    collect_rows(rows)
}
