use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{collect_rows, enum_col, json_col, json_to_sql, ts_col, ts_to_sql, LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::{Consultation, ConsultationStatusUpdate};

const CONSULTATION_COLUMNS: &str = "id, patient_id, doctor_id, doctor_name, symptoms, diagnosis,
     prescription, status, appointment_time, consultation_type, room_id, created_at";

fn map_consultation(row: &Row<'_>) -> rusqlite::Result<Consultation> {
    Ok(Consultation {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        doctor_name: row.get(3)?,
        symptoms: row.get(4)?,
        diagnosis: row.get(5)?,
        prescription: json_col(row, 6)?,
        status: enum_col(row, 7)?,
        appointment_time: ts_col(row, 8)?,
        consultation_type: enum_col(row, 9)?,
        room_id: row.get(10)?,
        created_at: ts_col(row, 11)?,
    })
}

pub fn insert_consultation(conn: &Connection, c: &Consultation) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO consultations
         (id, patient_id, doctor_id, doctor_name, symptoms, diagnosis, prescription,
          status, appointment_time, consultation_type, room_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            c.id,
            c.patient_id,
            c.doctor_id,
            c.doctor_name,
            c.symptoms,
            c.diagnosis,
            json_to_sql(&c.prescription)?,
            c.status.as_str(),
            ts_to_sql(&c.appointment_time),
            c.consultation_type.as_str(),
            c.room_id,
            ts_to_sql(&c.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_consultation(conn: &Connection, id: &str) -> Result<Option<Consultation>, DatabaseError> {
    let sql = format!("SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_consultation).optional()?)
}

pub fn get_consultation_by_room(
    conn: &Connection,
    room_id: &str,
) -> Result<Option<Consultation>, DatabaseError> {
    let sql = format!("SELECT {CONSULTATION_COLUMNS} FROM consultations WHERE room_id = ?1");
    Ok(conn.query_row(&sql, params![room_id], map_consultation).optional()?)
}

pub fn room_id_exists(conn: &Connection, room_id: &str) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM consultations WHERE room_id = ?1",
        params![room_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// A patient's consultations, latest appointment first.
pub fn list_consultations(conn: &Connection, patient_id: &str) -> Result<Vec<Consultation>, DatabaseError> {
    let sql = format!(
        "SELECT {CONSULTATION_COLUMNS} FROM consultations
         WHERE patient_id = ?1 ORDER BY appointment_time DESC LIMIT {LIST_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![patient_id], map_consultation)?;
    collect_rows(rows)
}

/// Apply a status change. Diagnosis and prescription are only overwritten when supplied.
pub fn update_consultation_status(
    conn: &Connection,
    id: &str,
    update: &ConsultationStatusUpdate,
) -> Result<Consultation, DatabaseError> {
    let prescription = update
        .prescription
        .as_ref()
        .map(|p| json_to_sql(p))
        .transpose()?;
    let rows_changed = conn.execute(
        "UPDATE consultations
         SET status = ?1,
             diagnosis = COALESCE(?2, diagnosis),
             prescription = COALESCE(?3, prescription)
         WHERE id = ?4",
        params![update.status.as_str(), update.diagnosis, prescription, id],
    )?;
    if rows_changed == 0 {
        return Err(DatabaseError::not_found("consultation", id));
    }
    get_consultation(conn, id)?.ok_or_else(|| DatabaseError::not_found("consultation", id))
}
