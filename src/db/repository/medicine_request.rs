use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{
    collect_rows, enum_col, json_col, json_to_sql, opt_ts_col, opt_ts_to_sql, ts_col, ts_to_sql,
    LIST_LIMIT,
};
use crate::db::DatabaseError;
use crate::models::{MedicineRequest, RequestStatus};

const REQUEST_COLUMNS: &str =
    "id, user_id, user_name, user_phone, medicines, pharmacy_id, status, booking_date, pickup_date";

fn map_request(row: &Row<'_>) -> rusqlite::Result<MedicineRequest> {
    Ok(MedicineRequest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_phone: row.get(3)?,
        medicines: json_col(row, 4)?,
        pharmacy_id: row.get(5)?,
        status: enum_col(row, 6)?,
        booking_date: ts_col(row, 7)?,
        pickup_date: opt_ts_col(row, 8)?,
    })
}

pub fn insert_medicine_request(
    conn: &Connection,
    request: &MedicineRequest,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medicine_requests
         (id, user_id, user_name, user_phone, medicines, pharmacy_id, status, booking_date, pickup_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            request.id,
            request.user_id,
            request.user_name,
            request.user_phone,
            json_to_sql(&request.medicines)?,
            request.pharmacy_id,
            request.status.as_str(),
            ts_to_sql(&request.booking_date),
            opt_ts_to_sql(&request.pickup_date),
        ],
    )?;
    Ok(())
}

pub fn get_medicine_request(
    conn: &Connection,
    id: &str,
) -> Result<Option<MedicineRequest>, DatabaseError> {
    let sql = format!("SELECT {REQUEST_COLUMNS} FROM medicine_requests WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_request).optional()?)
}

/// A user's bookings, newest first.
pub fn list_medicine_requests(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<MedicineRequest>, DatabaseError> {
    let sql = format!(
        "SELECT {REQUEST_COLUMNS} FROM medicine_requests
         WHERE user_id = ?1 ORDER BY booking_date DESC LIMIT {LIST_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], map_request)?;
    collect_rows(rows)
}

/// Set the status. A supplied pickup date replaces the stored one; `None` keeps it.
pub fn update_medicine_request_status(
    conn: &Connection,
    id: &str,
    status: RequestStatus,
    pickup_date: Option<DateTime<Utc>>,
) -> Result<MedicineRequest, DatabaseError> {
    let rows_changed = conn.execute(
        "UPDATE medicine_requests
         SET status = ?1, pickup_date = COALESCE(?2, pickup_date)
         WHERE id = ?3",
        params![status.as_str(), opt_ts_to_sql(&pickup_date), id],
    )?;
    if rows_changed == 0 {
        return Err(DatabaseError::not_found("medicine_request", id));
    }
    get_medicine_request(conn, id)?.ok_or_else(|| DatabaseError::not_found("medicine_request", id))
}
