use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{collect_rows, json_col, json_to_sql, ts_col, ts_to_sql, LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::Pharmacy;

fn map_pharmacy(row: &Row<'_>) -> rusqlite::Result<Pharmacy> {
    Ok(Pharmacy {
        id: row.get(0)?,
        name: row.get(1)?,
        location: row.get(2)?,
        phone: row.get(3)?,
        medicines: json_col(row, 4)?,
        last_updated: ts_col(row, 5)?,
    })
}

/// Insert a pharmacy, replacing every field of an existing one with the same id.
pub fn upsert_pharmacy(conn: &Connection, pharmacy: &Pharmacy) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pharmacies (id, name, location, phone, medicines, last_updated)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            location = excluded.location,
            phone = excluded.phone,
            medicines = excluded.medicines,
            last_updated = excluded.last_updated",
        params![
            pharmacy.id,
            pharmacy.name,
            pharmacy.location,
            pharmacy.phone,
            json_to_sql(&pharmacy.medicines)?,
            ts_to_sql(&pharmacy.last_updated),
        ],
    )?;
    Ok(())
}

pub fn get_pharmacy(conn: &Connection, id: &str) -> Result<Option<Pharmacy>, DatabaseError> {
    Ok(conn
        .query_row(
            "SELECT id, name, location, phone, medicines, last_updated
             FROM pharmacies WHERE id = ?1",
            params![id],
            map_pharmacy,
        )
        .optional()?)
}

pub fn list_pharmacies(conn: &Connection) -> Result<Vec<Pharmacy>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, name, location, phone, medicines, last_updated
         FROM pharmacies ORDER BY name ASC LIMIT {LIST_LIMIT}"
    ))?;
    let rows = stmt.query_map([], map_pharmacy)?;
    collect_rows(rows)
}
