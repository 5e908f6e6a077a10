use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{collect_rows, enum_col, json_to_sql, opt_json_col, ts_col, ts_to_sql, LARGE_LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::{User, UserFilter, UserRole};

const USER_COLUMNS: &str =
    "id, name, phone, village, language, role, emergency_contact, location, created_at";

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        village: row.get(3)?,
        language: row.get(4)?,
        role: enum_col(row, 5)?,
        emergency_contact: row.get(6)?,
        location: opt_json_col(row, 7)?,
        created_at: ts_col(row, 8)?,
    })
}

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    let location = user.location.as_ref().map(json_to_sql).transpose()?;
    conn.execute(
        "INSERT INTO users (id, name, phone, village, language, role, emergency_contact, location, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            user.id,
            user.name,
            user.phone,
            user.village,
            user.language,
            user.role.as_str(),
            user.emergency_contact,
            location,
            ts_to_sql(&user.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_user(conn: &Connection, id: &str) -> Result<Option<User>, DatabaseError> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_user).optional()?)
}

/// Users matching the optional role/village filters, oldest first.
pub fn list_users(conn: &Connection, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
    let mut sql = format!("SELECT {USER_COLUMNS} FROM users WHERE 1=1");
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(role) = filter.role {
        params_vec.push(Box::new(role.as_str()));
        sql.push_str(&format!(" AND role = ?{}", params_vec.len()));
    }
    if let Some(ref village) = filter.village {
        params_vec.push(Box::new(village.clone()));
        sql.push_str(&format!(" AND village = ?{}", params_vec.len()));
    }
    sql.push_str(&format!(" ORDER BY created_at ASC LIMIT {LARGE_LIST_LIMIT}"));

    let param_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(param_refs.as_slice(), map_user)?;
    collect_rows(rows)
}

/// Every user whose role can answer an emergency alert.
pub fn list_responders(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE role IN (?1, ?2) ORDER BY created_at ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![UserRole::Asha.as_str(), UserRole::Doctor.as_str()],
        map_user,
    )?;
    collect_rows(rows)
}

pub fn count_users(conn: &Connection) -> Result<i64, DatabaseError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
}
