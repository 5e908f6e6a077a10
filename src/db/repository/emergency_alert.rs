use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{collect_rows, enum_col, json_col, json_to_sql, ts_col, ts_to_sql, LIST_LIMIT};
use crate::db::DatabaseError;
use crate::models::{AlertStatus, EmergencyAlert};

const ALERT_COLUMNS: &str = "id, user_id, user_name, user_phone, location, alert_type,
     description, status, created_at, responders_notified";

fn map_alert(row: &Row<'_>) -> rusqlite::Result<EmergencyAlert> {
    Ok(EmergencyAlert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        user_phone: row.get(3)?,
        location: json_col(row, 4)?,
        alert_type: enum_col(row, 5)?,
        description: row.get(6)?,
        status: enum_col(row, 7)?,
        created_at: ts_col(row, 8)?,
        responders_notified: json_col(row, 9)?,
    })
}

pub fn insert_emergency_alert(conn: &Connection, alert: &EmergencyAlert) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO emergency_alerts
         (id, user_id, user_name, user_phone, location, alert_type, description,
          status, created_at, responders_notified)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            alert.id,
            alert.user_id,
            alert.user_name,
            alert.user_phone,
            json_to_sql(&alert.location)?,
            alert.alert_type.as_str(),
            alert.description,
            alert.status.as_str(),
            ts_to_sql(&alert.created_at),
            json_to_sql(&alert.responders_notified)?,
        ],
    )?;
    Ok(())
}

pub fn get_emergency_alert(conn: &Connection, id: &str) -> Result<Option<EmergencyAlert>, DatabaseError> {
    let sql = format!("SELECT {ALERT_COLUMNS} FROM emergency_alerts WHERE id = ?1");
    Ok(conn.query_row(&sql, params![id], map_alert).optional()?)
}

/// Alerts in the given status, newest first.
pub fn list_emergency_alerts(
    conn: &Connection,
    status: AlertStatus,
) -> Result<Vec<EmergencyAlert>, DatabaseError> {
    let sql = format!(
        "SELECT {ALERT_COLUMNS} FROM emergency_alerts
         WHERE status = ?1 ORDER BY created_at DESC LIMIT {LIST_LIMIT}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![status.as_str()], map_alert)?;
    collect_rows(rows)
}

/// Append an acknowledgement and mark the alert responded.
///
/// The append happens in a single UPDATE, so concurrent acknowledgements
/// all land in the list. Repeats are kept.
pub fn append_alert_responder(
    conn: &Connection,
    id: &str,
    responder_id: &str,
) -> Result<EmergencyAlert, DatabaseError> {
    let rows_changed = conn.execute(
        "UPDATE emergency_alerts
         SET responders_notified = json_insert(responders_notified, '$[#]', ?1),
             status = ?2
         WHERE id = ?3",
        params![responder_id, AlertStatus::Responded.as_str(), id],
    )?;
    if rows_changed == 0 {
        return Err(DatabaseError::not_found("emergency_alert", id));
    }
    get_emergency_alert(conn, id)?.ok_or_else(|| DatabaseError::not_found("emergency_alert", id))
}

pub fn set_emergency_alert_status(
    conn: &Connection,
    id: &str,
    status: AlertStatus,
) -> Result<EmergencyAlert, DatabaseError> {
    let rows_changed = conn.execute(
        "UPDATE emergency_alerts SET status = ?1 WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    if rows_changed == 0 {
        return Err(DatabaseError::not_found("emergency_alert", id));
    }
    get_emergency_alert(conn, id)?.ok_or_else(|| DatabaseError::not_found("emergency_alert", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{AlertType, EmergencyAlertCreate, GeoPoint};

    fn alert() -> EmergencyAlert {
        EmergencyAlert::from_create(EmergencyAlertCreate {
            user_id: "u1".into(),
            user_name: "Harjit".into(),
            user_phone: "+91-9000000002".into(),
            location: GeoPoint::new(30.9, 75.85),
            alert_type: AlertType::Accident,
            description: Some("Tractor accident".into()),
        })
    }

    #[test]
    fn new_alert_is_listed_as_active() {
        let conn = open_memory_database().unwrap();
        let a = alert();
        insert_emergency_alert(&conn, &a).unwrap();

        assert_eq!(list_emergency_alerts(&conn, AlertStatus::Active).unwrap(), vec![a]);
        assert!(list_emergency_alerts(&conn, AlertStatus::Responded).unwrap().is_empty());
    }

    #[test]
    fn responders_accumulate_in_order() {
        let conn = open_memory_database().unwrap();
        let a = alert();
        insert_emergency_alert(&conn, &a).unwrap();

        append_alert_responder(&conn, &a.id, "asha-1").unwrap();
        append_alert_responder(&conn, &a.id, "doc-1").unwrap();
        let updated = append_alert_responder(&conn, &a.id, "asha-1").unwrap();

        assert_eq!(updated.status, AlertStatus::Responded);
        assert_eq!(updated.responders_notified, vec!["asha-1", "doc-1", "asha-1"]);
    }

    #[test]
    fn responding_to_unknown_alert_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = append_alert_responder(&conn, "missing", "asha-1").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn resolve_sets_status() {
        let conn = open_memory_database().unwrap();
        let a = alert();
        insert_emergency_alert(&conn, &a).unwrap();
        let resolved = set_emergency_alert_status(&conn, &a.id, AlertStatus::Resolved).unwrap();
        assert_eq!(resolved.status, AlertStatus::Resolved);
        assert!(set_emergency_alert_status(&conn, "x", AlertStatus::Resolved).is_err());
    }
}
