use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AlertStatus, AlertType};
use super::location::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyAlert {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub location: GeoPoint,
    pub alert_type: AlertType,
    pub description: Option<String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    /// Responder ids in acknowledgement order. Repeats are kept.
    pub responders_notified: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmergencyAlertCreate {
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub location: GeoPoint,
    #[serde(default = "default_alert_type")]
    pub alert_type: AlertType,
    pub description: Option<String>,
}

fn default_alert_type() -> AlertType {
    AlertType::Medical
}

impl EmergencyAlert {
    pub fn from_create(input: EmergencyAlertCreate) -> Self {
        Self {
            id: super::new_id(),
            user_id: input.user_id,
            user_name: input.user_name,
            user_phone: input.user_phone,
            location: input.location,
            alert_type: input.alert_type,
            description: input.description,
            status: AlertStatus::Active,
            created_at: super::now(),
            responders_notified: Vec::new(),
        }
    }

    pub fn responder_message(&self) -> String {
        format!(
            "EMERGENCY ALERT: {} needs help at location {}. Alert ID: {}",
            self.user_name,
            self.location,
            super::short_id(&self.id)
        )
    }
}
