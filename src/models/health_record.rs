use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::RecordType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    pub description: String,
    pub doctor_name: Option<String>,
    /// Free-form medication entries (name, dose, frequency, ...), in order.
    pub medications: Vec<serde_json::Value>,
    pub attachments: Vec<String>,
    pub date: DateTime<Utc>,
    pub is_synced: bool,
    pub offline_id: Option<String>,
}

/// A record draft, either created online or queued on a device while offline.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthRecordCreate {
    pub user_id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    pub description: String,
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub medications: Vec<serde_json::Value>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default = "default_synced")]
    pub is_synced: bool,
    pub offline_id: Option<String>,
}

fn default_synced() -> bool {
    true
}

impl HealthRecordCreate {
    /// The dedup key, if the draft carries a usable one.
    pub fn offline_key(&self) -> Option<&str> {
        self.offline_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

impl HealthRecord {
    pub fn from_create(input: HealthRecordCreate) -> Self {
        let offline_id = input.offline_key().map(str::to_string);
        Self {
            id: super::new_id(),
            user_id: input.user_id,
            record_type: input.record_type,
            title: input.title,
            description: input.description,
            doctor_name: input.doctor_name,
            medications: input.medications,
            attachments: input.attachments,
            date: super::now(),
            is_synced: input.is_synced,
            offline_id,
        }
    }
}
