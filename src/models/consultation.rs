use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ConsultationStatus, ConsultationType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub symptoms: String,
    pub diagnosis: Option<String>,
    pub prescription: Vec<serde_json::Value>,
    pub status: ConsultationStatus,
    pub appointment_time: DateTime<Utc>,
    pub consultation_type: ConsultationType,
    /// Allocated once at booking; never changes afterwards.
    pub room_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationCreate {
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub doctor_name: String,
    pub symptoms: String,
    pub appointment_time: DateTime<Utc>,
    #[serde(default = "default_type")]
    pub consultation_type: ConsultationType,
}

fn default_type() -> ConsultationType {
    ConsultationType::Video
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsultationStatusUpdate {
    pub status: ConsultationStatus,
    pub diagnosis: Option<String>,
    pub prescription: Option<Vec<serde_json::Value>>,
}

impl Consultation {
    /// Build a scheduled consultation around a server-allocated room id.
    pub fn from_create(input: ConsultationCreate, room_id: String) -> Self {
        Self {
            id: super::new_id(),
            patient_id: input.patient_id,
            doctor_id: input.doctor_id,
            doctor_name: input.doctor_name,
            symptoms: input.symptoms,
            diagnosis: None,
            prescription: Vec::new(),
            status: ConsultationStatus::Scheduled,
            appointment_time: input.appointment_time,
            consultation_type: input.consultation_type,
            room_id,
            created_at: super::now(),
        }
    }
}
