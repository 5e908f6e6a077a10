use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::RequestStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    /// Requested lines (name, quantity, ...), in order.
    pub medicines: Vec<serde_json::Value>,
    pub pharmacy_id: String,
    pub status: RequestStatus,
    pub booking_date: DateTime<Utc>,
    pub pickup_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicineRequestCreate {
    pub user_id: String,
    pub user_name: String,
    pub user_phone: String,
    pub medicines: Vec<serde_json::Value>,
    pub pharmacy_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MedicineRequestStatusUpdate {
    pub status: RequestStatus,
    pub pickup_date: Option<DateTime<Utc>>,
}

impl MedicineRequest {
    pub fn from_create(input: MedicineRequestCreate) -> Self {
        Self {
            id: super::new_id(),
            user_id: input.user_id,
            user_name: input.user_name,
            user_phone: input.user_phone,
            medicines: input.medicines,
            pharmacy_id: input.pharmacy_id,
            status: RequestStatus::Pending,
            booking_date: super::now(),
            pickup_date: None,
        }
    }

    pub fn confirmation_message(&self) -> String {
        format!(
            "Medicine booking confirmed. Booking ID: {}",
            super::short_id(&self.id)
        )
    }
}
