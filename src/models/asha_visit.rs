use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::VisitType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AshaVisit {
    pub id: String,
    pub asha_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub visit_type: VisitType,
    pub findings: String,
    pub action_taken: String,
    pub next_visit_date: Option<DateTime<Utc>>,
    /// Readings keyed by vital name ("bp", "pulse", "temperature", ...).
    pub vital_signs: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AshaVisitCreate {
    pub asha_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub visit_type: VisitType,
    pub findings: String,
    pub action_taken: String,
    pub next_visit_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub vital_signs: BTreeMap<String, serde_json::Value>,
}

impl AshaVisit {
    pub fn from_create(input: AshaVisitCreate) -> Self {
        Self {
            id: super::new_id(),
            asha_id: input.asha_id,
            patient_id: input.patient_id,
            patient_name: input.patient_name,
            visit_type: input.visit_type,
            findings: input.findings,
            action_taken: input.action_taken,
            next_visit_date: input.next_visit_date,
            vital_signs: input.vital_signs,
            created_at: super::now(),
        }
    }
}
