use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Severity, TriageSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCheck {
    pub id: String,
    pub user_id: String,
    pub symptoms: Vec<String>,
    pub assessment: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub referral_needed: bool,
    pub source: TriageSource,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymptomCheckCreate {
    pub user_id: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
    pub additional_info: Option<String>,
}
