use crate::models::Severity;

/// Any of these forces an emergency classification.
pub const EMERGENCY_SYMPTOMS: &[&str] = &[
    "chest pain",
    "difficulty breathing",
    "severe bleeding",
    "unconscious",
];

/// Common mild complaints.
pub const MILD_SYMPTOMS: &[&str] = &["fever", "headache", "cough"];

pub const OFFLINE_ASSESSMENT: &str =
    "Basic symptom assessment completed offline. Please consult with healthcare provider.";

pub const OFFLINE_RECOMMENDATIONS: [&str; 2] = [
    "Consult with nearest healthcare provider",
    "Monitor symptoms carefully",
];

fn matches_any(symptoms: &[String], list: &[&str]) -> bool {
    symptoms.iter().any(|s| {
        let s = s.trim().to_lowercase();
        list.iter().any(|k| *k == s)
    })
}

/// Deterministic keyword classification. Emergency wins over mild; no match is medium.
pub fn classify(symptoms: &[String]) -> Severity {
    if matches_any(symptoms, EMERGENCY_SYMPTOMS) {
        Severity::Emergency
    } else if matches_any(symptoms, MILD_SYMPTOMS) {
        Severity::Low
    } else {
        Severity::Medium
    }
}

pub fn offline_recommendations() -> Vec<String> {
    OFFLINE_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
}
