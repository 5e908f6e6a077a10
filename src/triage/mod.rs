//! Symptom triage: model-assisted assessment over a deterministic floor.
//!
//! The keyword classifier always runs. When a model is configured its
//! answer is used instead, bounded by a timeout, except that an emergency
//! keyword match can never be downgraded. Any model failure (transport,
//! timeout, unparseable output) falls back to the keyword result, so a
//! triage request always produces an assessment.

pub mod fallback;
pub mod parser;
pub mod prompt;

use std::time::Duration;

use crate::db::{self, Store};
use crate::llm::LlmClient;
use crate::models::{self, Severity, SymptomCheck, SymptomCheckCreate, TriageSource};

/// Triage result before it is attached to a user and stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub assessment: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub referral_needed: bool,
    pub source: TriageSource,
}

impl Assessment {
    fn offline(severity: Severity) -> Self {
        Self {
            assessment: fallback::OFFLINE_ASSESSMENT.to_string(),
            severity,
            recommendations: fallback::offline_recommendations(),
            referral_needed: true,
            source: TriageSource::Offline,
        }
    }
}

/// Assess symptoms. Never fails.
pub async fn assess(
    llm: Option<&dyn LlmClient>,
    timeout: Duration,
    symptoms: &[String],
    additional_info: Option<&str>,
) -> Assessment {
    let floor = fallback::classify(symptoms);

    let Some(llm) = llm else {
        tracing::debug!("No AI client configured, using offline triage");
        return Assessment::offline(floor);
    };

    let user_prompt = prompt::build_triage_prompt(symptoms, additional_info);
    tracing::debug!(model = llm.model(), symptoms = symptoms.len(), "Requesting AI triage");
    let response =
        match tokio::time::timeout(timeout, llm.generate(prompt::TRIAGE_SYSTEM_PROMPT, &user_prompt))
            .await
        {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "AI triage failed, using offline triage");
                return Assessment::offline(floor);
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    "AI triage timed out, using offline triage"
                );
                return Assessment::offline(floor);
            }
        };

    let ai = match parser::parse_triage_response(&response) {
        Ok(ai) => ai,
        Err(e) => {
            tracing::warn!(error = %e, "AI triage response unusable, using offline triage");
            return Assessment::offline(floor);
        }
    };

    let mut result = Assessment {
        assessment: ai.assessment,
        severity: ai.severity,
        recommendations: ai.recommendations,
        referral_needed: ai.referral_needed,
        source: TriageSource::Ai,
    };

    if floor == Severity::Emergency && result.severity != Severity::Emergency {
        tracing::warn!(
            ai_severity = %result.severity,
            "Emergency symptom present, overriding AI severity"
        );
        result.severity = Severity::Emergency;
    }
    if result.severity == Severity::Emergency {
        result.referral_needed = true;
    }

    result
}

/// Assess, then record the check in the user's history.
///
/// A store failure is logged and the assessment is still returned.
pub async fn run_symptom_check(
    store: &Store,
    llm: Option<&dyn LlmClient>,
    timeout: Duration,
    input: SymptomCheckCreate,
) -> SymptomCheck {
    let result = assess(llm, timeout, &input.symptoms, input.additional_info.as_deref()).await;

    let check = SymptomCheck {
        id: models::new_id(),
        user_id: input.user_id,
        symptoms: input.symptoms,
        assessment: result.assessment,
        severity: result.severity,
        recommendations: result.recommendations,
        referral_needed: result.referral_needed,
        source: result.source,
        created_at: models::now(),
    };

    if let Err(e) = store.with_conn(|conn| db::insert_symptom_check(conn, &check)) {
        tracing::error!(error = %e, check_id = %check.id, "Failed to store symptom check");
    }

    tracing::info!(
        severity = %check.severity,
        source = %check.source,
        referral = check.referral_needed,
        "Symptom check complete"
    );
    check
}
