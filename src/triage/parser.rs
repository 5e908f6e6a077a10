use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::models::Severity;

/// Markdown code fences the model tends to wrap JSON in.
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid fence regex"));

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("No JSON object in model response")]
    NoJson,

    #[error("Malformed triage JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown severity: {0}")]
    Severity(String),
}

/// Triage answer as produced by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct AiAssessment {
    pub assessment: String,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub referral_needed: bool,
}

#[derive(Deserialize)]
struct RawAssessment {
    assessment: String,
    severity: String,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default = "default_referral")]
    referral_needed: bool,
}

fn default_referral() -> bool {
    true
}

/// Parse the model's text, tolerating code fences and prose around the object.
pub fn parse_triage_response(response: &str) -> Result<AiAssessment, ParseError> {
    let cleaned = CODE_FENCE.replace_all(response, "");
    let start = cleaned.find('{').ok_or(ParseError::NoJson)?;
    let end = cleaned.rfind('}').ok_or(ParseError::NoJson)?;
    if end < start {
        return Err(ParseError::NoJson);
    }

    let raw: RawAssessment = serde_json::from_str(&cleaned[start..=end])?;
    let severity_text = raw.severity.trim().to_lowercase();
    let severity =
        Severity::from_str(&severity_text).map_err(|_| ParseError::Severity(raw.severity))?;

    Ok(AiAssessment {
        assessment: raw.assessment.trim().to_string(),
        severity,
        recommendations: raw.recommendations,
        referral_needed: raw.referral_needed,
    })
}
