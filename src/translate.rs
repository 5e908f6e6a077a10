//! Best-effort translation and the supported-language list.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::LlmClient;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English", native_name: "English" },
    Language { code: "hi", name: "Hindi", native_name: "हिंदी" },
    Language { code: "pa", name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
    Language { code: "bn", name: "Bengali", native_name: "বাংলা" },
    Language { code: "te", name: "Telugu", native_name: "తెలుగు" },
    Language { code: "mr", name: "Marathi", native_name: "मराठी" },
    Language { code: "ta", name: "Tamil", native_name: "தமிழ்" },
    Language { code: "gu", name: "Gujarati", native_name: "ગુજરાતી" },
    Language { code: "kn", name: "Kannada", native_name: "ಕನ್ನಡ" },
    Language { code: "ml", name: "Malayalam", native_name: "മലയാളം" },
];

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
}

/// English name for a language code; unknown codes pass through unchanged.
pub fn language_name(code_or_name: &str) -> &str {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code.eq_ignore_ascii_case(code_or_name.trim()))
        .map(|l| l.name)
        .unwrap_or(code_or_name)
}

fn system_prompt(target_language: &str) -> String {
    format!(
        "Translate the following text to {}. Only respond with the translated text, nothing else.",
        language_name(target_language)
    )
}

/// Translate `text`, or echo it back when translation is unavailable.
pub async fn translate(
    llm: Option<&dyn LlmClient>,
    timeout: Duration,
    request: &TranslateRequest,
) -> TranslateResponse {
    let echo = || TranslateResponse {
        translated_text: request.text.clone(),
    };

    let Some(llm) = llm else {
        return echo();
    };
    if request.text.trim().is_empty() {
        return echo();
    }

    let system = system_prompt(&request.target_language);
    match tokio::time::timeout(timeout, llm.generate(&system, &request.text)).await {
        Ok(Ok(text)) if !text.trim().is_empty() => TranslateResponse {
            translated_text: text.trim().to_string(),
        },
        Ok(Ok(_)) => {
            tracing::warn!("Translation returned empty text, echoing input");
            echo()
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Translation failed, echoing input");
            echo()
        }
        Err(_) => {
            tracing::warn!("Translation timed out, echoing input");
            echo()
        }
    }
}
