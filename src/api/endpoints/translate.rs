//! Translation endpoints. `POST /api/translate` never fails once its
//! parameters are present.
//!
//! `text` and `target_language` are read from the JSON body, falling back
//! to the query string (`/api/translate?text=...&target_language=hi`).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiJson, ApiQuery};
use crate::translate::{self, Language, TranslateRequest, TranslateResponse, SUPPORTED_LANGUAGES};

#[derive(Debug, Default, Deserialize)]
pub struct TranslateParams {
    pub text: Option<String>,
    pub target_language: Option<String>,
}

impl TranslateParams {
    fn merge(self, fallback: TranslateParams) -> Result<TranslateRequest, ApiError> {
        let text = self
            .text
            .or(fallback.text)
            .ok_or_else(|| ApiError::BadRequest("text is required".into()))?;
        let target_language = self
            .target_language
            .or(fallback.target_language)
            .filter(|lang| !lang.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("target_language is required".into()))?;
        Ok(TranslateRequest {
            text,
            target_language,
        })
    }
}

pub async fn translate(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TranslateParams>,
    body: Option<ApiJson<TranslateParams>>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let body = body.map(|ApiJson(b)| b).unwrap_or_default();
    let request = body.merge(query)?;
    Ok(Json(
        translate::translate(ctx.core.llm(), ctx.core.ai_timeout(), &request).await,
    ))
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub languages: &'static [Language],
}

pub async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: SUPPORTED_LANGUAGES,
    })
}
