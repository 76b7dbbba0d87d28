use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ensure_configured;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct TranslateRequest {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
    #[validate(length(min = 2, max = 16, message = "target_language must be a language code"))]
    pub target_language: String,
    pub source_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub source_language: Option<String>,
    pub target_language: String,
}

pub async fn translate(
    State(state): State<AppState>,
    Json(mut body): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    body.text = body.text.trim().to_string();
    body.target_language = body.target_language.trim().to_string();
    body.validate()?;
    ensure_configured(state.translation.is_available(), "Translation")?;

    let source = body
        .source_language
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let translation = state
        .translation
        .translate(&body.text, &body.target_language, source)
        .await?;

    Ok(Json(TranslateResponse {
        translated_text: translation.translated_text,
        source_language: translation.source_language,
        target_language: body.target_language,
    }))
}
