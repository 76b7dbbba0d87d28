use axum::{Json, extract::State};
use clinivox_services::clinical::analysis::TranscriptAnalysis;
use serde::Deserialize;

use super::{TranscriptInput, ensure_configured};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub transcript: TranscriptInput,
    pub language: Option<String>,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalysisRequest>,
) -> Result<Json<TranscriptAnalysis>, ApiError> {
    ensure_configured(state.analysis.is_available(), "Transcript analysis")?;

    let analysis = state
        .analysis
        .analyze(&body.transcript.render(), body.language.as_deref())
        .await?;

    Ok(Json(analysis))
}
