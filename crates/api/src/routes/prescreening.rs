use axum::{Json, extract::State};
use clinivox_services::clinical::prescreening::{DialogueTurn, PrescreeningReply};
use serde::Deserialize;

use super::ensure_configured;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct PrescreeningRequest {
    #[serde(default)]
    pub messages: Vec<DialogueTurn>,
    pub language: Option<String>,
}

/// POST /api/prescreening
///
/// Returns the assistant's next message. The client appends it to
/// `messages` together with the patient's answer and posts again.
pub async fn next_turn(
    State(state): State<AppState>,
    Json(body): Json<PrescreeningRequest>,
) -> Result<Json<PrescreeningReply>, ApiError> {
    ensure_configured(state.prescreening.is_available(), "Pre-screening")?;

    let reply = state
        .prescreening
        .next_turn(&body.messages, body.language.as_deref())
        .await?;

    Ok(Json(reply))
}
