use axum::{
    Json,
    extract::{Multipart, State},
};
use clinivox_services::diarization::{Utterance, build_transcript};
use clinivox_services::speech::RecognitionOptions;
use clinivox_services::upstream::UpstreamError;
use serde::Serialize;
use tracing::{debug, info};

use super::ensure_configured;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub transcript: Vec<Utterance>,
}

/// POST /api/speech/transcribe
///
/// Multipart upload: `audio` (required file), plus optional `language`,
/// `encoding`, `sample_rate`, `min_speakers` and `max_speakers` text fields.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    ensure_configured(state.speech.is_available(), "Speech recognition")?;

    let mut audio: Option<Vec<u8>> = None;
    let mut options = RecognitionOptions::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => audio = Some(field.bytes().await?.to_vec()),
            "language" => options.language = non_empty(field.text().await?),
            "encoding" => {
                options.encoding = non_empty(field.text().await?).map(|e| e.to_uppercase())
            }
            "sample_rate" => options.sample_rate = parse_number(&name, field.text().await?)?,
            "min_speakers" => options.min_speakers = parse_number(&name, field.text().await?)?,
            "max_speakers" => options.max_speakers = parse_number(&name, field.text().await?)?,
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let audio = audio
        .filter(|a| !a.is_empty())
        .ok_or_else(|| ApiError::BadRequest("No audio file uploaded".to_string()))?;

    let words = match state.speech.recognize(&audio, &options).await {
        Ok(words) => words,
        Err(UpstreamError::NoResult(_)) => {
            return Err(ApiError::Validation(
                "No speech could be recognized".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let transcript = build_transcript(&words);
    info!(
        bytes = audio.len(),
        words = words.len(),
        utterances = transcript.len(),
        "Audio transcribed"
    );

    Ok(Json(TranscribeResponse { transcript }))
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_number(field: &str, value: String) -> Result<Option<u32>, ApiError> {
    non_empty(value)
        .map(|v| {
            v.parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("{field} must be a positive integer")))
        })
        .transpose()
}
