pub mod analysis;
pub mod auth;
pub mod doctor;
pub mod prescreening;
pub mod prescription;
pub mod speech;
pub mod translate;

use bson::oid::ObjectId;
use clinivox_services::clinical::analysis::render_utterances;
use clinivox_services::diarization::Utterance;
use serde::Deserialize;

use crate::error::ApiError;

/// A transcript as clients send it back: either the diarized list returned
/// by `/api/speech/transcribe` or free text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TranscriptInput {
    Utterances(Vec<Utterance>),
    Text(String),
}

impl TranscriptInput {
    pub fn render(&self) -> String {
        match self {
            TranscriptInput::Utterances(utterances) => render_utterances(utterances),
            TranscriptInput::Text(text) => text.trim().to_string(),
        }
    }
}

/// Fails fast with 503 when the upstream behind a handler has no API key.
fn ensure_configured(available: bool, what: &str) -> Result<(), ApiError> {
    if available {
        Ok(())
    } else {
        Err(ApiError::ServiceUnavailable(format!("{what} is not configured")))
    }
}

fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
