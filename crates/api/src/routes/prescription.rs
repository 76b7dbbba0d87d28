use axum::{Json, extract::State};
use clinivox_services::clinical::prescription::{ConsultationNotes, PatientInfo, Prescription};
use serde::Deserialize;

use super::{TranscriptInput, ensure_configured};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct PrescriptionRequest {
    #[serde(default)]
    pub patient: PatientInfo,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub transcript: Option<TranscriptInput>,
    pub language: Option<String>,
}

pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<PrescriptionRequest>,
) -> Result<Json<Prescription>, ApiError> {
    let notes = ConsultationNotes {
        symptoms: body.symptoms,
        diagnosis: body.diagnosis,
        notes: body.notes,
        transcript: body.transcript.as_ref().map(TranscriptInput::render),
    };

    ensure_configured(state.prescriptions.is_available(), "Prescription drafting")?;

    let prescription = state
        .prescriptions
        .generate(&body.patient, &notes, body.language.as_deref())
        .await?;

    Ok(Json(prescription))
}
