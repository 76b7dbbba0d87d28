use axum::{
    Json,
    extract::{Path, Query, State},
};
use bson::oid::ObjectId;
use clinivox_db::models::Doctor;
use serde::{Deserialize, Serialize};

use super::hex_id;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    pub specialization: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DoctorResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub years_of_experience: Option<u32>,
    pub languages: Vec<String>,
    pub is_available: bool,
}

impl From<Doctor> for DoctorResponse {
    fn from(d: Doctor) -> Self {
        Self {
            id: hex_id(d.id),
            user_id: d.user_id.to_hex(),
            name: d.name,
            email: d.email,
            specialization: d.specialization,
            years_of_experience: d.years_of_experience,
            languages: d.languages,
            is_available: d.is_available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorListResponse {
    pub items: Vec<DoctorResponse>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DoctorQuery>,
) -> Result<Json<DoctorListResponse>, ApiError> {
    let doctors = state.doctors.list(params.specialization.as_deref()).await?;

    Ok(Json(DoctorListResponse {
        items: doctors.into_iter().map(DoctorResponse::from).collect(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<DoctorResponse>, ApiError> {
    let id = ObjectId::parse_str(&doctor_id)
        .map_err(|_| ApiError::BadRequest("Invalid doctor_id".to_string()))?;

    let doctor = state.doctors.base.find_by_id(id).await?;
    Ok(Json(doctor.into()))
}
