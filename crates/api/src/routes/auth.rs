use axum::{Json, extract::State, http::StatusCode};
use clinivox_db::models::{Doctor, Role, User};
use clinivox_services::dao::{base::DaoError, doctor::NewDoctor, user::NewUser};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::{doctor::DoctorResponse, hex_id};
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorResponse>,
}

impl UserResponse {
    fn new(user: User, doctor: Option<Doctor>) -> Self {
        Self {
            id: hex_id(user.id),
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            doctor: doctor.map(DoctorResponse::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(mut body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    body.name = body.name.trim().to_string();
    body.email = body.email.trim().to_string();
    body.validate()?;

    let specialization = match body.role {
        Role::Doctor => Some(
            body.specialization
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    ApiError::Validation("specialization is required for doctors".to_string())
                })?
                .to_string(),
        ),
        Role::Patient => None,
    };

    let password_hash = state.auth.hash_password(&body.password)?;

    let user = state
        .users
        .create(NewUser {
            name: body.name,
            email: body.email,
            password_hash,
            role: body.role,
            phone: body.phone.filter(|p| !p.trim().is_empty()),
        })
        .await?;

    let user_id = user
        .id
        .ok_or_else(|| ApiError::Internal("Stored user has no id".to_string()))?;

    let doctor = match specialization {
        Some(specialization) => {
            let created = state
                .doctors
                .create(NewDoctor {
                    user_id,
                    name: user.name.clone(),
                    email: user.email.clone(),
                    specialization,
                    years_of_experience: body.years_of_experience,
                    languages: body.languages,
                })
                .await;
            match created {
                Ok(doctor) => Some(doctor),
                Err(e) => {
                    // Roll back the account so the email can be reused.
                    warn!(%user_id, error = %e, "Doctor profile creation failed");
                    state.users.delete(user_id).await?;
                    return Err(e.into());
                }
            }
        }
        None => None,
    };

    info!(%user_id, role = user.role.as_str(), "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user: UserResponse::new(user, doctor),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = match state.users.find_by_email(&body.email).await {
        Ok(user) => user,
        Err(DaoError::NotFound) => return Err(invalid()),
        Err(e) => return Err(e.into()),
    };

    state
        .auth
        .check_credentials(&body.password, &user.password_hash)?;

    let user_id = user.id.ok_or_else(invalid)?;
    state.users.touch_last_login(user_id).await?;

    let doctor = match user.role {
        Role::Doctor => match state.doctors.find_by_user_id(user_id).await {
            Ok(doctor) => Some(doctor),
            Err(DaoError::NotFound) => None,
            Err(e) => return Err(e.into()),
        },
        Role::Patient => None,
    };

    info!(%user_id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserResponse::new(user, doctor),
    }))
}
