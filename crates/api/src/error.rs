use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use clinivox_services::auth::AuthError;
use clinivox_services::clinical::ClinicalError;
use clinivox_services::dao::base::DaoError;
use clinivox_services::upstream::UpstreamError;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    Validation(String),
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation", msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "bad_gateway", msg),
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DaoError> for ApiError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            DaoError::DuplicateKey(_) => {
                ApiError::Conflict("An account with this email already exists".to_string())
            }
            DaoError::Mongo(e) => {
                error!(error = %e, "Database error");
                ApiError::Internal("Database error".to_string())
            }
            DaoError::UnexpectedId => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::HashError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotConfigured(_) | UpstreamError::RateLimited(_) => {
                ApiError::ServiceUnavailable(err.to_string())
            }
            UpstreamError::Http { .. }
            | UpstreamError::Status { .. }
            | UpstreamError::Decode { .. }
            | UpstreamError::NoResult(_) => {
                error!(error = %err, "Upstream call failed");
                ApiError::BadGateway(err.to_string())
            }
        }
    }
}

impl From<ClinicalError> for ApiError {
    fn from(err: ClinicalError) -> Self {
        match err {
            ClinicalError::InvalidInput(msg) => ApiError::Validation(msg),
            ClinicalError::MalformedOutput(_) => {
                error!(error = %err, "Unusable model output");
                ApiError::BadGateway(err.to_string())
            }
            ClinicalError::Upstream(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
