use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::error::DomainError;

/// Field-level detail carried in validation error responses.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// REST-surface error. Every failure serializes as
/// `{ "message": string, "errors"?: [{field, message}] }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            Self::BadRequest { message, errors } => {
                (StatusCode::BAD_REQUEST, message, Some(errors))
            }
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            Self::Internal(err) => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = ?err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::TicketNotFound { .. } => Self::NotFound("Ticket not found".to_string()),
            DomainError::Validation { field, message } => Self::BadRequest {
                message: "Invalid ticket data".to_string(),
                errors: vec![FieldError { field, message }],
            },
            DomainError::Database { message } => Self::Internal(anyhow::anyhow!(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400_with_field_detail() {
        let api: ApiError = DomainError::validation("email", "is not a valid address").into();
        match api {
            ApiError::BadRequest { ref errors, .. } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn database_errors_stay_opaque() {
        let api: ApiError = DomainError::database("connection refused").into();
        match api {
            ApiError::Internal(_) => {}
            other => panic!("expected Internal, got {other:?}"),
        }
        // The serialized body never carries the backend detail.
        let body = ErrorBody {
            message: "internal error".to_string(),
            errors: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("connection refused"));
        assert!(!json.contains("errors"));
    }
}
