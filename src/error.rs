//! Error type shared by the HTTP handlers.
//!
//! Every failure leaves the service as `{"error": "<message>"}` with a status
//! matching its class: caller mistakes are 4xx, infrastructure faults are 500
//! with details kept in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::calculator::CalcError;
use crate::users::UserError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Calculation(#[from] CalcError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Calculation(_) | AppError::Validation(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                error!(error = %e, "database error");
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                error!(error = %msg, "internal error");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::Conflict(what.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<axum::extract::rejection::PathRejection> for AppError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divide_by_zero_is_a_client_error_with_exact_text() {
        let err = AppError::from(CalcError::DivisionByZero);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Cannot divide by zero!");
    }

    #[test]
    fn non_finite_result_is_a_client_error() {
        let err = AppError::from(CalcError::NonFinite);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "Result is not a finite number");
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::Internal("argon2 blew up".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn conflict_and_not_found_statuses() {
        assert_eq!(AppError::conflict("Email").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::conflict("Email").to_string(),
            "Email already exists"
        );
        assert_eq!(AppError::not_found("User").status(), StatusCode::NOT_FOUND);
    }
}
