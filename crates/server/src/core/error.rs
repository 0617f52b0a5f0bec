use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::core::response::ApiResponse;
use crate::core::validate::FieldError;

/// Message sent to clients for every non-validation failure.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Client Errors
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("malformed request body: {0}")]
    InvalidBody(String),

    // Model Errors
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    // Generic
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Error::Validation(vec![FieldError::new(field, message)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::Validation(_) | Error::InvalidBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            Error::Validation(errors) => ApiResponse::<()>::invalid(errors),
            Error::InvalidBody(reason) => {
                ApiResponse::<()>::invalid(vec![FieldError::new("body", reason)])
            }
            other => {
                // The cause stays server-side.
                error!("{}", other);
                ApiResponse::<()>::failure(INTERNAL_SERVER_ERROR)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Internal(format!("background task failed: {err}"))
    }
}
