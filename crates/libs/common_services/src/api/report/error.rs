use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Storage error")]
    Storage(#[from] std::io::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &ReportError) {
    match error {
        ReportError::BadRequest(message) => warn!("Report found item -> Bad Request: {}", message),
        ReportError::Database(e) => error!("Database query failed: {}", e),
        ReportError::Storage(e) => error!("Could not store uploaded image: {}", e),
        ReportError::Internal(e) => error!("Internal error: {:?}", e),
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred, the item was not saved.".to_string(),
            ),
            Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The image could not be stored, the item was not saved.".to_string(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected internal error occurred.".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<DbError> for ReportError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(err) => Self::Database(err),
            DbError::Migrate(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
