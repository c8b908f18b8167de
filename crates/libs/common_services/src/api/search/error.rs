use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use color_eyre::eyre;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("storage error")]
    Storage(#[from] std::io::Error),

    #[error("internal error")]
    Internal(#[from] eyre::Report),
}

fn log_error(error: &SearchError) {
    match error {
        SearchError::BadRequest(message) => warn!("Search -> Bad Request: {}", message),
        SearchError::Database(e) => error!("Database query failed: {}", e),
        SearchError::Storage(e) => error!("Could not stage search image: {}", e),
        SearchError::Internal(e) => error!("Internal error: {}", e),
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        log_error(&self);

        let (status, error_message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "A database error occurred.".to_string(),
            ),
            Self::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The search image could not be processed.".to_string(),
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

impl From<DbError> for SearchError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Sqlx(err) => Self::Database(err),
            DbError::Migrate(err) => Self::Internal(eyre::Report::new(err)),
        }
    }
}
