use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::queue::QueueError;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("record not found")]
    NotFound,
    #[error("duplicate record")]
    Duplicate,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("failed to enqueue webhook task: {0}")]
    Enqueue(#[from] QueueError),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::Duplicate,
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Duplicate => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Enqueue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> i32 {
        match self {
            AppError::NotFound => error_codes::NOT_FOUND,
            AppError::Duplicate => error_codes::DUPLICATE,
            AppError::Validation(_) => error_codes::VALIDATION_ERROR,
            AppError::Database(_) => error_codes::INTERNAL_ERROR,
            AppError::Enqueue(_) => error_codes::QUEUE_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = error_to_api_response::<()>(self.error_code(), self.to_string());

        (status, body).into_response()
    }
}
