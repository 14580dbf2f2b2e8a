use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Please provide a valid list of ingredients.")]
    EmptyQuery,

    #[error("No matching recipe found for the given ingredients.")]
    NoMatch,

    #[error("Username or email already exists. Please choose a different one.")]
    DuplicateAccount,

    #[error("Invalid username or password. Please try again.")]
    InvalidCredentials,

    #[error("User not found")]
    SessionNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    SessionStore(#[from] redis::RedisError),

    #[error("Narration error: {0}")]
    Narration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::EmptyQuery => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NoMatch => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::DuplicateAccount => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidCredentials | AppError::SessionNotFound => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            // Internal details go to the logs, never to the client.
            AppError::Database(_)
            | AppError::SessionStore(_)
            | AppError::Narration(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
