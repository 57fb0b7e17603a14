use crate::models::PostError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Body had the wrong encoding or could not be decoded.
    MalformedCheep,
    /// Body decoded but the cheep failed validation.
    InvalidCheep(PostError),
    NotSignedIn,
    TooManyAttempts,
    /// The store did not accept a write.
    WriteFailed(StoreError),
    Timeout,
    InternalError(String),
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        ApiError::InvalidCheep(err)
    }
}

/// Errors answer with a status and a short plain-text message.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MalformedCheep => (
                StatusCode::BAD_REQUEST,
                "Cheep was not well formed".to_string(),
            ),
            ApiError::InvalidCheep(err) => (
                StatusCode::BAD_REQUEST,
                format!("Cheep was not well formed: {}", err),
            ),
            ApiError::NotSignedIn => (
                StatusCode::BAD_REQUEST,
                "You need to login to cheep".to_string(),
            ),
            ApiError::TooManyAttempts => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts, try again in a minute".to_string(),
            ),
            ApiError::WriteFailed(err) => {
                error!("Cheep write failed: {}", err);
                (StatusCode::BAD_GATEWAY, "Could not save cheep".to_string())
            }
            ApiError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "Request took too long".to_string(),
            ),
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
