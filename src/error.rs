use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors that cross the HTTP boundary. Everything infrastructure-related
/// (store, mail) is absorbed and logged before it can reach this type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("All fields are required")]
    MissingField,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid query parameters")]
    InvalidQuery,

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Catch-all for failures no other variant classifies. The submission
    /// path absorbs store and mail errors before they get here, so this is
    /// only reachable through `?` on something genuinely unexpected.
    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingField | AppError::InvalidEmail | AppError::InvalidQuery => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "success": false, "message": self.to_string() }));

        (status, body).into_response()
    }
}

/// Store-side failures. Callers downgrade these to logs plus empty/zero
/// results; they never become an HTTP error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unconfigured or unreachable")]
    Unavailable,

    #[error(transparent)]
    Backend(#[from] mongodb::error::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(status_of(AppError::MissingField), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::InvalidEmail), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::InvalidQuery), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::NotFound("Project")), StatusCode::NOT_FOUND);

        let internal = AppError::Internal("boom".into());
        assert_eq!(status_of(internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
