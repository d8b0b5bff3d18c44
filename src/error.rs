// ⚠️ Error taxonomy for the directory and account registry
//
// Every variant is a client-facing condition. The HTTP layer turns each one
// into a `{message}` body with the matching status code; nothing escapes as
// an unhandled fault. Search never produces an error.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Missing or empty required field (signup, login, malformed body)
    #[error("{0}")]
    InvalidInput(String),

    /// Signup with an email that is already registered
    #[error("User already exists")]
    DuplicateAccount,

    /// Login with unknown email or wrong password
    #[error("Invalid credentials")]
    Unauthorized,

    /// Lookup of an unknown record
    #[error("{0} not found")]
    NotFound(String),
}

impl DirectoryError {
    /// Short machine-readable tag, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            DirectoryError::InvalidInput(_) => "invalid_input",
            DirectoryError::DuplicateAccount => "duplicate_account",
            DirectoryError::Unauthorized => "unauthorized",
            DirectoryError::NotFound(_) => "not_found",
        }
    }
}

#[cfg(feature = "server")]
mod http {
    use super::DirectoryError;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use serde_json::json;

    impl DirectoryError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                DirectoryError::InvalidInput(_) | DirectoryError::DuplicateAccount => {
                    StatusCode::BAD_REQUEST
                }
                DirectoryError::Unauthorized => StatusCode::UNAUTHORIZED,
                DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            }
        }
    }

    impl IntoResponse for DirectoryError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            tracing::warn!(
                error_type = self.error_type(),
                status = status.as_u16(),
                details = %self,
                "Request rejected"
            );

            (status, Json(json!({ "message": self.to_string() }))).into_response()
        }
    }
}
