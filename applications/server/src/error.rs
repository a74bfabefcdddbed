/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use setlist_core::SetlistError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Required parameter '{0}' is missing")]
    MissingParameter(String),

    #[error("Parameter '{name}' has invalid value '{value}'")]
    InvalidParameter { name: String, value: String },

    #[error(transparent)]
    Playlist(#[from] SetlistError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<setlist_storage::StorageError> for ServerError {
    fn from(err: setlist_storage::StorageError) -> Self {
        // StorageError -> SetlistError -> ServerError
        ServerError::Playlist(err.into())
    }
}

impl ServerError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingParameter(name.into())
    }

    pub fn invalid(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Auth(_) | ServerError::Jwt(_) => "authentication_failed",
            ServerError::MissingParameter(_) => "missing_parameter",
            ServerError::InvalidParameter { .. } => "invalid_parameter",
            ServerError::Playlist(err) => match err {
                SetlistError::NotFound { .. } => "not_found",
                SetlistError::NotAuthorized => "not_authorized",
                SetlistError::InvalidOperation(_) => "invalid_operation",
                SetlistError::Validation(_) => "invalid_parameter",
                SetlistError::Storage(_) | SetlistError::Serialization(_) => "storage",
            },
            ServerError::Internal(_) | ServerError::Config(_) | ServerError::Bcrypt(_) => {
                "internal"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            "authentication_failed" => StatusCode::UNAUTHORIZED,
            "missing_parameter" | "invalid_parameter" => StatusCode::BAD_REQUEST,
            "not_found" => StatusCode::NOT_FOUND,
            "not_authorized" => StatusCode::FORBIDDEN,
            "invalid_operation" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        // Never leak internals to the client
        let message = if status.is_server_error() {
            tracing::error!(code, "Request failed: {:?}", self);
            match code {
                "storage" => "Storage error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            match &self {
                ServerError::Jwt(_) => "Invalid token".to_string(),
                other => other.to_string(),
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
