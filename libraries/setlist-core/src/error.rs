/// Core error types for Setlist
use thiserror::Error;

/// Result type alias using `SetlistError`
pub type Result<T> = std::result::Result<T, SetlistError>;

/// Core error type for Setlist
///
/// Each variant is a distinct failure class that the HTTP layer maps to its
/// own stable response code.
#[derive(Error, Debug)]
pub enum SetlistError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: String,
        /// Identifier that did not resolve
        id: String,
    },

    /// The acting user is not the owner of the entity
    #[error("Not authorized")]
    NotAuthorized,

    /// Structurally disallowed edit (e.g. track edits on a smart playlist)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Required input missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Opaque failure from the underlying store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl SetlistError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error is a not-found for any entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for SetlistError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
