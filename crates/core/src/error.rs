use thiserror::Error;

/// Main error type for GameStats operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown app token: {0}")]
    UnknownToken(String),

    #[error("Integrity fault: session {session_id} references unknown app token {token}")]
    IntegrityFault { session_id: i64, token: String },

    #[error("User {0} is not active")]
    InactiveUser(i64),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

// Constraint violations come from rows the schema refuses, not from a failing store.
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => {
                Error::InvalidInput(format!("rejected by schema constraint: {}", err))
            }
            _ => Error::StorageUnavailable(err),
        }
    }
}

impl Error {
    /// Check if the underlying store could not serve the request
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Error::StorageUnavailable(_) | Error::Io(_))
    }

    /// Stable tag handed to the presentation layer
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnknownToken(_) => "UnknownToken",
            Error::IntegrityFault { .. } => "IntegrityFault",
            Error::InactiveUser(_) => "InactiveUser",
            Error::StorageUnavailable(_) | Error::Io(_) => "StorageUnavailable",
            Error::InvalidInput(_) | Error::Payload(_) => "InvalidInput",
            Error::Internal(_) => "Internal",
        }
    }
}
