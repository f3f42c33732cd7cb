//! Error types for the CourseBundler backend.
//!
//! This module defines the `AppError` enum which represents every failure
//! the services, the storage layer and the statistics core can report.

use thiserror::Error;

/// The main error type for CourseBundler operations.
///
/// Variants are grouped by concern. The HTTP layer maps them to responses
/// through [`AppError::status_code`].
#[derive(Debug, Error)]
pub enum AppError {
    // ==================== Validation Errors ====================
    /// A required field is missing.
    #[error("Please enter all the fields: missing '{field}'")]
    MissingField { field: String },

    /// A field value is invalid.
    #[error("Invalid field value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The email format is invalid.
    #[error("Invalid email format")]
    InvalidEmail,

    // ==================== Access Errors ====================
    /// No authenticated user is attached to the request.
    #[error("Please login to access this resource")]
    Unauthenticated,

    /// The authenticated user lacks the required role or subscription.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // ==================== Lookup Errors ====================
    /// The requested record was not found.
    #[error("Record not found: {entity} with {key}={value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    /// A unique constraint was violated (e.g., duplicate email).
    #[error("Duplicate entry: {entity} with {field}={value} already exists")]
    DuplicateEntry {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== Statistics Errors ====================
    /// A change trigger fired before any snapshot row was seeded.
    #[error("No current statistics snapshot exists")]
    MissingCurrentSnapshot,

    /// A conditional snapshot update lost the race against another writer.
    #[error("Snapshot version conflict: expected {expected}, found {found}")]
    SnapshotConflict { expected: u64, found: u64 },

    // ==================== Collaborator Errors ====================
    /// The media storage service failed.
    #[error("Media storage error: {message}")]
    MediaError { message: String },

    /// The payment gateway failed.
    #[error("Payment gateway error: {message}")]
    PaymentError { message: String },

    /// A payment signature did not match.
    #[error("Payment signature verification failed")]
    InvalidSignature,

    /// Outbound email delivery failed.
    #[error("Mail delivery error: {message}")]
    MailError { message: String },

    // ==================== Internal Errors ====================
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    InternalError { message: String },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },
}

impl AppError {
    /// Creates a new missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a new invalid field error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a new duplicate entry error.
    pub fn duplicate(entity: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new media storage error.
    pub fn media(message: impl Into<String>) -> Self {
        Self::MediaError {
            message: message.into(),
        }
    }

    /// Creates a new payment gateway error.
    pub fn payment(message: impl Into<String>) -> Self {
        Self::PaymentError {
            message: message.into(),
        }
    }

    /// Creates a new mail delivery error.
    pub fn mail(message: impl Into<String>) -> Self {
        Self::MailError {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if this is a user-facing error (vs internal).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidField { .. }
                | Self::InvalidEmail
                | Self::Unauthenticated
                | Self::Forbidden(_)
                | Self::NotFound { .. }
                | Self::DuplicateEntry { .. }
                | Self::InvalidSignature
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingField { .. }
            | Self::InvalidField { .. }
            | Self::InvalidEmail
            | Self::InvalidSignature => 400,
            Self::Unauthenticated => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::DuplicateEntry { .. } | Self::SnapshotConflict { .. } => 409,
            Self::MediaError { .. } | Self::PaymentError { .. } | Self::MailError { .. } => 502,
            _ => 500,
        }
    }
}

/// A Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::MissingCurrentSnapshot;
        assert_eq!(err.to_string(), "No current statistics snapshot exists");

        let err = AppError::missing("title");
        assert_eq!(err.to_string(), "Please enter all the fields: missing 'title'");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::missing("name").status_code(), 400);
        assert_eq!(AppError::Unauthenticated.status_code(), 401);
        assert_eq!(AppError::Forbidden("admin only".into()).status_code(), 403);
        assert_eq!(AppError::not_found("course", "id", "c1").status_code(), 404);
        assert_eq!(AppError::duplicate("user", "email", "a@b.io").status_code(), 409);
        assert_eq!(
            AppError::SnapshotConflict { expected: 1, found: 2 }.status_code(),
            409
        );
        assert_eq!(AppError::MissingCurrentSnapshot.status_code(), 500);
        assert_eq!(AppError::media("down").status_code(), 502);
    }

    #[test]
    fn test_is_user_error() {
        assert!(AppError::InvalidEmail.is_user_error());
        assert!(!AppError::MissingCurrentSnapshot.is_user_error());
        assert!(!AppError::internal("boom").is_user_error());
    }

    #[test]
    fn test_infrastructure_errors_are_server_side() {
        let err: AppError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::SerializationError { .. }));
        assert_eq!(err.status_code(), 500);
        assert_eq!(AppError::internal("boom").status_code(), 500);
    }
}
