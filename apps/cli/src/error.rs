//! # CLI Error Type
//!
//! Unified error type for all commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  Command Function  →  Result<(), CliError>                              │
//! │         │                                                               │
//! │         ├── DbError::NotFound ──────────────┐                           │
//! │         ├── DbError::VersionConflict ───────┤                           │
//! │         ├── CoreError::InvalidInput ────────┼──► CliError { code, msg } │
//! │         ├── CoreError::DocumentLocked ──────┤          │                │
//! │         └── io / JSON input errors ─────────┘          ▼                │
//! │                                             stderr: [CONFLICT] ...      │
//! │                                             exit status: code-specific  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use geruest_core::CoreError;
use geruest_db::DbError;
use serde::Serialize;

/// Error printed by the CLI before exiting with a non-zero status.
///
/// With `--json` it is printed as:
/// ```json
/// { "code": "NOT_FOUND", "message": "Document not found: A-2026-0099" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, stable for scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Concurrent modification or duplicate key
    Conflict,

    /// Lifecycle rule violated (locked document, illegal transition)
    BusinessLogic,

    DatabaseError,

    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::BusinessLogic => "BUSINESS_LOGIC",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::Conflict => 4,
            ErrorCode::BusinessLogic => 5,
            ErrorCode::DatabaseError => 6,
            ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => CliError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::VersionConflict { .. } => CliError::new(
                ErrorCode::Conflict,
                format!("{}; reload and try again", err),
            ),
            DbError::Locked { .. } => CliError::new(ErrorCode::BusinessLogic, err.to_string()),
            DbError::Domain(core) => CliError::from(core),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::validation("Invalid reference to customer, project or quote")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored data could not be decoded: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Stored document is corrupt")
            }
            DbError::ConnectionFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database connection failed: {}", e),
            ),
            DbError::MigrationFailed(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Database migration failed: {}", e),
            ),
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidInput(_) | CoreError::TooManyLines { .. } => {
                ErrorCode::ValidationError
            }
            CoreError::LineNotFound { .. } => ErrorCode::NotFound,
            CoreError::DocumentLocked { .. }
            | CoreError::InvalidStatusTransition { .. }
            | CoreError::WrongDocumentKind { .. }
            | CoreError::QuoteNotAccepted { .. } => ErrorCode::BusinessLogic,
            CoreError::AmountOverflow { .. } => ErrorCode::Internal,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<geruest_core::ValidationError> for CliError {
    fn from(err: geruest_core::ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CliError::validation(format!("Invalid JSON input: {}", err))
        } else {
            CliError::internal(format!("JSON error: {}", err))
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_codes() {
        let conflict: CliError = DbError::VersionConflict {
            id: "d1".to_string(),
            expected: 1,
            found: 2,
        }
        .into();
        assert_eq!(conflict.code, ErrorCode::Conflict);

        let missing: CliError = DbError::not_found("Document", "A-2026-0099").into();
        assert_eq!(missing.code, ErrorCode::NotFound);
        assert_eq!(missing.to_string(), "[NOT_FOUND] Document not found: A-2026-0099");

        let duplicate: CliError = DbError::duplicate("document number", "A-2026-0001").into();
        assert_eq!(duplicate.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_core_errors_map_to_codes() {
        let locked: CliError = CoreError::DocumentLocked {
            number: "A-2026-0001".to_string(),
            status: "accepted".to_string(),
        }
        .into();
        assert_eq!(locked.code, ErrorCode::BusinessLogic);

        let nested: CliError = DbError::Domain(CoreError::TooManyLines { max: 500 }).into();
        assert_eq!(nested.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_json_serialization() {
        let err = CliError::validation("quantity (position 02) must not be negative");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(
            json,
            r#"{"code":"VALIDATION_ERROR","message":"quantity (position 02) must not be negative"}"#
        );
    }

    #[test]
    fn test_exit_codes_are_non_zero() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::ValidationError,
            ErrorCode::Conflict,
            ErrorCode::BusinessLogic,
            ErrorCode::DatabaseError,
            ErrorCode::Internal,
        ] {
            assert_ne!(code.exit_code(), 0);
        }
    }
}
