//! # Error Types
//!
//! Domain-specific error types for geruest-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  geruest-core errors (this file)                                       │
//! │  ├── CoreError        - Lifecycle and arithmetic failures              │
//! │  └── ValidationError  - Input validation failures (InvalidInput)       │
//! │                                                                         │
//! │  geruest-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── CliError         - Coded error printed to the user                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → Terminal     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation before any computation ran.
    ///
    /// ## When This Occurs
    /// - Negative quantity on a line
    /// - Percentage outside 0..=100
    /// - Negative VAT rate, discount percent or discount amount
    /// - Unknown position kind at the boundary
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The document reached a terminal status and is immutable.
    ///
    /// ## User Workflow
    /// ```text
    /// Quote A-2026-0012 (accepted)
    ///      │
    ///      ▼
    /// add_line(...)
    ///      │
    ///      ▼
    /// DocumentLocked { number: "A-2026-0012", status: "accepted" }
    /// ```
    #[error("Document {number} is {status} and can no longer be edited")]
    DocumentLocked { number: String, status: String },

    /// The requested status change is not part of the document's lifecycle.
    #[error("Document {number} cannot change from {from} to {to}")]
    InvalidStatusTransition {
        number: String,
        from: String,
        to: String,
    },

    /// No line with the given position exists in the document.
    #[error("Document {number} has no position {position}")]
    LineNotFound { number: String, position: String },

    /// Operation needs a different document kind (e.g. invoicing a non-quote).
    #[error("Document {number} is a {actual}, expected a {expected}")]
    WrongDocumentKind {
        number: String,
        expected: String,
        actual: String,
    },

    /// Only accepted quotes can be turned into invoices.
    #[error("Quote {number} is {status}; only accepted quotes can be invoiced")]
    QuoteNotAccepted { number: String, status: String },

    /// Document has exceeded maximum allowed lines.
    #[error("Document cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// An intermediate amount exceeded the decimal range.
    #[error("Amount overflow while computing {step}")]
    AmountOverflow { step: &'static str },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before business logic runs. Field names carry
/// the line position where one applies, e.g. `quantity (position 02)`.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid document number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DocumentLocked {
            number: "A-2026-0012".to_string(),
            status: "accepted".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Document A-2026-0012 is accepted and can no longer be edited"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustNotBeNegative {
            field: "quantity (position 02)".to_string(),
        };
        assert_eq!(err.to_string(), "quantity (position 02) must not be negative");

        let err = ValidationError::OutOfRange {
            field: "percentage".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "percentage must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::Required {
            field: "position".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
    }
}
