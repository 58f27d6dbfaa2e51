//! # Validation Module
//!
//! Input validation for line items, totals parameters and document fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (serde / FromStr)                                   │
//! │  └── Closed sets: PositionKind, DocumentStatus, TemplateCategory       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ranges: quantity >= 0, 0 <= percentage <= 100, rates >= 0         │
//! │  └── Formats: positions, document numbers, shortcodes, UUIDs           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL, UNIQUE, foreign keys                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Omitted values are never errors here; the calculator substitutes the
//! documented defaults. Only present-but-out-of-range values are rejected.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::LineItem;
use crate::MAX_PAYMENT_DAYS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn at_position(field: &str, position: &str) -> String {
    format!("{} (position {})", field, position)
}

// =============================================================================
// Line Item Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be zero or greater
pub fn validate_quantity(position: &str, quantity: Decimal) -> ValidationResult<()> {
    if quantity < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: at_position("quantity", position),
        });
    }

    Ok(())
}

/// Validates an optional billed percentage.
///
/// ## Rules
/// - Absent is fine
/// - Present values must lie in 0..=100
///
/// ## Example
/// ```rust
/// use geruest_core::validation::validate_percentage;
/// use rust_decimal::Decimal;
///
/// assert!(validate_percentage("01", None).is_ok());
/// assert!(validate_percentage("01", Some(Decimal::from(30))).is_ok());
/// assert!(validate_percentage("01", Some(Decimal::from(101))).is_err());
/// ```
pub fn validate_percentage(position: &str, percentage: Option<Decimal>) -> ValidationResult<()> {
    match percentage {
        Some(pct) if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED => {
            Err(ValidationError::OutOfRange {
                field: at_position("percentage", position),
                min: 0,
                max: 100,
            })
        }
        _ => Ok(()),
    }
}

/// Validates a position label ("01", "02", ...).
///
/// ## Rules
/// - Must not be empty
/// - At most 10 characters
pub fn validate_position_label(position: &str) -> ValidationResult<()> {
    let position = position.trim();

    if position.is_empty() {
        return Err(ValidationError::Required {
            field: "position".to_string(),
        });
    }

    if position.len() > 10 {
        return Err(ValidationError::TooLong {
            field: "position".to_string(),
            max: 10,
        });
    }

    Ok(())
}

/// Validates the fields the arithmetic depends on: quantity and percentage.
///
/// `unit_price` is unrestricted: negative prices are credit lines. The
/// position label is not looked at, so ad-hoc lines with any label compute.
pub fn validate_line_amounts(line: &LineItem) -> ValidationResult<()> {
    validate_quantity(&line.position, line.quantity)?;
    validate_percentage(&line.position, line.percentage)?;
    Ok(())
}

/// Validates a line before it is stored on a document: label plus amounts.
pub fn validate_line(line: &LineItem) -> ValidationResult<()> {
    validate_position_label(&line.position)?;
    validate_line_amounts(line)
}

// =============================================================================
// Rate & Discount Validators
// =============================================================================

fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a VAT rate in percent (19, 7, 0, ...).
pub fn validate_vat_rate(rate: Decimal) -> ValidationResult<()> {
    validate_non_negative("vat_rate", rate)
}

/// Validates a payment amount: strictly positive.
pub fn validate_payment_amount(amount: Decimal) -> ValidationResult<()> {
    validate_non_negative("payment amount", amount)?;
    if amount.is_zero() {
        return Err(ValidationError::InvalidFormat {
            field: "payment amount".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Validates a payment term in days (0..=[`MAX_PAYMENT_DAYS`]).
pub fn validate_payment_days(days: u32) -> ValidationResult<()> {
    if days > MAX_PAYMENT_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "payment_days".to_string(),
            min: 0,
            max: i64::from(MAX_PAYMENT_DAYS),
        });
    }
    Ok(())
}

/// Validates a discount percentage.
pub fn validate_discount_percent(percent: Decimal) -> ValidationResult<()> {
    validate_non_negative("discount_percent", percent)
}

/// Validates a fixed discount amount in euros.
pub fn validate_discount_amount(amount: Decimal) -> ValidationResult<()> {
    validate_non_negative("discount_amount", amount)
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a document number such as `A-2026-0007` or `R-2026-0142`.
///
/// ## Rules
/// - Three dash-separated parts
/// - Prefix `A` (quote) or `R` (invoice)
/// - Four-digit year
/// - Numeric sequence of at least four digits
pub fn validate_document_number(number: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "number".to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = number.trim().split('-').collect();
    let [prefix, year, sequence] = parts.as_slice() else {
        return Err(invalid("expected PREFIX-YYYY-NNNN"));
    };

    if *prefix != crate::QUOTE_NUMBER_PREFIX && *prefix != crate::INVOICE_NUMBER_PREFIX {
        return Err(invalid("prefix must be A or R"));
    }

    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("year must have four digits"));
    }

    if sequence.len() < 4 || !sequence.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("sequence must have at least four digits"));
    }

    Ok(())
}

/// Validates a position template shortcode (`EINR`, `MIETE4W`).
///
/// ## Rules
/// - 1 to 20 characters
/// - Uppercase ASCII letters and digits only
pub fn validate_shortcode(shortcode: &str) -> ValidationResult<()> {
    let shortcode = shortcode.trim();

    if shortcode.is_empty() {
        return Err(ValidationError::Required {
            field: "shortcode".to_string(),
        });
    }

    if shortcode.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "shortcode".to_string(),
            max: 20,
        });
    }

    if !shortcode
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "shortcode".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a required display name (template names, project names).
pub fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use geruest_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
