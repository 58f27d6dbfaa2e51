//! # geruest-core: Pure Business Logic for Gerüst ERP
//!
//! This crate holds the quote ("Angebot") and invoice ("Rechnung") arithmetic
//! of the scaffolding ERP as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gerüst ERP Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    geruest CLI (apps/cli)                       │   │
//! │  │    calc, show, list, status, invoice-from-quote, compare        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ geruest-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │   types   │  │ calculator │  │ document  │  │ validation│ │   │
//! │  │   │ LineItem  │  │  Totals    │  │ Document  │  │   rules   │ │   │
//! │  │   │ Customer  │  │ TotalsPar. │  │ lifecycle │  │  checks   │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 geruest-db (Database Layer)                     │   │
//! │  │        SQLite, migrations, repositories, optimistic locking     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Customer, templates, statuses)
//! - [`calculator`] - `compute_totals` and its derived projections
//! - [`document`] - Quote/invoice document with its edit lifecycle
//! - [`money`] - Rounding and German currency formatting (display only)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, no hidden state
//! 2. **Exact Decimals**: amounts are `rust_decimal::Decimal`, never `f64`
//! 3. **Round Late**: totals keep full precision, rounding happens only in [`money`]
//! 4. **Explicit Errors**: invalid input is a typed error raised before any math
//!
//! ## Example Usage
//!
//! ```rust
//! use geruest_core::calculator::{compute_totals, TotalsParams};
//! use geruest_core::types::{LineItem, PositionKind};
//! use rust_decimal::Decimal;
//!
//! let lines = vec![
//!     LineItem::new("01", PositionKind::Material, Decimal::from(10), Decimal::new(1500, 2)),
//!     LineItem::new("02", PositionKind::Rental, Decimal::ONE, Decimal::from(500)),
//! ];
//!
//! let params = TotalsParams::new()
//!     .discount_percent(Decimal::TEN)
//!     .exclude(PositionKind::Rental);
//!
//! let totals = compute_totals(&lines, &params).unwrap();
//! assert_eq!(totals.gross, Decimal::new(16065, 2)); // 160.65 €
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod document;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{compute_totals, net_from_gross, Totals, TotalsParams};
pub use document::Document;
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// German standard VAT rate ("Regelsteuersatz") in percent.
///
/// Used whenever a caller omits the VAT rate.
pub const DEFAULT_VAT_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 0);

/// Maximum number of line items in a single document.
///
/// ## Business Reason
/// Scaffolding quotes rarely exceed a few dozen positions; a hard cap keeps
/// typos in bulk imports from producing runaway documents.
pub const MAX_DOCUMENT_LINES: usize = 500;

/// Longest accepted invoice payment term, in days.
pub const MAX_PAYMENT_DAYS: u32 = 365;

/// Number prefix for quotes ("Angebot").
pub const QUOTE_NUMBER_PREFIX: &str = "A";

/// Number prefix for invoices ("Rechnung").
pub const INVOICE_NUMBER_PREFIX: &str = "R";
