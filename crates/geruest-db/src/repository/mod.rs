//! # Repository Module
//!
//! Database repository implementations for Gerüst ERP.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  db.documents().get_by_number("A-2026-0007")                   │
//! │       ▼                                                                 │
//! │  DocumentRepository                                                    │
//! │  ├── insert(&self, document)                                           │
//! │  ├── get_by_id / get_by_number                                         │
//! │  ├── save(&self, &mut document)   ← optimistic version check           │
//! │  ├── list(&self, filter)                                               │
//! │  └── next_number(&self, kind, year)                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`document::DocumentRepository`] - Quotes and invoices
//! - [`customer::CustomerRepository`] - Customer lookup
//! - [`project::ProjectRepository`] - Construction projects per customer
//! - [`template::TemplateRepository`] - Text snippets and position templates

pub mod customer;
pub mod document;
pub mod project;
pub mod template;

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::DbResult;

/// Parses a decimal stored as TEXT.
pub(crate) fn decimal_from_text(text: &str) -> DbResult<Decimal> {
    Ok(Decimal::from_str(text.trim())?)
}

pub(crate) fn optional_decimal(text: Option<String>) -> DbResult<Option<Decimal>> {
    text.as_deref().map(decimal_from_text).transpose()
}
