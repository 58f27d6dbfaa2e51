//! # geruest-db: Database Layer for Gerüst ERP
//!
//! This crate provides database access for the Gerüst ERP system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gerüst ERP Data Flow                             │
//! │                                                                         │
//! │  CLI command (geruest show A-2026-0007)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     geruest-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ DocumentRepo   │   │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo   │   │              │  │   │
//! │  │   │ Connection    │    │ ProjectRepo    │   │              │  │   │
//! │  │   │ Management    │    │ TemplateRepo   │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                     ./geruest.db                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (documents, customers, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geruest_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./geruest.db")).await?;
//!
//! let quote = db.documents().get_by_number("A-2026-0007").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::document::{DocumentFilter, DocumentRepository};
pub use repository::project::ProjectRepository;
pub use repository::template::TemplateRepository;
