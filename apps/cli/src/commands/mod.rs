//! Subcommands. Each module exposes an `XxxArgs` struct and a `run` function.

pub mod calc;
pub mod customer;
pub mod document;
pub mod template;

use std::str::FromStr;

use geruest_db::{Database, DbConfig};
use rust_decimal::Decimal;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Shared state handed to every command.
pub struct Context {
    pub config: AppConfig,
    pub json: bool,
}

impl Context {
    pub fn new(config: AppConfig, json: bool) -> Self {
        Context { config, json }
    }

    /// Opens the configured database and applies pending migrations.
    pub async fn open_db(&self) -> CliResult<Database> {
        info!(path = %self.config.db_path.display(), "Opening database");
        let db = Database::new(DbConfig::new(&self.config.db_path)).await?;
        Ok(db)
    }
}

/// Parses a decimal argument, accepting a German decimal comma ("7,5").
pub fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim().replace(',', ".").as_str())
        .map_err(|_| format!("'{}' is not a number", raw))
}

/// Turns "no such row" into a coded error.
pub fn require<T>(value: Option<T>, resource: &str, id: &str) -> CliResult<T> {
    value.ok_or_else(|| CliError::not_found(resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_accepts_comma() {
        assert_eq!(parse_decimal("7,5").unwrap(), dec!(7.5));
        assert_eq!(parse_decimal(" 19 ").unwrap(), dec!(19));
        assert_eq!(parse_decimal("-15.00").unwrap(), dec!(-15.00));
        assert!(parse_decimal("zehn").is_err());
    }

    #[test]
    fn test_require() {
        assert_eq!(require(Some(1), "Document", "x").unwrap(), 1);
        let err = require::<i32>(None, "Document", "A-2026-0001").unwrap_err();
        assert_eq!(err.message, "Document not found: A-2026-0001");
    }
}
