//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line (`--db`)
//! 2. Environment variables (`GERUEST_*`)
//! 3. Defaults (this file)

use std::path::PathBuf;
use std::str::FromStr;

use geruest_core::validation::{validate_payment_days, validate_vat_rate};
use geruest_core::DEFAULT_VAT_RATE;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Company name printed in document headers
    pub company_name: String,

    /// VAT rate for new documents, in percent
    pub default_vat_rate: Decimal,

    /// Payment term filled into new invoices without one
    pub payment_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("./geruest.db"),
            company_name: "Gerüst ERP".to_string(),
            default_vat_rate: DEFAULT_VAT_RATE,
            payment_days: 14,
        }
    }
}

impl AppConfig {
    /// Loads defaults overridden by environment variables.
    ///
    /// ## Environment Variables
    /// - `GERUEST_DB_PATH`: database file
    /// - `GERUEST_COMPANY_NAME`: company name
    /// - `GERUEST_VAT_RATE`: default VAT rate in percent (e.g. "7")
    /// - `GERUEST_PAYMENT_DAYS`: invoice payment term in days
    pub fn from_env() -> Self {
        AppConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("GERUEST_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(name) = lookup("GERUEST_COMPANY_NAME") {
            config.company_name = name;
        }

        if let Some(raw) = lookup("GERUEST_VAT_RATE") {
            match Decimal::from_str(raw.trim().replace(',', ".").as_str()) {
                Ok(rate) if validate_vat_rate(rate).is_ok() => config.default_vat_rate = rate,
                _ => warn!(value = %raw, "Ignoring invalid GERUEST_VAT_RATE"),
            }
        }

        if let Some(raw) = lookup("GERUEST_PAYMENT_DAYS") {
            match raw.trim().parse::<u32>() {
                Ok(days) if validate_payment_days(days).is_ok() => config.payment_days = days,
                _ => warn!(value = %raw, "Ignoring invalid GERUEST_PAYMENT_DAYS"),
            }
        }

        config
    }

    /// Applies the `--db` flag.
    pub fn with_db_override(mut self, db: Option<PathBuf>) -> Self {
        if let Some(path) = db {
            self.db_path = path;
        }
        self
    }

    /// Default payment terms text for new invoices.
    pub fn payment_terms(&self) -> String {
        format!(
            "Zahlbar innerhalb von {} Tagen nach Rechnungsdatum ohne Abzug.",
            self.payment_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_vat_rate, dec!(19));
        assert_eq!(config.payment_days, 14);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GERUEST_DB_PATH", "/var/lib/geruest/erp.db"),
            ("GERUEST_COMPANY_NAME", "Nordgerüst GmbH"),
            ("GERUEST_VAT_RATE", "7,5"),
            ("GERUEST_PAYMENT_DAYS", "30"),
        ]));

        assert_eq!(config.db_path, PathBuf::from("/var/lib/geruest/erp.db"));
        assert_eq!(config.company_name, "Nordgerüst GmbH");
        assert_eq!(config.default_vat_rate, dec!(7.5));
        assert_eq!(config.payment_days, 30);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[
            ("GERUEST_VAT_RATE", "-19"),
            ("GERUEST_PAYMENT_DAYS", "two weeks"),
            ("GERUEST_DB_PATH", "  "),
        ]));
        assert_eq!(config, AppConfig::default());

        let config = AppConfig::from_lookup(lookup(&[("GERUEST_PAYMENT_DAYS", "400")]));
        assert_eq!(config.payment_days, 14);
    }

    #[test]
    fn test_db_flag_wins() {
        let config = AppConfig::from_lookup(lookup(&[("GERUEST_DB_PATH", "env.db")]))
            .with_db_override(Some(PathBuf::from("flag.db")));
        assert_eq!(config.db_path, PathBuf::from("flag.db"));

        let config = AppConfig::default().with_db_override(None);
        assert_eq!(config.db_path, PathBuf::from("./geruest.db"));
    }

    #[test]
    fn test_payment_terms_text() {
        let config = AppConfig {
            payment_days: 30,
            ..AppConfig::default()
        };
        assert!(config.payment_terms().contains("30 Tagen"));
    }
}
