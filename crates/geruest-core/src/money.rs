//! # Money Presentation
//!
//! Rounding and formatting of euro amounts. Display only: nothing in the
//! calculation path calls into this module except [`crate::Totals::rounded`].
//!
//! ## Why Round Late?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rounding between steps drifts:                                         │
//! │                                                                         │
//! │    net 0.999 → 1.00, VAT 19 % → 0.19, gross 1.19                        │
//! │    net 0.999, VAT 0.18981, gross 1.18881 → 1.19                         │
//! │                                                                         │
//! │  Same here, but across many lines and a discount the early-rounded      │
//! │  path diverges by cents. We keep full precision and round once.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use geruest_core::money::{format_eur, round_currency};
//! use rust_decimal::Decimal;
//!
//! assert_eq!(round_currency(Decimal::new(25645, 3)), Decimal::new(2565, 2));
//! assert_eq!(format_eur(Decimal::new(123456, 2)), "1.234,56 €");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of the euro.
pub const CURRENCY_DECIMALS: u32 = 2;

/// Rounds to whole cents, half away from zero (kaufmännisches Runden).
#[inline]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the German way: `1.234,56 €`, `-15,00 €`.
pub fn format_eur(amount: Decimal) -> String {
    let rounded = round_currency(amount);
    let negative = rounded < Decimal::ZERO;

    let plain = format!("{:.2}", rounded.abs());
    let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!(
        "{}{},{} €",
        if negative { "-" } else { "" },
        group_thousands(whole),
        frac
    )
}

/// Formats a rate for labels: `19 %`, `7,5 %`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{} %", rate.normalize().to_string().replace('.', ","))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_midpoint_away_from_zero() {
        assert_eq!(round_currency(dec!(25.645)), dec!(25.65));
        assert_eq!(round_currency(dec!(0.005)), dec!(0.01));
        assert_eq!(round_currency(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_currency(dec!(1.18881)), dec!(1.19));
        assert_eq!(round_currency(dec!(123.5)), dec!(123.50));
    }

    #[test]
    fn test_format_eur() {
        assert_eq!(format_eur(dec!(0)), "0,00 €");
        assert_eq!(format_eur(dec!(160.65)), "160,65 €");
        assert_eq!(format_eur(dec!(773.5)), "773,50 €");
        assert_eq!(format_eur(dec!(1234.567)), "1.234,57 €");
        assert_eq!(format_eur(dec!(1234567.8)), "1.234.567,80 €");
        assert_eq!(format_eur(dec!(-15)), "-15,00 €");
    }

    #[test]
    fn test_format_eur_tiny_negative_is_not_signed() {
        assert_eq!(format_eur(dec!(-0.001)), "0,00 €");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(19)), "19 %");
        assert_eq!(format_percent(dec!(7.50)), "7,5 %");
        assert_eq!(format_percent(dec!(0)), "0 %");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1.000");
        assert_eq!(group_thousands("123456"), "123.456");
    }
}
