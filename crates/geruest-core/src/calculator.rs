//! # Totals Calculator
//!
//! The one shared implementation of quote/invoice arithmetic.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute_totals(lines, params)                                          │
//! │                                                                         │
//! │  0. validate params + every line ──► InvalidInput, nothing computed    │
//! │  1. drop lines whose kind ∈ exclude_kinds   (quotes: rental)            │
//! │  2. contribution = qty × price [× pct/100 when pct > 0]                 │
//! │  3. subtotal   = Σ contributions (line order)                           │
//! │  4. discount   = subtotal × pct/100  if discount_percent > 0            │
//! │                  else discount_amount (default 0)                       │
//! │  5. net        = max(0, subtotal − discount)                            │
//! │  6. vat_amount = net × vat_rate/100  (vat_rate default 19)              │
//! │  7. gross      = net + vat_amount                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No step rounds. Use [`Totals::rounded`] or [`crate::money`] for display.
//!
//! [`net_from_gross`] runs the VAT step backwards for amounts booked gross
//! (receipts, payments): `net = gross / (1 + vat_rate/100)`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::round_currency;
use crate::types::{LineItem, PositionKind};
use crate::validation;
use crate::DEFAULT_VAT_RATE;

// =============================================================================
// Parameters
// =============================================================================

/// Tax and discount configuration for one computation.
///
/// ## Example
/// ```rust
/// use geruest_core::calculator::TotalsParams;
/// use geruest_core::types::PositionKind;
/// use rust_decimal::Decimal;
///
/// let params = TotalsParams::new()
///     .vat_rate(Decimal::from(7))
///     .discount_amount(Decimal::from(50))
///     .exclude(PositionKind::Rental);
/// assert_eq!(params.effective_vat_rate(), Decimal::from(7));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsParams {
    /// Takes precedence over `discount_amount` when > 0.
    pub discount_percent: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    /// Percent; `None` means [`DEFAULT_VAT_RATE`].
    pub vat_rate: Option<Decimal>,
    pub exclude_kinds: Vec<PositionKind>,
}

impl TotalsParams {
    pub fn new() -> Self {
        TotalsParams::default()
    }

    pub fn discount_percent(mut self, percent: Decimal) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    pub fn discount_amount(mut self, amount: Decimal) -> Self {
        self.discount_amount = Some(amount);
        self
    }

    pub fn vat_rate(mut self, rate: Decimal) -> Self {
        self.vat_rate = Some(rate);
        self
    }

    /// Leaves lines of `kind` out of the subtotal.
    pub fn exclude(mut self, kind: PositionKind) -> Self {
        if !self.exclude_kinds.contains(&kind) {
            self.exclude_kinds.push(kind);
        }
        self
    }

    #[inline]
    pub fn effective_vat_rate(&self) -> Decimal {
        self.vat_rate.unwrap_or(DEFAULT_VAT_RATE)
    }

    fn validate(&self) -> CoreResult<()> {
        if let Some(pct) = self.discount_percent {
            validation::validate_discount_percent(pct)?;
        }
        if let Some(amount) = self.discount_amount {
            validation::validate_discount_amount(amount)?;
        }
        if let Some(rate) = self.vat_rate {
            validation::validate_vat_rate(rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The five derived amounts of a document.
///
/// Values carry full precision. They are a projection of lines, discount and
/// rate and are never edited on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// "Zwischensumme"
    #[ts(type = "string")]
    pub subtotal: Decimal,
    /// "Rabatt"
    #[ts(type = "string")]
    pub discount: Decimal,
    /// "Netto"
    #[ts(type = "string")]
    pub net: Decimal,
    /// "MwSt."
    #[ts(type = "string")]
    pub vat_amount: Decimal,
    /// "Brutto"
    #[ts(type = "string")]
    pub gross: Decimal,
}

impl Totals {
    /// All-zero totals (empty document).
    pub const fn zero() -> Self {
        Totals {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            net: Decimal::ZERO,
            vat_amount: Decimal::ZERO,
            gross: Decimal::ZERO,
        }
    }

    /// Rounds every amount to cents for display or export.
    ///
    /// Each field is rounded independently from its full-precision value.
    pub fn rounded(&self) -> Self {
        Totals {
            subtotal: round_currency(self.subtotal),
            discount: round_currency(self.discount),
            net: round_currency(self.net),
            vat_amount: round_currency(self.vat_amount),
            gross: round_currency(self.gross),
        }
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Computes subtotal, discount, net, VAT and gross for a set of lines.
///
/// ## Errors
/// [`CoreError::InvalidInput`] when any line has a negative quantity or a
/// percentage outside 0..=100, or when the VAT rate, discount percent or
/// discount amount is negative. Validation runs over all lines, including
/// excluded ones, before anything is computed.
///
/// ## Example
/// ```rust
/// use geruest_core::calculator::{compute_totals, TotalsParams};
///
/// let totals = compute_totals(&[], &TotalsParams::new()).unwrap();
/// assert!(totals.gross.is_zero());
/// ```
pub fn compute_totals(lines: &[LineItem], params: &TotalsParams) -> CoreResult<Totals> {
    params.validate()?;
    for line in lines {
        validation::validate_line_amounts(line)?;
    }

    let mut subtotal = Decimal::ZERO;
    for line in lines
        .iter()
        .filter(|line| !params.exclude_kinds.contains(&line.kind))
    {
        subtotal = subtotal
            .checked_add(line.line_total()?)
            .ok_or(CoreError::AmountOverflow { step: "subtotal" })?;
    }

    let discount = match params.discount_percent {
        Some(pct) if pct > Decimal::ZERO => subtotal
            .checked_mul(pct)
            .map(|v| v / Decimal::ONE_HUNDRED)
            .ok_or(CoreError::AmountOverflow { step: "discount" })?,
        _ => params.discount_amount.unwrap_or(Decimal::ZERO),
    };

    let net = subtotal
        .checked_sub(discount)
        .ok_or(CoreError::AmountOverflow { step: "net" })?
        .max(Decimal::ZERO);

    let vat_amount = net
        .checked_mul(params.effective_vat_rate())
        .map(|v| v / Decimal::ONE_HUNDRED)
        .ok_or(CoreError::AmountOverflow { step: "vat" })?;

    let gross = net
        .checked_add(vat_amount)
        .ok_or(CoreError::AmountOverflow { step: "gross" })?;

    Ok(Totals {
        subtotal,
        discount,
        net,
        vat_amount,
        gross,
    })
}

// =============================================================================
// Breakdowns
// =============================================================================

/// Line count and sum of line totals for one kind ("Positionsübersicht").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct KindSummary {
    pub kind: PositionKind,
    pub count: usize,
    #[ts(type = "string")]
    pub total: Decimal,
}

/// Groups lines by kind, in [`PositionKind::ALL`] order, skipping empty kinds.
///
/// Excluded kinds are still listed: the overview shows what a quote
/// contains, not what it taxes.
pub fn summarize_by_kind(lines: &[LineItem]) -> CoreResult<Vec<KindSummary>> {
    let mut groups: BTreeMap<usize, KindSummary> = BTreeMap::new();

    for line in lines {
        let order = PositionKind::ALL
            .iter()
            .position(|k| *k == line.kind)
            .unwrap_or(PositionKind::ALL.len());
        let entry = groups.entry(order).or_insert(KindSummary {
            kind: line.kind,
            count: 0,
            total: Decimal::ZERO,
        });
        entry.count += 1;
        entry.total = entry
            .total
            .checked_add(line.line_total()?)
            .ok_or(CoreError::AmountOverflow { step: "kind summary" })?;
    }

    Ok(groups.into_values().collect())
}

/// How far an invoice has billed its source quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteComparison {
    #[ts(type = "string")]
    pub quote_gross: Decimal,
    #[ts(type = "string")]
    pub invoice_gross: Decimal,
    /// invoice − quote; positive when billing exceeds the quote.
    #[ts(type = "string")]
    pub difference: Decimal,
    /// `difference / quote × 100`; `None` when the quote total is zero.
    #[ts(type = "string | null")]
    pub difference_percent: Option<Decimal>,
    /// Amount of the quote not yet billed, never negative.
    #[ts(type = "string")]
    pub remaining: Decimal,
    /// `invoice / quote × 100`, capped at 100; `None` when the quote total is zero.
    #[ts(type = "string | null")]
    pub billed_percent: Option<Decimal>,
}

impl QuoteComparison {
    /// Compares a quote's gross with what has been invoiced against it.
    ///
    /// ## Errors
    /// `AmountOverflow` when a difference or percentage leaves the decimal range.
    pub fn between(quote_gross: Decimal, invoice_gross: Decimal) -> CoreResult<Self> {
        let difference = invoice_gross
            .checked_sub(quote_gross)
            .ok_or(CoreError::AmountOverflow { step: "difference" })?;
        let remaining = quote_gross
            .checked_sub(invoice_gross)
            .ok_or(CoreError::AmountOverflow { step: "remaining" })?
            .max(Decimal::ZERO);

        let has_base = quote_gross > Decimal::ZERO;
        let percent_of_quote = |amount: Decimal, step: &'static str| -> CoreResult<Option<Decimal>> {
            if !has_base {
                return Ok(None);
            }
            amount
                .checked_mul(Decimal::ONE_HUNDRED)
                .and_then(|v| v.checked_div(quote_gross))
                .map(Some)
                .ok_or(CoreError::AmountOverflow { step })
        };

        Ok(QuoteComparison {
            quote_gross,
            invoice_gross,
            difference,
            difference_percent: percent_of_quote(difference, "difference percent")?,
            remaining,
            billed_percent: percent_of_quote(invoice_gross, "billed percent")?
                .map(|pct| pct.min(Decimal::ONE_HUNDRED)),
        })
    }
}

// =============================================================================
// VAT Add-Back
// =============================================================================

/// Splits a gross amount into net and VAT ("Brutto zu Netto").
///
/// The result has no discount; `subtotal` equals `net`. Nothing is rounded,
/// so `net + vat_amount == gross` holds exactly.
///
/// ## Errors
/// `InvalidInput` for a negative rate, `AmountOverflow` if the division
/// leaves the decimal range.
///
/// ## Example
/// ```rust
/// use geruest_core::calculator::net_from_gross;
/// use rust_decimal::Decimal;
///
/// let totals = net_from_gross(Decimal::from(119), Decimal::from(19)).unwrap();
/// assert_eq!(totals.net, Decimal::from(100));
/// assert_eq!(totals.vat_amount, Decimal::from(19));
/// ```
pub fn net_from_gross(gross: Decimal, vat_rate: Decimal) -> CoreResult<Totals> {
    validation::validate_vat_rate(vat_rate)?;

    let divisor = Decimal::ONE
        .checked_add(vat_rate / Decimal::ONE_HUNDRED)
        .ok_or(CoreError::AmountOverflow { step: "vat divisor" })?;
    let net = gross
        .checked_div(divisor)
        .ok_or(CoreError::AmountOverflow { step: "net" })?;
    let vat_amount = gross
        .checked_sub(net)
        .ok_or(CoreError::AmountOverflow { step: "vat" })?;

    Ok(Totals {
        subtotal: net,
        discount: Decimal::ZERO,
        net,
        vat_amount,
        gross,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
