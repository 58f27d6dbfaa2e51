//! # Domain Types
//!
//! Core domain types used throughout Gerüst ERP.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │    Customer     │   │ PositionTemplate│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  position "01"  │   │  id (UUID)      │   │  shortcode      │       │
//! │  │  kind           │   │  company / name │   │  kind, unit     │       │
//! │  │  quantity       │   │  address        │   │  defaults       │       │
//! │  │  unit_price     │   └─────────────────┘   └─────────────────┘       │
//! │  │  percentage?    │                                                    │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │ DocumentStatus  │   │  PositionKind   │       │
//! │  ┌─────────────────┐   │  ─────────────  │   │  ─────────────  │       │
//! │  │  DocumentKind   │   │  Draft, Sent    │   │  Material       │       │
//! │  │  Quote          │   │  Accepted ...   │   │  Labor, Rental  │       │
//! │  │  Invoice        │   │  Paid ...       │   │  Transport ...  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Position Kind
// =============================================================================

/// What a line item bills for.
///
/// The set is closed. Serde also accepts the German labels used by older
/// exports (`lohn`, `miete`, `sonstiges`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    Material,
    #[serde(alias = "lohn")]
    Labor,
    /// Scaffold rental, billed after the fact by actual duration.
    #[serde(alias = "miete")]
    Rental,
    Transport,
    #[serde(alias = "sonstiges")]
    Other,
}

impl PositionKind {
    /// All kinds in display order.
    pub const ALL: [PositionKind; 5] = [
        PositionKind::Material,
        PositionKind::Labor,
        PositionKind::Rental,
        PositionKind::Transport,
        PositionKind::Other,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PositionKind::Material => "material",
            PositionKind::Labor => "labor",
            PositionKind::Rental => "rental",
            PositionKind::Transport => "transport",
            PositionKind::Other => "other",
        }
    }

    /// German label for printed documents.
    pub const fn label_de(&self) -> &'static str {
        match self {
            PositionKind::Material => "Material",
            PositionKind::Labor => "Lohn",
            PositionKind::Rental => "Miete",
            PositionKind::Transport => "Transport",
            PositionKind::Other => "Sonstiges",
        }
    }
}

impl fmt::Display for PositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PositionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "material" => Ok(PositionKind::Material),
            "labor" | "lohn" => Ok(PositionKind::Labor),
            "rental" | "miete" => Ok(PositionKind::Rental),
            "transport" => Ok(PositionKind::Transport),
            "other" | "sonstiges" => Ok(PositionKind::Other),
            _ => Err(ValidationError::NotAllowed {
                field: "kind".to_string(),
                allowed: PositionKind::ALL.iter().map(|k| k.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A single position on a quote or invoice.
///
/// `line_total` is never stored. It is derived from `quantity`,
/// `unit_price` and `percentage` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Ordinal label, two digits ("01", "02", ...).
    ///
    /// Older exports store a plain number; it is read as its two-digit label.
    #[serde(deserialize_with = "deserialize_position")]
    pub position: String,

    pub kind: PositionKind,

    /// Free text, may contain HTML from the rich-text editor.
    #[serde(default)]
    pub description: String,

    /// Unit label ("St.", "m", "qm", "lfdm", "stgm", "m³").
    #[serde(default = "default_unit")]
    pub unit: String,

    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Negative for credit lines.
    #[ts(type = "string")]
    pub unit_price: Decimal,

    /// Bill only this share (0..=100) of `quantity * unit_price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub percentage: Option<Decimal>,

    /// Position this line was derived from (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_position: Option<String>,
}

fn default_unit() -> String {
    "St.".to_string()
}

fn deserialize_position<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPosition {
        Label(String),
        Number(u64),
    }

    Ok(match RawPosition::deserialize(deserializer)? {
        RawPosition::Label(label) => label,
        RawPosition::Number(n) => format!("{:02}", n),
    })
}

impl LineItem {
    /// Creates a line with the default unit and no percentage.
    pub fn new(
        position: impl Into<String>,
        kind: PositionKind,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        LineItem {
            position: position.into(),
            kind,
            description: String::new(),
            unit: default_unit(),
            quantity,
            unit_price,
            percentage: None,
            linked_position: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the unit label.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the billed percentage.
    pub fn with_percentage(mut self, percentage: Decimal) -> Self {
        self.percentage = Some(percentage);
        self
    }

    /// Returns the effective percentage, if one applies.
    ///
    /// A percentage of zero is treated as "not set" and bills the full amount.
    #[inline]
    pub fn effective_percentage(&self) -> Option<Decimal> {
        self.percentage.filter(|p| *p > Decimal::ZERO)
    }

    /// Computes the line's contribution to the subtotal.
    ///
    /// ## Formula
    /// ```text
    /// percentage > 0 :  quantity × unit_price × percentage / 100
    /// otherwise      :  quantity × unit_price
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use geruest_core::types::{LineItem, PositionKind};
    /// use rust_decimal::Decimal;
    ///
    /// let line = LineItem::new("01", PositionKind::Material, Decimal::TWO, Decimal::ONE_HUNDRED)
    ///     .with_percentage(Decimal::from(50));
    /// assert_eq!(line.line_total().unwrap(), Decimal::ONE_HUNDRED);
    /// ```
    pub fn line_total(&self) -> CoreResult<Decimal> {
        let base = self
            .quantity
            .checked_mul(self.unit_price)
            .ok_or(CoreError::AmountOverflow { step: "line total" })?;

        match self.effective_percentage() {
            Some(pct) => base
                .checked_mul(pct)
                .map(|v| v / Decimal::ONE_HUNDRED)
                .ok_or(CoreError::AmountOverflow { step: "line percentage" }),
            None => Ok(base),
        }
    }
}

// =============================================================================
// Document Kind
// =============================================================================

/// Quote or invoice. Same shape, different lifecycle and tax base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Quote,
    Invoice,
}

impl DocumentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::Invoice => "invoice",
        }
    }

    /// Number prefix ("A" for Angebot, "R" for Rechnung).
    pub const fn number_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Quote => crate::QUOTE_NUMBER_PREFIX,
            DocumentKind::Invoice => crate::INVOICE_NUMBER_PREFIX,
        }
    }

    /// Line kinds left out of the taxable subtotal.
    ///
    /// Quotes leave rental out: rental is billed later by actual duration.
    /// Invoices bill every line.
    pub fn excluded_kinds(&self) -> &'static [PositionKind] {
        match self {
            DocumentKind::Quote => &[PositionKind::Rental],
            DocumentKind::Invoice => &[],
        }
    }

    /// Formats a document number: `A-2026-0007`, `R-2026-0142`.
    pub fn format_number(&self, year: i32, sequence: u32) -> String {
        format!("{}-{}-{:04}", self.number_prefix(), year, sequence)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quote" | "angebot" => Ok(DocumentKind::Quote),
            "invoice" | "rechnung" => Ok(DocumentKind::Invoice),
            _ => Err(ValidationError::NotAllowed {
                field: "kind".to_string(),
                allowed: vec!["quote".to_string(), "invoice".to_string()],
            }),
        }
    }
}

// =============================================================================
// Document Status
// =============================================================================

/// Lifecycle status of a quote or invoice.
///
/// ## Lifecycles
/// ```text
/// Quote:    Draft ──► Sent ──► Accepted | Rejected | Expired
///             │  ◄──── │
///             └──────────────► Accepted | Rejected
///
/// Invoice:  Draft ──► Sent ──► PartiallyPaid ──► Paid
///             │         │  ╲        ▲  │
///             │         │   ╲       │  ▼
///             │         │    ──► Overdue ──► Paid
///             ▼         ▼          │
///          Cancelled ◄─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Draft
    }
}

impl DocumentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Accepted => "accepted",
            DocumentStatus::Rejected => "rejected",
            DocumentStatus::Expired => "expired",
            DocumentStatus::PartiallyPaid => "partially_paid",
            DocumentStatus::Paid => "paid",
            DocumentStatus::Overdue => "overdue",
            DocumentStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses lock the document against edits.
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Accepted
                | DocumentStatus::Rejected
                | DocumentStatus::Expired
                | DocumentStatus::Paid
                | DocumentStatus::Cancelled
        )
    }

    /// Statuses stored documents may be in without being locked.
    pub const EDITABLE: [DocumentStatus; 4] = [
        DocumentStatus::Draft,
        DocumentStatus::Sent,
        DocumentStatus::PartiallyPaid,
        DocumentStatus::Overdue,
    ];

    /// Checks whether `self → to` is a legal step for the given document kind.
    pub fn can_transition(&self, kind: DocumentKind, to: DocumentStatus) -> bool {
        use DocumentStatus::*;

        match kind {
            DocumentKind::Quote => matches!(
                (self, to),
                (Draft, Sent)
                    | (Draft, Accepted)
                    | (Draft, Rejected)
                    | (Sent, Draft)
                    | (Sent, Accepted)
                    | (Sent, Rejected)
                    | (Sent, Expired)
            ),
            DocumentKind::Invoice => matches!(
                (self, to),
                (Draft, Sent)
                    | (Draft, Cancelled)
                    | (Sent, PartiallyPaid)
                    | (Sent, Paid)
                    | (Sent, Overdue)
                    | (Sent, Cancelled)
                    | (Overdue, PartiallyPaid)
                    | (Overdue, Paid)
                    | (Overdue, Cancelled)
                    | (PartiallyPaid, Paid)
                    | (PartiallyPaid, Overdue)
            ),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [DocumentStatus; 9] = [
            DocumentStatus::Draft,
            DocumentStatus::Sent,
            DocumentStatus::Accepted,
            DocumentStatus::Rejected,
            DocumentStatus::Expired,
            DocumentStatus::PartiallyPaid,
            DocumentStatus::Paid,
            DocumentStatus::Overdue,
            DocumentStatus::Cancelled,
        ];

        let wanted = s.trim().to_lowercase().replace('-', "_");
        ALL.iter()
            .copied()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ALL.iter().map(|st| st.to_string()).collect(),
            })
    }
}

// =============================================================================
// Customer & Project
// =============================================================================

/// A customer documents are addressed to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    /// Company name for business customers.
    pub company: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Name printed on documents: company if present, else "first last".
    pub fn display_name(&self) -> String {
        match self.company.as_deref().map(str::trim) {
            Some(company) if !company.is_empty() => company.to_string(),
            _ => format!("{} {}", self.first_name.trim(), self.last_name.trim())
                .trim()
                .to_string(),
        }
    }

    /// Single-line postal address: "Hauptstr. 5, 10115 Berlin".
    ///
    /// Returns `None` when no address part is set.
    pub fn address_line(&self) -> Option<String> {
        let part = |p: &Option<String>| p.as_deref().unwrap_or("").trim().to_string();

        let street = format!("{} {}", part(&self.street), part(&self.house_number));
        let city = format!("{} {}", part(&self.postal_code), part(&self.city));
        let (street, city) = (street.trim(), city.trim());

        match (street.is_empty(), city.is_empty()) {
            (true, true) => None,
            (false, true) => Some(street.to_string()),
            (true, false) => Some(city.to_string()),
            (false, false) => Some(format!("{}, {}", street, city)),
        }
    }
}

/// A construction project ("Bauvorhaben") of a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    /// Construction site address.
    pub site_address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Templates
// =============================================================================

/// Which document text a snippet fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    /// "Betreff"
    Subject,
    /// "Einleitung"
    Intro,
    /// "Zahlungsbedingungen"
    PaymentTerms,
    /// "Schlusstext"
    Closing,
}

impl TemplateCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TemplateCategory::Subject => "subject",
            TemplateCategory::Intro => "intro",
            TemplateCategory::PaymentTerms => "payment_terms",
            TemplateCategory::Closing => "closing",
        }
    }
}

impl FromStr for TemplateCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "subject" => Ok(TemplateCategory::Subject),
            "intro" => Ok(TemplateCategory::Intro),
            "payment_terms" => Ok(TemplateCategory::PaymentTerms),
            "closing" => Ok(TemplateCategory::Closing),
            _ => Err(ValidationError::NotAllowed {
                field: "category".to_string(),
                allowed: ["subject", "intro", "payment_terms", "closing"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            }),
        }
    }
}

/// A named, reusable text snippet.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TextTemplate {
    pub id: String,
    pub category: TemplateCategory,
    pub name: String,
    pub text: String,
    pub active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A reusable line item ("Positions-Vorlage"), e.g. `EINR` or `MIETE4W`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PositionTemplate {
    pub id: String,
    pub shortcode: String,
    pub name: String,
    pub description: String,
    pub kind: PositionKind,
    pub unit: String,
    #[ts(type = "string | null")]
    pub default_price: Option<Decimal>,
    #[ts(type = "string | null")]
    pub default_quantity: Option<Decimal>,
    #[ts(type = "string | null")]
    pub default_percentage: Option<Decimal>,
    pub category: Option<String>,
    pub active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl PositionTemplate {
    /// Builds a line item from the template's defaults.
    ///
    /// The position is left empty; [`crate::Document::add_line`] assigns it.
    /// Missing defaults fall back to quantity 1 and price 0.
    pub fn to_line_item(&self) -> LineItem {
        LineItem {
            position: String::new(),
            kind: self.kind,
            description: self.description.clone(),
            unit: self.unit.clone(),
            quantity: self.default_quantity.unwrap_or(Decimal::ONE),
            unit_price: self.default_price.unwrap_or(Decimal::ZERO),
            percentage: self.default_percentage,
            linked_position: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn customer() -> Customer {
        Customer {
            id: "c1".to_string(),
            company: None,
            first_name: "Erika".to_string(),
            last_name: "Mustermann".to_string(),
            street: Some("Hauptstr.".to_string()),
            house_number: Some("5".to_string()),
            postal_code: Some("10115".to_string()),
            city: Some("Berlin".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_total_plain() {
        let line = LineItem::new("01", PositionKind::Material, dec!(10), dec!(15.00));
        assert_eq!(line.line_total().unwrap(), dec!(150.00));
    }

    #[test]
    fn test_line_total_with_percentage() {
        let line = LineItem::new("01", PositionKind::Material, dec!(2), dec!(100))
            .with_percentage(dec!(50));
        assert_eq!(line.line_total().unwrap(), dec!(100));
    }

    #[test]
    fn test_zero_percentage_bills_full_amount() {
        let line = LineItem::new("01", PositionKind::Labor, dec!(3), dec!(40))
            .with_percentage(Decimal::ZERO);
        assert_eq!(line.effective_percentage(), None);
        assert_eq!(line.line_total().unwrap(), dec!(120));
    }

    #[test]
    fn test_credit_line_is_negative() {
        let line = LineItem::new("03", PositionKind::Other, dec!(1), dec!(-250));
        assert_eq!(line.line_total().unwrap(), dec!(-250));
    }

    #[test]
    fn test_line_total_ignores_other_fields() {
        let a = LineItem::new("01", PositionKind::Material, dec!(4), dec!(12.5));
        let mut b = a.clone().with_description("Gerüstbohlen").with_unit("m");
        b.kind = PositionKind::Transport;
        b.linked_position = Some("07".to_string());
        assert_eq!(a.line_total().unwrap(), b.line_total().unwrap());
    }

    #[test]
    fn test_position_kind_from_str() {
        assert_eq!("material".parse::<PositionKind>().unwrap(), PositionKind::Material);
        assert_eq!("Miete".parse::<PositionKind>().unwrap(), PositionKind::Rental);
        assert_eq!("lohn".parse::<PositionKind>().unwrap(), PositionKind::Labor);
        assert!("scaffold".parse::<PositionKind>().is_err());
    }

    #[test]
    fn test_position_kind_serde_accepts_german_alias() {
        let kind: PositionKind = serde_json::from_str("\"miete\"").unwrap();
        assert_eq!(kind, PositionKind::Rental);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"rental\"");
        assert!(serde_json::from_str::<PositionKind>("\"crane\"").is_err());
    }

    #[test]
    fn test_line_item_json_shape() {
        let json = r#"{"position":"02","kind":"rental","quantity":"1","unitPrice":500}"#;
        let line: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.unit, "St.");
        assert_eq!(line.unit_price, dec!(500));
        assert!(line.percentage.is_none());
    }

    #[test]
    fn test_line_item_numeric_position() {
        let json = r#"[{"position":1,"kind":"material","quantity":10,"unitPrice":15},
                       {"position":12,"kind":"labor","quantity":"2","unitPrice":"40"}]"#;
        let lines: Vec<LineItem> = serde_json::from_str(json).unwrap();

        assert_eq!(lines[0].position, "01");
        assert_eq!(lines[0].line_total().unwrap(), dec!(150));
        assert_eq!(lines[1].position, "12");

        // Written back as a label
        let out = serde_json::to_string(&lines[0]).unwrap();
        assert!(out.contains(r#""position":"01""#));

        assert!(serde_json::from_str::<LineItem>(
            r#"{"position":-1,"kind":"material","quantity":1,"unitPrice":1}"#
        )
        .is_err());
    }

    #[test]
    fn test_excluded_kinds() {
        assert_eq!(DocumentKind::Quote.excluded_kinds(), &[PositionKind::Rental]);
        assert!(DocumentKind::Invoice.excluded_kinds().is_empty());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(DocumentKind::Quote.format_number(2026, 7), "A-2026-0007");
        assert_eq!(DocumentKind::Invoice.format_number(2026, 142), "R-2026-0142");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(DocumentStatus::Accepted.is_terminal());
        assert!(DocumentStatus::Rejected.is_terminal());
        assert!(DocumentStatus::Paid.is_terminal());
        assert!(!DocumentStatus::Draft.is_terminal());
        assert!(!DocumentStatus::Overdue.is_terminal());
        assert!(DocumentStatus::EDITABLE.iter().all(|s| !s.is_terminal()));
    }

    #[test]
    fn test_transitions_depend_on_kind() {
        use DocumentStatus::*;
        assert!(Sent.can_transition(DocumentKind::Quote, Accepted));
        assert!(!Sent.can_transition(DocumentKind::Invoice, Accepted));
        assert!(Sent.can_transition(DocumentKind::Invoice, Paid));
        assert!(!Sent.can_transition(DocumentKind::Quote, Paid));
        assert!(!Accepted.can_transition(DocumentKind::Quote, Draft));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("partially-paid".parse::<DocumentStatus>().unwrap(), DocumentStatus::PartiallyPaid);
        assert_eq!("SENT".parse::<DocumentStatus>().unwrap(), DocumentStatus::Sent);
        assert!("archived".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_customer_display_name_and_address() {
        let mut c = customer();
        assert_eq!(c.display_name(), "Erika Mustermann");
        assert_eq!(c.address_line().as_deref(), Some("Hauptstr. 5, 10115 Berlin"));

        c.company = Some("Bau GmbH".to_string());
        c.street = None;
        c.house_number = None;
        assert_eq!(c.display_name(), "Bau GmbH");
        assert_eq!(c.address_line().as_deref(), Some("10115 Berlin"));

        c.postal_code = None;
        c.city = None;
        assert_eq!(c.address_line(), None);
    }

    #[test]
    fn test_position_template_defaults() {
        let now = Utc::now();
        let template = PositionTemplate {
            id: "t1".to_string(),
            shortcode: "MIETE4W".to_string(),
            name: "Miete ab 4 Wochen".to_string(),
            description: "Gerüstmiete je Woche".to_string(),
            kind: PositionKind::Rental,
            unit: "qm".to_string(),
            default_price: Some(dec!(0.85)),
            default_quantity: None,
            default_percentage: None,
            category: Some("Gerüstbau".to_string()),
            active: true,
            created_at: now,
            updated_at: now,
        };

        let line = template.to_line_item();
        assert_eq!(line.kind, PositionKind::Rental);
        assert_eq!(line.quantity, Decimal::ONE);
        assert_eq!(line.unit_price, dec!(0.85));
        assert_eq!(line.unit, "qm");
    }
}
