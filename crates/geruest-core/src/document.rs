//! # Document
//!
//! A quote or invoice: lines, discount, VAT rate and the status lifecycle.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Document Operations                                │
//! │                                                                         │
//! │  Editor Action            Method                  Effect                │
//! │  ─────────────            ──────                  ──────                │
//! │                                                                         │
//! │  Add position ──────────► add_line() ───────────► lines.push("NN")     │
//! │  Edit position ─────────► update_line() ────────► lines[i] = edited    │
//! │  Delete position ───────► remove_line() ────────► drop + unlink        │
//! │  "Verknüpfen" ──────────► link_line() ──────────► copy qty/price       │
//! │  Rabatt % / € ──────────► set_discount_*() ─────► one of the two       │
//! │  MwSt. ─────────────────► set_vat_rate()                               │
//! │  Status dropdown ───────► transition_to() ──────► lifecycle check      │
//! │  Zahlungseingang ───────► record_payment() ─────► paid, (partially)paid │
//! │                                                                         │
//! │  View totals ───────────► totals() ─────────────► (derived, read only) │
//! │                                                                         │
//! │  NOTE: every edit fails with DocumentLocked once the status is          │
//! │        terminal (accepted, rejected, expired, paid, cancelled).         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The clock is never read here; callers pass `now` where a timestamp changes.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::calculator::{compute_totals, summarize_by_kind, KindSummary, Totals, TotalsParams};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{
    Customer, DocumentKind, DocumentStatus, LineItem, Project, TemplateCategory, TextTemplate,
};
use crate::validation;
use crate::{DEFAULT_VAT_RATE, MAX_DOCUMENT_LINES, MAX_PAYMENT_DAYS};

/// A quote ("Angebot") or invoice ("Rechnung").
///
/// ## Invariants
/// - Positions are unique within `lines`
/// - At most one of `discount_percent` / `discount_amount` is set by the
///   setters; if both arrive from storage, a positive percent wins
/// - Totals are never stored; call [`Document::totals`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    /// `A-YYYY-NNNN` or `R-YYYY-NNNN`
    pub number: String,
    pub status: DocumentStatus,

    /// Customer snapshot at assignment time.
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub customer_address: Option<String>,

    pub project_id: Option<String>,
    /// Source quote of an invoice.
    pub quote_id: Option<String>,

    pub subject: String,
    pub intro: String,
    pub payment_terms: String,
    pub closing: String,

    pub lines: Vec<LineItem>,

    #[ts(type = "string | null")]
    pub discount_percent: Option<Decimal>,
    #[ts(type = "string | null")]
    pub discount_amount: Option<Decimal>,
    #[ts(type = "string")]
    pub vat_rate: Decimal,

    /// Invoices only: document date plus the payment term.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,
    /// Invoices only: sum of recorded payments.
    #[serde(default)]
    #[ts(type = "string")]
    pub paid_amount: Decimal,

    /// Optimistic locking counter, owned by the repository.
    pub version: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub status_changed_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates an empty draft.
    ///
    /// ## Errors
    /// `InvalidInput` if `number` is malformed or its prefix does not match
    /// `kind`.
    pub fn new(kind: DocumentKind, number: impl Into<String>, now: DateTime<Utc>) -> CoreResult<Self> {
        let number = number.into();
        validation::validate_document_number(&number)?;

        if !number.starts_with(kind.number_prefix()) {
            return Err(ValidationError::InvalidFormat {
                field: "number".to_string(),
                reason: format!("{} numbers start with {}", kind, kind.number_prefix()),
            }
            .into());
        }

        Ok(Document {
            id: Uuid::new_v4().to_string(),
            kind,
            number,
            status: DocumentStatus::Draft,
            customer_id: None,
            customer_name: String::new(),
            customer_address: None,
            project_id: None,
            quote_id: None,
            subject: String::new(),
            intro: String::new(),
            payment_terms: String::new(),
            closing: String::new(),
            lines: Vec::new(),
            discount_percent: None,
            discount_amount: None,
            vat_rate: DEFAULT_VAT_RATE,
            due_date: None,
            paid_amount: Decimal::ZERO,
            version: 0,
            created_at: now,
            updated_at: now,
            status_changed_at: None,
        })
    }

    pub fn new_quote(number: impl Into<String>, now: DateTime<Utc>) -> CoreResult<Self> {
        Document::new(DocumentKind::Quote, number, now)
    }

    pub fn new_invoice(number: impl Into<String>, now: DateTime<Utc>) -> CoreResult<Self> {
        Document::new(DocumentKind::Invoice, number, now)
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.status.is_terminal()
    }

    /// Fails with `DocumentLocked` when the status is terminal.
    pub fn ensure_editable(&self) -> CoreResult<()> {
        if self.is_locked() {
            return Err(CoreError::DocumentLocked {
                number: self.number.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    /// Calculator parameters for this document; exclusions follow the kind.
    pub fn totals_params(&self) -> TotalsParams {
        TotalsParams {
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount,
            vat_rate: Some(self.vat_rate),
            exclude_kinds: self.kind.excluded_kinds().to_vec(),
        }
    }

    pub fn totals(&self) -> CoreResult<Totals> {
        compute_totals(&self.lines, &self.totals_params())
    }

    pub fn summary_by_kind(&self) -> CoreResult<Vec<KindSummary>> {
        summarize_by_kind(&self.lines)
    }

    pub fn line(&self, position: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.position == position)
    }

    /// Next free two-digit position: one past the highest numeric label.
    ///
    /// ## Errors
    /// `InvalidInput` when the highest stored label has no successor.
    pub fn next_position(&self) -> CoreResult<String> {
        let highest = self
            .lines
            .iter()
            .filter_map(|l| l.position.trim().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let next = highest.checked_add(1).ok_or(ValidationError::TooLong {
            field: "position".to_string(),
            max: 10,
        })?;
        Ok(format!("{:02}", next))
    }

    fn line_index(&self, position: &str) -> CoreResult<usize> {
        self.lines
            .iter()
            .position(|l| l.position == position)
            .ok_or_else(|| CoreError::LineNotFound {
                number: self.number.clone(),
                position: position.to_string(),
            })
    }

    fn check_link(&self, line: &LineItem) -> CoreResult<()> {
        match line.linked_position.as_deref() {
            Some(target) if target == line.position => Err(ValidationError::InvalidFormat {
                field: format!("linked_position (position {})", line.position),
                reason: "a line cannot link to itself".to_string(),
            }
            .into()),
            Some(target) => self.line_index(target).map(|_| ()),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Line editing
    // =========================================================================

    /// Appends a line under the next free position and returns that position.
    ///
    /// Any position already set on `line` is replaced.
    pub fn add_line(&mut self, mut line: LineItem) -> CoreResult<String> {
        self.ensure_editable()?;

        if self.lines.len() >= MAX_DOCUMENT_LINES {
            return Err(CoreError::TooManyLines {
                max: MAX_DOCUMENT_LINES,
            });
        }

        line.position = self.next_position()?;
        validation::validate_line(&line)?;
        self.check_link(&line)?;

        let position = line.position.clone();
        self.lines.push(line);
        Ok(position)
    }

    /// Edits a line in place. The position cannot be changed.
    ///
    /// The edit is applied to a copy and only stored if the result validates.
    pub fn update_line<F>(&mut self, position: &str, edit: F) -> CoreResult<()>
    where
        F: FnOnce(&mut LineItem),
    {
        self.ensure_editable()?;
        let index = self.line_index(position)?;

        let mut edited = self.lines[index].clone();
        edit(&mut edited);
        edited.position = position.to_string();

        validation::validate_line(&edited)?;
        self.check_link(&edited)?;

        self.lines[index] = edited;
        Ok(())
    }

    /// Removes a line; lines linked to it keep their values but lose the link.
    pub fn remove_line(&mut self, position: &str) -> CoreResult<LineItem> {
        self.ensure_editable()?;
        let index = self.line_index(position)?;
        let removed = self.lines.remove(index);

        for line in &mut self.lines {
            if line.linked_position.as_deref() == Some(position) {
                line.linked_position = None;
            }
        }

        Ok(removed)
    }

    /// Links `position` to `target`, copying quantity, unit, unit price and
    /// percentage from the target line.
    pub fn link_line(&mut self, position: &str, target: &str) -> CoreResult<()> {
        self.ensure_editable()?;
        let source = self.lines[self.line_index(target)?].clone();

        self.update_line(position, |line| {
            line.quantity = source.quantity;
            line.unit = source.unit;
            line.unit_price = source.unit_price;
            line.percentage = source.percentage;
            line.linked_position = Some(source.position);
        })
    }

    // =========================================================================
    // Discount, VAT, parties, texts
    // =========================================================================

    /// Sets a percentage discount and clears any fixed amount.
    pub fn set_discount_percent(&mut self, percent: Decimal) -> CoreResult<()> {
        self.ensure_editable()?;
        validation::validate_discount_percent(percent)?;
        self.discount_percent = Some(percent);
        self.discount_amount = None;
        Ok(())
    }

    /// Sets a fixed discount in euros and clears any percentage.
    pub fn set_discount_amount(&mut self, amount: Decimal) -> CoreResult<()> {
        self.ensure_editable()?;
        validation::validate_discount_amount(amount)?;
        self.discount_amount = Some(amount);
        self.discount_percent = None;
        Ok(())
    }

    pub fn clear_discount(&mut self) -> CoreResult<()> {
        self.ensure_editable()?;
        self.discount_percent = None;
        self.discount_amount = None;
        Ok(())
    }

    pub fn set_vat_rate(&mut self, rate: Decimal) -> CoreResult<()> {
        self.ensure_editable()?;
        validation::validate_vat_rate(rate)?;
        self.vat_rate = rate;
        Ok(())
    }

    /// Copies the customer's id, display name and address onto the document.
    ///
    /// Switching to a different customer drops the project assignment.
    pub fn assign_customer(&mut self, customer: &Customer) -> CoreResult<()> {
        self.ensure_editable()?;

        if self.customer_id.as_deref() != Some(customer.id.as_str()) {
            self.project_id = None;
        }

        self.customer_id = Some(customer.id.clone());
        self.customer_name = customer.display_name();
        self.customer_address = customer.address_line();
        Ok(())
    }

    /// Assigns a project of the document's customer.
    pub fn assign_project(&mut self, project: &Project) -> CoreResult<()> {
        self.ensure_editable()?;

        if let Some(customer_id) = self.customer_id.as_deref() {
            if customer_id != project.customer_id {
                return Err(ValidationError::InvalidFormat {
                    field: "project_id".to_string(),
                    reason: format!("project {} belongs to another customer", project.id),
                }
                .into());
            }
        }

        self.project_id = Some(project.id.clone());
        Ok(())
    }

    /// Fills the text field matching the template's category.
    pub fn apply_text_template(&mut self, template: &TextTemplate) -> CoreResult<()> {
        self.ensure_editable()?;

        let field = match template.category {
            TemplateCategory::Subject => &mut self.subject,
            TemplateCategory::Intro => &mut self.intro,
            TemplateCategory::PaymentTerms => &mut self.payment_terms,
            TemplateCategory::Closing => &mut self.closing,
        };
        field.clone_from(&template.text);
        Ok(())
    }

    // =========================================================================
    // Payments
    // =========================================================================

    fn ensure_invoice(&self) -> CoreResult<()> {
        if self.kind != DocumentKind::Invoice {
            return Err(CoreError::WrongDocumentKind {
                number: self.number.clone(),
                expected: DocumentKind::Invoice.to_string(),
                actual: self.kind.to_string(),
            });
        }
        Ok(())
    }

    /// Sets the due date to `days` after the document date.
    pub fn set_payment_due(&mut self, days: u32) -> CoreResult<NaiveDate> {
        self.ensure_editable()?;
        self.ensure_invoice()?;
        validation::validate_payment_days(days)?;

        let due = self
            .created_at
            .date_naive()
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(ValidationError::OutOfRange {
                field: "payment_days".to_string(),
                min: 0,
                max: i64::from(MAX_PAYMENT_DAYS),
            })?;

        self.due_date = Some(due);
        Ok(due)
    }

    /// Gross still to be paid, never negative.
    pub fn open_amount(&self) -> CoreResult<Decimal> {
        let gross = self.totals()?.gross;
        Ok(gross
            .checked_sub(self.paid_amount)
            .ok_or(CoreError::AmountOverflow { step: "open amount" })?
            .max(Decimal::ZERO))
    }

    /// Books a payment on a sent invoice and moves it to `PartiallyPaid`,
    /// or to `Paid` once nothing is open.
    ///
    /// ## Errors
    /// - `WrongDocumentKind` for quotes
    /// - `DocumentLocked` once paid or cancelled
    /// - `InvalidInput` for an amount that is not positive
    /// - `InvalidStatusTransition` for drafts
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> CoreResult<DocumentStatus> {
        self.ensure_editable()?;
        self.ensure_invoice()?;
        validation::validate_payment_amount(amount)?;

        let paid = self
            .paid_amount
            .checked_add(amount)
            .ok_or(CoreError::AmountOverflow { step: "paid amount" })?;
        let gross = self.totals()?.gross;

        let target = if paid >= gross {
            DocumentStatus::Paid
        } else {
            DocumentStatus::PartiallyPaid
        };
        if target != self.status {
            self.transition_to(target, now)?;
        }

        self.paid_amount = paid;
        Ok(self.status)
    }

    /// True for an unpaid invoice whose due date lies before `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        let awaiting_payment = matches!(
            self.status,
            DocumentStatus::Sent | DocumentStatus::PartiallyPaid | DocumentStatus::Overdue
        );
        awaiting_payment && self.due_date.is_some_and(|due| due < today)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Moves the document to `to` if the kind's lifecycle allows it.
    pub fn transition_to(&mut self, to: DocumentStatus, now: DateTime<Utc>) -> CoreResult<()> {
        if !self.status.can_transition(self.kind, to) {
            return Err(CoreError::InvalidStatusTransition {
                number: self.number.clone(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }

        self.status = to;
        self.status_changed_at = Some(now);
        Ok(())
    }

    /// Builds a draft invoice from an accepted quote.
    ///
    /// Copies customer, project, texts, lines, discount and VAT rate and
    /// records the quote id. Rental lines, left out of the quote's totals,
    /// are billed on the invoice.
    pub fn invoice_from_quote(
        quote: &Document,
        number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> CoreResult<Document> {
        if quote.kind != DocumentKind::Quote {
            return Err(CoreError::WrongDocumentKind {
                number: quote.number.clone(),
                expected: DocumentKind::Quote.to_string(),
                actual: quote.kind.to_string(),
            });
        }

        if quote.status != DocumentStatus::Accepted {
            return Err(CoreError::QuoteNotAccepted {
                number: quote.number.clone(),
                status: quote.status.to_string(),
            });
        }

        let mut invoice = Document::new_invoice(number, now)?;
        invoice.customer_id = quote.customer_id.clone();
        invoice.customer_name = quote.customer_name.clone();
        invoice.customer_address = quote.customer_address.clone();
        invoice.project_id = quote.project_id.clone();
        invoice.quote_id = Some(quote.id.clone());
        invoice.subject = quote.subject.clone();
        invoice.intro = quote.intro.clone();
        invoice.payment_terms = quote.payment_terms.clone();
        invoice.closing = quote.closing.clone();
        invoice.lines = quote.lines.clone();
        invoice.discount_percent = quote.discount_percent;
        invoice.discount_amount = quote.discount_amount;
        invoice.vat_rate = quote.vat_rate;

        Ok(invoice)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
