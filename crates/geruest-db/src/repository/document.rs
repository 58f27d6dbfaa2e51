//! # Document Repository
//!
//! Storage for quotes and invoices.
//!
//! ## Save Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       save(&mut document)                               │
//! │                                                                         │
//! │  1. Load stored (status, version)        ── missing ──► NotFound        │
//! │  2. Stored status terminal?              ── yes ──────► Locked          │
//! │  3. Stored version == document.version?  ── no ───────► VersionConflict │
//! │  4. UPDATE ... WHERE id = ? AND version = ?                             │
//! │     └── 0 rows (lost a race)             ─────────────► VersionConflict │
//! │  5. document.version += 1, updated_at = now                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines are one JSON array column; decimals are TEXT. Totals are not stored.

use chrono::{DateTime, NaiveDate, Utc};
use geruest_core::{Document, DocumentKind, DocumentStatus, LineItem};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use super::{decimal_from_text, optional_decimal};
use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, kind, number, status,
        customer_id, customer_name, customer_address, project_id, quote_id,
        subject, intro, payment_terms, closing,
        lines, discount_percent, discount_amount, vat_rate,
        due_date, paid_amount,
        version, created_at, updated_at, status_changed_at
    FROM documents
"#;

/// Raw `documents` row; decimals and lines still encoded.
#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    kind: DocumentKind,
    number: String,
    status: DocumentStatus,
    customer_id: Option<String>,
    customer_name: String,
    customer_address: Option<String>,
    project_id: Option<String>,
    quote_id: Option<String>,
    subject: String,
    intro: String,
    payment_terms: String,
    closing: String,
    lines: String,
    discount_percent: Option<String>,
    discount_amount: Option<String>,
    vat_rate: String,
    due_date: Option<NaiveDate>,
    paid_amount: String,
    version: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    status_changed_at: Option<DateTime<Utc>>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = DbError;

    fn try_from(row: DocumentRow) -> DbResult<Self> {
        let lines: Vec<LineItem> = serde_json::from_str(&row.lines)?;

        Ok(Document {
            id: row.id,
            kind: row.kind,
            number: row.number,
            status: row.status,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            customer_address: row.customer_address,
            project_id: row.project_id,
            quote_id: row.quote_id,
            subject: row.subject,
            intro: row.intro,
            payment_terms: row.payment_terms,
            closing: row.closing,
            lines,
            discount_percent: optional_decimal(row.discount_percent)?,
            discount_amount: optional_decimal(row.discount_amount)?,
            vat_rate: decimal_from_text(&row.vat_rate)?,
            due_date: row.due_date,
            paid_amount: decimal_from_text(&row.paid_amount)?,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
            status_changed_at: row.status_changed_at,
        })
    }
}

/// Filter for [`DocumentRepository::list`]. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub kind: Option<DocumentKind>,
    pub status: Option<DocumentStatus>,
    pub customer_id: Option<String>,
    pub limit: Option<u32>,
}

impl DocumentFilter {
    pub fn new() -> Self {
        DocumentFilter::default()
    }

    pub fn kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Repository for quote and invoice persistence.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        DocumentRepository { pool }
    }

    /// Inserts a new document as stored version `document.version`.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - number already taken
    pub async fn insert(&self, document: &Document) -> DbResult<()> {
        debug!(id = %document.id, number = %document.number, kind = %document.kind, "Inserting document");

        let lines = serde_json::to_string(&document.lines)?;

        sqlx::query(
            r#"
            INSERT INTO documents (
                id, kind, number, status,
                customer_id, customer_name, customer_address, project_id, quote_id,
                subject, intro, payment_terms, closing,
                lines, discount_percent, discount_amount, vat_rate,
                due_date, paid_amount,
                version, created_at, updated_at, status_changed_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9,
                ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17,
                ?18, ?19,
                ?20, ?21, ?22, ?23
            )
            "#,
        )
        .bind(&document.id)
        .bind(document.kind)
        .bind(&document.number)
        .bind(document.status)
        .bind(&document.customer_id)
        .bind(&document.customer_name)
        .bind(&document.customer_address)
        .bind(&document.project_id)
        .bind(&document.quote_id)
        .bind(&document.subject)
        .bind(&document.intro)
        .bind(&document.payment_terms)
        .bind(&document.closing)
        .bind(lines)
        .bind(document.discount_percent.map(|d| d.to_string()))
        .bind(document.discount_amount.map(|d| d.to_string()))
        .bind(document.vat_rate.to_string())
        .bind(document.due_date)
        .bind(document.paid_amount.to_string())
        .bind(document.version)
        .bind(document.created_at)
        .bind(document.updated_at)
        .bind(document.status_changed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("number") => {
                DbError::duplicate("document number", document.number.clone())
            }
            other => other,
        })?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Document>> {
        let row: Option<DocumentRow> =
            sqlx::query_as(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Document::try_from).transpose()
    }

    /// Looks a document up by its number (`A-2026-0007`).
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Document>> {
        let row: Option<DocumentRow> =
            sqlx::query_as(&format!("{} WHERE number = ?1", SELECT_COLUMNS))
                .bind(number.trim())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Document::try_from).transpose()
    }

    /// Writes all fields of an existing document.
    ///
    /// On success `document.version` and `document.updated_at` reflect the
    /// stored row. Saving the transition *into* a terminal status is allowed;
    /// saving over a stored terminal document is not.
    pub async fn save(&self, document: &mut Document) -> DbResult<()> {
        let stored: Option<(DocumentStatus, i64)> =
            sqlx::query_as("SELECT status, version FROM documents WHERE id = ?1")
                .bind(&document.id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((stored_status, stored_version)) = stored else {
            return Err(DbError::not_found("Document", &document.id));
        };

        if stored_status.is_terminal() {
            warn!(id = %document.id, status = %stored_status, "Refusing to overwrite locked document");
            return Err(DbError::Locked {
                id: document.id.clone(),
                status: stored_status.to_string(),
            });
        }

        if stored_version != document.version {
            return Err(DbError::VersionConflict {
                id: document.id.clone(),
                expected: document.version,
                found: stored_version,
            });
        }

        let now = Utc::now();
        let lines = serde_json::to_string(&document.lines)?;

        debug!(
            id = %document.id,
            number = %document.number,
            version = document.version,
            lines = document.lines.len(),
            "Saving document"
        );

        let result = sqlx::query(
            r#"
            UPDATE documents SET
                status = ?3,
                customer_id = ?4,
                customer_name = ?5,
                customer_address = ?6,
                project_id = ?7,
                quote_id = ?8,
                subject = ?9,
                intro = ?10,
                payment_terms = ?11,
                closing = ?12,
                lines = ?13,
                discount_percent = ?14,
                discount_amount = ?15,
                vat_rate = ?16,
                status_changed_at = ?17,
                updated_at = ?18,
                due_date = ?19,
                paid_amount = ?20,
                version = version + 1
            WHERE id = ?1 AND version = ?2
            "#,
        )
        .bind(&document.id)
        .bind(document.version)
        .bind(document.status)
        .bind(&document.customer_id)
        .bind(&document.customer_name)
        .bind(&document.customer_address)
        .bind(&document.project_id)
        .bind(&document.quote_id)
        .bind(&document.subject)
        .bind(&document.intro)
        .bind(&document.payment_terms)
        .bind(&document.closing)
        .bind(lines)
        .bind(document.discount_percent.map(|d| d.to_string()))
        .bind(document.discount_amount.map(|d| d.to_string()))
        .bind(document.vat_rate.to_string())
        .bind(document.status_changed_at)
        .bind(now)
        .bind(document.due_date)
        .bind(document.paid_amount.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::VersionConflict {
                id: document.id.clone(),
                expected: document.version,
                found: document.version + 1,
            });
        }

        document.version += 1;
        document.updated_at = now;
        Ok(())
    }

    /// Lists documents, newest first.
    pub async fn list(&self, filter: &DocumentFilter) -> DbResult<Vec<Document>> {
        debug!(?filter, "Listing documents");

        // LIMIT -1 means no limit in SQLite
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE (?1 IS NULL OR kind = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR customer_id = ?3)
            ORDER BY created_at DESC, number DESC
            LIMIT ?4"#,
            SELECT_COLUMNS
        ))
        .bind(filter.kind)
        .bind(filter.status)
        .bind(filter.customer_id.as_deref())
        .bind(filter.limit.map(i64::from).unwrap_or(-1))
        .fetch_all(&self.pool)
        .await?;

        let documents = rows
            .into_iter()
            .map(Document::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        debug!(count = documents.len(), "List returned documents");
        Ok(documents)
    }

    /// Next free number for `kind` in `year`, e.g. `A-2026-0008`.
    ///
    /// Sequences restart every year. The number is not reserved; a racing
    /// insert of the same number fails with `UniqueViolation`.
    pub async fn next_number(&self, kind: DocumentKind, year: i32) -> DbResult<String> {
        let prefix = format!("{}-{}-", kind.number_prefix(), year);

        let highest: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX(CAST(substr(number, ?2) AS INTEGER))
            FROM documents
            WHERE kind = ?1 AND number LIKE ?3
            "#,
        )
        .bind(kind)
        .bind(i64::try_from(prefix.len() + 1).unwrap_or(i64::MAX))
        .bind(format!("{}%", prefix))
        .fetch_one(&self.pool)
        .await?;

        let next = u32::try_from(highest.unwrap_or(0) + 1)
            .map_err(|e| DbError::Internal(format!("document sequence overflow: {}", e)))?;

        Ok(kind.format_number(year, next))
    }

    /// Counts documents, optionally of one kind.
    pub async fn count(&self, kind: Option<DocumentKind>) -> DbResult<i64> {
        let count: i64 = match kind {
            Some(kind) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE kind = ?1")
                    .bind(kind)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM documents")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count)
    }

    /// Invoices created from the given quote.
    pub async fn invoices_for_quote(&self, quote_id: &str) -> DbResult<Vec<Document>> {
        let rows: Vec<DocumentRow> = sqlx::query_as(&format!(
            "{} WHERE quote_id = ?1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Document::try_from).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use geruest_core::PositionKind;
    use rust_decimal_macros::dec;

    async fn repo() -> DocumentRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().documents()
    }

    fn sample_quote(number: &str) -> Document {
        let mut doc = Document::new_quote(number, Utc::now()).unwrap();
        doc.add_line(
            LineItem::new("", PositionKind::Material, dec!(10), dec!(15.00))
                .with_description("Gerüstaufbau"),
        )
        .unwrap();
        doc.add_line(LineItem::new("", PositionKind::Rental, dec!(1), dec!(500.00)))
            .unwrap();
        doc.set_discount_percent(dec!(10)).unwrap();
        doc
    }

    #[tokio::test]
    async fn test_insert_and_load_round_trip() {
        let repo = repo().await;
        let quote = sample_quote("A-2026-0001");
        repo.insert(&quote).await.unwrap();

        let loaded = repo.get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded.lines, quote.lines);
        assert_eq!(loaded.discount_percent, Some(dec!(10)));
        assert_eq!(loaded.vat_rate, dec!(19));
        assert_eq!(loaded.totals().unwrap().rounded().gross, dec!(160.65));

        let by_number = repo.get_by_number("A-2026-0001").await.unwrap().unwrap();
        assert_eq!(by_number.id, quote.id);
        assert!(repo.get_by_number("A-2026-0099").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let repo = repo().await;
        repo.insert(&sample_quote("A-2026-0001")).await.unwrap();

        let err = repo.insert(&sample_quote("A-2026-0001")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let repo = repo().await;
        let mut quote = sample_quote("A-2026-0001");
        repo.insert(&quote).await.unwrap();

        quote.set_vat_rate(dec!(7)).unwrap();
        repo.save(&mut quote).await.unwrap();
        assert_eq!(quote.version, 1);

        let loaded = repo.get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.vat_rate, dec!(7));
    }

    #[tokio::test]
    async fn test_stale_save_is_a_version_conflict() {
        let repo = repo().await;
        let mut quote = sample_quote("A-2026-0001");
        repo.insert(&quote).await.unwrap();

        let mut stale = quote.clone();
        quote.set_discount_amount(dec!(20)).unwrap();
        repo.save(&mut quote).await.unwrap();

        stale.set_vat_rate(dec!(0)).unwrap();
        let err = repo.save(&mut stale).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::VersionConflict { expected: 0, found: 1, .. }
        ));
        assert_eq!(stale.version, 0);
    }

    #[tokio::test]
    async fn test_terminal_document_cannot_be_overwritten() {
        let repo = repo().await;
        let mut quote = sample_quote("A-2026-0001");
        repo.insert(&quote).await.unwrap();

        quote.transition_to(DocumentStatus::Accepted, Utc::now()).unwrap();
        repo.save(&mut quote).await.unwrap();

        // Bypass the in-memory lock to prove the store enforces it too.
        quote.status = DocumentStatus::Draft;
        let err = repo.save(&mut quote).await.unwrap_err();
        assert!(matches!(err, DbError::Locked { .. }));
    }

    #[tokio::test]
    async fn test_payment_fields_round_trip() {
        let repo = repo().await;
        let mut invoice = Document::new_invoice("R-2026-0001", Utc::now()).unwrap();
        invoice
            .add_line(LineItem::new("", PositionKind::Labor, dec!(1), dec!(1000)))
            .unwrap();
        let due = invoice.set_payment_due(14).unwrap();
        invoice.transition_to(DocumentStatus::Sent, Utc::now()).unwrap();
        repo.insert(&invoice).await.unwrap();

        invoice.record_payment(dec!(500.50), Utc::now()).unwrap();
        repo.save(&mut invoice).await.unwrap();

        let loaded = repo.get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(loaded.due_date, Some(due));
        assert_eq!(loaded.paid_amount, dec!(500.50));
        assert_eq!(loaded.status, DocumentStatus::PartiallyPaid);
        assert_eq!(loaded.open_amount().unwrap(), dec!(689.50));
    }

    #[tokio::test]
    async fn test_numeric_positions_in_stored_lines() {
        let repo = repo().await;
        let quote = sample_quote("A-2026-0001");
        repo.insert(&quote).await.unwrap();

        sqlx::query("UPDATE documents SET lines = ?1 WHERE id = ?2")
            .bind(r#"[{"position":1,"kind":"material","quantity":"10","unitPrice":"15"}]"#)
            .bind(&quote.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let loaded = repo.get_by_id(&quote.id).await.unwrap().unwrap();
        assert_eq!(loaded.lines[0].position, "01");
        assert_eq!(loaded.next_position().unwrap(), "02");
    }

    #[tokio::test]
    async fn test_save_unknown_document() {
        let repo = repo().await;
        let mut quote = sample_quote("A-2026-0001");
        let err = repo.save(&mut quote).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_next_number_per_kind_and_year() {
        let repo = repo().await;
        assert_eq!(
            repo.next_number(DocumentKind::Quote, 2026).await.unwrap(),
            "A-2026-0001"
        );

        repo.insert(&sample_quote("A-2026-0001")).await.unwrap();
        repo.insert(&sample_quote("A-2026-0012")).await.unwrap();
        repo.insert(&sample_quote("A-2025-0040")).await.unwrap();

        assert_eq!(
            repo.next_number(DocumentKind::Quote, 2026).await.unwrap(),
            "A-2026-0013"
        );
        assert_eq!(
            repo.next_number(DocumentKind::Quote, 2025).await.unwrap(),
            "A-2025-0041"
        );
        assert_eq!(
            repo.next_number(DocumentKind::Invoice, 2026).await.unwrap(),
            "R-2026-0001"
        );
    }

    #[tokio::test]
    async fn test_list_and_count_with_filter() {
        let repo = repo().await;
        let mut accepted = sample_quote("A-2026-0001");
        accepted
            .transition_to(DocumentStatus::Accepted, Utc::now())
            .unwrap();
        repo.insert(&accepted).await.unwrap();
        repo.insert(&sample_quote("A-2026-0002")).await.unwrap();

        let invoice = Document::invoice_from_quote(&accepted, "R-2026-0001", Utc::now()).unwrap();
        repo.insert(&invoice).await.unwrap();

        let quotes = repo
            .list(&DocumentFilter::new().kind(DocumentKind::Quote))
            .await
            .unwrap();
        assert_eq!(quotes.len(), 2);

        let drafts = repo
            .list(
                &DocumentFilter::new()
                    .kind(DocumentKind::Quote)
                    .status(DocumentStatus::Draft),
            )
            .await
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].number, "A-2026-0002");

        let limited = repo.list(&DocumentFilter::new().limit(1)).await.unwrap();
        assert_eq!(limited.len(), 1);

        assert_eq!(repo.count(None).await.unwrap(), 3);
        assert_eq!(repo.count(Some(DocumentKind::Invoice)).await.unwrap(), 1);

        let billed = repo.invoices_for_quote(&accepted.id).await.unwrap();
        assert_eq!(billed.len(), 1);
        assert_eq!(billed[0].number, "R-2026-0001");
    }
}
