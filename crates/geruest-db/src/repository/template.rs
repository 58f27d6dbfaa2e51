//! # Template Repository
//!
//! Reusable document texts and line items.
//!
//! ```text
//! text_templates        subject | intro | payment_terms | closing
//!                       "14 Tage netto" → document.payment_terms
//!
//! position_templates    EINR, MIETE4W, ...
//!                       shortcode → LineItem with default qty/price/percentage
//! ```

use chrono::{DateTime, Utc};
use geruest_core::validation::{validate_name, validate_percentage, validate_shortcode};
use geruest_core::{CoreError, PositionKind, PositionTemplate, TemplateCategory, TextTemplate};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use super::optional_decimal;
use crate::error::{DbError, DbResult};

const MAX_TEMPLATE_NAME: usize = 100;

#[derive(Debug, FromRow)]
struct PositionTemplateRow {
    id: String,
    shortcode: String,
    name: String,
    description: String,
    kind: PositionKind,
    unit: String,
    default_price: Option<String>,
    default_quantity: Option<String>,
    default_percentage: Option<String>,
    category: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PositionTemplateRow> for PositionTemplate {
    type Error = DbError;

    fn try_from(row: PositionTemplateRow) -> DbResult<Self> {
        Ok(PositionTemplate {
            id: row.id,
            shortcode: row.shortcode,
            name: row.name,
            description: row.description,
            kind: row.kind,
            unit: row.unit,
            default_price: optional_decimal(row.default_price)?,
            default_quantity: optional_decimal(row.default_quantity)?,
            default_percentage: optional_decimal(row.default_percentage)?,
            category: row.category,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const POSITION_COLUMNS: &str = r#"
    SELECT
        id, shortcode, name, description, kind, unit,
        default_price, default_quantity, default_percentage,
        category, active, created_at, updated_at
    FROM position_templates
"#;

/// Repository for text snippets and position templates.
#[derive(Debug, Clone)]
pub struct TemplateRepository {
    pool: SqlitePool,
}

impl TemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TemplateRepository { pool }
    }

    // =========================================================================
    // Text templates
    // =========================================================================

    /// Lists text templates, optionally of one category, sorted by name.
    pub async fn list_text(
        &self,
        category: Option<TemplateCategory>,
        active_only: bool,
    ) -> DbResult<Vec<TextTemplate>> {
        let templates = sqlx::query_as::<_, TextTemplate>(
            r#"
            SELECT id, category, name, text, active, created_at, updated_at
            FROM text_templates
            WHERE (?1 IS NULL OR category = ?1)
              AND (?2 = 0 OR active = 1)
            ORDER BY category, name COLLATE NOCASE
            "#,
        )
        .bind(category)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    pub async fn get_text(&self, id: &str) -> DbResult<Option<TextTemplate>> {
        let template = sqlx::query_as::<_, TextTemplate>(
            r#"
            SELECT id, category, name, text, active, created_at, updated_at
            FROM text_templates
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    /// Inserts or updates a text template by id.
    pub async fn save_text(&self, template: &TextTemplate) -> DbResult<()> {
        validate_name("name", &template.name, MAX_TEMPLATE_NAME).map_err(CoreError::from)?;

        debug!(id = %template.id, category = template.category.as_str(), "Saving text template");

        sqlx::query(
            r#"
            INSERT INTO text_templates (id, category, name, text, active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                category = excluded.category,
                name = excluded.name,
                text = excluded.text,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&template.id)
        .bind(template.category)
        .bind(template.name.trim())
        .bind(&template.text)
        .bind(template.active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_text(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting text template");

        let result = sqlx::query("DELETE FROM text_templates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Text template", id));
        }
        Ok(())
    }

    // =========================================================================
    // Position templates
    // =========================================================================

    /// Lists position templates, sorted by shortcode.
    pub async fn list_positions(&self, active_only: bool) -> DbResult<Vec<PositionTemplate>> {
        let rows: Vec<PositionTemplateRow> = sqlx::query_as(&format!(
            "{} WHERE (?1 = 0 OR active = 1) ORDER BY shortcode",
            POSITION_COLUMNS
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PositionTemplate::try_from).collect()
    }

    /// Looks a position template up by shortcode (case-insensitive).
    pub async fn get_position_by_shortcode(
        &self,
        shortcode: &str,
    ) -> DbResult<Option<PositionTemplate>> {
        let row: Option<PositionTemplateRow> =
            sqlx::query_as(&format!("{} WHERE shortcode = ?1", POSITION_COLUMNS))
                .bind(shortcode.trim().to_uppercase())
                .fetch_optional(&self.pool)
                .await?;

        row.map(PositionTemplate::try_from).transpose()
    }

    /// Inserts or updates a position template by id.
    ///
    /// ## Returns
    /// * `Err(DbError::Domain)` - invalid shortcode, name or percentage
    /// * `Err(DbError::UniqueViolation)` - shortcode used by another template
    pub async fn save_position(&self, template: &PositionTemplate) -> DbResult<()> {
        validate_shortcode(&template.shortcode).map_err(CoreError::from)?;
        validate_name("name", &template.name, MAX_TEMPLATE_NAME).map_err(CoreError::from)?;
        validate_percentage(&template.shortcode, template.default_percentage)
            .map_err(CoreError::from)?;

        debug!(id = %template.id, shortcode = %template.shortcode, "Saving position template");

        sqlx::query(
            r#"
            INSERT INTO position_templates (
                id, shortcode, name, description, kind, unit,
                default_price, default_quantity, default_percentage,
                category, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ON CONFLICT(id) DO UPDATE SET
                shortcode = excluded.shortcode,
                name = excluded.name,
                description = excluded.description,
                kind = excluded.kind,
                unit = excluded.unit,
                default_price = excluded.default_price,
                default_quantity = excluded.default_quantity,
                default_percentage = excluded.default_percentage,
                category = excluded.category,
                active = excluded.active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&template.id)
        .bind(template.shortcode.trim())
        .bind(template.name.trim())
        .bind(&template.description)
        .bind(template.kind)
        .bind(&template.unit)
        .bind(template.default_price.map(|d| d.to_string()))
        .bind(template.default_quantity.map(|d| d.to_string()))
        .bind(template.default_percentage.map(|d| d.to_string()))
        .bind(&template.category)
        .bind(template.active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_position(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting position template");

        let result = sqlx::query("DELETE FROM position_templates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Position template", id));
        }
        Ok(())
    }
}
