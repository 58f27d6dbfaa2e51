//! # Project Repository
//!
//! Construction projects ("Bauvorhaben"), each owned by one customer.

use geruest_core::Project;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: SqlitePool,
}

impl ProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProjectRepository { pool }
    }

    /// Inserts a project.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - customer doesn't exist
    pub async fn insert(&self, project: &Project) -> DbResult<()> {
        debug!(id = %project.id, customer_id = %project.customer_id, "Inserting project");

        sqlx::query(
            r#"
            INSERT INTO projects (id, customer_id, name, site_address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&project.id)
        .bind(&project.customer_id)
        .bind(&project.name)
        .bind(&project.site_address)
        .bind(project.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, customer_id, name, site_address, created_at FROM projects WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    /// Projects of one customer, newest first.
    pub async fn list_for_customer(&self, customer_id: &str) -> DbResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, customer_id, name, site_address, created_at
            FROM projects
            WHERE customer_id = ?1
            ORDER BY created_at DESC, name
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}
