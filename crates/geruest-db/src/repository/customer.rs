//! # Customer Repository
//!
//! Customer lookup for document headers.

use geruest_core::Customer;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a customer (id generated beforehand).
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.display_name(), "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, company, first_name, last_name,
                street, house_number, postal_code, city,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.company)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.street)
        .bind(&customer.house_number)
        .bind(&customer.postal_code)
        .bind(&customer.city)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a customer by ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - Customer not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                id, company, first_name, last_name,
                street, house_number, postal_code, city,
                created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// All customers, sorted by company name or last name.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT
                id, company, first_name, last_name,
                street, house_number, postal_code, city,
                created_at
            FROM customers
            ORDER BY COALESCE(NULLIF(company, ''), last_name) COLLATE NOCASE, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }
}
