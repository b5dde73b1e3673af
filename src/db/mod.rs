use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::models::{Invoice, InvoiceChanges, NewInvoice};

/// Write access to the `invoices` table as the form actions need it
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<()>;

    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<()>;

    async fn delete_invoice(&self, id: &str) -> Result<()>;
}

/// Database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new Database instance with a connection pool
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(config.database_url())
            .await?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(self.get_pool()).await?;
        Ok(())
    }

    pub async fn get_invoice(&self, id: &str) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT
                id,
                customer_id,
                amount,
                status,
                date
            FROM invoices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(invoice)
    }
}

#[async_trait]
impl InvoiceStore for Database {
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (customer_id, amount, status, date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount_cents)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn update_invoice(&self, id: &str, changes: &InvoiceChanges) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = $1, amount = $2, status = $3
            WHERE id = $4
            "#,
        )
        .bind(&changes.customer_id)
        .bind(changes.amount_cents)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    async fn delete_invoice(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}

/// Initialize the database connection pool
pub async fn init(config: &Config) -> Result<Database> {
    let db = Database::new(config).await?;

    Ok(db)
}
