//! Customer directory backed by the `customers` table. Customers are created
//! on first contact; `last_interaction` is refreshed on every lookup.

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::Utc;
use kasibot_core::{Customer, CustomerDirectory, StoreError};
use tracing::info;

#[derive(Clone)]
pub struct CustomerRepo {
    pool_manager: SqlitePoolManager,
}

impl CustomerRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Updates the stored preferred language.
    pub async fn set_language(&self, customer_id: i64, language: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE customers SET language = ? WHERE id = ?")
            .bind(language)
            .bind(customer_id)
            .execute(self.pool_manager.pool())
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

type CustomerRow = (i64, String, String, String, i64);

fn from_row(row: CustomerRow) -> Customer {
    let (id, channel_address, name, language, business_id) = row;
    Customer {
        id,
        channel_address,
        name,
        language,
        business_id,
    }
}

#[async_trait]
impl CustomerDirectory for CustomerRepo {
    async fn get_or_create(
        &self,
        address: &str,
        business_id: i64,
    ) -> Result<Customer, StoreError> {
        let pool = self.pool_manager.pool();
        let now = Utc::now().to_rfc3339();

        let existing: Option<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, channel_address, name, language, business_id
            FROM customers WHERE channel_address = ? AND business_id = ?
            "#,
        )
        .bind(address)
        .bind(business_id)
        .fetch_optional(pool)
        .await
        .map_err(db_err)?;

        if let Some(row) = existing {
            sqlx::query("UPDATE customers SET last_interaction = ? WHERE id = ?")
                .bind(&now)
                .bind(row.0)
                .execute(pool)
                .await
                .map_err(db_err)?;
            return Ok(from_row(row));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO customers (channel_address, name, language, business_id, last_interaction)
            VALUES (?, '', 'en', ?, ?)
            "#,
        )
        .bind(address)
        .bind(business_id)
        .bind(&now)
        .execute(pool)
        .await
        .map_err(db_err)?;
        let id = result.last_insert_rowid();
        info!(customer_id = id, business_id, "created customer on first contact");

        Ok(Customer {
            id,
            channel_address: address.to_string(),
            name: String::new(),
            language: "en".to_string(),
            business_id,
        })
    }

    async fn list_customers(&self, business_id: i64) -> Result<Vec<Customer>, StoreError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT id, channel_address, name, language, business_id
            FROM customers WHERE business_id = ? ORDER BY id
            "#,
        )
        .bind(business_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(from_row).collect())
    }
}
