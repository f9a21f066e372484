//! Per-business message log (both directions).

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kasibot_core::{Direction, MessageLog, MessageRecord, StoreError};

#[derive(Clone)]
pub struct MessageRepo {
    pool_manager: SqlitePoolManager,
}

impl MessageRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Most recent messages for a business, newest first.
    pub async fn recent(
        &self,
        business_id: i64,
        limit: i64,
    ) -> Result<Vec<MessageRecord>, StoreError> {
        let rows: Vec<(String, i64, i64, String, String, String)> = sqlx::query_as(
            r#"
            SELECT id, business_id, customer_id, direction, body, created_at
            FROM messages WHERE business_id = ?
            ORDER BY created_at DESC LIMIT ?
            "#,
        )
        .bind(business_id)
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(id, business_id, customer_id, direction, body, created_at)| {
                let direction = match direction.as_str() {
                    "incoming" => Direction::Incoming,
                    "outgoing" => Direction::Outgoing,
                    other => {
                        return Err(StoreError::Database(format!(
                            "unknown direction {other:?}"
                        )))
                    }
                };
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| StoreError::Database(format!("bad timestamp: {e}")))?
                    .with_timezone(&Utc);
                Ok(MessageRecord {
                    id,
                    business_id,
                    customer_id,
                    direction,
                    body,
                    created_at,
                })
            })
            .collect()
    }
}

#[async_trait]
impl MessageLog for MessageRepo {
    async fn record(&self, record: &MessageRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, business_id, customer_id, direction, body, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.business_id)
        .bind(record.customer_id)
        .bind(record.direction.as_str())
        .bind(&record.body)
        .bind(record.created_at.to_rfc3339())
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
