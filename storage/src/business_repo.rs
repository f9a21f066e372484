//! Business directory backed by the `businesses` table.

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use kasibot_core::{
    Business, BusinessDirectory, BusinessType, OperatingHours, StoreError,
};

#[derive(Clone)]
pub struct BusinessRepo {
    pool_manager: SqlitePoolManager,
}

impl BusinessRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Registers a business, returning its generated id.
    pub async fn create(&self, business: &Business) -> Result<i64, StoreError> {
        let hours = serde_json::to_string(&business.operating_hours)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        let result = sqlx::query(
            r#"
            INSERT INTO businesses (name, channel_address, business_type, language, operating_hours, ai_enabled)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&business.name)
        .bind(&business.channel_address)
        .bind(business.business_type.as_str())
        .bind(&business.language)
        .bind(hours)
        .bind(business.ai_enabled)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

type BusinessRow = (i64, String, String, String, String, String, bool);

fn from_row(row: BusinessRow) -> Result<Business, StoreError> {
    let (id, name, channel_address, type_tag, language, hours_json, ai_enabled) = row;
    let business_type = BusinessType::parse(&type_tag)
        .ok_or_else(|| StoreError::Database(format!("unknown business type {type_tag:?}")))?;
    let operating_hours: OperatingHours = serde_json::from_str(&hours_json)
        .map_err(|e| StoreError::Database(format!("bad operating hours: {e}")))?;
    Ok(Business {
        id,
        name,
        channel_address,
        business_type,
        language,
        operating_hours,
        ai_enabled,
    })
}

#[async_trait]
impl BusinessDirectory for BusinessRepo {
    async fn find_by_channel_address(
        &self,
        address: &str,
    ) -> Result<Option<Business>, StoreError> {
        let row: Option<BusinessRow> = sqlx::query_as(
            r#"
            SELECT id, name, channel_address, business_type, language, operating_hours, ai_enabled
            FROM businesses WHERE channel_address = ?
            "#,
        )
        .bind(address)
        .fetch_optional(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        row.map(from_row).transpose()
    }
}
