//! FAQ rule store. Returns candidates for (business, language-or-en); the
//! ordering policy lives in the fallback matcher, not here.

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use kasibot_core::{FaqRule, FaqStore, StoreError};

#[derive(Clone)]
pub struct FaqRepo {
    pool_manager: SqlitePoolManager,
}

impl FaqRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn add_rule(&self, rule: &FaqRule) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO faq_rules (business_id, pattern, answer, language, priority)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(rule.business_id)
        .bind(&rule.pattern)
        .bind(&rule.answer)
        .bind(&rule.language)
        .bind(rule.priority)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl FaqStore for FaqRepo {
    async fn list_rules(
        &self,
        business_id: i64,
        language: &str,
    ) -> Result<Vec<FaqRule>, StoreError> {
        let rows: Vec<(i64, i64, String, String, String, i64)> = sqlx::query_as(
            r#"
            SELECT id, business_id, pattern, answer, language, priority
            FROM faq_rules WHERE business_id = ? AND language IN (?, 'en')
            "#,
        )
        .bind(business_id)
        .bind(language)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, business_id, pattern, answer, language, priority)| FaqRule {
                id,
                business_id,
                pattern,
                answer,
                language,
                priority,
            })
            .collect())
    }
}
