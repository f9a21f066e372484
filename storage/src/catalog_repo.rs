//! Catalog reads: services (price ascending) and products with optional
//! category/stock filters.

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use kasibot_core::{Catalog, Product, ProductFilters, Service, StoreError};

#[derive(Clone)]
pub struct CatalogRepo {
    pool_manager: SqlitePoolManager,
}

impl CatalogRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn add_service(&self, service: &Service) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO services (business_id, name, description, price, duration_min)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(service.business_id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(service.duration_min)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }

    pub async fn add_product(&self, product: &Product) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (business_id, name, category, price, stock)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.business_id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.price)
        .bind(product.stock)
        .execute(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl Catalog for CatalogRepo {
    async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, StoreError> {
        let rows: Vec<(i64, i64, String, Option<String>, f64, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT id, business_id, name, description, price, duration_min
            FROM services WHERE business_id = ? ORDER BY price ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, business_id, name, description, price, duration_min)| Service {
                id,
                business_id,
                name,
                description,
                price,
                duration_min,
            })
            .collect())
    }

    async fn list_products(
        &self,
        business_id: i64,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<(i64, i64, String, Option<String>, f64, i64)> = sqlx::query_as(
            r#"
            SELECT id, business_id, name, category, price, stock
            FROM products WHERE business_id = ? ORDER BY name ASC
            "#,
        )
        .bind(business_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(id, business_id, name, category, price, stock)| Product {
                id,
                business_id,
                name,
                category,
                price,
                stock,
            })
            .filter(|p| {
                filters
                    .category
                    .as_deref()
                    .map_or(true, |c| p.category.as_deref() == Some(c))
            })
            .filter(|p| filters.in_stock.map_or(true, |want| p.in_stock() == want))
            .collect())
    }
}
