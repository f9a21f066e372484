//! Order store. Stock check and decrement happen inside one transaction; a
//! conditional `UPDATE ... WHERE stock >= ?` makes the decrement the check.

use crate::convert::db_err;
use crate::sqlite_pool::SqlitePoolManager;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kasibot_core::{
    DeliveryType, Order, OrderError, OrderLine, OrderLineRequest, OrderStore, StoreError,
};
use tracing::info;

#[derive(Clone)]
pub struct OrderRepo {
    pool_manager: SqlitePoolManager,
}

impl OrderRepo {
    pub fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    async fn lines_for(&self, order_id: i64) -> Result<Vec<OrderLine>, StoreError> {
        let rows: Vec<(i64, String, i64, f64)> = sqlx::query_as(
            r#"
            SELECT product_id, name, quantity, unit_price
            FROM order_items WHERE order_id = ? ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(product_id, name, quantity, unit_price)| OrderLine {
                product_id,
                name,
                quantity,
                unit_price,
                line_total: unit_price * quantity as f64,
            })
            .collect())
    }
}

fn parse_delivery(tag: &str) -> Result<DeliveryType, StoreError> {
    match tag {
        "pickup" => Ok(DeliveryType::Pickup),
        "delivery" => Ok(DeliveryType::Delivery),
        other => Err(StoreError::Database(format!(
            "unknown delivery type {other:?}"
        ))),
    }
}

#[async_trait]
impl OrderStore for OrderRepo {
    async fn create_order(
        &self,
        business_id: i64,
        customer_id: i64,
        lines: &[OrderLineRequest],
        delivery: DeliveryType,
        address: Option<&str>,
    ) -> Result<Order, OrderError> {
        let mut tx = self
            .pool_manager
            .pool()
            .begin()
            .await
            .map_err(|e| OrderError::Store(db_err(e)))?;

        let mut priced: Vec<OrderLine> = Vec::with_capacity(lines.len());
        for line in lines {
            let row: Option<(String, f64, i64)> = sqlx::query_as(
                "SELECT name, price, stock FROM products WHERE id = ? AND business_id = ?",
            )
            .bind(line.product_id)
            .bind(business_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| OrderError::Store(db_err(e)))?;
            let (name, price, stock) =
                row.ok_or(OrderError::UnknownProduct(line.product_id))?;

            let updated = sqlx::query(
                "UPDATE products SET stock = stock - ? WHERE id = ? AND stock >= ?",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| OrderError::Store(db_err(e)))?;
            if updated.rows_affected() == 0 {
                // Transaction drops here, rolling back earlier decrements.
                return Err(OrderError::OutOfStock {
                    product: name,
                    available: stock,
                });
            }

            priced.push(OrderLine {
                product_id: line.product_id,
                name,
                quantity: line.quantity,
                unit_price: price,
                line_total: price * line.quantity as f64,
            });
        }

        let total: f64 = priced.iter().map(|l| l.line_total).sum();
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO orders (business_id, customer_id, total, delivery_type, address, status, created_at)
            VALUES (?, ?, ?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(business_id)
        .bind(customer_id)
        .bind(total)
        .bind(delivery.as_str())
        .bind(address)
        .bind(created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| OrderError::Store(db_err(e)))?;
        let order_id = result.last_insert_rowid();

        for line in &priced {
            sqlx::query(
                r#"
                INSERT INTO order_items (order_id, product_id, name, quantity, unit_price)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| OrderError::Store(db_err(e)))?;
        }

        tx.commit().await.map_err(|e| OrderError::Store(db_err(e)))?;
        info!(order_id, business_id, total, "order created");

        Ok(Order {
            id: order_id,
            business_id,
            customer_id,
            lines: priced,
            total,
            delivery,
            address: address.map(str::to_string),
            status: "pending".to_string(),
            created_at,
        })
    }

    async fn list_orders(
        &self,
        business_id: i64,
        customer_id: i64,
    ) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<(i64, f64, String, Option<String>, String, String)> = sqlx::query_as(
            r#"
            SELECT id, total, delivery_type, address, status, created_at
            FROM orders WHERE business_id = ? AND customer_id = ?
            ORDER BY id DESC
            "#,
        )
        .bind(business_id)
        .bind(customer_id)
        .fetch_all(self.pool_manager.pool())
        .await
        .map_err(db_err)?;

        let mut orders = Vec::with_capacity(rows.len());
        for (id, total, delivery_tag, address, status, created_at) in rows {
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StoreError::Database(format!("bad timestamp: {e}")))?
                .with_timezone(&Utc);
            orders.push(Order {
                id,
                business_id,
                customer_id,
                lines: self.lines_for(id).await?,
                total,
                delivery: parse_delivery(&delivery_tag)?,
                address,
                status,
                created_at,
            });
        }
        Ok(orders)
    }
}
