//! Catalog items: bookable services and retail products. Read-only to the
//! core, exposed via the catalog collaborator.

use serde::{Deserialize, Serialize};

/// A bookable service (barber cut, wash package).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub duration_min: Option<i64>,
}

/// A retail product with a stock count (spaza shops).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub business_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub price: f64,
    pub stock: i64,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
