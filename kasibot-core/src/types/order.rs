//! Retail orders built from quantity+name extraction in the spaza module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Pickup,
    Delivery,
}

impl DeliveryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryType::Pickup => "pickup",
            DeliveryType::Delivery => "delivery",
        }
    }
}

/// One requested line before pricing: which product, how many.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// A priced order line as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub line_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub business_id: i64,
    pub customer_id: i64,
    pub lines: Vec<OrderLine>,
    pub total: f64,
    pub delivery: DeliveryType,
    pub address: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
