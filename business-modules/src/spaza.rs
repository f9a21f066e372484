//! Spaza shop module: direct commands only. Catalog browsing, free-text
//! ordering with transactional stock checks, stock queries, delivery info,
//! and order history.

use crate::parse::extract_order_lines;
use crate::texts;
use async_trait::async_trait;
use kasibot_core::{
    Business, Catalog, Customer, DeliveryType, DirectHandler, Order, OrderError, OrderStore,
    ProductFilters, Result,
};
use std::sync::Arc;
use tracing::info;

pub struct SpazaModule {
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn OrderStore>,
}

impl SpazaModule {
    pub fn new(catalog: Arc<dyn Catalog>, orders: Arc<dyn OrderStore>) -> Self {
        Self { catalog, orders }
    }
}

#[async_trait]
impl DirectHandler for SpazaModule {
    async fn handle_message(
        &self,
        business: &Business,
        customer: &Customer,
        text: &str,
    ) -> Result<Option<String>> {
        let lower = text.to_lowercase();
        let language = customer.effective_language(&business.language);

        if lower.contains("catalog")
            || lower.contains("product")
            || lower.contains("price")
            || lower.contains("menu")
        {
            let products = self
                .catalog
                .list_products(business.id, &ProductFilters::default())
                .await?;
            return Ok(Some(texts::format_catalog(language, &products)));
        }

        if lower.contains("my order") {
            return Ok(Some(self.view_orders(business, customer).await?));
        }

        if lower.starts_with("order") || lower.contains("i want") || lower.contains("buy") {
            return Ok(Some(
                self.place_order(business, customer, &lower, language).await?,
            ));
        }

        if lower.starts_with("stock") || lower.contains("available") || lower.contains("have") {
            return Ok(Some(self.stock_query(business, &lower, language).await?));
        }

        if lower.contains("deliver") {
            return Ok(Some(texts::delivery_info(language).to_string()));
        }

        if lower.contains("hour") || lower.contains("open") || lower.contains("close") {
            return Ok(Some(texts::format_operating_hours(language, business)));
        }

        Ok(None)
    }
}

impl SpazaModule {
    /// Places an order from free text. Item lines are matched against the
    /// current catalog; delivery type and address come from the same message.
    async fn place_order(
        &self,
        business: &Business,
        customer: &Customer,
        lower: &str,
        language: &str,
    ) -> Result<String> {
        let products = self
            .catalog
            .list_products(business.id, &ProductFilters::default())
            .await?;
        let lines = extract_order_lines(lower, &products);
        if lines.is_empty() {
            return Ok(texts::order_usage(language).to_string());
        }

        let delivery = if lower.contains("deliver") {
            DeliveryType::Delivery
        } else {
            DeliveryType::Pickup
        };
        let address = extract_address(lower);

        match self
            .orders
            .create_order(business.id, customer.id, &lines, delivery, address.as_deref())
            .await
        {
            Ok(order) => {
                info!(
                    business_id = business.id,
                    order_id = order.id,
                    total = order.total,
                    "order placed"
                );
                Ok(format_receipt(&order))
            }
            Err(OrderError::OutOfStock { product, available }) => Ok(format!(
                "Sorry, we don't have enough {product} in stock right now (only {available} left). Your order was not placed."
            )),
            Err(OrderError::UnknownProduct(_)) => Ok(texts::order_usage(language).to_string()),
            Err(OrderError::Store(e)) => Err(e.into()),
        }
    }

    async fn stock_query(
        &self,
        business: &Business,
        lower: &str,
        language: &str,
    ) -> Result<String> {
        let products = self
            .catalog
            .list_products(business.id, &ProductFilters::default())
            .await?;
        let named = products
            .iter()
            .find(|p| lower.contains(&p.name.to_lowercase()) || word_overlap(lower, &p.name));
        match named {
            Some(product) => Ok(texts::stock_report(language, product)),
            None => Ok(texts::format_catalog(language, &products)),
        }
    }

    async fn view_orders(&self, business: &Business, customer: &Customer) -> Result<String> {
        let orders = self.orders.list_orders(business.id, customer.id).await?;
        if orders.is_empty() {
            return Ok("You have no orders yet. Reply \"catalog\" to see what we stock.".to_string());
        }
        let mut out = "🛒 Your Orders:\n\n".to_string();
        for order in orders.iter().take(5) {
            out.push_str(&format!(
                "#{} - R{:.2} ({}) - {}\n",
                order.id,
                order.total,
                order.delivery.as_str(),
                order.status
            ));
        }
        Ok(out)
    }
}

/// True when any word of the message (3+ chars) appears in the product name.
fn word_overlap(lower: &str, name: &str) -> bool {
    let name_lower = name.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w.len() >= 3 && name_lower.contains(w))
}

fn extract_address(lower: &str) -> Option<String> {
    let (_, rest) = lower.split_once("address:")?;
    let address = rest.trim();
    (!address.is_empty()).then(|| address.to_string())
}

fn format_receipt(order: &Order) -> String {
    let mut out = "✅ Order Placed!\n\n".to_string();
    for line in &order.lines {
        out.push_str(&format!(
            "{}x {} - R{:.2}\n",
            line.quantity, line.name, line.line_total
        ));
    }
    out.push_str(&format!("\nTotal: R{:.2}\n", order.total));
    match order.delivery {
        DeliveryType::Delivery => {
            out.push_str("Delivery: we'll bring it to you");
            if let Some(address) = &order.address {
                out.push_str(&format!(" at {address}"));
            }
            out.push('.');
        }
        DeliveryType::Pickup => out.push_str("Pickup: come collect when ready."),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_extracted_after_marker() {
        assert_eq!(
            extract_address("order 2 bread, deliver, address: 12 main rd"),
            Some("12 main rd".to_string())
        );
        assert_eq!(extract_address("order 2 bread"), None);
        assert_eq!(extract_address("address:   "), None);
    }
}
