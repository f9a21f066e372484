//! Car wash module: package-selection flow with button choices plus direct
//! commands for queue status, services, and hours.

use crate::texts;
use async_trait::async_trait;
use chrono::Local;
use kasibot_core::{
    BookingFilters, BookingStore, Business, Button, Catalog, Customer, DirectHandler,
    InteractiveFlow, ModuleKey, Prompt, Result, Session,
};
use std::sync::Arc;
use tracing::warn;

pub const STEP_SELECT_PACKAGE: &str = "select_package";
pub const STEP_COLLECT_LOCATION: &str = "collect_location";
pub const STEP_COLLECT_TIME: &str = "collect_time";

/// Minutes of estimated wait contributed by each car ahead in the queue.
const QUEUE_MINUTES_PER_CAR: i64 = 20;

/// The three wash packages offered as interactive buttons.
pub fn package_buttons() -> Vec<Button> {
    vec![
        Button::new("carwash_basic", "Basic Wash"),
        Button::new("carwash_deluxe", "Deluxe Wash"),
        Button::new("carwash_detail", "Detailing"),
    ]
}

fn package_label(input: &str) -> &str {
    match input {
        "carwash_basic" => "Basic Wash",
        "carwash_deluxe" => "Deluxe Wash",
        "carwash_detail" => "Detailing",
        other => other,
    }
}

pub struct CarwashModule {
    catalog: Arc<dyn Catalog>,
    bookings: Arc<dyn BookingStore>,
}

impl CarwashModule {
    pub fn new(catalog: Arc<dyn Catalog>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { catalog, bookings }
    }
}

#[async_trait]
impl InteractiveFlow for CarwashModule {
    fn key(&self) -> ModuleKey {
        ModuleKey::Carwash
    }

    fn start(&self) -> Prompt {
        Prompt::text("🚗 Car wash bookings: which package would you like?")
            .with_buttons(package_buttons())
            .with_next_step(STEP_SELECT_PACKAGE)
    }

    async fn handle_step(&self, input: &str, session: &mut Session) -> Result<Prompt> {
        match session.step.as_deref() {
            Some(STEP_SELECT_PACKAGE) => {
                session.data.insert("package", package_label(input));
                Ok(
                    Prompt::text("Where should we wash your car? Share your location or address.")
                        .with_next_step(STEP_COLLECT_LOCATION),
                )
            }
            Some(STEP_COLLECT_LOCATION) => {
                session.data.insert("location", input);
                Ok(Prompt::text("What time should we come? (e.g. 11:00)")
                    .with_next_step(STEP_COLLECT_TIME))
            }
            Some(STEP_COLLECT_TIME) => {
                session.data.insert("time", input);
                let package = session.data.get("package").unwrap_or("-");
                let location = session.data.get("location").unwrap_or("-");
                let time = session.data.get("time").unwrap_or("-");
                Ok(Prompt::finished(format!(
                    "✅ Car wash booked!\n• Package: {package}\n• Location: {location}\n• Time: {time}\n\nSee you then!"
                )))
            }
            other => {
                warn!(step = ?other, "unrecognized car wash step, restarting flow");
                session.data.clear();
                Ok(Prompt::text("Let's start again. Which package would you like?")
                    .with_buttons(package_buttons())
                    .with_next_step(STEP_SELECT_PACKAGE))
            }
        }
    }
}

#[async_trait]
impl DirectHandler for CarwashModule {
    async fn handle_message(
        &self,
        business: &Business,
        customer: &Customer,
        text: &str,
    ) -> Result<Option<String>> {
        let lower = text.to_lowercase();
        let language = customer.effective_language(&business.language);

        if lower.contains("queue") || lower.contains("wait") || lower.contains("how long") {
            return Ok(Some(self.queue_status(business).await?));
        }

        if lower.contains("service") || lower.contains("price") || lower.contains("package") {
            let services = self.catalog.list_services(business.id).await?;
            return Ok(Some(texts::format_services(
                language,
                business.business_type,
                &services,
            )));
        }

        if lower.contains("hour") || lower.contains("open") || lower.contains("close") {
            return Ok(Some(texts::format_operating_hours(language, business)));
        }

        Ok(None)
    }
}

impl CarwashModule {
    /// Estimated wait from today's active bookings at a fixed per-car rate.
    async fn queue_status(&self, business: &Business) -> Result<String> {
        let today = Local::now().date_naive();
        let active = self
            .bookings
            .list_bookings(&BookingFilters {
                business_id: Some(business.id),
                date: Some(today),
                active_only: true,
                ..Default::default()
            })
            .await?;

        let cars = active.len() as i64;
        if cars == 0 {
            return Ok("🚗 No queue right now, come on through!".to_string());
        }
        Ok(format!(
            "🚗 Queue status: {} car{} ahead of you.\nEstimated wait: about {} minutes.",
            cars,
            if cars == 1 { "" } else { "s" },
            cars * QUEUE_MINUTES_PER_CAR
        ))
    }
}
