//! Barber module: interactive booking flow (date → time → style) plus direct
//! commands for services, hours, slot booking, and booking management.

use crate::parse::{extract_date, extract_time};
use crate::texts;
use async_trait::async_trait;
use booking_engine::{AvailabilityEngine, ReserveFailure};
use chrono::{Local, NaiveDate, NaiveTime};
use kasibot_core::{
    Booking, BookingFilters, BookingStatus, BookingStore, Business, Catalog, Customer,
    DirectHandler, InteractiveFlow, ModuleKey, Prompt, Result, Service, Session, SlotRequest,
};
use std::sync::Arc;
use tracing::warn;

pub const STEP_COLLECT_DATE: &str = "collect_date";
pub const STEP_COLLECT_TIME: &str = "collect_time";
pub const STEP_COLLECT_STYLE: &str = "collect_style";

pub struct BarberModule {
    catalog: Arc<dyn Catalog>,
    bookings: Arc<dyn BookingStore>,
    engine: AvailabilityEngine,
}

impl BarberModule {
    pub fn new(catalog: Arc<dyn Catalog>, bookings: Arc<dyn BookingStore>) -> Self {
        let engine = AvailabilityEngine::new(bookings.clone());
        Self {
            catalog,
            bookings,
            engine,
        }
    }
}

#[async_trait]
impl InteractiveFlow for BarberModule {
    fn key(&self) -> ModuleKey {
        ModuleKey::Barber
    }

    fn start(&self) -> Prompt {
        Prompt::text(
            "💈 Barber bookings: please share your preferred date (YYYY-MM-DD). Reply \"menu\" to exit.",
        )
        .with_next_step(STEP_COLLECT_DATE)
    }

    async fn handle_step(&self, input: &str, session: &mut Session) -> Result<Prompt> {
        match session.step.as_deref() {
            Some(STEP_COLLECT_DATE) => {
                session.data.insert("date", input);
                Ok(Prompt::text("Great! What time works best for that day? (e.g. 14:30)")
                    .with_next_step(STEP_COLLECT_TIME))
            }
            Some(STEP_COLLECT_TIME) => {
                session.data.insert("time", input);
                Ok(Prompt::text("Got it. Any style preference? (fade, beard trim, etc.)")
                    .with_next_step(STEP_COLLECT_STYLE))
            }
            Some(STEP_COLLECT_STYLE) => {
                session.data.insert("style", input);
                let date = session.data.get("date").unwrap_or("-");
                let time = session.data.get("time").unwrap_or("-");
                let style = session.data.get("style").unwrap_or("-");
                Ok(Prompt::finished(format!(
                    "✅ Booking request received!\n• Date: {date}\n• Time: {time}\n• Style: {style}\n\nOur team will confirm shortly."
                )))
            }
            other => {
                warn!(step = ?other, "unrecognized barber step, restarting flow");
                session.data.clear();
                Ok(Prompt::text("Let's start again. What date suits you for the barber booking?")
                    .with_next_step(STEP_COLLECT_DATE))
            }
        }
    }
}

#[async_trait]
impl DirectHandler for BarberModule {
    async fn handle_message(
        &self,
        business: &Business,
        customer: &Customer,
        text: &str,
    ) -> Result<Option<String>> {
        let lower = text.to_lowercase();
        let language = customer.effective_language(&business.language);

        if lower.contains("service") || lower.contains("price") || lower.contains("list") {
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

        if lower.contains("my booking") || lower.contains("my appointment") {
            return Ok(Some(self.view_bookings(business, customer).await?));
        }

        if lower.contains("cancel") || lower.contains("reschedule") {
            return Ok(Some(self.cancel_booking(business, customer, &lower).await?));
        }

        if lower.starts_with("book")
            || lower.contains("appointment")
            || lower.contains("schedule")
        {
            return Ok(Some(
                self.book_slot(business, customer, &lower, language).await?,
            ));
        }

        Ok(None)
    }
}

impl BarberModule {
    /// Parses service, date, and time from a "book ..." message and attempts
    /// an atomic reservation. Missing fields answer with a usage prompt; a
    /// conflict answers with the current free slots.
    async fn book_slot(
        &self,
        business: &Business,
        customer: &Customer,
        lower: &str,
        language: &str,
    ) -> Result<String> {
        let services = self.catalog.list_services(business.id).await?;
        let today = Local::now().date_naive();

        let service = services
            .iter()
            .find(|s| lower.contains(&s.name.to_lowercase()));
        let date = extract_date(lower, today);
        let time = extract_time(lower);

        let (Some(service), Some(date), Some(time)) = (service, date, time) else {
            return Ok(texts::booking_usage(language).to_string());
        };

        let request = SlotRequest {
            business_id: business.id,
            customer_id: customer.id,
            service_id: service.id,
            date,
            time,
        };
        match self.engine.reserve(business, request).await {
            Ok(_booking) => Ok(format!(
                "✅ Booking Created!\n\nService: {}\nDate: {}\nTime: {}\nPrice: R{:.2}\n\nWe'll send you a reminder before your appointment.",
                service.name,
                date,
                time.format("%H:%M"),
                service.price
            )),
            Err(ReserveFailure::Conflict { free }) => {
                Ok(format_conflict(date, time, &free))
            }
            Err(ReserveFailure::Closed) => Ok(format!(
                "We are closed on {date}. Reply \"hours\" to see our operating hours."
            )),
            Err(ReserveFailure::Store(e)) => Err(e.into()),
        }
    }

    async fn view_bookings(&self, business: &Business, customer: &Customer) -> Result<String> {
        let bookings = self
            .bookings
            .list_bookings(&BookingFilters {
                business_id: Some(business.id),
                customer_id: Some(customer.id),
                ..Default::default()
            })
            .await?;

        if bookings.is_empty() {
            return Ok(
                "You have no bookings. Reply \"book\" to make a new booking.".to_string(),
            );
        }

        let services = self.catalog.list_services(business.id).await?;
        let mut out = "📅 Your Bookings:\n\n".to_string();
        for booking in bookings.iter().take(10) {
            out.push_str(&format!(
                "#{} - {}\nDate: {} {}\nStatus: {}\n\n",
                booking.id,
                service_name(&services, booking),
                booking.date,
                booking.time.format("%H:%M"),
                booking.status.as_str()
            ));
        }
        Ok(out)
    }

    async fn cancel_booking(
        &self,
        business: &Business,
        customer: &Customer,
        lower: &str,
    ) -> Result<String> {
        let active = self
            .bookings
            .list_bookings(&BookingFilters {
                business_id: Some(business.id),
                customer_id: Some(customer.id),
                active_only: true,
                ..Default::default()
            })
            .await?;

        if active.is_empty() {
            return Ok("You have no active bookings to cancel.".to_string());
        }

        if let Some(id) = extract_booking_id(lower) {
            if active.iter().any(|b| b.id == id) {
                self.bookings
                    .update_status(id, BookingStatus::Cancelled)
                    .await?;
                return Ok("✅ Your booking has been cancelled.".to_string());
            }
        }

        let mut out = "Your active bookings:\n\n".to_string();
        for booking in &active {
            out.push_str(&format!(
                "#{} - {} {}\n\n",
                booking.id,
                booking.date,
                booking.time.format("%H:%M")
            ));
        }
        out.push_str("Reply \"cancel #[booking number]\" to cancel a specific booking.");
        Ok(out)
    }
}

fn service_name<'a>(services: &'a [Service], booking: &Booking) -> &'a str {
    services
        .iter()
        .find(|s| s.id == booking.service_id)
        .map(|s| s.name.as_str())
        .unwrap_or("Service")
}

fn extract_booking_id(lower: &str) -> Option<i64> {
    lower
        .split_whitespace()
        .filter_map(|t| t.trim_start_matches('#').parse::<i64>().ok())
        .next()
}

/// Conflict answer shared by booking-capable modules: the requested time plus
/// up to ten free alternatives.
pub(crate) fn format_conflict(date: NaiveDate, time: NaiveTime, free: &[NaiveTime]) -> String {
    let alternatives: Vec<String> = free
        .iter()
        .take(10)
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    if alternatives.is_empty() {
        format!(
            "Time slot {} is not available, and {date} is fully booked. Please try another date.",
            time.format("%H:%M")
        )
    } else {
        format!(
            "Time slot {} is not available.\n\nAvailable times for {date}:\n{}",
            time.format("%H:%M"),
            alternatives.join(", ")
        )
    }
}
