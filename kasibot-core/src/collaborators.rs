//! Collaborator traits: the narrow interfaces through which the core talks
//! to the external stores and the outbound sender. Every call is treated as
//! an atomic, single-operation request; the one multi-step guarantee the
//! core relies on is the booking store's atomic reserve.

use crate::error::{DeliveryError, OrderError, ReserveError, StoreError};
use crate::types::{
    Booking, BookingStatus, Business, Button, Customer, DeliveryType, FaqRule, MessageRecord,
    Order, OrderLineRequest, Product, Service,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

/// Resolves an inbound channel address to a business record.
#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    async fn find_by_channel_address(
        &self,
        address: &str,
    ) -> Result<Option<Business>, StoreError>;
}

#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Looks up the customer for (address, business), creating the record on
    /// first contact.
    async fn get_or_create(&self, address: &str, business_id: i64)
        -> Result<Customer, StoreError>;

    /// All known customers of a business (used by the broadcast operation).
    async fn list_customers(&self, business_id: i64) -> Result<Vec<Customer>, StoreError>;
}

/// Filters for product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Services ordered by price ascending.
    async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, StoreError>;

    async fn list_products(
        &self,
        business_id: i64,
        filters: &ProductFilters,
    ) -> Result<Vec<Product>, StoreError>;
}

/// A reservation request for one exact (business, date, time) slot.
#[derive(Debug, Clone)]
pub struct SlotRequest {
    pub business_id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Filters for booking queries.
#[derive(Debug, Clone, Default)]
pub struct BookingFilters {
    pub business_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Restrict to bookings that still hold their slot (pending/confirmed).
    pub active_only: bool,
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Check-and-reserve in one atomic operation: creates the booking, or
    /// returns [`ReserveError::SlotTaken`] when a non-cancelled booking
    /// already claims the slot. Two concurrent callers can never both
    /// succeed for the same (business, date, time).
    async fn reserve_slot(&self, request: &SlotRequest) -> Result<Booking, ReserveError>;

    async fn list_bookings(&self, filters: &BookingFilters) -> Result<Vec<Booking>, StoreError>;

    async fn update_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Creates an order with stock checked and decremented transactionally.
    async fn create_order(
        &self,
        business_id: i64,
        customer_id: i64,
        lines: &[OrderLineRequest],
        delivery: DeliveryType,
        address: Option<&str>,
    ) -> Result<Order, OrderError>;

    async fn list_orders(
        &self,
        business_id: i64,
        customer_id: i64,
    ) -> Result<Vec<Order>, StoreError>;
}

#[async_trait]
pub trait FaqStore: Send + Sync {
    /// Rules for the business in the given language or the generic ("en")
    /// language. Ordering policy lives in the fallback matcher.
    async fn list_rules(
        &self,
        business_id: i64,
        language: &str,
    ) -> Result<Vec<FaqRule>, StoreError>;
}

/// Persisted message log (inbound and outbound).
#[async_trait]
pub trait MessageLog: Send + Sync {
    async fn record(&self, record: &MessageRecord) -> Result<(), StoreError>;
}

/// Outbound message delivery. Implementations return delivery failures as
/// values, never panic for ordinary failures, and apply their own timeout;
/// no retry is performed anywhere in the core.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &str, text: &str) -> Result<(), DeliveryError>;

    /// Sends an interactive button message. Callers enforce the transport
    /// limits (at most 3 buttons, labels at most 20 chars) before handoff.
    async fn send_buttons(
        &self,
        to: &str,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), DeliveryError>;
}
