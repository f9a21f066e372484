//! Error taxonomy for the dispatch core.
//!
//! Configuration problems are fatal at startup; everything that can happen
//! per-message is either recovered locally (corrective prompts, slot
//! alternatives) or surfaced as a distinct variant the caller can match on.

use thiserror::Error;

/// Top-level error for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No business is registered for channel address {0}")]
    UnknownAddress(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external collaborator stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Outcome of the atomic check-and-reserve operation on the booking store.
///
/// `SlotTaken` is the uniqueness-constraint violation on
/// (business, date, time) among non-cancelled bookings; it must never be
/// collapsed into a generic database error.
#[derive(Error, Debug)]
pub enum ReserveError {
    #[error("Slot is already taken")]
    SlotTaken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from order creation on the order store.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("{product} is out of stock (only {available} available)")]
    OutOfStock { product: String, available: i64 },

    #[error("Unknown product id {0}")]
    UnknownProduct(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outbound delivery failures. Never rolls back session state; the router
/// logs and surfaces these as a partial failure, with no retry.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Send failed: {0}")]
    Failed(String),

    #[error("Send timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, CoreError>;
