//! # kasibot-core
//!
//! Core types and traits for the conversational-commerce dispatcher: business,
//! customer, session and catalog types, the business-module contract
//! ([`InteractiveFlow`] / [`DirectHandler`]), collaborator traits for the
//! external stores and the outbound sender, error taxonomy, and tracing
//! initialization. Transport-agnostic; used by every other crate.

pub mod collaborators;
pub mod error;
pub mod logger;
pub mod module;
pub mod types;

pub use collaborators::{
    BookingFilters, BookingStore, BusinessDirectory, Catalog, CustomerDirectory, FaqStore,
    MessageLog, MessageSender, OrderStore, ProductFilters, SlotRequest,
};
pub use error::{CoreError, DeliveryError, OrderError, ReserveError, Result, StoreError};
pub use logger::init_tracing;
pub use module::{DirectHandler, InteractiveFlow, Prompt};
pub use types::{
    Booking, BookingStatus, Business, BusinessType, Button, Customer, DeliveryType,
    Direction, FaqRule, InboundMessage, MessageRecord, ModuleKey, OperatingHours, Order,
    OrderLine, OrderLineRequest, Product, Reply, Service, Session, SessionData,
};
