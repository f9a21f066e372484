//! Core data model: tenants, customers, sessions, catalog, bookings, orders,
//! FAQ rules, and the inbound/outbound message shapes.

mod booking;
mod business;
mod catalog;
mod customer;
mod faq;
mod message;
mod order;
mod session;

pub use booking::{Booking, BookingStatus};
pub use business::{Business, BusinessType, OperatingHours};
pub use catalog::{Product, Service};
pub use customer::Customer;
pub use faq::FaqRule;
pub use message::{Button, Direction, InboundMessage, MessageRecord, Reply};
pub use order::{DeliveryType, Order, OrderLine, OrderLineRequest};
pub use session::{ModuleKey, Session, SessionData};
