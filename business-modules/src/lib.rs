//! # business-modules
//!
//! The built-in business-type handlers behind the module contract: Barber and
//! CarWash (interactive flows plus direct commands), Spaza (direct commands
//! only), the registry that dispatches them by variant tag, localized canned
//! texts, and the token-based input parsing they share.

mod barber;
mod carwash;
mod parse;
mod registry;
mod spaza;
pub mod texts;

pub use barber::BarberModule;
pub use carwash::{package_buttons, CarwashModule};
pub use parse::{extract_date, extract_order_lines, extract_time};
pub use registry::{standard_registry, ModuleRegistry};
pub use spaza::SpazaModule;
