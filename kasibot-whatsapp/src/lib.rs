//! # kasibot-whatsapp
//!
//! WhatsApp Cloud API transport: configuration, inbound webhook payload
//! extraction, and the outbound Graph API sender.

mod config;
mod sender;
mod webhook;

pub use config::WhatsappConfig;
pub use sender::WhatsappSender;
pub use webhook::{InboundEvent, WebhookEnvelope};
