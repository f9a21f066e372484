//! # command-router
//!
//! Message classification and dispatch. Every inbound message goes through a
//! fixed precedence: global commands, the customer's active interactive flow,
//! the business type's direct handler, and finally the keyword fallback
//! matcher. Replies are computed under the per-customer session lock and
//! delivered after it is released.

mod fallback;
mod router;

pub use fallback::{detect_language, FallbackMatcher};
pub use router::{CommandRouter, RouterError, MAX_BUTTONS, MAX_BUTTON_LABEL};
