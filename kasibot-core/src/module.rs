//! Business-module contract: the two capabilities a module can declare.
//!
//! [`InteractiveFlow`] is the multi-turn step machine; [`DirectHandler`] is
//! single-shot command handling that returns `None` to mean "not handled,
//! fall through". Modules declare capabilities statically and are dispatched
//! through [`ModuleKey`] / business type, never by structural probing.

use crate::error::Result;
use crate::types::{Business, Button, Customer, ModuleKey, Session};
use async_trait::async_trait;

/// A module's answer to a flow start or step: the message to send, optional
/// buttons, the step to move to, and whether the flow is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    pub buttons: Option<Vec<Button>>,
    pub next_step: Option<String>,
    pub done: bool,
}

impl Prompt {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            buttons: None,
            next_step: None,
            done: false,
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = Some(buttons);
        self
    }

    pub fn with_next_step(mut self, step: &str) -> Self {
        self.next_step = Some(step.to_string());
        self
    }

    /// Terminal prompt: the router clears the session and resends the menu.
    pub fn finished(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            buttons: None,
            next_step: None,
            done: true,
        }
    }
}

/// Multi-turn guided dialogue owned by one module.
///
/// `handle_step` must never error out for user-input problems; it answers
/// with a corrective prompt. An unrecognized step value resets the module's
/// own state to the initial step and re-prompts.
#[async_trait]
pub trait InteractiveFlow: Send + Sync {
    fn key(&self) -> ModuleKey;

    /// Opening prompt; its `next_step` becomes the session's first step.
    fn start(&self) -> Prompt;

    /// Advances the flow with the raw user input. The session's `data` may
    /// be mutated; `step` is applied by the router from the returned prompt.
    async fn handle_step(&self, input: &str, session: &mut Session) -> Result<Prompt>;
}

/// Direct (non-interactive) command handling for a business type.
#[async_trait]
pub trait DirectHandler: Send + Sync {
    /// Returns the answer text, or `None` when the message is not claimed
    /// and should fall through to the fallback matcher.
    async fn handle_message(
        &self,
        business: &Business,
        customer: &Customer,
        text: &str,
    ) -> Result<Option<String>>;
}
