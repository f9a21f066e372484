//! The dispatch core. Classification precedence, in order: global commands,
//! the customer's active flow, the business type's direct handler, the
//! fallback matcher, and the default menu answer.

use crate::fallback::FallbackMatcher;
use business_modules::{texts, ModuleRegistry};
use chrono::Utc;
use kasibot_core::{
    Business, BusinessDirectory, Button, Customer, CustomerDirectory, DeliveryError, CoreError,
    Direction, InboundMessage, MessageLog, MessageRecord, MessageSender, ModuleKey, Prompt, Reply,
    Session, StoreError,
};
use session_store::SessionStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// WhatsApp interactive-message transport limit.
pub const MAX_BUTTONS: usize = 3;
/// WhatsApp button label transport limit.
pub const MAX_BUTTON_LABEL: usize = 20;

const DEFAULT_ANSWER: &str = "Sorry, I didn't catch that. Please pick an option below:";
const MENU_TEXT: &str = "👋 What would you like to do?";
const UNKNOWN_ADDRESS_ANSWER: &str =
    "This number is not set up for automated replies yet. Please contact the business directly.";

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// The reply could not be delivered. Session state has already been
    /// applied and is not rolled back.
    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Commands recognized everywhere, regardless of session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlobalCommand {
    Menu,
    Help,
    Barber,
    Carwash,
}

impl GlobalCommand {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "menu" | "start" => Some(GlobalCommand::Menu),
            "help" => Some(GlobalCommand::Help),
            "barber" => Some(GlobalCommand::Barber),
            "carwash" => Some(GlobalCommand::Carwash),
            _ => None,
        }
    }
}

/// Strips button-identifier prefixes so a tapped `cmd_menu_barber` and a
/// typed `barber` classify identically.
fn sanitize_command(input: &str) -> String {
    let lower = input.trim().to_lowercase();
    // menu_ is only a button-id infix inside cmd_menu_*; bare "menu_barber"
    // typed by a customer is not a command.
    match lower.strip_prefix("cmd_") {
        Some(rest) => rest.strip_prefix("menu_").unwrap_or(rest).to_string(),
        None => lower,
    }
}

fn menu_buttons() -> Vec<Button> {
    vec![
        Button::new("cmd_barber", "Barber"),
        Button::new("cmd_carwash", "Car Wash"),
        Button::new("cmd_help", "Help"),
    ]
}

/// Enforces the transport limits before handoff to the sender.
fn clamp_buttons(buttons: Vec<Button>) -> Vec<Button> {
    buttons
        .into_iter()
        .take(MAX_BUTTONS)
        .map(|mut b| {
            if b.title.chars().count() > MAX_BUTTON_LABEL {
                b.title = b.title.chars().take(MAX_BUTTON_LABEL).collect();
            }
            b
        })
        .collect()
}

pub struct CommandRouter {
    businesses: Arc<dyn BusinessDirectory>,
    customers: Arc<dyn CustomerDirectory>,
    sessions: Arc<SessionStore>,
    registry: Arc<ModuleRegistry>,
    fallback: FallbackMatcher,
    log: Arc<dyn MessageLog>,
    sender: Arc<dyn MessageSender>,
}

impl CommandRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        businesses: Arc<dyn BusinessDirectory>,
        customers: Arc<dyn CustomerDirectory>,
        sessions: Arc<SessionStore>,
        registry: Arc<ModuleRegistry>,
        fallback: FallbackMatcher,
        log: Arc<dyn MessageLog>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            businesses,
            customers,
            sessions,
            registry,
            fallback,
            log,
            sender,
        }
    }

    /// Routes one inbound message addressed to `business_address` and sends
    /// every resulting reply.
    ///
    /// The per-customer session guard is held across classification and the
    /// module step, and released before any outbound send. A delivery failure
    /// after the session transition is surfaced as
    /// [`RouterError::Delivery`] without rolling that transition back.
    pub async fn handle_inbound(
        &self,
        business_address: &str,
        msg: &InboundMessage,
    ) -> Result<(), RouterError> {
        let Some(business) = self
            .businesses
            .find_by_channel_address(business_address)
            .await?
        else {
            warn!(address = business_address, "inbound for unknown business address");
            self.sender
                .send_text(&msg.from, UNKNOWN_ADDRESS_ANSWER)
                .await?;
            return Ok(());
        };

        let customer = self.customers.get_or_create(&msg.from, business.id).await?;
        let input = msg.input();
        self.record(&business, &customer, Direction::Incoming, input)
            .await;

        let replies = if input.is_empty() {
            vec![self.menu_reply(&msg.from, DEFAULT_ANSWER)]
        } else {
            let mut session = self.sessions.lock(&msg.from, business.id).await;
            let replies = self
                .classify(&business, &customer, &msg.from, input, &mut session)
                .await?;
            drop(session);
            replies
        };

        for reply in replies {
            self.deliver(&business, &customer, &reply).await?;
        }
        Ok(())
    }

    /// Runs the precedence chain under the session guard and returns the
    /// replies to send once the guard is released.
    async fn classify(
        &self,
        business: &Business,
        customer: &Customer,
        to: &str,
        input: &str,
        session: &mut Session,
    ) -> Result<Vec<Reply>, RouterError> {
        let token = sanitize_command(input);

        if let Some(command) = GlobalCommand::parse(&token) {
            info!(user = %customer.channel_address, command = ?command, "step: global command");
            session.clear();
            return Ok(self.run_global(command, business, customer, to, session));
        }

        if let Some(key) = session.module {
            let Some(flow) = self.registry.interactive(key) else {
                warn!(module = key.as_str(), "active session for unregistered module");
                session.clear();
                return Ok(vec![self.menu_reply(to, DEFAULT_ANSWER)]);
            };
            info!(
                user = %customer.channel_address,
                module = key.as_str(),
                step = session.step.as_deref().unwrap_or("-"),
                "step: interactive flow"
            );
            let prompt = flow.handle_step(input, session).await?;
            return Ok(self.apply_prompt(prompt, to, session));
        }

        if let Some(handler) = self.registry.direct(business.business_type) {
            if let Some(answer) = handler.handle_message(business, customer, input).await? {
                info!(
                    user = %customer.channel_address,
                    business_type = business.business_type.as_str(),
                    "step: direct handler answered"
                );
                return Ok(vec![Reply::text(to, answer)]);
            }
        }

        if let Some(answer) = self.fallback.answer(business, customer, input).await? {
            info!(user = %customer.channel_address, "step: fallback answered");
            return Ok(vec![Reply::text(to, answer)]);
        }

        Ok(vec![self.menu_reply(to, DEFAULT_ANSWER)])
    }

    fn run_global(
        &self,
        command: GlobalCommand,
        business: &Business,
        customer: &Customer,
        to: &str,
        session: &mut Session,
    ) -> Vec<Reply> {
        let language = customer.effective_language(&business.language);
        match command {
            GlobalCommand::Menu => vec![self.menu_reply(to, MENU_TEXT)],
            GlobalCommand::Help => vec![Reply::text(
                to,
                texts::help_text(language, business.business_type),
            )],
            GlobalCommand::Barber => self.start_flow(ModuleKey::Barber, business, to, session),
            GlobalCommand::Carwash => self.start_flow(ModuleKey::Carwash, business, to, session),
        }
    }

    fn start_flow(
        &self,
        key: ModuleKey,
        business: &Business,
        to: &str,
        session: &mut Session,
    ) -> Vec<Reply> {
        let Some(flow) = self.registry.interactive(key) else {
            warn!(module = key.as_str(), "no flow registered for global command");
            return vec![self.menu_reply(to, DEFAULT_ANSWER)];
        };
        session.start_flow(key, business.id);
        self.apply_prompt(flow.start(), to, session)
    }

    /// Applies a module prompt to the session and converts it into replies.
    /// A finished flow clears the session and resends the menu.
    fn apply_prompt(&self, prompt: Prompt, to: &str, session: &mut Session) -> Vec<Reply> {
        if let Some(step) = &prompt.next_step {
            session.step = Some(step.clone());
        }
        let reply = match prompt.buttons {
            Some(buttons) => Reply::buttons(to, prompt.message, clamp_buttons(buttons)),
            None => Reply::text(to, prompt.message),
        };
        if prompt.done {
            session.clear();
            vec![reply, self.menu_reply(to, MENU_TEXT)]
        } else {
            vec![reply]
        }
    }

    fn menu_reply(&self, to: &str, text: &str) -> Reply {
        Reply::buttons(to, text, clamp_buttons(menu_buttons()))
    }

    async fn deliver(
        &self,
        business: &Business,
        customer: &Customer,
        reply: &Reply,
    ) -> Result<(), RouterError> {
        let sent = if reply.is_interactive() {
            self.sender
                .send_buttons(&reply.to, &reply.text, &reply.buttons)
                .await
        } else {
            self.sender.send_text(&reply.to, &reply.text).await
        };
        if let Err(e) = sent {
            warn!(user = %reply.to, error = %e, "reply delivery failed");
            return Err(e.into());
        }
        self.record(business, customer, Direction::Outgoing, &reply.text)
            .await;
        Ok(())
    }

    /// Message logging is ancillary: a log-write failure is reported but
    /// never blocks the reply path.
    async fn record(
        &self,
        business: &Business,
        customer: &Customer,
        direction: Direction,
        body: &str,
    ) {
        let record = MessageRecord {
            id: Uuid::new_v4().to_string(),
            business_id: business.id,
            customer_id: customer.id,
            direction,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        if let Err(e) = self.log.record(&record).await {
            warn!(direction = direction.as_str(), error = %e, "message log write failed");
        }
    }
}
