//! Inbound webhook payload types (WhatsApp Cloud API envelope) and the
//! extraction into normalized [`InboundMessage`]s. Status-only and malformed
//! payloads extract to nothing; the webhook still acknowledges them.

use kasibot_core::InboundMessage;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
pub struct Change {
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeValue {
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub display_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawMessage {
    pub from: Option<String>,
    pub text: Option<TextBody>,
    pub interactive: Option<Interactive>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Interactive {
    pub button_reply: Option<InteractiveReply>,
    pub list_reply: Option<InteractiveReply>,
}

#[derive(Debug, Deserialize)]
pub struct InteractiveReply {
    pub id: Option<String>,
}

/// One extracted inbound event: the business number it was addressed to and
/// the normalized message.
#[derive(Debug)]
pub struct InboundEvent {
    pub business_address: String,
    pub message: InboundMessage,
}

impl WebhookEnvelope {
    /// Every usable message in the envelope. A message without a sender is
    /// skipped; a change without metadata has no addressable business and is
    /// skipped too.
    pub fn extract(self) -> Vec<InboundEvent> {
        let mut events = Vec::new();
        for entry in self.entry {
            for change in entry.changes {
                let Some(value) = change.value else { continue };
                let Some(address) = value
                    .metadata
                    .and_then(|m| m.display_phone_number)
                else {
                    continue;
                };
                for raw in value.messages {
                    let Some(from) = raw.from else { continue };
                    let button_id = raw
                        .interactive
                        .and_then(|i| i.button_reply.or(i.list_reply))
                        .and_then(|r| r.id);
                    let text = raw.text.and_then(|t| t.body);
                    if text.is_none() && button_id.is_none() {
                        continue;
                    }
                    events.push(InboundEvent {
                        business_address: address.clone(),
                        message: InboundMessage {
                            from,
                            text,
                            button_id,
                        },
                    });
                }
            }
        }
        events
    }
}
