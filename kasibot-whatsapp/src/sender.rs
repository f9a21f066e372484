//! Outbound Graph API client. Text and interactive-button payloads, with a
//! per-request timeout; a timeout is a delivery failure like any other.

use crate::config::WhatsappConfig;
use async_trait::async_trait;
use kasibot_core::{Button, DeliveryError, MessageSender};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct WhatsappSender {
    config: WhatsappConfig,
    client: reqwest::Client,
}

impl WhatsappSender {
    pub fn new(config: WhatsappConfig) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.send_timeout_secs))
            .build()
            .map_err(|e| DeliveryError::Failed(e.to_string()))?;
        Ok(Self { config, client })
    }

    async fn post(&self, payload: Value) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Failed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "Graph API rejected outbound message");
            return Err(DeliveryError::Failed(format!("HTTP {status}")));
        }
        debug!("outbound message accepted");
        Ok(())
    }

    fn button_payload(to: &str, text: &str, buttons: &[Button]) -> Value {
        let rows: Vec<Value> = buttons
            .iter()
            .map(|b| {
                json!({
                    "type": "reply",
                    "reply": { "id": b.id, "title": b.title }
                })
            })
            .collect();
        json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "interactive",
            "interactive": {
                "type": "button",
                "body": { "text": text },
                "action": { "buttons": rows }
            }
        })
    }
}

#[async_trait]
impl MessageSender for WhatsappSender {
    async fn send_text(&self, to: &str, text: &str) -> Result<(), DeliveryError> {
        self.post(json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "body": text }
        }))
        .await
    }

    async fn send_buttons(
        &self,
        to: &str,
        text: &str,
        buttons: &[Button],
    ) -> Result<(), DeliveryError> {
        self.post(Self::button_payload(to, text, buttons)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_payload_shape() {
        let payload = WhatsappSender::button_payload(
            "27829990001",
            "Pick one:",
            &[Button::new("cmd_barber", "Barber")],
        );
        assert_eq!(payload["type"], "interactive");
        assert_eq!(payload["interactive"]["type"], "button");
        assert_eq!(
            payload["interactive"]["action"]["buttons"][0]["reply"]["id"],
            "cmd_barber"
        );
    }
}
