//! WhatsApp Cloud API config. Loaded from env; missing credentials are a
//! fatal startup error.

use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct WhatsappConfig {
    /// WHATSAPP_ACCESS_TOKEN
    pub access_token: String,
    /// WHATSAPP_PHONE_NUMBER_ID
    pub phone_number_id: String,
    /// WHATSAPP_VERIFY_TOKEN (webhook handshake)
    pub verify_token: String,
    /// WHATSAPP_API_VERSION
    pub api_version: String,
    /// GRAPH_API_BASE_URL
    pub base_url: String,
    /// Outbound request timeout (secs)
    pub send_timeout_secs: u64,
}

impl WhatsappConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let access_token = env::var("WHATSAPP_ACCESS_TOKEN")
            .map_err(|_| anyhow::anyhow!("WHATSAPP_ACCESS_TOKEN not set"))?;
        let phone_number_id = env::var("WHATSAPP_PHONE_NUMBER_ID")
            .map_err(|_| anyhow::anyhow!("WHATSAPP_PHONE_NUMBER_ID not set"))?;
        let verify_token = env::var("WHATSAPP_VERIFY_TOKEN")
            .map_err(|_| anyhow::anyhow!("WHATSAPP_VERIFY_TOKEN not set"))?;
        let api_version =
            env::var("WHATSAPP_API_VERSION").unwrap_or_else(|_| "v19.0".to_string());
        let base_url = env::var("GRAPH_API_BASE_URL")
            .unwrap_or_else(|_| "https://graph.facebook.com".to_string());
        let send_timeout_secs = env::var("SEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let config = Self {
            access_token,
            phone_number_id,
            verify_token,
            api_version,
            base_url,
            send_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.base_url).is_err() {
            anyhow::bail!("GRAPH_API_BASE_URL is not a valid URL: {}", self.base_url);
        }
        if self.access_token.trim().is_empty() {
            anyhow::bail!("WHATSAPP_ACCESS_TOKEN is empty");
        }
        Ok(())
    }

    /// `{base}/{version}/{phone_number_id}/messages`
    pub fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            self.phone_number_id
        )
    }
}
