//! Server config: bind address, database, logging, session TTL. Loaded from
//! env.

use anyhow::Result;
use session_store::DEFAULT_TTL_SECS;
use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// BIND_ADDR
    pub bind_addr: String,
    /// DATABASE_URL
    pub database_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// SESSION_TTL_SECS
    pub session_ttl_secs: i64,
}

impl ServerConfig {
    /// Load from environment variables.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "./kasibot.db".to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/kasibot.log".to_string());
        let session_ttl_secs = env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);

        let config = Self {
            bind_addr,
            database_url,
            log_file,
            session_ttl_secs,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("BIND_ADDR is not a valid socket address: {}", self.bind_addr);
        }
        if self.session_ttl_secs <= 0 {
            anyhow::bail!("SESSION_TTL_SECS must be positive");
        }
        Ok(())
    }
}
