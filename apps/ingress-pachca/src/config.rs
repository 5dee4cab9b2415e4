use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use webhook::WebhookConfig;

const DEFAULT_BIND: &str = "0.0.0.0:8090";

#[derive(Debug, Clone)]
pub struct IngressConfig {
    pub bind: SocketAddr,
    /// When set, every delivery must carry a valid `Pachca-Signature`.
    pub secret: Option<String>,
    pub webhook: WebhookConfig,
}

impl IngressConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), WebhookConfig::from_env())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        webhook: WebhookConfig,
    ) -> Result<Self> {
        let raw_bind = lookup("BIND").unwrap_or_else(|| DEFAULT_BIND.into());
        let bind = raw_bind
            .parse()
            .with_context(|| format!("invalid BIND address {raw_bind:?}"))?;
        let secret = lookup("PACHCA_WEBHOOK_SECRET").filter(|s| !s.trim().is_empty());

        Ok(Self {
            bind,
            secret,
            webhook,
        })
    }
}
