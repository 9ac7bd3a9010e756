// src/notify/slack.rs
//! Slack incoming-webhook sink. Serializes the rendered block sequence into
//! Block Kit JSON with the configured bot identity.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::error;

use super::{Block, Notifier, Rendered};
use crate::config::SlackConfig;

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

pub struct SlackNotifier {
    webhook_url: Option<String>,
    identity: SlackConfig,
    client: Client,
}

impl SlackNotifier {
    pub fn from_env(identity: SlackConfig) -> Self {
        Self {
            webhook_url: std::env::var(ENV_WEBHOOK_URL).ok(),
            identity,
            client: Client::new(),
        }
    }

    /// Explicit builder for tests/tools.
    pub fn new(url: String, identity: SlackConfig) -> Self {
        Self {
            webhook_url: Some(url),
            identity,
            client: Client::new(),
        }
    }

    fn block_to_json(block: &Block) -> Value {
        match block {
            Block::Header(t) => json!({
                "type": "header",
                "text": { "type": "plain_text", "text": t, "emoji": true }
            }),
            Block::Section(t) => json!({
                "type": "section",
                "text": { "type": "mrkdwn", "text": t }
            }),
            Block::Context(t) => json!({
                "type": "context",
                "elements": [ { "type": "mrkdwn", "text": t } ]
            }),
            Block::Divider => json!({ "type": "divider" }),
        }
    }

    pub fn payload(&self, rendered: &Rendered) -> Value {
        let blocks: Vec<Value> = rendered.blocks.iter().map(Self::block_to_json).collect();
        let mut payload = json!({
            "username": self.identity.username,
            "blocks": blocks,
        });
        // icon_url wins over icon_emoji when both are configured.
        match &self.identity.icon_url {
            Some(url) => payload["icon_url"] = json!(url),
            None => payload["icon_emoji"] = json!(self.identity.icon_emoji),
        }
        payload
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, rendered: &Rendered) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            bail!("{ENV_WEBHOOK_URL} is not set");
        };

        let payload = self.payload(rendered);
        let resp = self
            .client
            .post(url)
            .json(&payload)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .context("slack post")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            // Per-block detail so a structural rejection (invalid_blocks)
            // can be traced to the offending block.
            for (i, b) in rendered.blocks.iter().enumerate() {
                error!(index = i, kind = b.kind(), chars = b.text_chars(), "block in rejected payload");
            }
            bail!("slack webhook rejected payload: {status}: {body}");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Slack"
    }
}
