//! Discord webhook delivery
//!
//! Messages go out one at a time: a send holds the gate for the request and
//! a fixed pacing delay afterwards, keeping us under the webhook rate limit.

use std::time::Duration;

use dropwatch_core::{LogNotifier, Notifier, NotifyError};
use dropwatch_types::DiscordConfig;
use serde::Serialize;
use tokio::sync::Mutex;

const EMBED_COLOR: u32 = 3_447_003;
const PACING_DELAY: Duration = Duration::from_millis(500);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("dropwatch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar_url: Option<&'a str>,
    embeds: [Embed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    author: EmbedAuthor<'a>,
    description: &'a str,
    color: u32,
}

#[derive(Debug, Serialize)]
struct EmbedAuthor<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a str>,
}

pub struct DiscordWebhook {
    client: reqwest::Client,
    url: String,
    author_name: String,
    author_icon: Option<String>,
    gate: Mutex<()>,
    pacing: Duration,
}

impl DiscordWebhook {
    pub fn new(
        url: impl Into<String>,
        author_name: impl Into<String>,
        author_icon: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            author_name: author_name.into(),
            author_icon,
            gate: Mutex::new(()),
            pacing: PACING_DELAY,
        })
    }

    fn payload<'a>(&'a self, message: &'a str) -> WebhookPayload<'a> {
        let icon = self.author_icon.as_deref();
        WebhookPayload {
            username: &self.author_name,
            avatar_url: icon,
            embeds: [Embed {
                author: EmbedAuthor {
                    name: &self.author_name,
                    icon_url: icon,
                },
                description: message,
                color: EMBED_COLOR,
            }],
        }
    }

    async fn post(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&self.payload(message))
            .send()
            .await
            .map_err(|e| NotifyError::Transport(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(status = status.as_u16(), "Webhook message delivered");
        Ok(())
    }
}

impl Notifier for DiscordWebhook {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let _gate = self.gate.lock().await;
        let result = self.post(message).await;
        tokio::time::sleep(self.pacing).await;
        result
    }
}

/// Notification channel chosen at startup
pub enum Outbound {
    Discord(DiscordWebhook),
    /// No webhook configured: messages are only logged
    Log(LogNotifier),
}

impl Outbound {
    pub fn from_config(config: &DiscordConfig) -> Result<Self, reqwest::Error> {
        match &config.webhook_url {
            Some(url) => Ok(Self::Discord(DiscordWebhook::new(
                url.clone(),
                config.author_name.clone(),
                config.author_icon.clone(),
            )?)),
            None => Ok(Self::Log(LogNotifier)),
        }
    }
}

impl Notifier for Outbound {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        match self {
            Self::Discord(webhook) => webhook.send(message).await,
            Self::Log(log) => log.send(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_shape() {
        let webhook = DiscordWebhook::new(
            "https://discord.example/api/webhooks/1/abc",
            "SCUM Server",
            Some("https://cdn.example/icon.png".to_string()),
        )
        .unwrap();

        let value = serde_json::to_value(webhook.payload("🗺️ Drop **B2**")).unwrap();
        assert_eq!(
            value,
            json!({
                "username": "SCUM Server",
                "avatar_url": "https://cdn.example/icon.png",
                "embeds": [{
                    "author": {
                        "name": "SCUM Server",
                        "icon_url": "https://cdn.example/icon.png",
                    },
                    "description": "🗺️ Drop **B2**",
                    "color": 3447003,
                }],
            })
        );
    }

    #[test]
    fn test_payload_without_icon() {
        let webhook =
            DiscordWebhook::new("https://discord.example/api/webhooks/1/abc", "Bot", None).unwrap();

        let value = serde_json::to_value(webhook.payload("hello")).unwrap();
        assert!(value.get("avatar_url").is_none());
        assert!(value["embeds"][0]["author"].get("icon_url").is_none());
    }

    #[test]
    fn test_outbound_selection() {
        let config = DiscordConfig::default();
        assert!(matches!(Outbound::from_config(&config), Ok(Outbound::Log(_))));

        let config = DiscordConfig {
            webhook_url: Some("https://discord.example/api/webhooks/1/abc".to_string()),
            ..DiscordConfig::default()
        };
        assert!(matches!(Outbound::from_config(&config), Ok(Outbound::Discord(_))));
    }

    #[tokio::test]
    async fn test_unreachable_webhook_is_reported() {
        let mut webhook = DiscordWebhook::new("http://127.0.0.1:9/webhook", "Bot", None).unwrap();
        webhook.pacing = Duration::from_millis(1);

        let result = webhook.send("hello").await;
        assert!(matches!(result, Err(NotifyError::Transport(_))));
    }
}
