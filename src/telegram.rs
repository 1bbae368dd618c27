//! Telegram delivery of status notifications.
//!
//! Sending is best-effort: a failed send is reported to the caller, which
//! logs it and keeps polling.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::WatchConfig;
use crate::errors::DeliveryError;

/// Outbound message channel.
pub trait Notifier {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError>;
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        (**self).send(chat_id, text)
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Blocking Telegram Bot API client.
pub struct TelegramBot {
    client: Client,
    send_url: String,
}

impl TelegramBot {
    pub fn new(config: &WatchConfig, token: &str) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            send_url: format!(
                "{}/bot{}/sendMessage",
                config.telegram_api.trim_end_matches('/'),
                token
            ),
        })
    }
}

impl Notifier for TelegramBot {
    fn send(&self, chat_id: &str, text: &str) -> Result<(), DeliveryError> {
        // reqwest errors carry the URL, which embeds the bot token.
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendMessage { chat_id, text })
            .send()
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<BotApiReply>()
                .ok()
                .and_then(|reply| reply.description);
            return Err(match description {
                Some(description) => DeliveryError::Rejected(description),
                None => DeliveryError::HttpStatus {
                    code: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("Unknown error").to_string(),
                },
            });
        }

        let reply: BotApiReply = response
            .json()
            .map_err(|e| DeliveryError::Transport(e.without_url().to_string()))?;
        if !reply.ok {
            return Err(DeliveryError::Rejected(
                reply.description.unwrap_or_else(|| "no description".to_string()),
            ));
        }

        tracing::info!(chat_id, "Message \"{text}\" sent successfully");
        Ok(())
    }
}
