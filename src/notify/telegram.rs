// src/notify/telegram.rs
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{MessageFormat, NotificationMessage, Notifier};
use crate::config::TelegramConfig;
use crate::error::DeliveryError;

/// Telegram Bot API `sendMessage`. Single attempt per message.
#[derive(Clone)]
pub struct TelegramNotifier {
    api_base: String,
    token: Option<String>,
    chat_id: Option<String>,
    client: Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    disable_web_page_preview: bool,
}

impl TelegramNotifier {
    pub fn new(cfg: &TelegramConfig, client: Client) -> Self {
        Self {
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
            chat_id: cfg.chat_id.clone(),
            client,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Both token and chat id are required; otherwise sends are skipped.
    pub fn is_enabled(&self) -> bool {
        self.token.is_some() && self.chat_id.is_some()
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, msg: &NotificationMessage) -> Result<(), DeliveryError> {
        let (Some(token), Some(chat_id)) = (&self.token, &self.chat_id) else {
            tracing::debug!("Telegram disabled (no TELEGRAM_TOKEN/TELEGRAM_CHAT_ID)");
            return Ok(());
        };

        let payload = SendMessage {
            chat_id: chat_id.as_str(),
            text: &msg.text,
            parse_mode: match msg.format {
                MessageFormat::Markdown => Some("Markdown"),
                MessageFormat::Plain => None,
            },
            disable_web_page_preview: true,
        };

        // the URL carries the bot token, keep it out of error text
        let rsp = self
            .client
            .post(format!("{}/bot{}/sendMessage", self.api_base, token))
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Http(e.without_url()))?;

        let status = rsp.status();
        if !status.is_success() {
            let body = rsp.text().await.unwrap_or_default();
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}
