// src/notifier.rs

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{FlowError, Result};
use crate::session::HttpSession;

const TELEGRAM_API_BASE_URL: &str = "https://api.telegram.org";

/// Delivery channel for a finished report. Callers never retry on failure.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<()>;
}

/// Sends reports through the Telegram Bot API `sendMessage` method.
pub struct TelegramNotifier {
    session: Arc<HttpSession>,
    base_url: String,
    bot_token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

impl TelegramNotifier {
    pub fn new(session: Arc<HttpSession>, bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        TelegramNotifier {
            session,
            base_url: TELEGRAM_API_BASE_URL.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.base_url, self.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
        };

        // reqwest errors embed the URL, which carries the bot token.
        let response = self
            .session
            .post_json(&self.endpoint(), &body)
            .await
            .map_err(|e| FlowError::Notify(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(FlowError::Notify(format!("telegram returned {}: {}", status, detail)));
        }

        debug!(chat_id = %self.chat_id, chars = text.len(), "telegram message sent");
        Ok(())
    }
}

/// Writes reports to the log. Used when no delivery channel is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        info!("report:\n{}", text);
        Ok(())
    }
}
