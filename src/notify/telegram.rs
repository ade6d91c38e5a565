use anyhow::{Context, Result};
use reqwest::Client;

use super::Notifier;

const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

pub struct TelegramNotifier {
    token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    /// Both credentials must be present, otherwise the run degrades to a dry
    /// run and the caller gets `None`.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var(ENV_BOT_TOKEN).ok().filter(|v| !v.is_empty())?;
        let chat_id = std::env::var(ENV_CHAT_ID).ok().filter(|v| !v.is_empty())?;
        Some(Self::new(token, chat_id))
    }

    pub fn new(token: String, chat_id: String) -> Self {
        Self {
            token,
            chat_id,
            client: Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.token)
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": true,
        });

        self.client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .context("telegram post")?
            .error_for_status()
            .context("telegram non-2xx")?;
        Ok(())
    }
}
