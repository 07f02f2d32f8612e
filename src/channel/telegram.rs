//! Telegram Bot API client using raw reqwest (no framework).
//!
//! Conversation discovery scans `getUpdates` for distinct chats the bot has
//! seen; messages go out via `sendMessage`. Markdown is attempted first with
//! a plain-text retry, since Telegram rejects the whole message on a parse
//! error.

use async_trait::async_trait;
use color_eyre::eyre::Result;
use serde::Deserialize;

use super::{ChatChannel, Conversation};

/// Telegram Bot API client.
pub struct TelegramChannel {
    bot_token: String,
    client: reqwest::Client,
}

// --- Telegram API response types ---

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
    /// Group/channel title (absent for private chats).
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

impl TgChat {
    /// Best human-readable name for the chat: group title, then the user's
    /// full name, then their @username, then the raw ID.
    fn display_name(&self) -> String {
        if let Some(ref title) = self.title {
            return title.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => return format!("{first} {last}"),
            (Some(first), None) => return first.clone(),
            _ => {}
        }
        if let Some(ref username) = self.username {
            return format!("@{username}");
        }
        self.id.to_string()
    }
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("failed to build reqwest client");

        Self { bot_token, client }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{method}", self.bot_token)
    }

    /// Fetch recent updates (one shot, no long-poll timeout).
    async fn get_updates(&self) -> Result<Vec<TgUpdate>> {
        let resp = self
            .client
            .get(self.api_url("getUpdates"))
            .query(&[("limit", "100"), ("timeout", "0")])
            .send()
            .await?;

        let body: TgResponse<Vec<TgUpdate>> = resp.json().await?;
        if !body.ok {
            let desc = body.description.unwrap_or_default();
            color_eyre::eyre::bail!("Telegram API error: {desc}");
        }

        Ok(body.result.unwrap_or_default())
    }
}

#[async_trait]
impl ChatChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    /// The Bot API has no "list chats" call, so enumerate the distinct chats
    /// present in the recent update backlog. A recipient needs to have
    /// messaged the bot at least once to be discoverable — same constraint
    /// as any Telegram bot.
    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let updates = self.get_updates().await?;

        let mut conversations: Vec<Conversation> = Vec::new();
        for update in &updates {
            let chat = match update.message {
                Some(ref msg) => &msg.chat,
                None => continue,
            };
            if conversations.iter().any(|c| c.chat_id == chat.id) {
                continue;
            }
            conversations.push(Conversation {
                display_name: chat.display_name(),
                chat_id: chat.id,
            });
        }

        Ok(conversations)
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await?;

        let body: TgResponse<serde_json::Value> = resp.json().await?;
        if body.ok {
            return Ok(());
        }

        // Retry without Markdown if parse_mode fails.
        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&serde_json::json!({
                "chat_id": chat_id,
                "text": text,
            }))
            .send()
            .await?;

        let body: TgResponse<serde_json::Value> = resp.json().await?;
        if !body.ok {
            let desc = body.description.unwrap_or_default();
            color_eyre::eyre::bail!("sendMessage failed: {desc}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(json: &str) -> TgChat {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_display_name_prefers_title() {
        let c = chat(r#"{"id": 1, "title": "Build Alerts", "first_name": "Bob"}"#);
        assert_eq!(c.display_name(), "Build Alerts");
    }

    #[test]
    fn test_display_name_full_name() {
        let c = chat(r#"{"id": 2, "first_name": "Tiago", "last_name": "Nobrega"}"#);
        assert_eq!(c.display_name(), "Tiago Nobrega");
    }

    #[test]
    fn test_display_name_first_name_only() {
        let c = chat(r#"{"id": 3, "first_name": "Fabio"}"#);
        assert_eq!(c.display_name(), "Fabio");
    }

    #[test]
    fn test_display_name_username_fallback() {
        let c = chat(r#"{"id": 4, "username": "fabioz"}"#);
        assert_eq!(c.display_name(), "@fabioz");
    }

    #[test]
    fn test_display_name_id_fallback() {
        let c = chat(r#"{"id": -100500}"#);
        assert_eq!(c.display_name(), "-100500");
    }

    #[test]
    fn test_update_without_message_deserializes() {
        let update: TgUpdate = serde_json::from_str(r#"{"update_id": 7}"#).unwrap();
        assert!(update.message.is_none());
    }
}
