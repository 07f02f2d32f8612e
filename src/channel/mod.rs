//! Channel abstraction for messaging integrations (Telegram today,
//! future Discord/Slack).

pub mod telegram;

use async_trait::async_trait;
use color_eyre::Result;

/// A conversation the bot can deliver notifications to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Human-readable name — chat title for groups, user name for DMs.
    pub display_name: String,
    pub chat_id: i64,
}

/// Trait for messaging channel integrations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Enumerate the conversations the bot can currently see.
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Send a plain text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}
