//! Conversation directory — links configured display names to chat IDs.
//!
//! Built once at startup from the `[recipients]` table and the channel's
//! conversation listing, read-only afterward. A build whose owning user has
//! no entry here is simply not relayed.

use std::collections::HashMap;

use crate::channel::Conversation;

/// Read-only map from CI user ID to the chat that receives that user's
/// build notifications.
#[derive(Debug, Clone, Default)]
pub struct ConversationDirectory {
    chats: HashMap<String, i64>,
}

impl ConversationDirectory {
    /// Match the channel's conversations against the display-name → CI-user
    /// table. Matches are linked and logged; everything else is listed for
    /// visibility so a missing mapping is easy to spot in the startup log.
    pub fn link(table: &HashMap<String, String>, conversations: &[Conversation]) -> Self {
        let mut chats = HashMap::new();
        for conv in conversations {
            match table.get(&conv.display_name) {
                Some(user_id) => {
                    eprintln!(
                        "[directory]   Linking: {user_id} -> {}({})",
                        conv.display_name, conv.chat_id
                    );
                    chats.insert(user_id.clone(), conv.chat_id);
                }
                None => {
                    eprintln!("[directory]   {} ({})", conv.display_name, conv.chat_id);
                }
            }
        }
        Self { chats }
    }

    /// Chat ID for a CI user, if one was linked.
    pub fn chat_for(&self, user_id: &str) -> Option<i64> {
        self.chats.get(user_id).copied()
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
