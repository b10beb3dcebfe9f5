//! In-memory conversation store

use std::collections::BTreeMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::{
    error::{GentleError, Result},
    messages::{title_from_message, Chat, NewTurn, Role, Turn, DEFAULT_CHAT_TITLE},
};

#[derive(Debug, Default)]
struct Inner {
    chats: BTreeMap<u64, Chat>,
    turns: BTreeMap<u64, Vec<Turn>>,
    next_chat_id: u64,
    next_turn_id: u64,
}

/// Chats and their turns, shared across request handlers
///
/// Locks are held only for the duration of each call.
#[derive(Debug, Default)]
pub struct ConversationStore {
    inner: RwLock<Inner>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All chats, most recently updated first
    #[must_use]
    pub fn list_chats(&self) -> Vec<Chat> {
        let inner = self.inner.read();
        let mut chats: Vec<Chat> = inner.chats.values().cloned().collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        chats
    }

    /// Create a chat; blank titles get the default
    pub fn create_chat(&self, title: Option<String>) -> Chat {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_CHAT_TITLE.to_string());

        let mut inner = self.inner.write();
        inner.next_chat_id += 1;
        let now = Utc::now();
        let chat = Chat {
            id: inner.next_chat_id,
            title,
            created_at: now,
            updated_at: now,
            message_count: 0,
        };
        inner.chats.insert(chat.id, chat.clone());
        inner.turns.insert(chat.id, Vec::new());
        chat
    }

    /// A chat with its turns in creation order
    ///
    /// # Errors
    ///
    /// Returns [`GentleError::ChatNotFound`] if no chat has this id
    pub fn get_chat(&self, id: u64) -> Result<(Chat, Vec<Turn>)> {
        let inner = self.inner.read();
        let chat = inner.chats.get(&id).ok_or(GentleError::ChatNotFound(id))?;
        let turns = inner.turns.get(&id).cloned().unwrap_or_default();
        Ok((chat.clone(), turns))
    }

    /// Remove a chat and all of its turns
    ///
    /// # Errors
    ///
    /// Returns [`GentleError::ChatNotFound`] if no chat has this id
    pub fn delete_chat(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write();
        inner.chats.remove(&id).ok_or(GentleError::ChatNotFound(id))?;
        inner.turns.remove(&id);
        Ok(())
    }

    /// Store a turn at the end of a chat
    ///
    /// # Errors
    ///
    /// Returns [`GentleError::ChatNotFound`] if no chat has this id
    pub fn append_turn(&self, chat_id: u64, turn: NewTurn) -> Result<Turn> {
        let mut inner = self.inner.write();
        if !inner.chats.contains_key(&chat_id) {
            return Err(GentleError::ChatNotFound(chat_id));
        }

        inner.next_turn_id += 1;
        let now = Utc::now();
        let stored = Turn {
            id: inner.next_turn_id,
            chat_id,
            role: turn.role,
            content: turn.content,
            model_used: turn.model_used,
            metadata: turn.metadata,
            created_at: now,
        };

        let turns = inner.turns.entry(chat_id).or_default();
        turns.push(stored.clone());
        let count = turns.len();

        if let Some(chat) = inner.chats.get_mut(&chat_id) {
            chat.message_count = count;
            chat.updated_at = now;
        }

        Ok(stored)
    }

    /// Title a chat after its first message
    ///
    /// Call after storing the reply. Applies only when that reply is the
    /// chat's first assistant turn, however many user turns preceded it.
    ///
    /// # Errors
    ///
    /// Returns [`GentleError::ChatNotFound`] if no chat has this id
    pub fn retitle_from_first_message(&self, chat_id: u64, message: &str) -> Result<Chat> {
        let mut inner = self.inner.write();
        let replies = inner
            .turns
            .get(&chat_id)
            .map_or(0, |turns| turns.iter().filter(|t| t.role == Role::Assistant).count());

        let chat = inner
            .chats
            .get_mut(&chat_id)
            .ok_or(GentleError::ChatNotFound(chat_id))?;
        if replies <= 1 {
            chat.title = title_from_message(message);
        }
        Ok(chat.clone())
    }
}
