//! Conversation types
//!
//! A [`Chat`] owns an ordered sequence of [`Turn`]s. User turns carry the text
//! that was routed; assistant turns additionally record which model answered
//! and the usage it reported.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::Usage;

/// Title given to chats created without one
pub const DEFAULT_CHAT_TITLE: &str = "New chat";

/// Message role in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A conversation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: u64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub message_count: usize,
}

/// Extra data attached to assistant turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_details: Option<String>,
}

/// A single stored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: u64,
    pub chat_id: u64,
    pub role: Role,
    pub content: String,
    pub model_used: Option<String>,
    pub metadata: TurnMetadata,
    pub created_at: DateTime<Utc>,
}

/// A turn that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewTurn {
    pub role: Role,
    pub content: String,
    pub model_used: Option<String>,
    pub metadata: TurnMetadata,
}

impl NewTurn {
    /// Create a user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
            model_used: None,
            metadata: TurnMetadata::default(),
        }
    }

    /// Create an assistant turn answered by `model`
    #[must_use]
    pub fn assistant(text: impl Into<String>, model: impl Into<String>, usage: Usage) -> Self {
        let model = model.into();
        Self {
            role: Role::Assistant,
            content: text.into(),
            metadata: TurnMetadata {
                usage: Some(usage),
                model_details: Some(model.clone()),
            },
            model_used: Some(model),
        }
    }
}

/// Title derived from the first message of a chat
#[must_use]
pub fn title_from_message(message: &str) -> String {
    const MAX_CHARS: usize = 50;

    let mut chars = message.chars();
    let head: String = chars.by_ref().take(MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
