//! Chat domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{null_as_default, ChatId, Record, TerminalId, TerminalRef};

/// A chat session among terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(rename = "_id", alias = "id")]
    pub id: ChatId,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub terminals: Vec<TerminalRef>,
    /// Participant count as stored by the service; may lag `terminals`.
    #[serde(default)]
    pub participants: usize,
}

impl Chat {
    pub fn terminal_ids(&self) -> impl Iterator<Item = &TerminalId> {
        self.terminals.iter().map(TerminalRef::id)
    }
}

impl Record for Chat {
    type Id = ChatId;

    const ENTITY: &'static str = "chat";

    fn id(&self) -> &ChatId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Request payload for creating or updating a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub name: String,

    #[validate(custom(function = "crate::models::chat::validate_chat_terminals"))]
    pub terminals: Vec<TerminalId>,

    pub is_active: bool,

    pub participants: usize,
}

impl ChatRequest {
    /// Builds a request whose participant count matches the terminal list.
    pub fn new(name: impl Into<String>, terminals: Vec<TerminalId>, is_active: bool) -> Self {
        let participants = terminals.len();
        Self {
            name: name.into(),
            terminals,
            is_active,
            participants,
        }
    }
}

pub fn validate_chat_terminals(terminals: &[TerminalId]) -> Result<(), validator::ValidationError> {
    shared::validation::validate_selection(terminals, Chat::ENTITY)
}
