//! Domain models for Fleet Console.

pub mod auth;
pub mod chat;
pub mod group;
pub mod id;
pub mod terminal;

pub use auth::{LoginRequest, LoginResponse};
pub use chat::{Chat, ChatRequest};
pub use group::{Group, GroupRequest};
pub use id::{ChatId, GroupId, TerminalId};
pub use terminal::{LevelBand, Terminal, TerminalRef, TerminalRequest};

use serde::{Deserialize, Deserializer};

/// A record held in one of the remote collections.
pub trait Record {
    /// Identifier type of the record.
    type Id: Clone + PartialEq + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static;

    /// Singular noun used in user-facing messages ("terminal", "group", "chat").
    const ENTITY: &'static str;

    fn id(&self) -> &Self::Id;

    fn name(&self) -> &str;
}

/// Treats an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
