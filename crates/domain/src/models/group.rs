//! Group domain models.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{null_as_default, GroupId, Record, TerminalId, TerminalRef};

/// A named collection of terminals with a connectivity flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "_id", alias = "id")]
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub is_connected: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub terminals: Vec<TerminalRef>,
}

impl Group {
    pub fn terminal_ids(&self) -> impl Iterator<Item = &TerminalId> {
        self.terminals.iter().map(TerminalRef::id)
    }
}

impl Record for Group {
    type Id = GroupId;

    const ENTITY: &'static str = "group";

    fn id(&self) -> &GroupId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Request payload for creating or updating a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub name: String,

    #[validate(custom(function = "crate::models::group::validate_group_terminals"))]
    pub terminals: Vec<TerminalId>,

    pub is_connected: bool,
}

pub fn validate_group_terminals(terminals: &[TerminalId]) -> Result<(), validator::ValidationError> {
    shared::validation::validate_selection(terminals, Group::ENTITY)
}
