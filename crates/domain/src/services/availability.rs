//! Terminal availability filter.
//!
//! Decides which terminals the group or chat editor may offer for assignment.
//! A terminal already used by another saved record of the same collection is
//! hidden, unless the form under edit has it checked or the saved record being
//! edited owns it. Groups and chats are filtered independently: a terminal in a
//! group is still free for a chat.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Chat, ChatId, Group, GroupId, Terminal, TerminalId};

/// Collection a terminal can be assigned through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Groups,
    Chats,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Groups => "groups",
            CollectionKind::Chats => "chats",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A saved record that claims terminals.
pub trait TerminalAssignment {
    type Id: PartialEq;

    const KIND: CollectionKind;

    fn assignment_id(&self) -> &Self::Id;

    fn assigned_terminals(&self) -> impl Iterator<Item = &TerminalId>;
}

impl TerminalAssignment for Group {
    type Id = GroupId;

    const KIND: CollectionKind = CollectionKind::Groups;

    fn assignment_id(&self) -> &GroupId {
        &self.id
    }

    fn assigned_terminals(&self) -> impl Iterator<Item = &TerminalId> {
        self.terminal_ids()
    }
}

impl TerminalAssignment for Chat {
    type Id = ChatId;

    const KIND: CollectionKind = CollectionKind::Chats;

    fn assignment_id(&self) -> &ChatId {
        &self.id
    }

    fn assigned_terminals(&self) -> impl Iterator<Item = &TerminalId> {
        self.terminal_ids()
    }
}

/// Returns the terminals selectable for the record being edited, in catalog
/// order.
///
/// * `catalog` - every known terminal
/// * `saved` - the saved records of one collection
/// * `checked` - terminals currently checked in the form
/// * `editing` - the saved record under edit, if any
pub fn available_terminals<'a, R>(
    catalog: &'a [Terminal],
    saved: &[R],
    checked: &[TerminalId],
    editing: Option<&R::Id>,
) -> Vec<&'a Terminal>
where
    R: TerminalAssignment,
{
    let taken: HashSet<&TerminalId> = saved
        .iter()
        .filter(|record| editing != Some(record.assignment_id()))
        .flat_map(|record| record.assigned_terminals())
        .collect();

    let available: Vec<&Terminal> = catalog
        .iter()
        .filter(|terminal| !taken.contains(&terminal.id) || checked.contains(&terminal.id))
        .collect();

    tracing::trace!(
        kind = %R::KIND,
        catalog = catalog.len(),
        taken = taken.len(),
        available = available.len(),
        "Computed available terminals"
    );

    available
}
