//! Dashboard aggregation.

use serde::Serialize;

use crate::models::{Chat, Group, Terminal};

/// Record counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub terminals: usize,
    pub connected_groups: usize,
    pub disconnected_groups: usize,
    pub active_chats: usize,
    pub inactive_chats: usize,
}

impl DashboardSummary {
    pub fn from_collections(terminals: &[Terminal], groups: &[Group], chats: &[Chat]) -> Self {
        let connected_groups = groups.iter().filter(|g| g.is_connected).count();
        let active_chats = chats.iter().filter(|c| c.is_active).count();

        Self {
            terminals: terminals.len(),
            connected_groups,
            disconnected_groups: groups.len() - connected_groups,
            active_chats,
            inactive_chats: chats.len() - active_chats,
        }
    }

    /// Labelled series for the activity chart, in display order.
    pub fn series(&self) -> [(&'static str, usize); 5] {
        [
            ("Terminals", self.terminals),
            ("Connected groups", self.connected_groups),
            ("Disconnected groups", self.disconnected_groups),
            ("Active chats", self.active_chats),
            ("Inactive chats", self.inactive_chats),
        ]
    }
}
