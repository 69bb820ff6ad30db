//! Plain-text rendering of the console screens.

use domain::models::{Chat, Group, Terminal, TerminalId};
use domain::services::DashboardSummary;

pub const NO_TERMINALS: &str = "No terminals have been created yet.";
pub const NO_GROUPS: &str = "No groups have been created yet.";
pub const NO_CHATS: &str = "No chats have been created yet.";
pub const NO_AVAILABLE_TERMINALS: &str = "No terminals available.";

fn terminal_line(terminal: &Terminal) -> String {
    format!(
        "{}  {}  battery {}% ({})  wifi {}% ({})",
        terminal.id,
        terminal.name,
        terminal.battery_level,
        terminal.battery_band(),
        terminal.wifi_level,
        terminal.wifi_band(),
    )
}

pub fn terminals(terminals: &[Terminal]) -> String {
    if terminals.is_empty() {
        return NO_TERMINALS.to_string();
    }
    terminals
        .iter()
        .map(terminal_line)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn groups(groups: &[Group]) -> String {
    if groups.is_empty() {
        return NO_GROUPS.to_string();
    }

    let mut lines = Vec::new();
    for group in groups {
        let status = if group.is_connected {
            "connected"
        } else {
            "disconnected"
        };
        lines.push(format!("{}  {}  [{}]", group.id, group.name, status));
        lines.extend(group.terminals.iter().map(|t| format!("    - {}", t.label())));
    }
    lines.join("\n")
}

pub fn chats(chats: &[Chat]) -> String {
    if chats.is_empty() {
        return NO_CHATS.to_string();
    }

    let mut lines = Vec::new();
    for chat in chats {
        let status = if chat.is_active { "active" } else { "inactive" };
        lines.push(format!(
            "{}  {}  [{}]  participants: {}",
            chat.id, chat.name, status, chat.participants
        ));
        lines.extend(chat.terminals.iter().map(|t| format!("    - {}", t.label())));
    }
    lines.join("\n")
}

/// The terminal picklist, one checkbox per selectable terminal.
pub fn picklist(available: &[&Terminal], checked: &[TerminalId]) -> String {
    if available.is_empty() {
        return NO_AVAILABLE_TERMINALS.to_string();
    }
    available
        .iter()
        .map(|terminal| {
            let mark = if checked.contains(&terminal.id) { "x" } else { " " };
            format!("[{}] {}  {}", mark, terminal.id, terminal.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dashboard(
    summary: &DashboardSummary,
    terminal_list: &[Terminal],
    group_list: &[Group],
    chat_list: &[Chat],
) -> String {
    let width = summary
        .series()
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);

    let mut sections = vec!["Activity summary".to_string()];
    sections.extend(
        summary
            .series()
            .iter()
            .map(|(label, count)| format!("  {:<width$}  {}", label, count, width = width)),
    );

    [
        sections.join("\n"),
        format!("Groups\n{}", groups(group_list)),
        format!("Terminals\n{}", terminals(terminal_list)),
        format!("Chats\n{}", chats(chat_list)),
    ]
    .join("\n\n")
}
