//! Domain services for Fleet Console.
//!
//! Services contain the logic that operates on already-fetched domain models.

pub mod availability;
pub mod dashboard;

pub use availability::{available_terminals, CollectionKind, TerminalAssignment};
pub use dashboard::DashboardSummary;
