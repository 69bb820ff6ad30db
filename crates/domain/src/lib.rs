//! Domain layer for Fleet Console.
//!
//! This crate contains:
//! - Wire models (Terminal, Group, Chat, login)
//! - Typed editor forms and their submission rules
//! - The terminal availability filter and dashboard aggregation
//!
//! Nothing here performs I/O.

pub mod forms;
pub mod models;
pub mod services;
