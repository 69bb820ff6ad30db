//! Shared utilities for the Fleet Console workspace.
//!
//! This crate provides the field-level validation rules that every editor
//! form applies before a request is issued:
//! - Required names
//! - Telemetry levels (battery, wifi) within 0 to 100
//! - Non-empty terminal selections

pub mod validation;
