//! Common validation utilities.

use validator::ValidationError;

/// Lowest telemetry level a terminal can report.
pub const MIN_LEVEL: i32 = 0;

/// Highest telemetry level a terminal can report.
pub const MAX_LEVEL: i32 = 100;

/// Validates that a name is present (not empty and not only whitespace).
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_required");
        err.message = Some("Name is required.".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates that a battery level is within valid range (0 to 100).
pub fn validate_battery_level(level: i32) -> Result<(), ValidationError> {
    validate_level(level, "battery_range", "Battery level must be between 0 and 100")
}

/// Validates that a wifi signal level is within valid range (0 to 100).
pub fn validate_wifi_level(level: i32) -> Result<(), ValidationError> {
    validate_level(level, "wifi_range", "Wifi level must be between 0 and 100")
}

fn validate_level(level: i32, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new(code);
        err.message = Some(message.into());
        Err(err)
    }
}

/// Validates that a selection holds at least one item.
///
/// `owner` names the record the selection belongs to and is used in the
/// message, e.g. "A group must have at least one terminal."
pub fn validate_selection<T>(items: &[T], owner: &str) -> Result<(), ValidationError> {
    if items.is_empty() {
        let mut err = ValidationError::new("selection_empty");
        err.message = Some(format!("A {} must have at least one terminal.", owner).into());
        Err(err)
    } else {
        Ok(())
    }
}
