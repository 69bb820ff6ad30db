//! Terminal domain model.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use super::{Record, TerminalId};

/// Represents a managed physical terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Terminal {
    #[serde(rename = "_id", alias = "id")]
    pub id: TerminalId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub battery_level: i32,
    #[serde(default)]
    pub wifi_level: i32,
}

impl Terminal {
    pub fn battery_band(&self) -> LevelBand {
        LevelBand::from_level(self.battery_level)
    }

    pub fn wifi_band(&self) -> LevelBand {
        LevelBand::from_level(self.wifi_level)
    }
}

impl Record for Terminal {
    type Id = TerminalId;

    const ENTITY: &'static str = "terminal";

    fn id(&self) -> &TerminalId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Request payload for creating or updating a terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TerminalRequest {
    #[validate(custom(function = "shared::validation::validate_name"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_battery_level"))]
    pub battery_level: i32,

    #[validate(custom(function = "shared::validation::validate_wifi_level"))]
    pub wifi_level: i32,
}

/// A terminal as referenced from a group or chat.
///
/// The service normally embeds the full terminal; a bare identifier is
/// accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TerminalRef {
    Embedded(Terminal),
    Id(TerminalId),
}

impl TerminalRef {
    pub fn id(&self) -> &TerminalId {
        match self {
            TerminalRef::Embedded(terminal) => &terminal.id,
            TerminalRef::Id(id) => id,
        }
    }

    /// Display name, falling back to the identifier when not embedded or
    /// embedded without a name.
    pub fn label(&self) -> &str {
        match self {
            TerminalRef::Embedded(terminal) if !terminal.name.is_empty() => &terminal.name,
            TerminalRef::Embedded(terminal) => terminal.id.as_str(),
            TerminalRef::Id(id) => id.as_str(),
        }
    }
}

/// Coarse band for a battery or wifi level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelBand {
    Critical,
    Low,
    Fair,
    Good,
}

impl LevelBand {
    /// Bands are exclusive at their lower edge: 76..=100 is good, 51..=75
    /// fair, 26..=50 low and anything at or below 25 critical.
    pub fn from_level(level: i32) -> Self {
        if level > 75 {
            LevelBand::Good
        } else if level > 50 {
            LevelBand::Fair
        } else if level > 25 {
            LevelBand::Low
        } else {
            LevelBand::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelBand::Critical => "critical",
            LevelBand::Low => "low",
            LevelBand::Fair => "fair",
            LevelBand::Good => "good",
        }
    }
}

impl fmt::Display for LevelBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn terminal(id: &str, battery: i32, wifi: i32) -> Terminal {
        Terminal {
            id: TerminalId::new(id),
            name: format!("Terminal {}", id),
            battery_level: battery,
            wifi_level: wifi,
        }
    }

    #[test]
    fn test_terminal_deserializes_service_shape() {
        let terminal: Terminal = serde_json::from_value(json!({
            "_id": "65a1",
            "name": "T1",
            "batteryLevel": 80,
            "wifiLevel": 40,
            "__v": 0
        }))
        .unwrap();

        assert_eq!(terminal.id.as_str(), "65a1");
        assert_eq!(terminal.name, "T1");
        assert_eq!(terminal.battery_level, 80);
        assert_eq!(terminal.wifi_level, 40);
    }

    #[test]
    fn test_terminal_accepts_id_alias() {
        let terminal: Terminal =
            serde_json::from_value(json!({"id": "t-2", "name": "T2"})).unwrap();
        assert_eq!(terminal.id.as_str(), "t-2");
        assert_eq!(terminal.battery_level, 0);
    }

    #[test]
    fn test_terminal_request_wire_body() {
        let request = TerminalRequest {
            name: "T1".to_string(),
            battery_level: 80,
            wifi_level: 40,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "T1", "batteryLevel": 80, "wifiLevel": 40})
        );
    }

    #[test]
    fn test_terminal_request_validation() {
        let valid = TerminalRequest {
            name: "T1".to_string(),
            battery_level: 100,
            wifi_level: 0,
        };
        assert!(valid.validate().is_ok());

        let out_of_range = TerminalRequest {
            battery_level: 101,
            ..valid.clone()
        };
        assert!(out_of_range.validate().is_err());

        let blank = TerminalRequest {
            name: " ".to_string(),
            ..valid
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_terminal_ref_embedded_and_bare() {
        let refs: Vec<TerminalRef> = serde_json::from_value(json!([
            {"_id": "a", "name": "Alpha", "batteryLevel": 10, "wifiLevel": 20},
            "b"
        ]))
        .unwrap();

        assert_eq!(refs[0].id().as_str(), "a");
        assert_eq!(refs[0].label(), "Alpha");
        assert_eq!(refs[1].id().as_str(), "b");
        assert_eq!(refs[1].label(), "b");
    }

    #[test]
    fn test_embedded_terminal_without_name() {
        let refs: Vec<TerminalRef> = serde_json::from_value(json!([
            {"_id": "a"},
            {"_id": "b", "name": "Bravo"}
        ]))
        .unwrap();

        assert!(matches!(refs[0], TerminalRef::Embedded(_)));
        assert_eq!(refs[0].id().as_str(), "a");
        assert_eq!(refs[0].label(), "a");
        assert_eq!(refs[1].label(), "Bravo");
    }

    #[test]
    fn test_level_band_boundaries() {
        assert_eq!(LevelBand::from_level(100), LevelBand::Good);
        assert_eq!(LevelBand::from_level(76), LevelBand::Good);
        assert_eq!(LevelBand::from_level(75), LevelBand::Fair);
        assert_eq!(LevelBand::from_level(51), LevelBand::Fair);
        assert_eq!(LevelBand::from_level(50), LevelBand::Low);
        assert_eq!(LevelBand::from_level(26), LevelBand::Low);
        assert_eq!(LevelBand::from_level(25), LevelBand::Critical);
        assert_eq!(LevelBand::from_level(0), LevelBand::Critical);
    }

    #[test]
    fn test_terminal_bands() {
        let t = terminal("a", 80, 30);
        assert_eq!(t.battery_band(), LevelBand::Good);
        assert_eq!(t.wifi_band(), LevelBand::Low);
        assert_eq!(format!("{}", t.wifi_band()), "low");
    }
}
