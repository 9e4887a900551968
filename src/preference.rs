//! Theme preference and resolved color mode.
//!
//! A [`Preference`] is what the user asked for; a [`ColorMode`] is what is
//! actually shown. [`resolve`] maps one to the other given the OS signal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The user's declared theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    Dark,
    /// Follow the OS color scheme.
    #[default]
    System,
}

impl Preference {
    /// All preferences in the order a three-way toggle presents them.
    pub const ALL: [Preference; 3] = [Preference::Light, Preference::Dark, Preference::System];

    /// The stored/serialized name (`light`, `dark`, `system`).
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::System => "system",
        }
    }

    /// Human-readable label for toggle controls.
    pub fn label(self) -> &'static str {
        match self {
            Preference::Light => "Light",
            Preference::Dark => "Dark",
            Preference::System => "System",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Preference::Light),
            "dark" => Ok(Preference::Dark),
            "system" => Ok(Preference::System),
            other => Err(ParsePreferenceError {
                value: other.to_string(),
            }),
        }
    }
}

/// The effective light/dark value, either resolved from a [`Preference`]
/// or reported by the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

impl ColorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ParsePreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            other => Err(ParsePreferenceError {
                value: other.to_string(),
            }),
        }
    }
}

/// Error returned when a string names no known preference or color mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme value '{value}' (expected light, dark or system)")]
pub struct ParsePreferenceError {
    pub value: String,
}

/// Resolves a preference against the last observed OS color scheme.
///
/// ```rust
/// use themeshift::{resolve, ColorMode, Preference};
///
/// assert_eq!(resolve(Preference::Dark, ColorMode::Light), ColorMode::Dark);
/// assert_eq!(resolve(Preference::System, ColorMode::Light), ColorMode::Light);
/// ```
pub fn resolve(preference: Preference, os: ColorMode) -> ColorMode {
    match preference {
        Preference::Light => ColorMode::Light,
        Preference::Dark => ColorMode::Dark,
        Preference::System => os,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table() {
        assert_eq!(resolve(Preference::Light, ColorMode::Dark), ColorMode::Light);
        assert_eq!(resolve(Preference::Dark, ColorMode::Light), ColorMode::Dark);
        assert_eq!(resolve(Preference::System, ColorMode::Light), ColorMode::Light);
        assert_eq!(resolve(Preference::System, ColorMode::Dark), ColorMode::Dark);
    }

    #[test]
    fn test_default_is_system() {
        assert_eq!(Preference::default(), Preference::System);
    }

    #[test]
    fn test_parse_known_values() {
        assert_eq!("light".parse::<Preference>().unwrap(), Preference::Light);
        assert_eq!(" dark\n".parse::<Preference>().unwrap(), Preference::Dark);
        assert_eq!("system".parse::<Preference>().unwrap(), Preference::System);
        assert_eq!("dark".parse::<ColorMode>().unwrap(), ColorMode::Dark);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "sepia".parse::<Preference>().unwrap_err();
        assert_eq!(err.value, "sepia");
        assert!(err.to_string().contains("sepia"));

        // system is a preference, never a resolved mode
        assert!("system".parse::<ColorMode>().is_err());
        // case sensitive, like the stored values
        assert!("Dark".parse::<Preference>().is_err());
    }

    #[test]
    fn test_labels_follow_toggle_order() {
        let labels: Vec<_> = Preference::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Light", "Dark", "System"]);
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Preference::System).unwrap();
        assert_eq!(json, "\"system\"");
        let mode: ColorMode = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(mode, ColorMode::Dark);
    }
}
