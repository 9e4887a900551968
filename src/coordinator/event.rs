//! Events, outcomes and the observable state of the coordinator.

use serde::Serialize;

use crate::preference::{ColorMode, Preference};

/// Input to the theme state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEvent {
    /// The presentation layer asked for a new preference.
    PreferenceRequested(Preference),
    /// The OS reported a color scheme.
    OsSignalChanged(ColorMode),
    /// The settle delay of the in-flight transition may have elapsed.
    SettleElapsed,
}

/// Why an event produced no change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A transition is in flight.
    Busy,
    /// The request matches what is already in effect.
    Unchanged,
    /// An OS change arrived while the preference is not `system`.
    NotFollowingSystem,
    /// A settle event arrived before the deadline or with nothing in flight.
    NotDue,
    /// The coordinator has been shut down.
    ShutDown,
}

/// What the coordinator did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A transition to this mode started and the snapshot was applied.
    Transition(ColorMode),
    /// The preference changed but resolves to the mode already shown.
    Updated,
    /// The in-flight transition finished.
    Settled,
    Ignored(IgnoreReason),
}

impl Outcome {
    /// Returns `true` unless the event was ignored.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Outcome::Ignored(_))
    }
}

/// Read-only view of the coordinator for presentation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub preference: Preference,
    pub resolved: ColorMode,
    pub transitioning: bool,
}

impl ThemeState {
    pub fn is_dark(&self) -> bool {
        self.resolved == ColorMode::Dark
    }

    pub fn is_light(&self) -> bool {
        self.resolved == ColorMode::Light
    }

    pub fn is_system(&self) -> bool {
        self.preference == Preference::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_acceptance() {
        assert!(Outcome::Transition(ColorMode::Dark).is_accepted());
        assert!(Outcome::Updated.is_accepted());
        assert!(Outcome::Settled.is_accepted());
        assert!(!Outcome::Ignored(IgnoreReason::Busy).is_accepted());
    }

    #[test]
    fn test_state_helpers() {
        let state = ThemeState {
            preference: Preference::System,
            resolved: ColorMode::Dark,
            transitioning: false,
        };
        assert!(state.is_dark());
        assert!(!state.is_light());
        assert!(state.is_system());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let state = ThemeState {
            preference: Preference::Light,
            resolved: ColorMode::Light,
            transitioning: true,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(
            json,
            r#"{"preference":"light","resolved":"light","transitioning":true}"#
        );
    }
}
