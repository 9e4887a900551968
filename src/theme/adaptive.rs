//! Snapshots that respond to the resolved color mode, and OS scheme detection.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;
use std::sync::Mutex;

use super::snapshot::StyleSnapshot;
use crate::preference::ColorMode;

/// A pair of snapshots, one per color mode.
///
/// The coordinator hands the snapshot for the resolved mode to the
/// style sink whenever a transition starts.
///
/// # Example
///
/// ```rust
/// use themeshift::{AdaptiveSnapshot, ColorMode, StyleSnapshot};
///
/// let light = StyleSnapshot::new().set("--bg-primary", "#ffffff");
/// let dark = StyleSnapshot::new().set("--bg-primary", "#1f2937");
/// let adaptive = AdaptiveSnapshot::new(light, dark);
///
/// assert_eq!(adaptive.resolve(ColorMode::Dark).get("--bg-primary"), Some("#1f2937"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptiveSnapshot {
    light: StyleSnapshot,
    dark: StyleSnapshot,
}

/// Transition timing shared by both built-in palettes.
pub const THEME_TRANSITION: &str = "0.5s cubic-bezier(0.4, 0, 0.2, 1)";

impl AdaptiveSnapshot {
    /// Creates an adaptive snapshot with separate light and dark variants.
    pub fn new(light: StyleSnapshot, dark: StyleSnapshot) -> Self {
        Self { light, dark }
    }

    /// Returns the snapshot for the given mode.
    pub fn resolve(&self, mode: ColorMode) -> &StyleSnapshot {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }

    pub fn light(&self) -> &StyleSnapshot {
        &self.light
    }

    pub fn dark(&self) -> &StyleSnapshot {
        &self.dark
    }
}

impl Default for AdaptiveSnapshot {
    /// The built-in palette.
    fn default() -> Self {
        let light = StyleSnapshot::new()
            .set("--bg-primary", "#ffffff")
            .set("--bg-secondary", "#f9fafb")
            .set("--text-primary", "#111827")
            .set("--text-secondary", "#6b7280")
            .set("--border-color", "#e5e7eb")
            .set("--particle-opacity", "0.6")
            .set("--theme-transition", THEME_TRANSITION)
            .set("meta:theme-color", "#ffffff");
        let dark = StyleSnapshot::new()
            .set("--bg-primary", "#1f2937")
            .set("--bg-secondary", "#374151")
            .set("--text-primary", "#f9fafb")
            .set("--text-secondary", "#d1d5db")
            .set("--border-color", "#4b5563")
            .set("--particle-opacity", "0.8")
            .set("--theme-transition", THEME_TRANSITION)
            .set("meta:theme-color", "#1f2937");
        Self { light, dark }
    }
}

type SchemeDetector = fn() -> ColorMode;

static SCHEME_DETECTOR: Lazy<Mutex<SchemeDetector>> =
    Lazy::new(|| Mutex::new(os_scheme_detector));

/// Overrides the detector used to read the OS color scheme.
///
/// This is useful for testing or when the host reports the scheme through
/// some other channel.
pub fn set_scheme_detector(detector: SchemeDetector) {
    let mut guard = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = detector;
}

/// Restores the `dark-light` backed detector.
pub fn reset_scheme_detector() {
    set_scheme_detector(os_scheme_detector);
}

/// Reads the current OS color scheme through the active detector.
pub fn detect_color_mode() -> ColorMode {
    let detector = SCHEME_DETECTOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    (*detector)()
}

fn os_scheme_detector() -> ColorMode {
    match detect_os_theme() {
        OsThemeMode::Dark => ColorMode::Dark,
        OsThemeMode::Light => ColorMode::Light,
    }
}
