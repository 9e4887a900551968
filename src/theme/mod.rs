//! Style snapshots and OS color scheme detection.
//!
//! This module provides:
//!
//! - [`StyleSnapshot`]: A named collection of visual parameters
//! - [`AdaptiveSnapshot`]: Light/dark snapshot pairs, with the built-in palette
//! - [`detect_color_mode`]: OS color scheme detection with an overridable detector
//! - [`SnapshotValidationError`]: Errors from snapshot validation

mod adaptive;
mod error;
mod snapshot;

pub use adaptive::{
    detect_color_mode, reset_scheme_detector, set_scheme_detector, AdaptiveSnapshot,
    THEME_TRANSITION,
};
pub use error::SnapshotValidationError;
pub use snapshot::StyleSnapshot;
