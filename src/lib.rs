//! # Themeshift - light/dark/system theme coordination
//!
//! Themeshift owns the theme state of an application: the user's
//! [`Preference`] (`light`, `dark` or `system`), the [`ColorMode`] actually
//! shown, and whether a visual transition is still settling. Presentation
//! code reads that state and asks for changes; it never applies styles
//! itself.
//!
//! ## Guarantees
//!
//! - **Single flight**: at most one transition is in flight. Requests that
//!   arrive while one is settling are dropped, not queued.
//! - **Idempotence**: asking for the preference already in effect does
//!   nothing.
//! - **Pure resolution**: the shown mode is always [`resolve`]d from the
//!   preference and the last OS scheme observed.
//! - **Persistence**: the preference survives restarts through a
//!   [`PreferenceStore`]; everything else is recomputed at startup.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use themeshift::{
//!     ColorMode, CoordinatorConfig, ManualSignal, MemoryStore, Outcome, Preference,
//!     RecordingSink, ThemeCoordinator,
//! };
//!
//! let sink = RecordingSink::new();
//! let mut coordinator = ThemeCoordinator::builder()
//!     .config(CoordinatorConfig::new().settle_delay(Duration::from_millis(300)))
//!     .store(MemoryStore::new())
//!     .signal(ManualSignal::new(ColorMode::Light))
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! let t0 = Instant::now();
//! assert_eq!(
//!     coordinator.set_preference(Preference::Dark, t0),
//!     Outcome::Transition(ColorMode::Dark)
//! );
//! // Still settling: this one is dropped.
//! assert!(!coordinator.set_preference(Preference::Light, t0).is_accepted());
//!
//! coordinator.poll(t0 + Duration::from_millis(300));
//! assert!(!coordinator.state().transitioning);
//! assert_eq!(coordinator.state().resolved, ColorMode::Dark);
//! ```
//!
//! ## Collaborators
//!
//! | Concern | Trait | Provided |
//! |---------|-------|----------|
//! | Persisted preference | [`PreferenceStore`] | [`MemoryStore`], [`FileStore`] |
//! | OS color scheme | [`ColorSchemeSignal`] | [`ManualSignal`], [`SystemSignal`] |
//! | Applying styles | [`StyleSink`] | [`RecordingSink`], any `FnMut(ColorMode, &StyleSnapshot)` |
//!
//! [`EventLoop`] drives a coordinator against the wall clock, with
//! [`ThemeHandle`] as the sendable request handle.

pub mod config;
pub mod coordinator;
pub mod preference;
pub mod runtime;
pub mod signal;
pub mod sink;
pub mod store;
pub mod theme;

pub use config::{ConfigError, CoordinatorConfig, DEFAULT_POLL_INTERVAL, DEFAULT_SETTLE_DELAY};
pub use coordinator::{
    IgnoreReason, Outcome, ThemeCoordinator, ThemeCoordinatorBuilder, ThemeEvent, ThemeState,
};
pub use preference::{resolve, ColorMode, ParsePreferenceError, Preference};
pub use runtime::{EventLoop, ThemeHandle};
pub use signal::{ColorSchemeSignal, ManualSignal, Notify, SignalSubscription, SystemSignal};
pub use sink::{RecordingSink, StyleSink};
pub use store::{FileStore, MemoryStore, PreferenceStore, StoreError, STORAGE_KEY};
pub use theme::{
    detect_color_mode, reset_scheme_detector, set_scheme_detector, AdaptiveSnapshot,
    SnapshotValidationError, StyleSnapshot, THEME_TRANSITION,
};
