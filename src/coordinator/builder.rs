//! Builder for [`ThemeCoordinator`].

use super::ThemeCoordinator;
use crate::config::CoordinatorConfig;
use crate::signal::{ColorSchemeSignal, SystemSignal};
use crate::sink::StyleSink;
use crate::store::{MemoryStore, PreferenceStore};
use crate::theme::{AdaptiveSnapshot, SnapshotValidationError};

/// Collects the collaborators of a [`ThemeCoordinator`].
///
/// Anything not set falls back to a default:
///
/// | Collaborator | Default |
/// |--------------|---------|
/// | config | [`CoordinatorConfig::default`] |
/// | palette | [`AdaptiveSnapshot::default`] |
/// | store | empty [`MemoryStore`] |
/// | signal | [`SystemSignal`] at the configured poll interval |
/// | sink | none, snapshots are only tracked |
///
/// # Example
///
/// ```rust
/// use themeshift::{ColorMode, ManualSignal, MemoryStore, Preference, ThemeCoordinator};
///
/// let coordinator = ThemeCoordinator::builder()
///     .store(MemoryStore::new())
///     .signal(ManualSignal::new(ColorMode::Dark))
///     .build()
///     .unwrap();
///
/// let state = coordinator.state();
/// assert_eq!(state.preference, Preference::System);
/// assert_eq!(state.resolved, ColorMode::Dark);
/// assert!(!state.transitioning);
/// ```
#[derive(Default)]
pub struct ThemeCoordinatorBuilder {
    config: CoordinatorConfig,
    palette: AdaptiveSnapshot,
    store: Option<Box<dyn PreferenceStore>>,
    signal: Option<Box<dyn ColorSchemeSignal>>,
    sink: Option<Box<dyn StyleSink>>,
}

impl ThemeCoordinatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the snapshots applied for each color mode.
    pub fn palette(mut self, palette: AdaptiveSnapshot) -> Self {
        self.palette = palette;
        self
    }

    pub fn store(mut self, store: impl PreferenceStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn signal(mut self, signal: impl ColorSchemeSignal + 'static) -> Self {
        self.signal = Some(Box::new(signal));
        self
    }

    pub fn sink(mut self, sink: impl StyleSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Loads the stored preference, resolves the initial theme, applies
    /// its snapshot and subscribes to the OS signal.
    ///
    /// # Errors
    ///
    /// Returns an error if either palette snapshot fails validation.
    pub fn build(self) -> Result<ThemeCoordinator, SnapshotValidationError> {
        self.palette.light().validate()?;
        self.palette.dark().validate()?;

        let store: Box<dyn PreferenceStore> = match self.store {
            Some(store) => store,
            None => Box::new(MemoryStore::new()),
        };
        let signal: Box<dyn ColorSchemeSignal> = match self.signal {
            Some(signal) => signal,
            None => Box::new(SystemSignal::new(self.config.poll_interval)),
        };

        Ok(ThemeCoordinator::init(
            self.config,
            self.palette,
            store,
            signal,
            self.sink,
        ))
    }
}
