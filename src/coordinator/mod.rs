//! The theme transition coordinator.
//!
//! [`ThemeCoordinator`] is the single owner of theme state. It reconciles
//! the stored [`Preference`], the last OS color scheme it observed, and
//! whether a transition is in flight.
//!
//! # State machine
//!
//! ```text
//!            PreferenceRequested / OsSignalChanged
//!            (resolves to a different mode)
//!   Idle ───────────────────────────────────────────▶ Transitioning
//!    ▲                                                     │
//!    │               SettleElapsed (deadline reached)      │
//!    └─────────────────────────────────────────────────────┘
//! ```
//!
//! - Entering `Transitioning` applies the snapshot for the new mode
//!   through the [`StyleSink`] and arms the settle deadline.
//! - Every request that arrives while `Transitioning` is dropped, not
//!   queued. The first accepted request wins.
//! - OS changes are always recorded. When a transition settles and the
//!   recorded scheme no longer matches what is shown (the preference is
//!   `system` and the OS flipped mid-transition), a new transition starts.
//!
//! Time is passed in explicitly (`now`), so the machine is deterministic.
//! [`EventLoop`](crate::EventLoop) drives it against the wall clock.

mod builder;
mod event;

pub use builder::ThemeCoordinatorBuilder;
pub use event::{IgnoreReason, Outcome, ThemeEvent, ThemeState};

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::config::CoordinatorConfig;
use crate::preference::{resolve, ColorMode, Preference};
use crate::runtime::ThemeHandle;
use crate::signal::{ColorSchemeSignal, SignalSubscription};
use crate::sink::StyleSink;
use crate::store::PreferenceStore;
use crate::theme::{AdaptiveSnapshot, StyleSnapshot};

/// Messages delivered to the coordinator's inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Inbound {
    Event(ThemeEvent),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Transitioning { settle_at: Instant },
}

type Observer = Box<dyn FnMut(&ThemeState)>;

/// Single point of truth for theme state.
///
/// Build one with [`ThemeCoordinator::builder`] and hand it (or an
/// [`EventLoop`](crate::EventLoop) wrapping it) to presentation code.
pub struct ThemeCoordinator {
    config: CoordinatorConfig,
    palette: AdaptiveSnapshot,
    store: Box<dyn PreferenceStore>,
    // Kept alive for the lifetime of the subscription.
    _signal: Box<dyn ColorSchemeSignal>,
    sink: Option<Box<dyn StyleSink>>,
    subscription: Option<SignalSubscription>,
    inbox: Receiver<Inbound>,
    outbox: Sender<Inbound>,
    preference: Preference,
    os: ColorMode,
    resolved: ColorMode,
    phase: Phase,
    observers: Vec<Observer>,
}

impl ThemeCoordinator {
    pub fn builder() -> ThemeCoordinatorBuilder {
        ThemeCoordinatorBuilder::new()
    }

    pub(crate) fn init(
        config: CoordinatorConfig,
        palette: AdaptiveSnapshot,
        store: Box<dyn PreferenceStore>,
        mut signal: Box<dyn ColorSchemeSignal>,
        sink: Option<Box<dyn StyleSink>>,
    ) -> Self {
        let preference = match store.read(&config.storage_key) {
            Ok(Some(preference)) => preference,
            Ok(None) => Preference::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read stored theme preference, using system");
                Preference::default()
            }
        };
        let os = signal.current();
        let resolved = resolve(preference, os);

        let (outbox, inbox) = mpsc::channel();
        let notify_tx = outbox.clone();
        let subscription = signal.subscribe(Box::new(move |mode| {
            let _ = notify_tx.send(Inbound::Event(ThemeEvent::OsSignalChanged(mode)));
        }));

        let mut coordinator = Self {
            config,
            palette,
            store,
            _signal: signal,
            sink,
            subscription: Some(subscription),
            inbox,
            outbox,
            preference,
            os,
            resolved,
            phase: Phase::Idle,
            observers: Vec::new(),
        };
        coordinator.apply_snapshot();
        tracing::debug!(%preference, %os, %resolved, "theme coordinator started");
        coordinator
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state. Pure read.
    pub fn state(&self) -> ThemeState {
        ThemeState {
            preference: self.preference,
            resolved: self.resolved,
            transitioning: self.is_transitioning(),
        }
    }

    pub fn preference(&self) -> Preference {
        self.preference
    }

    pub fn resolved_theme(&self) -> ColorMode {
        self.resolved
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// The last OS color scheme observed.
    pub fn os_scheme(&self) -> ColorMode {
        self.os
    }

    /// When the in-flight transition settles, if one is in flight.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Idle => None,
            Phase::Transitioning { settle_at } => Some(settle_at),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        self.config.settle_delay
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn palette(&self) -> &AdaptiveSnapshot {
        &self.palette
    }

    /// The snapshot for the currently resolved theme.
    pub fn current_snapshot(&self) -> &StyleSnapshot {
        self.palette.resolve(self.resolved)
    }

    pub fn is_shut_down(&self) -> bool {
        self.subscription.is_none()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Registers a listener called after every state change.
    pub fn observe(&mut self, observer: impl FnMut(&ThemeState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Returns a sendable handle that posts requests to this coordinator's
    /// inbox. Requests are processed by [`poll`](Self::poll) or by an
    /// [`EventLoop`](crate::EventLoop).
    ///
    /// The coordinator holds a sender of its own, so the inbox never
    /// disconnects. Dropping every handle does not stop an event loop; send
    /// [`ThemeHandle::shutdown`] instead.
    pub fn remote(&self) -> ThemeHandle {
        ThemeHandle::new(self.outbox.clone())
    }

    /// Requests a new preference.
    ///
    /// Ignored while a transition is in flight or when `preference` is
    /// already in effect. Otherwise the preference is updated and
    /// persisted, and a transition starts if the resolved theme changes.
    pub fn set_preference(&mut self, preference: Preference, now: Instant) -> Outcome {
        self.handle(ThemeEvent::PreferenceRequested(preference), now)
    }

    /// Feeds one event through the state machine.
    ///
    /// A transition whose deadline is at or before `now` settles first, so
    /// the event is judged against the state after the settle.
    pub fn handle(&mut self, event: ThemeEvent, now: Instant) -> Outcome {
        if self.is_shut_down() {
            return Outcome::Ignored(IgnoreReason::ShutDown);
        }
        if event != ThemeEvent::SettleElapsed {
            self.settle_if_due(now);
        }
        let outcome = match event {
            ThemeEvent::PreferenceRequested(preference) => {
                self.on_preference_requested(preference, now)
            }
            ThemeEvent::OsSignalChanged(mode) => self.on_os_signal(mode, now),
            ThemeEvent::SettleElapsed => self.on_settle(now),
        };
        match outcome {
            Outcome::Ignored(reason) => {
                tracing::trace!(?event, ?reason, "theme event ignored");
            }
            _ => self.notify_observers(),
        }
        outcome
    }

    /// Settles the in-flight transition if its deadline has passed, then
    /// processes everything waiting in the inbox.
    ///
    /// Returns the outcome of every event handled, in order.
    pub fn poll(&mut self, now: Instant) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        outcomes.extend(self.settle_if_due(now));
        while let Ok(inbound) = self.inbox.try_recv() {
            if let Some(outcome) = self.dispatch(inbound, now) {
                outcomes.push(outcome);
            }
        }
        // A zero settle delay makes a transition started above due already.
        outcomes.extend(self.settle_if_due(now));
        outcomes
    }

    /// Releases the OS signal subscription. Later events are ignored.
    ///
    /// Calling it more than once is harmless.
    pub fn shutdown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
            self.phase = Phase::Idle;
            tracing::debug!("theme coordinator shut down");
        }
    }

    // =========================================================================
    // Event loop plumbing
    // =========================================================================

    pub(crate) fn dispatch(&mut self, inbound: Inbound, now: Instant) -> Option<Outcome> {
        match inbound {
            Inbound::Event(event) => Some(self.handle(event, now)),
            Inbound::Shutdown => {
                self.shutdown();
                None
            }
        }
    }

    pub(crate) fn recv(&self) -> Option<Inbound> {
        self.inbox.recv().ok()
    }

    pub(crate) fn recv_timeout(&self, timeout: Duration) -> Result<Inbound, RecvTimeoutError> {
        self.inbox.recv_timeout(timeout)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn settle_if_due(&mut self, now: Instant) -> Option<Outcome> {
        let due = self.next_deadline().is_some_and(|at| now >= at);
        due.then(|| self.handle(ThemeEvent::SettleElapsed, now))
    }

    fn on_preference_requested(&mut self, preference: Preference, now: Instant) -> Outcome {
        if self.is_transitioning() {
            tracing::debug!(%preference, "preference request dropped, transition in flight");
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        if preference == self.preference {
            return Outcome::Ignored(IgnoreReason::Unchanged);
        }

        self.preference = preference;
        if let Err(e) = self.store.write(&self.config.storage_key, preference) {
            tracing::warn!(error = %e, %preference, "failed to persist theme preference");
        }

        let target = resolve(preference, self.os);
        if target == self.resolved {
            tracing::debug!(%preference, resolved = %target, "preference updated, theme unchanged");
            Outcome::Updated
        } else {
            self.start_transition(target, now)
        }
    }

    fn on_os_signal(&mut self, mode: ColorMode, now: Instant) -> Outcome {
        self.os = mode;
        if self.preference != Preference::System {
            return Outcome::Ignored(IgnoreReason::NotFollowingSystem);
        }
        if self.is_transitioning() {
            return Outcome::Ignored(IgnoreReason::Busy);
        }
        if mode == self.resolved {
            return Outcome::Ignored(IgnoreReason::Unchanged);
        }
        self.start_transition(mode, now)
    }

    fn on_settle(&mut self, now: Instant) -> Outcome {
        match self.phase {
            Phase::Transitioning { settle_at } if now >= settle_at => {
                self.phase = Phase::Idle;
                tracing::debug!(resolved = %self.resolved, "theme transition settled");

                let target = resolve(self.preference, self.os);
                if target != self.resolved {
                    // The OS flipped while we were busy.
                    self.notify_observers();
                    return self.start_transition(target, now);
                }
                Outcome::Settled
            }
            _ => Outcome::Ignored(IgnoreReason::NotDue),
        }
    }

    fn start_transition(&mut self, target: ColorMode, now: Instant) -> Outcome {
        let settle_at = now + self.config.settle_delay;
        self.phase = Phase::Transitioning { settle_at };
        self.resolved = target;
        self.apply_snapshot();
        tracing::debug!(
            resolved = %target,
            settle = ?self.config.settle_delay,
            "theme transition started"
        );
        Outcome::Transition(target)
    }

    fn apply_snapshot(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            sink.apply(self.resolved, self.palette.resolve(self.resolved));
        }
    }

    fn notify_observers(&mut self) {
        let state = self.state();
        for observer in &mut self.observers {
            observer(&state);
        }
    }
}

impl Drop for ThemeCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for ThemeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCoordinator")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("os", &self.os)
            .field("phase", &self.phase)
            .field("observers", &self.observers.len())
            .finish()
    }
}
