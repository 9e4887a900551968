//! Single-threaded event loop around a [`ThemeCoordinator`].
//!
//! The loop owns the coordinator and blocks on its inbox. OS signal
//! notifications and [`ThemeHandle`] requests land in the same inbox, so
//! they are handled strictly in arrival order. While a transition is in
//! flight the wait is bounded by the settle deadline; otherwise the loop
//! sleeps until the next message.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::thread;
//! use themeshift::{EventLoop, Preference, ThemeCoordinator};
//!
//! let coordinator = ThemeCoordinator::builder().build().unwrap();
//! let event_loop = EventLoop::new(coordinator);
//! let handle = event_loop.handle();
//!
//! thread::spawn(move || {
//!     handle.set_preference(Preference::Dark);
//!     handle.shutdown();
//! });
//!
//! let final_state = event_loop.run();
//! ```

use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::coordinator::{Inbound, ThemeCoordinator, ThemeEvent, ThemeState};
use crate::preference::Preference;

/// Cloneable, sendable handle for posting requests to a coordinator.
///
/// Every method returns `false` once the coordinator is gone. An
/// [`EventLoop`] keeps running after its handles are dropped, so call
/// [`shutdown`](Self::shutdown) to stop it.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    tx: Sender<Inbound>,
}

impl ThemeHandle {
    pub(crate) fn new(tx: Sender<Inbound>) -> Self {
        Self { tx }
    }

    /// Posts a preference request. Acceptance is decided when the
    /// coordinator processes it.
    pub fn set_preference(&self, preference: Preference) -> bool {
        self.send(Inbound::Event(ThemeEvent::PreferenceRequested(preference)))
    }

    /// Asks the coordinator to tear down and the loop to exit.
    pub fn shutdown(&self) -> bool {
        self.send(Inbound::Shutdown)
    }

    fn send(&self, inbound: Inbound) -> bool {
        self.tx.send(inbound).is_ok()
    }
}

/// Drives a coordinator against the wall clock.
pub struct EventLoop {
    coordinator: ThemeCoordinator,
}

impl EventLoop {
    pub fn new(coordinator: ThemeCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn handle(&self) -> ThemeHandle {
        self.coordinator.remote()
    }

    pub fn coordinator(&self) -> &ThemeCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut ThemeCoordinator {
        &mut self.coordinator
    }

    /// Runs until a shutdown request arrives, then returns the final state.
    ///
    /// Dropping every [`ThemeHandle`] does not end the loop. Some handle
    /// must call [`ThemeHandle::shutdown`].
    pub fn run(mut self) -> ThemeState {
        while !self.coordinator.is_shut_down() {
            self.step();
        }
        self.coordinator.state()
    }

    /// Waits for one message or the settle deadline and processes it.
    pub fn step(&mut self) {
        let received = match self.coordinator.next_deadline() {
            Some(deadline) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                // Timing out means the settle deadline is due.
                self.coordinator.recv_timeout(timeout).ok()
            }
            None => self.coordinator.recv(),
        };

        let now = Instant::now();
        if let Some(inbound) = received {
            self.coordinator.dispatch(inbound, now);
        }
        self.coordinator.poll(now);
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
