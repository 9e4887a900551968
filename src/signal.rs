//! OS color scheme signal.
//!
//! A [`ColorSchemeSignal`] reports the current OS scheme and notifies
//! subscribers when it changes. The coordinator subscribes exactly once and
//! releases the [`SignalSubscription`] on shutdown; after release no
//! further notifications are delivered.
//!
//! - [`ManualSignal`] is driven in-process with [`ManualSignal::emit`].
//! - [`SystemSignal`] polls the OS through [`detect_color_mode`] on a
//!   background thread and notifies on change.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use crate::preference::ColorMode;
use crate::theme::detect_color_mode;

/// Callback invoked with the new scheme on every OS change.
pub type Notify = Box<dyn Fn(ColorMode) + Send>;

/// Source of OS color scheme changes.
pub trait ColorSchemeSignal {
    /// The scheme the OS reports right now.
    fn current(&self) -> ColorMode;

    /// Registers `notify` for change notifications until the returned
    /// handle is released.
    fn subscribe(&mut self, notify: Notify) -> SignalSubscription;
}

/// Handle for a live signal subscription.
///
/// Dropping the handle releases the subscription.
#[must_use = "dropping the handle releases the subscription"]
pub struct SignalSubscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl SignalSubscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the subscription. Calling it again does nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for SignalSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalSubscription")
            .field("active", &self.is_active())
            .finish()
    }
}

struct ManualInner {
    current: ColorMode,
    next_id: u64,
    subscribers: Vec<(u64, Notify)>,
}

/// In-process color scheme signal.
///
/// Clones share state, so a test can keep one clone to emit changes while
/// the coordinator owns another.
///
/// ```rust
/// use themeshift::{ColorMode, ColorSchemeSignal, ManualSignal};
/// use std::sync::mpsc;
///
/// let mut signal = ManualSignal::new(ColorMode::Light);
/// let (tx, rx) = mpsc::channel();
/// let _sub = signal.subscribe(Box::new(move |mode| {
///     let _ = tx.send(mode);
/// }));
///
/// signal.emit(ColorMode::Dark);
/// assert_eq!(rx.try_recv().unwrap(), ColorMode::Dark);
/// ```
#[derive(Clone)]
pub struct ManualSignal {
    inner: Rc<RefCell<ManualInner>>,
}

impl ManualSignal {
    pub fn new(initial: ColorMode) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualInner {
                current: initial,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Sets the current scheme and notifies every live subscriber.
    ///
    /// Subscribers are notified even if the value did not change, the way
    /// a flapping OS signal would.
    pub fn emit(&self, mode: ColorMode) {
        let mut inner = self.inner.borrow_mut();
        inner.current = mode;
        for (_, notify) in &inner.subscribers {
            notify(mode);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl ColorSchemeSignal for ManualSignal {
    fn current(&self) -> ColorMode {
        self.inner.borrow().current
    }

    fn subscribe(&mut self, notify: Notify) -> SignalSubscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, notify));
            id
        };
        let inner = Rc::clone(&self.inner);
        SignalSubscription::new(move || {
            inner.borrow_mut().subscribers.retain(|(sub, _)| *sub != id);
        })
    }
}

impl std::fmt::Debug for ManualSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ManualSignal")
            .field("current", &inner.current)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

/// Stop flag with wake-up, shared between a watcher thread and its handle.
#[derive(Clone, Default)]
struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(|p| p.into_inner());
        *stopped = true;
        cvar.notify_all();
    }

    /// Waits for the stop flag or the timeout. Returns `true` if stopped.
    fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(|p| p.into_inner());
        if *stopped {
            return true;
        }
        match cvar.wait_timeout(stopped, duration) {
            Ok((stopped, _)) => *stopped,
            Err(poisoned) => *poisoned.into_inner().0,
        }
    }
}

/// OS color scheme signal backed by periodic detection.
///
/// Each subscription runs its own watcher thread that re-reads the scheme
/// every `poll_interval` and notifies when it differs from the last value
/// seen. Releasing the subscription stops and joins the thread.
#[derive(Debug, Clone)]
pub struct SystemSignal {
    poll_interval: Duration,
}

impl SystemSignal {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl ColorSchemeSignal for SystemSignal {
    fn current(&self) -> ColorMode {
        detect_color_mode()
    }

    fn subscribe(&mut self, notify: Notify) -> SignalSubscription {
        let stop = StopSignal::default();
        let watcher_stop = stop.clone();
        let interval = self.poll_interval;
        let mut last = detect_color_mode();

        let spawned = thread::Builder::new()
            .name("themeshift-scheme-watch".into())
            .spawn(move || {
                while !watcher_stop.wait_timeout(interval) {
                    let mode = detect_color_mode();
                    if mode != last {
                        tracing::debug!(%mode, "os color scheme changed");
                        last = mode;
                        notify(mode);
                    }
                }
            });

        match spawned {
            Ok(handle) => SignalSubscription::new(move || {
                stop.stop();
                let _ = handle.join();
            }),
            Err(e) => {
                tracing::warn!(error = %e, "failed to start color scheme watcher");
                SignalSubscription::new(|| {})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;

    fn channel_notify() -> (Notify, mpsc::Receiver<ColorMode>) {
        let (tx, rx) = mpsc::channel();
        let notify: Notify = Box::new(move |mode| {
            let _ = tx.send(mode);
        });
        (notify, rx)
    }

    #[test]
    fn test_manual_signal_current() {
        let signal = ManualSignal::new(ColorMode::Dark);
        assert_eq!(signal.current(), ColorMode::Dark);
        signal.emit(ColorMode::Light);
        assert_eq!(signal.current(), ColorMode::Light);
    }

    #[test]
    fn test_manual_signal_notifies_until_released() {
        let mut signal = ManualSignal::new(ColorMode::Light);
        let (notify, rx) = channel_notify();
        let mut sub = signal.subscribe(notify);
        assert_eq!(signal.subscriber_count(), 1);

        signal.emit(ColorMode::Dark);
        assert_eq!(rx.try_recv().unwrap(), ColorMode::Dark);

        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(signal.subscriber_count(), 0);

        signal.emit(ColorMode::Light);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let mut signal = ManualSignal::new(ColorMode::Light);
        let (notify, _rx) = channel_notify();
        {
            let _sub = signal.subscribe(notify);
            assert_eq!(signal.subscriber_count(), 1);
        }
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_twice_is_harmless() {
        let mut signal = ManualSignal::new(ColorMode::Light);
        let (a, _ra) = channel_notify();
        let (b, rb) = channel_notify();
        let mut first = signal.subscribe(a);
        let _second = signal.subscribe(b);

        first.unsubscribe();
        first.unsubscribe();
        assert_eq!(signal.subscriber_count(), 1);

        signal.emit(ColorMode::Dark);
        assert_eq!(rb.try_recv().unwrap(), ColorMode::Dark);
    }

    static FLIPPED: AtomicBool = AtomicBool::new(false);

    fn flipping_detector() -> ColorMode {
        if FLIPPED.load(Ordering::SeqCst) {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    #[test]
    #[serial]
    fn test_system_signal_reports_detector_changes() {
        use crate::theme::{reset_scheme_detector, set_scheme_detector};

        FLIPPED.store(false, Ordering::SeqCst);
        set_scheme_detector(flipping_detector);

        let mut signal = SystemSignal::new(Duration::from_millis(5));
        assert_eq!(signal.current(), ColorMode::Light);

        let (notify, rx) = channel_notify();
        let mut sub = signal.subscribe(notify);

        FLIPPED.store(true, Ordering::SeqCst);
        let mode = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(mode, ColorMode::Dark);

        sub.unsubscribe();
        reset_scheme_detector();
    }
}
