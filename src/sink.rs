//! Style application side effect.

use std::cell::RefCell;
use std::rc::Rc;

use crate::preference::ColorMode;
use crate::theme::StyleSnapshot;

/// Applies a [`StyleSnapshot`] to whatever renders the application.
///
/// Only the coordinator calls this: once at startup and once per
/// transition. Implementations are expected to finish well within the
/// settle delay.
pub trait StyleSink {
    fn apply(&mut self, mode: ColorMode, snapshot: &StyleSnapshot);
}

impl<F> StyleSink for F
where
    F: FnMut(ColorMode, &StyleSnapshot),
{
    fn apply(&mut self, mode: ColorMode, snapshot: &StyleSnapshot) {
        self(mode, snapshot)
    }
}

/// Sink that records every application, for hosts that render lazily and
/// for tests. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    applied: Rc<RefCell<Vec<(ColorMode, StyleSnapshot)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modes applied so far, oldest first.
    pub fn modes(&self) -> Vec<ColorMode> {
        self.applied.borrow().iter().map(|(mode, _)| *mode).collect()
    }

    /// The most recently applied snapshot.
    pub fn last(&self) -> Option<(ColorMode, StyleSnapshot)> {
        self.applied.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.applied.borrow().len()
    }
}

impl StyleSink for RecordingSink {
    fn apply(&mut self, mode: ColorMode, snapshot: &StyleSnapshot) {
        self.applied.borrow_mut().push((mode, snapshot.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_shares_history() {
        let mut sink = RecordingSink::new();
        let view = sink.clone();
        let snapshot = StyleSnapshot::new().set("--bg-primary", "#1f2937");

        sink.apply(ColorMode::Dark, &snapshot);
        sink.apply(ColorMode::Light, &StyleSnapshot::new());

        assert_eq!(view.count(), 2);
        assert_eq!(view.modes(), vec![ColorMode::Dark, ColorMode::Light]);
        assert_eq!(view.last().map(|(mode, _)| mode), Some(ColorMode::Light));
    }

    #[test]
    fn test_closure_is_a_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |mode: ColorMode, _: &StyleSnapshot| seen.push(mode);
            sink.apply(ColorMode::Dark, &StyleSnapshot::new());
        }
        assert_eq!(seen, vec![ColorMode::Dark]);
    }
}
