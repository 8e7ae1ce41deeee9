//! Console sink - logs all pad output for testing and debugging
//!
//! Useful for:
//! - Trying bindings and tuning without a virtual pad driver installed
//! - Watching the exact outputs each key event produces
//! - Driving the REPL and script replay

use tokio::sync::watch;
use tracing::{debug, info, trace};

use super::{ControllerSink, PadButton, PadSnapshot, PadStick, PadTrigger};

/// ConsoleSink applies outputs to an in-memory pad and logs each commit
pub struct ConsoleSink {
    name: String,
    pad: PadSnapshot,
    /// Outputs set since the last commit
    pending: usize,
    commit_count: u64,
    publisher: Option<watch::Sender<PadSnapshot>>,
}

impl ConsoleSink {
    /// Create a new ConsoleSink with a given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pad: PadSnapshot::default(),
            pending: 0,
            commit_count: 0,
            publisher: None,
        }
    }

    /// Publish every committed pad state to a watch channel
    pub fn with_publisher(mut self, publisher: watch::Sender<PadSnapshot>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Current pad state (including uncommitted outputs)
    pub fn pad(&self) -> &PadSnapshot {
        &self.pad
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }
}

impl ControllerSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_button(&mut self, button: PadButton, pressed: bool) {
        trace!(sink = %self.name, ?button, pressed, "set_button");
        self.pad.set_button(button, pressed);
        self.pending += 1;
    }

    fn set_stick_x(&mut self, stick: PadStick, x: f32) {
        trace!(sink = %self.name, ?stick, x, "set_stick_x");
        self.pad.set_stick_x(stick, x);
        self.pending += 1;
    }

    fn set_stick_y(&mut self, stick: PadStick, y: f32) {
        trace!(sink = %self.name, ?stick, y, "set_stick_y");
        self.pad.set_stick_y(stick, y);
        self.pending += 1;
    }

    fn set_trigger(&mut self, trigger: PadTrigger, value: f32) {
        trace!(sink = %self.name, ?trigger, value, "set_trigger");
        self.pad.set_trigger(trigger, value);
        self.pending += 1;
    }

    fn commit(&mut self) {
        self.commit_count += 1;
        info!(
            "🎮 [{}] {} → {} [commit #{}, {} outputs]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            self.pad,
            self.commit_count,
            self.pending
        );
        self.pending = 0;

        if let Some(publisher) = &self.publisher {
            // send_replace never fails, even with no receivers left
            publisher.send_replace(self.pad.clone());
        } else {
            debug!("ConsoleSink '{}' has no publisher", self.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coord;

    #[test]
    fn test_console_sink_tracks_pad() {
        let mut sink = ConsoleSink::new("test");
        assert_eq!(sink.name(), "test");

        sink.set_button(PadButton::X, true);
        sink.set_stick(PadStick::Main, Coord::new(0.0, 1.0));
        sink.set_trigger(PadTrigger::Left, 1.0);
        sink.commit();

        assert!(sink.pad().is_pressed(PadButton::X));
        assert_eq!(sink.pad().main_stick, Coord::UP);
        assert_eq!(sink.pad().left_trigger, 1.0);
        assert_eq!(sink.commit_count(), 1);
    }

    #[test]
    fn test_console_sink_publishes_on_commit() {
        let (tx, rx) = watch::channel(PadSnapshot::default());
        let mut sink = ConsoleSink::new("published").with_publisher(tx);

        sink.set_button(PadButton::Start, true);
        // Not visible before commit
        assert!(rx.borrow().buttons.is_empty());

        sink.commit();
        assert!(rx.borrow().is_pressed(PadButton::Start));
    }
}
