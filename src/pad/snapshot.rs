//! Recording sink
//!
//! Keeps the pending and last committed pad state, plus (when recording)
//! every output operation in order. Tests use the recording sink; hosts that
//! poll pad state instead of receiving pushes use [`SnapshotSink::polling`],
//! which keeps no operation log.

use super::{ControllerSink, PadButton, PadSnapshot, PadStick, PadTrigger};

/// A single sink operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadOp {
    Button(PadButton, bool),
    StickX(PadStick, f32),
    StickY(PadStick, f32),
    Trigger(PadTrigger, f32),
    Commit,
}

/// Sink that records operations and committed snapshots
#[derive(Debug)]
pub struct SnapshotSink {
    ops: Vec<PadOp>,
    recording: bool,
    pending: PadSnapshot,
    committed: PadSnapshot,
    commit_count: u64,
}

impl Default for SnapshotSink {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            recording: true,
            pending: PadSnapshot::default(),
            committed: PadSnapshot::default(),
            commit_count: 0,
        }
    }
}

impl SnapshotSink {
    /// Sink that records every operation
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that only tracks pad state
    pub fn polling() -> Self {
        Self {
            recording: false,
            ..Self::default()
        }
    }

    fn record(&mut self, op: PadOp) {
        if self.recording {
            self.ops.push(op);
        }
    }

    /// Every operation since creation (or the last [`SnapshotSink::clear_ops`])
    pub fn ops(&self) -> &[PadOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Pad state as of the last commit
    pub fn committed(&self) -> &PadSnapshot {
        &self.committed
    }

    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }
}

impl ControllerSink for SnapshotSink {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn set_button(&mut self, button: PadButton, pressed: bool) {
        self.record(PadOp::Button(button, pressed));
        self.pending.set_button(button, pressed);
    }

    fn set_stick_x(&mut self, stick: PadStick, x: f32) {
        self.record(PadOp::StickX(stick, x));
        self.pending.set_stick_x(stick, x);
    }

    fn set_stick_y(&mut self, stick: PadStick, y: f32) {
        self.record(PadOp::StickY(stick, y));
        self.pending.set_stick_y(stick, y);
    }

    fn set_trigger(&mut self, trigger: PadTrigger, value: f32) {
        self.record(PadOp::Trigger(trigger, value));
        self.pending.set_trigger(trigger, value);
    }

    fn commit(&mut self) {
        self.record(PadOp::Commit);
        self.committed = self.pending.clone();
        self.commit_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_publishes_pending() {
        let mut sink = SnapshotSink::new();
        sink.set_trigger(PadTrigger::Right, 0.7);
        assert_eq!(sink.committed().right_trigger, 0.0);

        sink.commit();
        assert_eq!(sink.committed().right_trigger, 0.7);
        assert_eq!(sink.commit_count(), 1);
        assert_eq!(
            sink.ops(),
            &[PadOp::Trigger(PadTrigger::Right, 0.7), PadOp::Commit]
        );

        sink.clear_ops();
        assert!(sink.ops().is_empty());
        assert_eq!(sink.committed().right_trigger, 0.7);
    }

    #[test]
    fn test_polling_sink_keeps_no_log() {
        let mut sink = SnapshotSink::polling();
        for _ in 0..100 {
            sink.set_button(PadButton::A, true);
            sink.set_stick_x(PadStick::Main, -1.0);
            sink.commit();
        }

        assert!(sink.ops().is_empty());
        assert_eq!(sink.commit_count(), 100);
        assert!(sink.committed().is_pressed(PadButton::A));
        assert_eq!(sink.committed().stick(PadStick::Main).x, -1.0);
    }
}
