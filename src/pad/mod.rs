//! Virtual controller sinks
//!
//! The engine never talks to a pad driver directly. Every output goes through
//! a [`ControllerSink`] passed in by the caller, and each processed key event
//! ends with exactly one [`ControllerSink::commit`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::geometry::Coord;

pub mod console;
pub mod snapshot;

pub use console::ConsoleSink;
pub use snapshot::SnapshotSink;

/// Digital pad button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadButton {
    Start,
    A,
    B,
    X,
    Y,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

/// Analog stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadStick {
    /// Main stick (left joystick)
    Main,
    /// C stick (right joystick)
    C,
}

/// Analog trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadTrigger {
    Left,
    Right,
}

/// Controller sink - anything that can surface pad state to an application
///
/// Set operations within one commit batch are idempotent and order
/// insensitive; only the last value per output matters.
pub trait ControllerSink: Send {
    /// Sink name for logs
    fn name(&self) -> &str;

    fn set_button(&mut self, button: PadButton, pressed: bool);

    /// Stick X in [-1.0, 1.0]
    fn set_stick_x(&mut self, stick: PadStick, x: f32);

    /// Stick Y in [-1.0, 1.0]
    fn set_stick_y(&mut self, stick: PadStick, y: f32);

    /// Trigger value in [0.0, 1.0]
    fn set_trigger(&mut self, trigger: PadTrigger, value: f32);

    /// Flush everything set since the previous commit as one update
    fn commit(&mut self);

    /// Set both stick axes
    fn set_stick(&mut self, stick: PadStick, pos: Coord) {
        self.set_stick_x(stick, pos.x);
        self.set_stick_y(stick, pos.y);
    }
}

/// Full pad state as seen by a sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PadSnapshot {
    pub buttons: BTreeSet<PadButton>,
    pub main_stick: Coord,
    pub c_stick: Coord,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl PadSnapshot {
    pub fn is_pressed(&self, button: PadButton) -> bool {
        self.buttons.contains(&button)
    }

    pub fn stick(&self, stick: PadStick) -> Coord {
        match stick {
            PadStick::Main => self.main_stick,
            PadStick::C => self.c_stick,
        }
    }

    pub fn trigger(&self, trigger: PadTrigger) -> f32 {
        match trigger {
            PadTrigger::Left => self.left_trigger,
            PadTrigger::Right => self.right_trigger,
        }
    }

    pub fn set_button(&mut self, button: PadButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    fn stick_mut(&mut self, stick: PadStick) -> &mut Coord {
        match stick {
            PadStick::Main => &mut self.main_stick,
            PadStick::C => &mut self.c_stick,
        }
    }

    pub fn set_stick_x(&mut self, stick: PadStick, x: f32) {
        self.stick_mut(stick).x = x;
    }

    pub fn set_stick_y(&mut self, stick: PadStick, y: f32) {
        self.stick_mut(stick).y = y;
    }

    pub fn set_trigger(&mut self, trigger: PadTrigger, value: f32) {
        match trigger {
            PadTrigger::Left => self.left_trigger = value,
            PadTrigger::Right => self.right_trigger = value,
        }
    }
}

impl fmt::Display for PadSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buttons: Vec<String> = self.buttons.iter().map(|b| format!("{:?}", b)).collect();
        write!(
            f,
            "buttons=[{}] main={} c={} lt={:.3} rt={:.3}",
            buttons.join(" "),
            self.main_stick,
            self.c_stick,
            self.left_trigger,
            self.right_trigger
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_setters() {
        let mut pad = PadSnapshot::default();
        pad.set_button(PadButton::A, true);
        pad.set_stick_x(PadStick::Main, -0.5);
        pad.set_stick_y(PadStick::C, 1.0);
        pad.set_trigger(PadTrigger::Right, 0.7);

        assert!(pad.is_pressed(PadButton::A));
        assert_eq!(pad.stick(PadStick::Main), Coord::new(-0.5, 0.0));
        assert_eq!(pad.stick(PadStick::C), Coord::new(0.0, 1.0));
        assert_eq!(pad.trigger(PadTrigger::Right), 0.7);
        assert_eq!(pad.trigger(PadTrigger::Left), 0.0);

        pad.set_button(PadButton::A, false);
        assert!(pad.buttons.is_empty());
    }

    #[test]
    fn test_snapshot_display() {
        let mut pad = PadSnapshot::default();
        pad.set_button(PadButton::RightShoulder, true);
        assert_eq!(
            pad.to_string(),
            "buttons=[RightShoulder] main=(0.000, 0.000) c=(0.000, 0.000) lt=0.000 rt=0.000"
        );
    }
}
