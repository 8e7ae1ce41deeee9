//! Physical key events

use chrono::{DateTime, Local};
use std::fmt;

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Press,
    Release,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Press => write!(f, "down"),
            Transition::Release => write!(f, "up"),
        }
    }
}

/// Press or release of a physical key
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Key label as reported by the event source (e.g. "j", "shift", "!")
    pub key: String,
    pub transition: Transition,
    pub timestamp: DateTime<Local>,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, transition: Transition) -> Self {
        Self {
            key: key.into(),
            transition,
            timestamp: Local::now(),
        }
    }

    pub fn press(key: impl Into<String>) -> Self {
        Self::new(key, Transition::Press)
    }

    pub fn release(key: impl Into<String>) -> Self {
        Self::new(key, Transition::Release)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} @ {}",
            self.key,
            self.transition,
            self.timestamp.format("%H:%M:%S%.3f")
        )
    }
}
