//! Key mapper
//!
//! Owns the mutable engine state and turns one [`KeyEvent`] at a time into
//! pad output:
//!
//! ```text
//! KeyEvent ──deshift──▶ binding lookup ──▶ ActiveKeyState ──▶ OutputResolver ──▶ sink.commit()
//!                                               ▲                   │
//!                                               └──── SwapTable ◀───┘ (press override)
//! ```
//!
//! The mapper is synchronous and driven through `&mut self`. Hosts with several
//! producers go through [`crate::queue::EngineQueue`].

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

use crate::bindings::KeyBindingTable;
use crate::input::{deshift, KeyEvent, Transition};
use crate::pad::ControllerSink;
use crate::resolve::OutputResolver;
use crate::state::ActiveKeyState;
use crate::swap::{SwapCollision, SwapTable};
use crate::tuning::AnalogTuning;
use crate::vkey::Vkey;

/// Engine failures
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MapperError {
    /// A press tried to swap a vkey that already has an outstanding swap
    #[error("swap invariant violated: {original} is already swapped to {existing}")]
    SwapInvariantViolation { original: Vkey, existing: Vkey },
}

impl From<SwapCollision> for MapperError {
    fn from(c: SwapCollision) -> Self {
        Self::SwapInvariantViolation {
            original: c.original,
            existing: c.existing,
        }
    }
}

/// Why an event produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No binding for the key label
    UnboundKey,
    /// Press of a key that is already down (OS autorepeat)
    Repeat,
    /// Release of a key that is not down
    RedundantRelease,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::UnboundKey => write!(f, "unbound key"),
            IgnoreReason::Repeat => write!(f, "autorepeat"),
            IgnoreReason::RedundantRelease => write!(f, "key not held"),
        }
    }
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed and the sink was committed. `swapped_to` is set when the
    /// bound vkey was retargeted (on press) or a swap was retired (on release).
    Applied {
        vkey: Vkey,
        swapped_to: Option<Vkey>,
    },
    Ignored(IgnoreReason),
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventOutcome::Applied {
                vkey,
                swapped_to: Some(target),
            } => write!(f, "{} → {}", vkey, target),
            EventOutcome::Applied { vkey, .. } => write!(f, "{}", vkey),
            EventOutcome::Ignored(reason) => write!(f, "ignored ({})", reason),
        }
    }
}

/// Keyboard → virtual pad engine
#[derive(Debug, Clone)]
pub struct KeyMapper {
    bindings: KeyBindingTable,
    resolver: OutputResolver,
    state: ActiveKeyState,
    swaps: SwapTable,
    /// Physical keys currently down, with the vkey each one activated
    held: HashMap<String, Vkey>,
}

impl Default for KeyMapper {
    fn default() -> Self {
        Self::new(KeyBindingTable::default_layout(), AnalogTuning::default())
    }
}

impl KeyMapper {
    pub fn new(bindings: KeyBindingTable, tuning: AnalogTuning) -> Self {
        Self {
            bindings,
            resolver: OutputResolver::new(tuning),
            state: ActiveKeyState::new(),
            swaps: SwapTable::new(),
            held: HashMap::new(),
        }
    }

    /// Active vkeys
    pub fn state(&self) -> &ActiveKeyState {
        &self.state
    }

    pub fn swaps(&self) -> &SwapTable {
        &self.swaps
    }

    /// Physical key labels currently down, sorted
    pub fn held_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.held.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Process one key event, emitting into `sink`
    pub fn handle_event(
        &mut self,
        event: &KeyEvent,
        sink: &mut dyn ControllerSink,
    ) -> Result<EventOutcome, MapperError> {
        let label = deshift(&event.key);

        let Some(vkey) = self.bindings.get(&label) else {
            trace!("Ignoring unbound key '{}'", event.key);
            return Ok(EventOutcome::Ignored(IgnoreReason::UnboundKey));
        };

        let outcome = match event.transition {
            Transition::Press => {
                if self.held.contains_key(&label) {
                    trace!("Ignoring autorepeat of '{}'", label);
                    return Ok(EventOutcome::Ignored(IgnoreReason::Repeat));
                }
                self.press(label, vkey, sink)?
            }
            Transition::Release => {
                let Some(activated) = self.held.remove(&label) else {
                    debug!("Ignoring release of '{}' (not held)", label);
                    return Ok(EventOutcome::Ignored(IgnoreReason::RedundantRelease));
                };
                self.release(vkey, activated, sink)
            }
        };

        sink.commit();
        debug!("{} {} → {} | held {}", event.transition, event.key, outcome, self.state);
        Ok(outcome)
    }

    fn press(
        &mut self,
        label: String,
        vkey: Vkey,
        sink: &mut dyn ControllerSink,
    ) -> Result<EventOutcome, MapperError> {
        let was_active = self.state.contains(vkey);
        self.state.add(vkey);

        let Some(target) = self
            .resolver
            .resolve(vkey, Transition::Press, &self.state, sink)
        else {
            self.held.insert(label, vkey);
            return Ok(EventOutcome::Applied {
                vkey,
                swapped_to: None,
            });
        };

        if let Err(collision) = self.swaps.record(vkey, target) {
            if !was_active {
                self.state.remove(vkey);
            }
            return Err(collision.into());
        }

        if !was_active {
            self.state.remove(vkey);
        }
        self.state.add(target);
        self.held.insert(label, target);
        self.resolver
            .resolve(target, Transition::Press, &self.state, sink);

        Ok(EventOutcome::Applied {
            vkey,
            swapped_to: Some(target),
        })
    }

    fn release(&mut self, vkey: Vkey, activated: Vkey, sink: &mut dyn ControllerSink) -> EventOutcome {
        let swapped_to = if activated != vkey {
            self.swaps.take(vkey);
            Some(activated)
        } else {
            None
        };

        // Another physical key may still hold the same vkey
        if !self.held.values().any(|v| *v == activated) {
            self.state.remove(activated);
        }
        self.resolver
            .resolve(activated, Transition::Release, &self.state, sink);

        EventOutcome::Applied { vkey, swapped_to }
    }
}
