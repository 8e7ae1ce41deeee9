//! Output resolution
//!
//! After every state mutation the engine resolves the vkey that changed.
//! Resolving never updates outputs incrementally: each affected output is
//! recomputed from the whole [`ActiveKeyState`], so pad state is always a
//! pure function of the held set.
//!
//! # Per-kind behavior
//!
//! ```text
//! Button    ──► set_button(held) ──► main stick
//! Trigger   ──► set_trigger(max held amount on that side) ──► main stick
//! Mod1      ──► main stick
//! CStick    ──► c stick
//! MainStick ──► main stick
//! ```
//!
//! Buttons and triggers always re-derive the main stick as well, since the
//! main stick gain depends on held triggers, Mod1, and (for up-tilt) A.
//!
//! # Main stick blend
//!
//! 1. Pick the gain: a held trigger's gain (its modified gain when Mod1 is
//!    also held), else the Mod1 gain (up-tilt gain for Mod1 + A + up without
//!    down), else 1.0.
//! 2. Apply the gain to every held direction and overlay the results.
//! 3. Clamp to the unit circle.

use tracing::{debug, trace};

use crate::geometry::{Coord, Gain};
use crate::input::Transition;
use crate::pad::{ControllerSink, PadStick, PadTrigger};
use crate::state::ActiveKeyState;
use crate::tuning::AnalogTuning;
use crate::vkey::{Vkey, VkeyKind};

/// Vkeys whose presence means "up-tilt": Mod1 + A + up
const UPTILT_REQUIRED: [Vkey; 3] = [Vkey::Mod1, Vkey::A, Vkey::StickU];
/// Vkeys that cancel up-tilt
const UPTILT_EXCLUDED: [Vkey; 1] = [Vkey::StickD];

/// Recomputes pad outputs from the active key state
#[derive(Debug, Clone, Default)]
pub struct OutputResolver {
    tuning: AnalogTuning,
}

impl OutputResolver {
    pub fn new(tuning: AnalogTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &AnalogTuning {
        &self.tuning
    }

    /// Resolve a vkey after `state` was mutated for it.
    ///
    /// Returns an override vkey when a press must be retargeted (B while Mod1
    /// is held becomes A). In that case nothing is emitted for `vkey`; the
    /// caller swaps the state and resolves the override instead.
    pub fn resolve(
        &self,
        vkey: Vkey,
        transition: Transition,
        state: &ActiveKeyState,
        sink: &mut dyn ControllerSink,
    ) -> Option<Vkey> {
        match vkey.kind() {
            VkeyKind::Button => {
                if let Some(target) = self.button_override(vkey, transition, state) {
                    debug!("Retargeting {} → {} (Mod1 held)", vkey, target);
                    return Some(target);
                }
                if let Some(button) = vkey.pad_button() {
                    sink.set_button(button, state.contains(vkey));
                }
                self.emit_main_stick(state, sink);
            }
            VkeyKind::Trigger => {
                if let Some(trigger) = vkey.pad_trigger() {
                    sink.set_trigger(trigger, self.trigger_value(trigger, state));
                }
                self.emit_main_stick(state, sink);
            }
            VkeyKind::Modifier | VkeyKind::MainStick => self.emit_main_stick(state, sink),
            VkeyKind::CStick => self.emit_c_stick(state, sink),
        }
        None
    }

    /// Press-time retarget rule: B with Mod1 held presses A instead
    fn button_override(
        &self,
        vkey: Vkey,
        transition: Transition,
        state: &ActiveKeyState,
    ) -> Option<Vkey> {
        match (vkey, transition) {
            (Vkey::B, Transition::Press) if state.contains(Vkey::Mod1) => Some(Vkey::A),
            _ => None,
        }
    }

    /// Trigger output: the largest amount among held triggers on that side
    pub fn trigger_value(&self, trigger: PadTrigger, state: &ActiveKeyState) -> f32 {
        state
            .all_of_kind(&[VkeyKind::Trigger])
            .filter(|v| v.pad_trigger() == Some(trigger))
            .filter_map(|v| self.tuning.trigger(v))
            .map(|t| t.amount)
            .fold(0.0, f32::max)
    }

    /// Gain applied to main stick directions
    pub fn main_stick_gain(&self, state: &ActiveKeyState) -> Gain {
        let modifier_held = state.contains(Vkey::Mod1);

        let mut held = state.all_of_kind(&[VkeyKind::Trigger]);
        // Last held trigger in catalog order wins
        if let Some(trigger) = held.clone().last() {
            if held.nth(1).is_some() {
                debug!(
                    "Several triggers held ({}), using {} for main stick gain",
                    state, trigger
                );
            }
            if let Some(t) = self.tuning.trigger(trigger) {
                return if modifier_held { t.modified_gain } else { t.gain };
            }
        }

        if modifier_held {
            if state.has(&UPTILT_REQUIRED, &UPTILT_EXCLUDED) {
                return self.tuning.modifier.uptilt_gain;
            }
            return self.tuning.modifier.gain;
        }

        Gain::UNIT
    }

    /// Main stick position for the current state
    pub fn main_stick(&self, state: &ActiveKeyState) -> Coord {
        let gain = self.main_stick_gain(state);
        state
            .all_of_kind(&[VkeyKind::MainStick])
            .filter_map(Vkey::direction)
            .map(|dir| gain.apply(dir))
            .fold(Coord::ZERO, |acc, c| acc | c)
            .clamp_to_unit_circle()
    }

    /// C stick position for the current state
    pub fn c_stick(&self, state: &ActiveKeyState) -> Coord {
        state
            .all_of_kind(&[VkeyKind::CStick])
            .filter_map(Vkey::direction)
            .fold(Coord::ZERO, |acc, c| acc | c)
            .clamp_to_unit_circle()
    }

    fn emit_main_stick(&self, state: &ActiveKeyState, sink: &mut dyn ControllerSink) {
        let pos = self.main_stick(state);
        trace!("Main stick {} from {}", pos, state);
        sink.set_stick(PadStick::Main, pos);
    }

    fn emit_c_stick(&self, state: &ActiveKeyState, sink: &mut dyn ControllerSink) {
        let pos = self.c_stick(state);
        trace!("C stick {} from {}", pos, state);
        sink.set_stick(PadStick::C, pos);
    }
}
