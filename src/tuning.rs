//! Analog tuning for triggers and the modifier
//!
//! Defaults reproduce the reference Melee layout. Every value can be
//! overridden from the `tuning:` section of the YAML config.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, Gain};
use crate::vkey::Vkey;

/// Per-trigger tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TriggerTuning {
    /// Analog value sent while held (0.0..=1.0)
    pub amount: f32,
    /// Main stick gain while held
    pub gain: Gain,
    /// Main stick gain while held together with Mod1
    pub modified_gain: Gain,
}

/// Modifier (Mod1) tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ModifierTuning {
    /// Main stick gain while Mod1 is held without a trigger
    #[serde(default = "default_modifier_gain")]
    pub gain: Gain,
    /// Gain for the up-tilt posture (Mod1 + A + up, not down)
    #[serde(default = "default_uptilt_gain")]
    pub uptilt_gain: Gain,
}

impl Default for ModifierTuning {
    fn default() -> Self {
        Self {
            gain: default_modifier_gain(),
            uptilt_gain: default_uptilt_gain(),
        }
    }
}

/// All analog constants used by output resolution
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AnalogTuning {
    #[serde(default = "default_trigger_l")]
    pub trigger_l: TriggerTuning,
    #[serde(default = "default_trigger_r")]
    pub trigger_r: TriggerTuning,
    #[serde(default = "default_trigger_r2")]
    pub trigger_r2: TriggerTuning,
    #[serde(default)]
    pub modifier: ModifierTuning,
}

impl Default for AnalogTuning {
    fn default() -> Self {
        Self {
            trigger_l: default_trigger_l(),
            trigger_r: default_trigger_r(),
            trigger_r2: default_trigger_r2(),
            modifier: ModifierTuning::default(),
        }
    }
}

impl AnalogTuning {
    /// Tuning of a trigger vkey, `None` for every other vkey
    pub fn trigger(&self, vkey: Vkey) -> Option<&TriggerTuning> {
        match vkey {
            Vkey::TriggerL => Some(&self.trigger_l),
            Vkey::TriggerR => Some(&self.trigger_r),
            Vkey::TriggerR2 => Some(&self.trigger_r2),
            _ => None,
        }
    }

    /// Check amounts are in range and gains are finite
    pub fn validate(&self) -> Result<()> {
        for vkey in [Vkey::TriggerL, Vkey::TriggerR, Vkey::TriggerR2] {
            let Some(t) = self.trigger(vkey) else { continue };
            if !(0.0..=1.0).contains(&t.amount) {
                anyhow::bail!("{} amount {} is invalid (must be 0.0-1.0)", vkey, t.amount);
            }
            if !t.gain.is_finite() || !t.modified_gain.is_finite() {
                anyhow::bail!("{} gain must be finite", vkey);
            }
        }
        if !self.modifier.gain.is_finite() || !self.modifier.uptilt_gain.is_finite() {
            anyhow::bail!("Mod1 gain must be finite");
        }
        Ok(())
    }
}

// Default value functions
fn default_trigger_l() -> TriggerTuning {
    TriggerTuning {
        amount: 1.0,
        gain: Gain::Scalar(1.0),
        modified_gain: Gain::Pairwise(Coord::new(0.15, 0.9)),
    }
}
fn default_trigger_r() -> TriggerTuning {
    TriggerTuning {
        amount: 0.7,
        gain: Gain::Pairwise(Coord::new(0.9, 0.2875)),
        modified_gain: Gain::Pairwise(Coord::new(0.2875, 0.9)),
    }
}
fn default_trigger_r2() -> TriggerTuning {
    TriggerTuning {
        amount: 1.0,
        gain: Gain::Pairwise(Coord::new(0.75, 0.4)),
        modified_gain: Gain::Pairwise(Coord::new(0.9, 0.2875)),
    }
}
fn default_modifier_gain() -> Gain { Gain::Pairwise(Coord::new(0.35, 0.39)) }
fn default_uptilt_gain() -> Gain { Gain::Pairwise(Coord::new(0.0, 0.4)) }
