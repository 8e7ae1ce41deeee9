//! Virtual key catalog
//!
//! A vkey is what a physical key is bound to: a pad button, one direction of
//! a stick, a trigger, or the modifier. The catalog is closed and small, so
//! vkeys are plain `Copy` enum values and the active state can be a bitset
//! indexed by [`Vkey::index`].
//!
//! Catalog order (the order of [`Vkey::ALL`]) is significant: every place
//! that folds over several held vkeys walks them in this order, which makes
//! outputs a function of the held set alone.

use crate::geometry::Coord;
use crate::pad::{PadButton, PadStick, PadTrigger};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of a vkey, deciding how it is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VkeyKind {
    /// Digital pad button (face buttons, Start, Z, D-pad)
    Button,
    /// One direction of the main (left) stick
    MainStick,
    /// One direction of the C (right) stick
    CStick,
    /// Analog trigger with a fixed pressed amount
    Trigger,
    /// Held-only modifier reshaping other outputs
    Modifier,
}

/// Virtual key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vkey {
    Start,
    A,
    B,
    X,
    Y,
    Z,
    DUp,
    DDown,
    DLeft,
    DRight,
    StickL,
    StickR,
    StickU,
    StickD,
    CStickL,
    CStickR,
    CStickU,
    CStickD,
    TriggerL,
    TriggerR,
    TriggerR2,
    Mod1,
}

impl Vkey {
    /// Every vkey, in catalog order
    pub const ALL: [Vkey; 22] = [
        Vkey::Start,
        Vkey::A,
        Vkey::B,
        Vkey::X,
        Vkey::Y,
        Vkey::Z,
        Vkey::DUp,
        Vkey::DDown,
        Vkey::DLeft,
        Vkey::DRight,
        Vkey::StickL,
        Vkey::StickR,
        Vkey::StickU,
        Vkey::StickD,
        Vkey::CStickL,
        Vkey::CStickR,
        Vkey::CStickU,
        Vkey::CStickD,
        Vkey::TriggerL,
        Vkey::TriggerR,
        Vkey::TriggerR2,
        Vkey::Mod1,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`Vkey::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> VkeyKind {
        match self {
            Vkey::Start
            | Vkey::A
            | Vkey::B
            | Vkey::X
            | Vkey::Y
            | Vkey::Z
            | Vkey::DUp
            | Vkey::DDown
            | Vkey::DLeft
            | Vkey::DRight => VkeyKind::Button,
            Vkey::StickL | Vkey::StickR | Vkey::StickU | Vkey::StickD => VkeyKind::MainStick,
            Vkey::CStickL | Vkey::CStickR | Vkey::CStickU | Vkey::CStickD => VkeyKind::CStick,
            Vkey::TriggerL | Vkey::TriggerR | Vkey::TriggerR2 => VkeyKind::Trigger,
            Vkey::Mod1 => VkeyKind::Modifier,
        }
    }

    /// Catalog name, as used in binding tables
    pub fn name(self) -> &'static str {
        match self {
            Vkey::Start => "Start",
            Vkey::A => "A",
            Vkey::B => "B",
            Vkey::X => "X",
            Vkey::Y => "Y",
            Vkey::Z => "Z",
            Vkey::DUp => "DUp",
            Vkey::DDown => "DDown",
            Vkey::DLeft => "DLeft",
            Vkey::DRight => "DRight",
            Vkey::StickL => "StickL",
            Vkey::StickR => "StickR",
            Vkey::StickU => "StickU",
            Vkey::StickD => "StickD",
            Vkey::CStickL => "CStickL",
            Vkey::CStickR => "CStickR",
            Vkey::CStickU => "CStickU",
            Vkey::CStickD => "CStickD",
            Vkey::TriggerL => "TriggerL",
            Vkey::TriggerR => "TriggerR",
            Vkey::TriggerR2 => "TriggerR2",
            Vkey::Mod1 => "Mod1",
        }
    }

    /// Unit direction of a stick vkey
    pub fn direction(self) -> Option<Coord> {
        match self {
            Vkey::StickL | Vkey::CStickL => Some(Coord::LEFT),
            Vkey::StickR | Vkey::CStickR => Some(Coord::RIGHT),
            Vkey::StickU | Vkey::CStickU => Some(Coord::UP),
            Vkey::StickD | Vkey::CStickD => Some(Coord::DOWN),
            _ => None,
        }
    }

    /// Stick a direction vkey belongs to
    pub fn stick(self) -> Option<PadStick> {
        match self.kind() {
            VkeyKind::MainStick => Some(PadStick::Main),
            VkeyKind::CStick => Some(PadStick::C),
            _ => None,
        }
    }

    /// Pad button driven by a button vkey
    pub fn pad_button(self) -> Option<PadButton> {
        match self {
            Vkey::Start => Some(PadButton::Start),
            Vkey::A => Some(PadButton::A),
            Vkey::B => Some(PadButton::B),
            Vkey::X => Some(PadButton::X),
            Vkey::Y => Some(PadButton::Y),
            Vkey::Z => Some(PadButton::RightShoulder),
            Vkey::DUp => Some(PadButton::DpadUp),
            Vkey::DDown => Some(PadButton::DpadDown),
            Vkey::DLeft => Some(PadButton::DpadLeft),
            Vkey::DRight => Some(PadButton::DpadRight),
            _ => None,
        }
    }

    /// Pad trigger driven by a trigger vkey
    pub fn pad_trigger(self) -> Option<PadTrigger> {
        match self {
            Vkey::TriggerL => Some(PadTrigger::Left),
            Vkey::TriggerR | Vkey::TriggerR2 => Some(PadTrigger::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Vkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown vkey name
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown vkey '{0}'")]
pub struct VkeyParseError(pub String);

impl FromStr for Vkey {
    type Err = VkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Vkey::ALL
            .iter()
            .copied()
            .find(|v| v.name() == s)
            .ok_or_else(|| VkeyParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_catalog_order() {
        for (i, v) in Vkey::ALL.iter().enumerate() {
            assert_eq!(v.index(), i, "{} out of place", v);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for v in Vkey::ALL {
            assert_eq!(v.name().parse::<Vkey>(), Ok(v));
        }
        assert_eq!(
            "Mod2".parse::<Vkey>(),
            Err(VkeyParseError("Mod2".to_string()))
        );
        // Names are case sensitive, like the binding table
        assert!("stickU".parse::<Vkey>().is_err());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Vkey::Z.kind(), VkeyKind::Button);
        assert_eq!(Vkey::DLeft.kind(), VkeyKind::Button);
        assert_eq!(Vkey::StickD.kind(), VkeyKind::MainStick);
        assert_eq!(Vkey::CStickU.kind(), VkeyKind::CStick);
        assert_eq!(Vkey::TriggerR2.kind(), VkeyKind::Trigger);
        assert_eq!(Vkey::Mod1.kind(), VkeyKind::Modifier);
    }

    #[test]
    fn test_each_stick_has_four_directions() {
        for stick in [PadStick::Main, PadStick::C] {
            let dirs: Vec<Coord> = Vkey::ALL
                .iter()
                .filter(|v| v.stick() == Some(stick))
                .filter_map(|v| v.direction())
                .collect();
            assert_eq!(dirs, vec![Coord::LEFT, Coord::RIGHT, Coord::UP, Coord::DOWN]);
        }
    }

    #[test]
    fn test_output_ids() {
        assert_eq!(Vkey::Z.pad_button(), Some(PadButton::RightShoulder));
        assert_eq!(Vkey::DUp.pad_button(), Some(PadButton::DpadUp));
        assert_eq!(Vkey::Mod1.pad_button(), None);
        assert_eq!(Vkey::TriggerL.pad_trigger(), Some(PadTrigger::Left));
        assert_eq!(Vkey::TriggerR2.pad_trigger(), Some(PadTrigger::Right));
        assert_eq!(Vkey::Mod1.pad_trigger(), None);
    }
}
