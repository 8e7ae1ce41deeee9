//! 2-D coordinate primitives for stick output
//!
//! Sticks are composed from per-direction contributions. Two directions on
//! the same axis never add up: the [`Coord`] overlay operator (`|`) lets a
//! nonzero right-hand axis replace the left-hand one, and the result is
//! radially clamped before it reaches the pad.

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, Mul};

/// A point on a stick plane, x to the right and y up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f32,
    pub y: f32,
}

impl Coord {
    /// Centered stick
    pub const ZERO: Coord = Coord::new(0.0, 0.0);
    pub const LEFT: Coord = Coord::new(-1.0, 0.0);
    pub const RIGHT: Coord = Coord::new(1.0, 0.0);
    pub const UP: Coord = Coord::new(0.0, 1.0);
    pub const DOWN: Coord = Coord::new(0.0, -1.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance from the center
    pub fn magnitude_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude_sq().sqrt()
    }

    /// Limit the magnitude to 1.0 while keeping the direction.
    ///
    /// Points inside the unit circle are returned unchanged. Points outside
    /// are projected radially onto it:
    /// - (0.5, 0.5): magnitude 0.707 → unchanged
    /// - (-1, 1): magnitude 1.414 → (-0.707, 0.707)
    pub fn clamp_to_unit_circle(self) -> Self {
        let r_sq = self.magnitude_sq();
        if r_sq <= 1.0 {
            return self;
        }
        let r = r_sq.sqrt();
        Coord::new(self.x / r, self.y / r)
    }

    /// Per-axis combine: an axis of `over` wins when nonzero.
    pub fn overlay(self, over: Coord) -> Self {
        Coord::new(
            if over.x != 0.0 { over.x } else { self.x },
            if over.y != 0.0 { over.y } else { self.y },
        )
    }
}

/// Scalar multiply
impl Mul<f32> for Coord {
    type Output = Coord;

    fn mul(self, k: f32) -> Coord {
        Coord::new(self.x * k, self.y * k)
    }
}

/// Pairwise (component-wise) multiply, used as a directional gain mask
impl Mul<Coord> for Coord {
    type Output = Coord;

    fn mul(self, rhs: Coord) -> Coord {
        Coord::new(self.x * rhs.x, self.y * rhs.y)
    }
}

/// Overlay, see [`Coord::overlay`]
impl BitOr for Coord {
    type Output = Coord;

    fn bitor(self, rhs: Coord) -> Coord {
        self.overlay(rhs)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

/// Stick gain applied by a trigger or the modifier.
///
/// A scalar scales the whole vector, a pairwise gain scales each axis on its
/// own. In YAML a gain is either a number or an `{x, y}` map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Gain {
    Scalar(f32),
    Pairwise(Coord),
}

impl Gain {
    /// Identity gain
    pub const UNIT: Gain = Gain::Scalar(1.0);

    pub fn apply(self, c: Coord) -> Coord {
        match self {
            Gain::Scalar(k) => c * k,
            Gain::Pairwise(mask) => c * mask,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            Gain::Scalar(k) => k.is_finite(),
            Gain::Pairwise(mask) => mask.x.is_finite() && mask.y.is_finite(),
        }
    }
}

impl Default for Gain {
    fn default() -> Self {
        Gain::UNIT
    }
}
