//! Keyboard input types and label normalization
//!
//! The physical event source is external. It hands the engine a [`KeyEvent`]
//! per key transition, in true physical order.

pub mod event;
pub mod normalize;

pub use event::{KeyEvent, Transition};
pub use normalize::deshift;
