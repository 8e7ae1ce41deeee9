//! keypad-gw - keyboard to virtual game controller mapping engine
//!
//! Translates physical key press/release events into a continuous virtual
//! pad state (buttons, two analog sticks, two analog triggers), blending
//! modifier and trigger keys into precise stick positions.

pub mod bindings;
pub mod cli;
pub mod config;
pub mod geometry;
pub mod input;
pub mod mapper;
pub mod pad;
pub mod queue;
pub mod resolve;
pub mod state;
pub mod swap;
pub mod tuning;
pub mod vkey;

pub use bindings::KeyBindingTable;
pub use mapper::{EventOutcome, IgnoreReason, KeyMapper, MapperError};
pub use pad::{ControllerSink, PadSnapshot};
pub use queue::EngineQueue;
