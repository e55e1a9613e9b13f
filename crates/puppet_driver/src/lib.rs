//! Drives the animation core: playback state machines, character archetypes
//! and the per-frame simulation context.
//!
//! The host loop owns a [`SimulationContext`], fills an [`InputState`] each
//! frame and calls [`SimulationContext::step`]; every character then
//! evaluates its [`StateMachine`] once and advances its animator once.

pub mod archetypes;
pub mod character;
pub mod config;
pub mod context;
pub mod errors;
pub mod input;
pub mod library;
pub mod machine;
pub mod ramp;

pub use character::{Character, Controller};
pub use config::DriverSettings;
pub use context::{CharacterKey, SimulationContext};
pub use errors::{DriverError, Result};
pub use input::{Action, InputState};
pub use library::ClipLibrary;
pub use machine::{
    ActionId, SessionSetup, SetupContext, StateId, StateMachine, StateSpec, Transition, TransitionTable,
    TransitionTableBuilder, Trigger,
};
pub use ramp::BlendRate;
