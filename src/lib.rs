//! # Puppet
//!
//! Skeletal animation blending for character rigs: keyframe sampling,
//! two-clip cross-fades with a partial-body override, and table-driven
//! playback state machines on top.
//!
//! - [`animation`]: tracks, clips, skeleton binding and the blend engine.
//! - [`driver`]: state machines, archetypes and the simulation context.
//!
//! ```rust,ignore
//! use puppet::prelude::*;
//!
//! let mut ctx = SimulationContext::new();
//! let key = ctx.spawn(runner::spawn("hero", binding, clips, &settings)?);
//!
//! loop {
//!     input.begin_frame();
//!     input.set(Action::Jump, jump_pressed);
//!     ctx.step(dt, &input);
//!     upload(ctx.animator(key).unwrap().bone_matrices());
//! }
//! ```

pub use glam;
pub use puppet_animation as animation;
pub use puppet_driver as driver;

pub mod prelude {
    pub use puppet_animation::{
        AnimationClip, AnimationError, Animator, BlendSession, BoneMask, BoneNode, BonePose, BoneTrack, ClipSlot,
        InterpolationMode, KeyframeTrack, MAX_BONES, SkeletonBinding, compute_bone_matrices,
    };
    pub use puppet_driver::archetypes::{duelist, looping, runner};
    pub use puppet_driver::{
        Action, BlendRate, Character, ClipLibrary, Controller, DriverError, DriverSettings, InputState,
        SimulationContext, StateMachine, StateSpec, TransitionTable, Trigger,
    };
}
