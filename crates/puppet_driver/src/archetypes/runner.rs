//! Side-scrolling runner: a looping run cycle with magic, jump and crouch
//! branches.
//!
//! ```text
//!          Attack            BlendComplete           progress
//!   Idle ─────────> IdleToMagic ──────────> Magic ──────────> MagicToIdle ─┐
//!    │ ^                                                                   │
//!    │ └───────────────────────── BlendComplete ──────────────────────────┘
//!    ├─ Jump ──> IdleToJump ──> Jump ── progress ──> JumpToIdle ──> Idle
//!    └─ Crouch ─> IdleToCrouch ─> Crouch ── released ──> CrouchToIdle ──> Idle
//! ```
//!
//! The magic branch pins the legs and head to the lower slot, so the run
//! cycle carries on under the casting upper body.

use std::sync::Arc;

use puppet_animation::{Animator, SkeletonBinding};

use crate::archetypes::{fade_in, fade_out, looping_session, resume, settle};
use crate::character::Character;
use crate::config::DriverSettings;
use crate::errors::Result;
use crate::input::Action;
use crate::library::ClipLibrary;
use crate::machine::{StateMachine, StateSpec, TransitionTable, Trigger};

pub const IDLE: &str = "idle";
pub const MAGIC: &str = "magic";
pub const JUMP: &str = "jump";
pub const CROUCH: &str = "crouch";

/// Default normalized progress at which a cast ends.
pub const MAGIC_RELEASE: f32 = 0.73;
/// Default normalized progress at which a jump lands.
pub const JUMP_RELEASE: f32 = 0.73;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerState {
    Idle,
    IdleToMagic,
    Magic,
    MagicToIdle,
    IdleToJump,
    Jump,
    JumpToIdle,
    IdleToCrouch,
    Crouch,
    CrouchToIdle,
}

pub fn table(settings: &DriverSettings) -> Result<TransitionTable<RunnerState, Action>> {
    use RunnerState::{
        Crouch, CrouchToIdle, Idle, IdleToCrouch, IdleToJump, IdleToMagic, Jump, JumpToIdle, Magic, MagicToIdle,
    };

    let legs = settings.frozen_mask();
    let magic_release = settings.threshold("magic_release", MAGIC_RELEASE);
    let jump_release = settings.threshold("jump_release", JUMP_RELEASE);

    TransitionTable::builder()
        .state(Idle, StateSpec::steady())
        .state(IdleToMagic, StateSpec::ramp().with_mask(legs.clone()))
        .state(Magic, StateSpec::steady().with_mask(legs.clone()))
        .state(MagicToIdle, StateSpec::ramp().with_mask(legs))
        .state(IdleToJump, StateSpec::ramp())
        .state(Jump, StateSpec::steady())
        .state(JumpToIdle, StateSpec::ramp())
        .state(IdleToCrouch, StateSpec::ramp())
        .state(Crouch, StateSpec::steady())
        .state(CrouchToIdle, StateSpec::ramp())
        // Idle
        .on(Idle, Trigger::Held(Action::Attack), IdleToMagic, "cast", fade_in(MAGIC))
        .on(Idle, Trigger::Held(Action::Jump), IdleToJump, "jump", fade_in(JUMP))
        .on(Idle, Trigger::Held(Action::Crouch), IdleToCrouch, "crouch", fade_in(CROUCH))
        // Magic
        .on(IdleToMagic, Trigger::BlendComplete, Magic, "cast_settle", settle)
        .on(Magic, Trigger::Progress(magic_release), MagicToIdle, "magic_release", fade_out(IDLE))
        .on(Magic, Trigger::JustPressed(Action::Attack), IdleToMagic, "recast", fade_in(MAGIC))
        .on(Magic, Trigger::Held(Action::Jump), IdleToJump, "jump", fade_in(JUMP))
        .on(MagicToIdle, Trigger::BlendComplete, Idle, "magic_settle", settle)
        .on(MagicToIdle, Trigger::JustPressed(Action::Attack), IdleToMagic, "recast", fade_in(MAGIC))
        .on(MagicToIdle, Trigger::Held(Action::Jump), IdleToJump, "jump", fade_in(JUMP))
        // Jump
        .on(IdleToJump, Trigger::BlendComplete, Jump, "jump_settle", settle)
        .on(Jump, Trigger::Progress(jump_release), JumpToIdle, "jump_release", fade_out(IDLE))
        .on(JumpToIdle, Trigger::BlendComplete, Idle, "land", settle)
        // Crouch
        .on(IdleToCrouch, Trigger::BlendComplete, Crouch, "crouch_settle", settle)
        .on(Crouch, Trigger::Released(Action::Crouch), CrouchToIdle, "stand", fade_out(IDLE))
        .on(CrouchToIdle, Trigger::BlendComplete, Idle, "stand_settle", settle)
        .on(CrouchToIdle, Trigger::Held(Action::Crouch), Crouch, "recrouch", resume)
        .build()
}

/// Builds a runner playing its idle run cycle.
pub fn spawn(
    name: impl Into<String>,
    binding: Arc<SkeletonBinding>,
    clips: Arc<ClipLibrary>,
    settings: &DriverSettings,
) -> Result<Character<RunnerState, Action>> {
    let table = Arc::new(table(settings)?);
    let machine = StateMachine::new(table, RunnerState::Idle, settings.blend_rate)?;
    let initial = looping_session(clips.get(IDLE));
    Ok(Character::new(name, Animator::new(binding), machine, clips, initial))
}
