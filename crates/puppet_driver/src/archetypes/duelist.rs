//! Sword duelist: idle stance with a slash that fades in, plays through and
//! fades back out. Two slots only; no lower-body override.
//!
//! The slash fades at its own, slower rate (see [`BLEND_RATE`]) unless the
//! settings override it under the `duelist` key.

use std::sync::Arc;

use puppet_animation::{Animator, BlendSession, SkeletonBinding};

use crate::archetypes::{fade_in, fade_out, settle};
use crate::character::Character;
use crate::config::DriverSettings;
use crate::errors::Result;
use crate::input::Action;
use crate::library::ClipLibrary;
use crate::machine::{StateMachine, StateSpec, TransitionTable, Trigger};
use crate::ramp::BlendRate;

pub const IDLE: &str = "idle";
pub const SLASH: &str = "slash";

/// Default normalized progress at which the slash hands back to idle.
pub const SLASH_RELEASE: f32 = 0.9;

/// Default cross-fade rate, 0.055 per frame at 60 fps.
pub const BLEND_RATE: BlendRate = BlendRate::PerSecond(3.3);
/// The same fade as a fixed per-frame step.
pub const LEGACY_BLEND_RATE: BlendRate = BlendRate::PerFrame(0.055);

/// Key of this archetype in [`DriverSettings::archetype_blend_rates`].
pub const ARCHETYPE: &str = "duelist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuelistState {
    Idle,
    IdleToSlash,
    Slash,
    SlashToIdle,
}

pub fn table(settings: &DriverSettings) -> Result<TransitionTable<DuelistState, Action>> {
    use DuelistState::{Idle, IdleToSlash, Slash, SlashToIdle};

    let release = settings.threshold("slash_release", SLASH_RELEASE);

    TransitionTable::builder()
        .state(Idle, StateSpec::steady())
        .state(IdleToSlash, StateSpec::ramp())
        .state(Slash, StateSpec::steady())
        .state(SlashToIdle, StateSpec::ramp())
        .on(Idle, Trigger::Held(Action::Attack), IdleToSlash, "slash", fade_in(SLASH))
        .on(IdleToSlash, Trigger::BlendComplete, Slash, "slash_settle", settle)
        // Held on its release pose so the fade never sees it loop
        .on(Slash, Trigger::Progress(release), SlashToIdle, "slash_release", fade_out(IDLE))
        .on(SlashToIdle, Trigger::BlendComplete, Idle, "idle_settle", settle)
        .build()
}

pub fn spawn(
    name: impl Into<String>,
    binding: Arc<SkeletonBinding>,
    clips: Arc<ClipLibrary>,
    settings: &DriverSettings,
) -> Result<Character<DuelistState, Action>> {
    let table = Arc::new(table(settings)?);
    let machine = StateMachine::new(table, DuelistState::Idle, settings.blend_rate_for(ARCHETYPE))?;
    let initial = clips.get(IDLE).map(|clip| BlendSession::single(clip, 0.0));
    Ok(Character::new(name, Animator::new(binding), machine, clips, initial))
}
