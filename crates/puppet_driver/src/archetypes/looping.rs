//! A single clip looping forever, e.g. a dance loop on a showcase model.

use std::sync::Arc;

use puppet_animation::{Animator, SkeletonBinding};

use crate::archetypes::looping_session;
use crate::character::Character;
use crate::config::DriverSettings;
use crate::errors::Result;
use crate::input::Action;
use crate::library::ClipLibrary;
use crate::machine::{StateMachine, StateSpec, TransitionTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    Playing,
}

pub fn table() -> Result<TransitionTable<LoopState, Action>> {
    TransitionTable::builder()
        .state(LoopState::Playing, StateSpec::steady())
        .build()
}

/// Loops the clip registered as `clip` in `clips`.
pub fn spawn(
    name: impl Into<String>,
    clip: &str,
    binding: Arc<SkeletonBinding>,
    clips: Arc<ClipLibrary>,
    settings: &DriverSettings,
) -> Result<Character<LoopState, Action>> {
    let machine = StateMachine::new(Arc::new(table()?), LoopState::Playing, settings.blend_rate)?;
    let initial = looping_session(clips.get(clip));
    Ok(Character::new(name, Animator::new(binding), machine, clips, initial))
}
