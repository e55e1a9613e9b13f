//! Bundled character archetypes.
//!
//! Each archetype is a transition table plus a factory that seeds the
//! initial session. The session builders below are the common shapes:
//!
//! | builder | primary | secondary | factor |
//! |---|---|---|---|
//! | [`fade_in`] | current primary, running | `clip` from 0 | 0 |
//! | [`fade_out`] | current primary, held | `clip` from 0 | 0 |
//! | [`settle`] | current secondary | none | 0 |
//! | [`resume`] | current primary, running | none | 0 |
//!
//! All of them carry the current lower slot over unchanged.

pub mod duelist;
pub mod looping;
pub mod runner;

use std::sync::Arc;

use puppet_animation::{AnimationClip, BlendSession, ClipSlot};

use crate::machine::SetupContext;

/// Cross-fade from whatever plays now into `clip`.
pub fn fade_in(clip: &'static str) -> impl Fn(&SetupContext<'_>) -> Option<BlendSession> + Send + Sync {
    move |ctx| {
        let mut from = ctx.primary_slot()?;
        from.paused = false;
        let to = ctx.slot(clip, 0.0)?;
        Some(BlendSession::cross_fade(from, to, 0.0).with_lower(ctx.lower_slot()))
    }
}

/// Freeze the current primary on its last pose and fade into `clip`.
pub fn fade_out(clip: &'static str) -> impl Fn(&SetupContext<'_>) -> Option<BlendSession> + Send + Sync {
    move |ctx| {
        let mut held = ctx.primary_slot()?;
        held.paused = true;
        let to = ctx.slot(clip, 0.0)?;
        Some(BlendSession::cross_fade(held, to, 0.0).with_lower(ctx.lower_slot()))
    }
}

/// Collapse a finished cross-fade onto its secondary clip.
pub fn settle(ctx: &SetupContext<'_>) -> Option<BlendSession> {
    let mut target = ctx.secondary_slot()?;
    target.paused = false;
    Some(BlendSession::new(Some(target), None, ctx.lower_slot(), 0.0))
}

/// Drop the secondary and keep playing the primary from where it is.
pub fn resume(ctx: &SetupContext<'_>) -> Option<BlendSession> {
    let mut current = ctx.primary_slot()?;
    current.paused = false;
    Some(BlendSession::new(Some(current), None, ctx.lower_slot(), 0.0))
}

/// `clip` looping in both the primary and lower slots.
#[must_use]
pub fn looping_session(clip: Option<Arc<AnimationClip>>) -> Option<BlendSession> {
    let clip = clip?;
    Some(BlendSession::single(clip.clone(), 0.0).with_lower(Some(ClipSlot::new(clip, 0.0))))
}
