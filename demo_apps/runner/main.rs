//! Headless runner demo.
//!
//! Plays a scripted input timeline into a runner and a duelist sharing one
//! simulation context, logging every state change and the hips and right
//! hand positions once a second.
//!
//! ```text
//! cargo run -p runner -- [settings.json]
//! RUST_LOG=puppet_driver=debug cargo run -p runner
//! ```

use std::sync::Arc;

use puppet::prelude::*;
use puppet_dev_utils::{duelist_clips, humanoid_rig, rest_pose_binding, runner_clips};

const FPS: f32 = 60.0;
const SECONDS: u32 = 8;

/// `(first frame, last frame, action)` windows during which an action is held.
const SCRIPT: &[(u64, u64, Action)] = &[
    (30, 40, Action::Attack),
    (150, 160, Action::Jump),
    (260, 380, Action::Crouch),
    (400, 405, Action::Attack),
];

fn library(clips: Vec<Arc<AnimationClip>>) -> ClipLibrary {
    let mut library = ClipLibrary::new();
    for clip in clips {
        library.add(clip);
    }
    library
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => DriverSettings::load(&path)?,
        None => DriverSettings::default(),
    };
    log::info!(
        "Blend rate: {:?}, duelist {:?}",
        settings.blend_rate,
        settings.blend_rate_for(duelist::ARCHETYPE)
    );

    let rig = humanoid_rig();
    let binding = Arc::new(rest_pose_binding(&rig, settings.bone_capacity)?);
    let runner_library = Arc::new(library(runner_clips(&rig)?));
    let duelist_library = Arc::new(library(duelist_clips(&rig)?));

    let mut ctx = SimulationContext::new();
    let hero = ctx.spawn(runner::spawn("hero", Arc::clone(&binding), runner_library, &settings)?);
    ctx.spawn(duelist::spawn("rival", binding, duelist_library, &settings)?);

    let mut input = InputState::new();
    let mut labels: Vec<String> = ctx.iter().map(|(_, c)| c.state_label()).collect();
    let dt = 1.0 / FPS;

    for frame in 0..u64::from(SECONDS) * FPS as u64 {
        input.begin_frame();
        for action in [Action::Attack, Action::Jump, Action::Crouch] {
            let held = SCRIPT
                .iter()
                .any(|&(start, end, a)| a == action && (start..=end).contains(&frame));
            input.set(action, held);
        }

        ctx.step(dt, &input);

        for ((_, character), label) in ctx.iter().zip(labels.iter_mut()) {
            let current = character.state_label();
            if current != *label {
                log::info!("[{frame:>4}] {}: {label} -> {current}", character.name());
                *label = current;
            }
        }

        if frame % FPS as u64 == 0 {
            if let Some(animator) = ctx.animator(hero) {
                let hips = animator.bone_model_matrix("Hips_66").map(|m| m.w_axis.truncate());
                let hand = animator.bone_model_matrix("RightHand_49").map(|m| m.w_axis.truncate());
                log::info!("[{frame:>4}] hero hips {hips:?} hand {hand:?}");
            }
        }
    }

    log::info!(
        "Simulated {} frames ({:.2}s) for {} characters",
        ctx.frame(),
        ctx.elapsed(),
        ctx.len()
    );
    Ok(())
}
