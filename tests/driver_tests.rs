//! Playback Driver Tests
//!
//! Tests for:
//! - Runner, duelist and looping archetype state flows
//! - Blend ramp rates (per second vs. legacy per frame)
//! - Transitions skipped for unloaded clips
//! - One animator advance per character per frame
//! - SimulationContext bookkeeping and settings loading

use std::sync::Arc;

use puppet::animation::{AnimationClip, MAX_BONES, SkeletonBinding};
use puppet::driver::archetypes::duelist::{self, DuelistState};
use puppet::driver::archetypes::looping::{self, LoopState};
use puppet::driver::archetypes::runner::{self, RunnerState};
use puppet::driver::{
    Action, BlendRate, Character, ClipLibrary, DriverError, DriverSettings, InputState, SimulationContext, StateId,
};
use puppet_dev_utils::{duelist_clips, humanoid_rig, rest_pose_binding, runner_clips};

const DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 600;

fn library(clips: Vec<Arc<AnimationClip>>) -> ClipLibrary {
    let mut library = ClipLibrary::new();
    for clip in clips {
        library.add(clip);
    }
    library
}

fn rig_binding() -> Arc<SkeletonBinding> {
    Arc::new(rest_pose_binding(&humanoid_rig(), MAX_BONES).unwrap())
}

fn runner_with(settings: &DriverSettings) -> Character<RunnerState, Action> {
    let clips = library(runner_clips(&humanoid_rig()).unwrap());
    runner::spawn("runner", rig_binding(), Arc::new(clips), settings).unwrap()
}

fn duelist_with(settings: &DriverSettings) -> Character<DuelistState, Action> {
    let clips = library(duelist_clips(&humanoid_rig()).unwrap());
    duelist::spawn("duelist", rig_binding(), Arc::new(clips), settings).unwrap()
}

/// Steps until `target` is entered. Returns the number of frames taken.
fn run_until<S: StateId>(
    character: &mut Character<S, Action>,
    input: &mut InputState,
    dt: f32,
    target: S,
) -> Option<usize> {
    for frame in 1..=MAX_FRAMES {
        character.update(dt, input);
        input.begin_frame();
        if character.state() == target {
            return Some(frame);
        }
    }
    None
}

fn primary_clip<S: StateId>(character: &Character<S, Action>) -> Option<String> {
    let slot = character.animator().session().primary.as_ref()?;
    Some(slot.clip().name.clone())
}

// ============================================================================
// Runner
// ============================================================================

#[test]
fn runner_magic_round_trip() {
    let mut runner = runner_with(&DriverSettings::default());
    let mut input = InputState::new();
    assert_eq!(runner.state(), RunnerState::Idle);

    input.press(Action::Attack);
    assert_eq!(run_until(&mut runner, &mut input, DT, RunnerState::IdleToMagic), Some(1));
    assert!(runner.machine().active_mask().is_some_and(|mask| mask.contains("LeftLeg_59")));
    let session = runner.animator().session();
    assert_eq!(session.secondary.as_ref().unwrap().clip().name, runner::MAGIC);
    assert_eq!(session.lower.as_ref().unwrap().clip().name, runner::IDLE);

    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Magic).is_some());
    assert_eq!(primary_clip(&runner).as_deref(), Some(runner::MAGIC));
    assert!(runner.animator().session().secondary.is_none());

    input.release(Action::Attack);
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::MagicToIdle).is_some());
    // The outgoing cast holds its last pose while idle fades in
    assert!(runner.animator().session().primary.as_ref().unwrap().paused);

    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Idle).is_some());
    assert_eq!(primary_clip(&runner).as_deref(), Some(runner::IDLE));
    assert!(runner.machine().active_mask().is_none());
    assert_eq!(runner.machine().transition_count(), 4);
}

#[test]
fn runner_holding_attack_does_not_retrigger_cast() {
    let mut runner = runner_with(&DriverSettings::default());
    let mut input = InputState::new();

    input.press(Action::Attack);
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Magic).is_some());
    let count = runner.machine().transition_count();

    // Still held, but no new press edge
    for _ in 0..10 {
        runner.update(DT, &input);
        input.begin_frame();
    }
    assert_eq!(runner.state(), RunnerState::Magic);
    assert_eq!(runner.machine().transition_count(), count);
}

#[test]
fn runner_jump_lands_back_in_idle() {
    let mut runner = runner_with(&DriverSettings::default());
    let mut input = InputState::new();

    input.press(Action::Jump);
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Jump).is_some());
    input.release(Action::Jump);
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::JumpToIdle).is_some());
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Idle).is_some());
    assert!(runner.machine().active_mask().is_none());
}

#[test]
fn runner_crouch_follows_the_key() {
    let mut runner = runner_with(&DriverSettings::default());
    let mut input = InputState::new();

    input.press(Action::Crouch);
    assert!(run_until(&mut runner, &mut input, DT, RunnerState::Crouch).is_some());

    // Held crouch stays down indefinitely
    for _ in 0..200 {
        runner.update(DT, &input);
        input.begin_frame();
    }
    assert_eq!(runner.state(), RunnerState::Crouch);

    input.release(Action::Crouch);
    assert_eq!(run_until(&mut runner, &mut input, DT, RunnerState::CrouchToIdle), Some(1));

    // Pressing again mid-fade drops straight back into the crouch
    input.press(Action::Crouch);
    assert_eq!(run_until(&mut runner, &mut input, DT, RunnerState::Crouch), Some(1));
    assert_eq!(primary_clip(&runner).as_deref(), Some(runner::CROUCH));
    assert!(!runner.animator().session().primary.as_ref().unwrap().paused);
}

#[test]
fn runner_skips_transition_to_unloaded_clip() {
    let rig = humanoid_rig();
    let clips = library(runner_clips(&rig).unwrap()).with(runner::MAGIC, None);
    assert!(!clips.is_loaded(runner::MAGIC));
    assert_eq!(clips.missing().collect::<Vec<_>>(), [runner::MAGIC]);

    let mut runner = runner::spawn("runner", rig_binding(), Arc::new(clips), &DriverSettings::default()).unwrap();
    let mut input = InputState::new();
    input.press(Action::Attack);

    for _ in 0..30 {
        assert_eq!(runner.update(DT, &input), None);
        input.begin_frame();
    }
    assert_eq!(runner.state(), RunnerState::Idle);
    assert_eq!(runner.machine().transition_count(), 0);
    assert_eq!(primary_clip(&runner).as_deref(), Some(runner::IDLE));

    // Other branches still work
    input.press(Action::Jump);
    assert_eq!(runner.update(DT, &input), Some(RunnerState::IdleToJump));
}

#[test]
fn runner_without_idle_clip_holds_bind_pose() {
    let clips = ClipLibrary::new().with(runner::IDLE, None);
    let mut runner = runner::spawn("ghost", rig_binding(), Arc::new(clips), &DriverSettings::default()).unwrap();
    let mut input = InputState::new();
    input.press(Action::Jump);

    runner.update(DT, &input);
    assert_eq!(runner.state(), RunnerState::Idle);
    assert!(runner.animator().session().is_empty());
    assert!(runner.animator().bone_matrices().iter().all(|m| *m == glam::Mat4::IDENTITY));
}

#[test]
fn character_advances_animator_once_per_frame() {
    let mut runner = runner_with(&DriverSettings::default());
    let input = InputState::new();

    runner.update(0.1, &input);
    // 30 ticks per second
    assert!((runner.animator().primary_time() - 3.0).abs() < 1e-4);
    assert!((runner.animator().lower_time() - 3.0).abs() < 1e-4);
}

#[test]
fn transition_frame_advances_new_session_once() {
    let mut runner = runner_with(&DriverSettings::default());
    let mut input = InputState::new();
    input.press(Action::Jump);

    assert_eq!(runner.update(0.1, &input), Some(RunnerState::IdleToJump));
    // The jump slot was seeded at 0 and advanced by this frame only
    let secondary = runner.animator().session().secondary.as_ref().unwrap();
    assert!((secondary.time() - 3.0).abs() < 1e-4);
}

// ============================================================================
// Blend ramp
// ============================================================================

fn blend_after_trigger(rate: BlendRate, dt: f32) -> f32 {
    let settings = DriverSettings {
        blend_rate: rate,
        ..DriverSettings::default()
    };
    let mut runner = runner_with(&settings);
    let mut input = InputState::new();
    input.press(Action::Jump);

    runner.update(dt, &input);
    assert_eq!(runner.state(), RunnerState::IdleToJump);
    assert_eq!(runner.animator().blend_factor(), 0.0);

    input.begin_frame();
    runner.update(dt, &input);
    runner.animator().blend_factor()
}

#[test]
fn per_second_rate_scales_with_frame_time() {
    let at_60 = blend_after_trigger(BlendRate::PerSecond(6.0), 1.0 / 60.0);
    let at_30 = blend_after_trigger(BlendRate::PerSecond(6.0), 1.0 / 30.0);
    assert!((at_60 - 0.1).abs() < 1e-5);
    assert!((at_30 - 0.2).abs() < 1e-5);
}

#[test]
fn per_frame_rate_ignores_frame_time() {
    let at_60 = blend_after_trigger(BlendRate::PerFrame(0.1), 1.0 / 60.0);
    let at_30 = blend_after_trigger(BlendRate::PerFrame(0.1), 1.0 / 30.0);
    assert!((at_60 - 0.1).abs() < 1e-6);
    assert!((at_30 - 0.1).abs() < 1e-6);
}

#[test]
fn fade_length_in_frames_follows_rate() {
    let mut fast = runner_with(&DriverSettings::legacy());
    let mut slow = runner_with(&DriverSettings {
        blend_rate: BlendRate::PerFrame(0.05),
        ..DriverSettings::default()
    });
    let mut input = InputState::new();
    input.press(Action::Crouch);
    let fast_frames = run_until(&mut fast, &mut input.clone(), DT, RunnerState::Crouch).unwrap();
    let slow_frames = run_until(&mut slow, &mut input, DT, RunnerState::Crouch).unwrap();

    assert!(slow_frames > fast_frames, "{slow_frames} <= {fast_frames}");
    // Trigger frame plus roughly ten ramp frames
    assert!((10..=12).contains(&fast_frames), "took {fast_frames} frames");
}

// ============================================================================
// Duelist and looping
// ============================================================================

#[test]
fn duelist_slash_cycle() {
    let mut duelist = duelist_with(&DriverSettings::default());
    let mut input = InputState::new();
    assert_eq!(primary_clip(&duelist).as_deref(), Some(duelist::IDLE));
    assert!(duelist.animator().session().lower.is_none());

    input.press(Action::Attack);
    assert!(run_until(&mut duelist, &mut input, DT, DuelistState::Slash).is_some());
    input.release(Action::Attack);

    assert!(run_until(&mut duelist, &mut input, DT, DuelistState::SlashToIdle).is_some());
    // Slash holds its release pose under the incoming idle
    let outgoing = duelist.animator().session().primary.as_ref().unwrap();
    assert_eq!(outgoing.clip().name, duelist::SLASH);
    assert!(outgoing.paused);

    assert!(run_until(&mut duelist, &mut input, DT, DuelistState::Idle).is_some());
    assert_eq!(primary_clip(&duelist).as_deref(), Some(duelist::IDLE));
}

#[test]
fn outgoing_slash_never_wraps_during_fade() {
    let mut duelist = duelist_with(&DriverSettings::default());
    let mut input = InputState::new();
    input.press(Action::Attack);
    assert!(run_until(&mut duelist, &mut input, DT, DuelistState::SlashToIdle).is_some());
    input.release(Action::Attack);

    let release = duelist.animator().session().primary.as_ref().unwrap().progress();
    assert!(release >= duelist::SLASH_RELEASE);
    for _ in 0..MAX_FRAMES {
        duelist.update(DT, &input);
        input.begin_frame();
        if duelist.state() != DuelistState::SlashToIdle {
            break;
        }
        let outgoing = duelist.animator().session().primary.as_ref().unwrap();
        assert!(!outgoing.looped(), "slash wrapped at blend {}", duelist.animator().blend_factor());
        assert_eq!(outgoing.progress(), release);
    }
    assert_eq!(duelist.state(), DuelistState::Idle);
}

#[test]
fn duelist_fade_rate_is_separate_from_runner() {
    let mut input = InputState::new();
    input.press(Action::Attack);

    let mut runner = runner_with(&DriverSettings::default());
    let mut duelist = duelist_with(&DriverSettings::default());
    let runner_frames = run_until(&mut runner, &mut input.clone(), DT, RunnerState::Magic).unwrap();
    let duelist_frames = run_until(&mut duelist, &mut input.clone(), DT, DuelistState::Slash).unwrap();
    assert!(duelist_frames > runner_frames, "{duelist_frames} <= {runner_frames}");
    assert_eq!(duelist.machine().blend_rate(), duelist::BLEND_RATE);

    let shared = DriverSettings {
        archetype_blend_rates: Default::default(),
        ..DriverSettings::default()
    };
    let mut quick = duelist_with(&shared);
    assert_eq!(run_until(&mut quick, &mut input, DT, DuelistState::Slash), Some(runner_frames));
}

#[test]
fn slash_release_threshold_is_configurable() {
    let early = DriverSettings::from_json_str(r#"{ "progress_thresholds": { "slash_release": 0.2 } }"#).unwrap();
    let mut quick = duelist_with(&early);
    let mut patient = duelist_with(&DriverSettings::default());
    let mut input = InputState::new();
    input.press(Action::Attack);

    let quick_frames = run_until(&mut quick, &mut input.clone(), DT, DuelistState::SlashToIdle).unwrap();
    let patient_frames = run_until(&mut patient, &mut input, DT, DuelistState::SlashToIdle).unwrap();
    assert!(quick_frames < patient_frames);
}

#[test]
fn looping_character_never_transitions() {
    let clips = library(runner_clips(&humanoid_rig()).unwrap());
    let mut dancer = looping::spawn("dancer", "idle", rig_binding(), Arc::new(clips), &DriverSettings::default()).unwrap();
    let mut input = InputState::new();
    input.press(Action::Attack);
    input.press(Action::Jump);

    for _ in 0..120 {
        assert_eq!(dancer.update(DT, &input), None);
        input.begin_frame();
    }
    assert_eq!(dancer.state(), LoopState::Playing);
    // 120 frames at 60 fps of a one-second clip: two full loops
    assert!(dancer.animator().primary_time() < 1e-2 || dancer.animator().primary_time() > 29.99);
}

// ============================================================================
// Simulation context
// ============================================================================

#[test]
fn context_steps_every_character() {
    let settings = DriverSettings::default();
    let mut ctx = SimulationContext::new();
    let hero = ctx.spawn(runner_with(&settings));
    let rival = ctx.spawn(duelist_with(&settings));
    assert_eq!(ctx.len(), 2);

    let mut input = InputState::new();
    input.press(Action::Attack);
    for _ in 0..30 {
        ctx.step(DT, &input);
        input.begin_frame();
    }

    assert_eq!(ctx.frame(), 30);
    assert!((ctx.elapsed() - 0.5).abs() < 1e-4);
    assert_eq!(ctx.get(hero).unwrap().state_label(), "Magic");
    assert_eq!(ctx.get(rival).unwrap().state_label(), "Slash");
    assert!(
        ctx.animator(hero)
            .unwrap()
            .bone_matrices()
            .iter()
            .any(|m| *m != glam::Mat4::IDENTITY)
    );

    assert!(ctx.despawn(rival));
    assert!(!ctx.despawn(rival));
    assert!(ctx.get(rival).is_none());
    assert_eq!(ctx.iter().map(|(_, c)| c.name().to_string()).collect::<Vec<_>>(), ["runner"]);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_load_from_file() {
    let path = std::env::temp_dir().join(format!("puppet_settings_{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{
            "blend_rate": { "per_frame": 0.055 },
            "progress_thresholds": { "magic_release": 0.5 },
            "frozen_bones": ["LeftLeg_59"]
        }"#,
    )
    .unwrap();

    let settings = DriverSettings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.blend_rate, BlendRate::PerFrame(0.055));
    assert_eq!(settings.threshold("magic_release", 0.73), 0.5);
    assert_eq!(settings.frozen_bones, ["LeftLeg_59"]);
    assert_eq!(settings.bone_capacity, MAX_BONES);
}

#[test]
fn settings_errors_are_reported() {
    assert!(matches!(
        DriverSettings::load("/definitely/not/here.json"),
        Err(DriverError::Io(_))
    ));
    assert!(matches!(
        DriverSettings::from_json_str(r#"{ "blend_rate": { "per_second": -1.0 } }"#),
        Err(DriverError::InvalidSetting { .. })
    ));
    assert!(matches!(
        DriverSettings::from_json_str(r#"{ "bone_capacity": 0 }"#),
        Err(DriverError::InvalidSetting { .. })
    ));
}
