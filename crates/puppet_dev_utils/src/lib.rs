//! Procedural rigs and clips for tests, benches and demo apps.
//!
//! Nothing here reads asset files. The humanoid rig uses the same bone
//! names as the runner character, so the default frozen-bone set applies
//! to it unchanged.

use std::f32::consts::TAU;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use puppet_animation::{
    AnimationClip, BoneNode, BonePose, BoneTrack, InterpolationMode, KeyframeTrack, Result, SkeletonBinding,
};

pub const TICKS_PER_SECOND: f32 = 30.0;

/// Keyframes per procedural track; first and last coincide so clips loop
/// seamlessly.
const SAMPLES: usize = 9;

// ============================================================================
// Rigs
// ============================================================================

fn joint(name: &str, offset: Vec3) -> BoneNode {
    BoneNode::new(name, Mat4::from_translation(offset))
}

/// `root -> mid -> tip`, each one unit above its parent in bind pose.
#[must_use]
pub fn chain_rig() -> Arc<BoneNode> {
    Arc::new(
        joint("root", Vec3::ZERO).with_child(joint("mid", Vec3::Y).with_child(joint("tip", Vec3::Y))),
    )
}

fn leg(side: &str, x: f32, ids: [u32; 4]) -> BoneNode {
    joint(&format!("{side}UpLeg_{}", ids[0]), Vec3::new(x, -0.05, 0.0)).with_child(
        joint(&format!("{side}Leg_{}", ids[1]), Vec3::new(0.0, -0.45, 0.0)).with_child(
            joint(&format!("{side}Foot_{}", ids[2]), Vec3::new(0.0, -0.45, 0.0))
                .with_child(joint(&format!("{side}ToeBase_{}", ids[3]), Vec3::new(0.0, -0.05, 0.1))),
        ),
    )
}

fn arm(side: &str, x: f32, ids: [u32; 3]) -> BoneNode {
    joint(&format!("{side}Arm_{}", ids[0]), Vec3::new(x, 0.1, 0.0)).with_child(
        joint(&format!("{side}ForeArm_{}", ids[1]), Vec3::new(x, 0.0, 0.0))
            .with_child(joint(&format!("{side}Hand_{}", ids[2]), Vec3::new(x, 0.0, 0.0))),
    )
}

/// Twenty-two bone biped rooted at the hips.
#[must_use]
pub fn humanoid_rig() -> Arc<BoneNode> {
    let head = joint("Neck_4", Vec3::new(0.0, 0.15, 0.0)).with_child(
        joint("Head_3", Vec3::new(0.0, 0.1, 0.0))
            .with_child(joint("LeftEye_1", Vec3::new(-0.03, 0.08, 0.08)))
            .with_child(joint("RightEye_2", Vec3::new(0.03, 0.08, 0.08)))
            .with_child(joint("HeadTop_End_0", Vec3::new(0.0, 0.2, 0.0))),
    );
    let torso = joint("Spine_40", Vec3::new(0.0, 0.2, 0.0)).with_child(
        joint("Spine1_39", Vec3::new(0.0, 0.2, 0.0))
            .with_child(head)
            .with_child(arm("Left", -0.2, [30, 31, 29]))
            .with_child(arm("Right", 0.2, [50, 51, 49])),
    );
    Arc::new(
        joint("Hips_66", Vec3::new(0.0, 1.0, 0.0))
            .with_child(leg("Left", -0.1, [60, 59, 58, 57]))
            .with_child(leg("Right", 0.1, [65, 64, 63, 62]))
            .with_child(torso),
    )
}

/// `limbs` chains of `limb_length` joints hanging off one root.
#[must_use]
pub fn broad_rig(limbs: usize, limb_length: usize) -> Arc<BoneNode> {
    let mut root = joint("root", Vec3::ZERO);
    for limb in 0..limbs {
        let mut chain: Option<BoneNode> = None;
        for segment in (0..limb_length).rev() {
            let mut node = joint(&format!("limb{limb}_{segment}"), Vec3::new(0.0, 0.25, 0.0));
            if let Some(child) = chain.take() {
                node.children.push(child);
            }
            chain = Some(node);
        }
        if let Some(chain) = chain {
            root.add_child(chain);
        }
    }
    Arc::new(root)
}

// ============================================================================
// Bindings
// ============================================================================

/// Binds every node of `hierarchy` in traversal order with an identity
/// inverse bind matrix, so skinning matrices equal world transforms.
pub fn identity_binding(hierarchy: &BoneNode, capacity: usize) -> Result<SkeletonBinding> {
    let mut binding = SkeletonBinding::with_capacity(capacity);
    for node in hierarchy.iter() {
        binding.register(&node.name, Mat4::IDENTITY)?;
    }
    Ok(binding)
}

/// Binds every node with the inverse of its bind-pose world transform, so
/// the rest pose skins to identity.
pub fn rest_pose_binding(hierarchy: &BoneNode, capacity: usize) -> Result<SkeletonBinding> {
    fn visit(node: &BoneNode, parent: Mat4, binding: &mut SkeletonBinding) -> Result<()> {
        let world = parent * node.transform;
        binding.register(&node.name, world.inverse())?;
        node.children
            .iter()
            .try_for_each(|child| visit(child, world, binding))
    }

    let mut binding = SkeletonBinding::with_capacity(capacity);
    visit(hierarchy, Mat4::IDENTITY, &mut binding)?;
    Ok(binding)
}

// ============================================================================
// Clips
// ============================================================================

/// One-tick clip at one tick per second holding each listed bone at a
/// fixed translation.
pub fn static_clip(name: &str, hierarchy: &Arc<BoneNode>, positions: &[(&str, Vec3)]) -> Result<Arc<AnimationClip>> {
    let tracks = positions
        .iter()
        .map(|&(bone, position)| BoneTrack::from_pose(bone, BonePose::new(position, Quat::IDENTITY, Vec3::ONE)));
    AnimationClip::new(name, Arc::clone(hierarchy), tracks, 1.0, 1.0).map(Arc::new)
}

fn swing_track(node: &BoneNode, order: usize, duration: f32, amplitude: f32, phase: f32) -> Result<BoneTrack> {
    let (scale, rotation, translation) = node.transform.to_scale_rotation_translation();
    let times: Vec<f32> = (0..SAMPLES)
        .map(|i| duration * i as f32 / (SAMPLES - 1) as f32)
        .collect();
    let rotations = times
        .iter()
        .map(|&t| {
            let angle = amplitude * (TAU * t / duration + phase + order as f32 * 0.7).sin();
            rotation * Quat::from_rotation_x(angle)
        })
        .collect();

    BoneTrack::new(
        node.name.clone(),
        KeyframeTrack::constant(translation),
        KeyframeTrack::new(times, rotations, InterpolationMode::Linear),
        KeyframeTrack::constant(scale),
    )
}

/// Looping clip that swings every joint of `rig` about X.
///
/// Joints swing out of phase with each other, and `phase` shifts the whole
/// clip, so two clips with different parameters pose every bone
/// differently.
pub fn swing_clip(
    name: &str,
    rig: &Arc<BoneNode>,
    seconds: f32,
    amplitude: f32,
    phase: f32,
) -> Result<Arc<AnimationClip>> {
    let duration = seconds * TICKS_PER_SECOND;
    let tracks = rig
        .iter()
        .enumerate()
        .map(|(order, node)| swing_track(node, order, duration, amplitude, phase))
        .collect::<Result<Vec<_>>>()?;
    AnimationClip::new(name, Arc::clone(rig), tracks, duration, TICKS_PER_SECOND).map(Arc::new)
}

/// `idle`, `magic`, `jump` and `crouch` clips for the runner character.
pub fn runner_clips(rig: &Arc<BoneNode>) -> Result<Vec<Arc<AnimationClip>>> {
    Ok(vec![
        swing_clip("idle", rig, 1.0, 0.6, 0.0)?,
        swing_clip("magic", rig, 1.2, 0.3, 1.0)?,
        swing_clip("jump", rig, 1.0, 0.9, 2.0)?,
        swing_clip("crouch", rig, 0.8, 0.2, 0.5)?,
    ])
}

/// `idle` and `slash` clips for the duelist character.
pub fn duelist_clips(rig: &Arc<BoneNode>) -> Result<Vec<Arc<AnimationClip>>> {
    Ok(vec![
        swing_clip("idle", rig, 2.0, 0.1, 0.0)?,
        swing_clip("slash", rig, 0.8, 1.2, 0.3)?,
    ])
}
