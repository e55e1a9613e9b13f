use std::sync::Arc;

use glam::Mat4;

use crate::binding::SkeletonBinding;
use crate::blend::{BlendStats, BoneMatrices, compute_bone_matrices};
use crate::clip::AnimationClip;
use crate::session::{BlendSession, BoneMask, ClipSlot};

/// Per-character blend engine instance.
///
/// Owns its [`BlendSession`] and output matrices; clips and the
/// [`SkeletonBinding`] are shared read-only with other characters of the
/// same rig.
///
/// # Frame flow
///
/// ```rust,ignore
/// animator.set_session(session);        // on a state change
/// animator.update(dt, Some(&leg_mask)); // once per frame
/// upload(animator.bone_matrices());
/// ```
#[derive(Debug, Clone)]
pub struct Animator {
    binding: Arc<SkeletonBinding>,
    session: BlendSession,
    matrices: BoneMatrices,
    last_stats: BlendStats,
}

impl Animator {
    #[must_use]
    pub fn new(binding: Arc<SkeletonBinding>) -> Self {
        let matrices = BoneMatrices::for_binding(&binding);
        Self {
            binding,
            session: BlendSession::default(),
            matrices,
            last_stats: BlendStats::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn binding(&self) -> &Arc<SkeletonBinding> {
        &self.binding
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &BlendSession {
        &self.session
    }

    /// Replaces the session wholesale.
    pub fn set_session(&mut self, session: BlendSession) {
        self.session = session;
    }

    /// Convenience form of [`set_session`](Self::set_session) taking each
    /// slot as an optional clip plus its seed time.
    pub fn play(
        &mut self,
        primary: Option<Arc<AnimationClip>>,
        secondary: Option<Arc<AnimationClip>>,
        lower: Option<Arc<AnimationClip>>,
        times: [f32; 3],
        blend_factor: f32,
    ) {
        let [t1, t2, t3] = times;
        self.set_session(BlendSession::new(
            primary.map(|clip| ClipSlot::new(clip, t1)),
            secondary.map(|clip| ClipSlot::new(clip, t2)),
            lower.map(|clip| ClipSlot::new(clip, t3)),
            blend_factor,
        ));
    }

    #[inline]
    #[must_use]
    pub fn blend_factor(&self) -> f32 {
        self.session.blend_factor()
    }

    pub fn set_blend_factor(&mut self, factor: f32) {
        self.session.set_blend_factor(factor);
    }

    #[must_use]
    pub fn primary_time(&self) -> f32 {
        self.session.primary.as_ref().map_or(0.0, ClipSlot::time)
    }

    #[must_use]
    pub fn secondary_time(&self) -> f32 {
        self.session.secondary.as_ref().map_or(0.0, ClipSlot::time)
    }

    #[must_use]
    pub fn lower_time(&self) -> f32 {
        self.session.lower.as_ref().map_or(0.0, ClipSlot::time)
    }

    /// Advances every cursor by `dt` seconds, then recomputes the matrices.
    ///
    /// Without a primary clip nothing happens and the previous matrices
    /// stay valid.
    pub fn update(&mut self, dt: f32, mask: Option<&BoneMask>) {
        if self.session.primary.is_none() {
            return;
        }
        self.session.advance(dt);
        self.compute(mask);
    }

    /// Recomputes the matrices at the current cursor times.
    pub fn compute(&mut self, mask: Option<&BoneMask>) {
        let Some(primary) = self.session.primary.as_ref() else {
            return;
        };
        self.last_stats = compute_bone_matrices(
            primary.clip().hierarchy(),
            &self.session,
            mask,
            &self.binding,
            &mut self.matrices,
        );
    }

    /// Skinning matrices, valid until the next update.
    #[inline]
    #[must_use]
    pub fn bone_matrices(&self) -> &[Mat4] {
        self.matrices.as_slice()
    }

    #[must_use]
    pub fn last_stats(&self) -> BlendStats {
        self.last_stats
    }

    /// Skinning matrix of a bound bone.
    #[must_use]
    pub fn bone_matrix(&self, name: &str) -> Option<Mat4> {
        let info = self.binding.get(name)?;
        self.matrices.get(info.index).copied()
    }

    /// Model-space transform of a bound bone, for attaching props.
    ///
    /// Undoes the inverse bind matrix applied to the skinning matrix.
    #[must_use]
    pub fn bone_model_matrix(&self, name: &str) -> Option<Mat4> {
        let info = self.binding.get(name)?;
        let skinning = self.matrices.get(info.index)?;
        Some(*skinning * info.inverse_bind.inverse())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::BoneNode;
    use crate::tracks::{BoneTrack, KeyframeTrack};
    use glam::{Quat, Vec3};

    fn sliding_clip() -> Arc<AnimationClip> {
        let root = Arc::new(BoneNode::new("hand", Mat4::IDENTITY));
        let track = BoneTrack::new(
            "hand",
            KeyframeTrack::from_samples([(0.0, Vec3::ZERO), (10.0, Vec3::new(10.0, 0.0, 0.0))]),
            KeyframeTrack::constant(Quat::IDENTITY),
            KeyframeTrack::constant(Vec3::ONE),
        )
        .unwrap();
        Arc::new(AnimationClip::new("slide", root, [track], 10.0, 10.0).unwrap())
    }

    fn binding_with_offset(offset: Mat4) -> Arc<SkeletonBinding> {
        let mut binding = SkeletonBinding::with_capacity(8);
        binding.register("hand", offset).unwrap();
        Arc::new(binding)
    }

    /// `slide` looping in the primary and lower slots.
    fn sliding_animator(offset: Mat4) -> Animator {
        let clip = sliding_clip();
        let mut animator = Animator::new(binding_with_offset(offset));
        animator.set_session(BlendSession::single(clip.clone(), 0.0).with_lower(Some(ClipSlot::new(clip, 0.0))));
        animator
    }

    #[test]
    fn update_without_primary_is_noop() {
        let mut animator = Animator::new(binding_with_offset(Mat4::IDENTITY));
        animator.update(0.5, None);
        assert!(animator.bone_matrices().iter().all(|m| *m == Mat4::IDENTITY));
        assert_eq!(animator.last_stats().visited, 0);
    }

    #[test]
    fn update_advances_then_computes() {
        let mut animator = sliding_animator(Mat4::IDENTITY);
        animator.update(0.25, None);

        assert!((animator.primary_time() - 2.5).abs() < 1e-5);
        assert!((animator.lower_time() - 2.5).abs() < 1e-5);
        let m = animator.bone_matrix("hand").unwrap();
        assert!((m.w_axis.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn model_matrix_undoes_inverse_bind() {
        let offset = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
        let mut animator = sliding_animator(offset);
        animator.update(0.5, None);

        let model = animator.bone_model_matrix("hand").unwrap();
        assert!(model.w_axis.truncate().abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-4));
        let skinning = animator.bone_matrix("hand").unwrap();
        assert!(skinning.w_axis.truncate().abs_diff_eq(Vec3::new(5.0, -1.0, 0.0), 1e-4));
        assert!(animator.bone_model_matrix("missing").is_none());
    }

    #[test]
    fn play_seeds_slot_times() {
        let clip = sliding_clip();
        let mut animator = Animator::new(binding_with_offset(Mat4::IDENTITY));
        animator.play(Some(clip.clone()), Some(clip), None, [1.0, 2.0, 3.0], 0.25);
        assert_eq!(animator.primary_time(), 1.0);
        assert_eq!(animator.secondary_time(), 2.0);
        assert_eq!(animator.lower_time(), 0.0);
        assert_eq!(animator.blend_factor(), 0.25);
    }
}
