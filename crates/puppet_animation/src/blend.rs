//! Blend Engine
//!
//! Walks a bone hierarchy depth-first and writes one skinning matrix per
//! bound bone.
//!
//! # Per-node local transform
//!
//! 1. Bone in the active [`BoneMask`] and the lower slot animates it:
//!    sample the lower clip only (partial-body override).
//! 2. Primary slot animates it: sample primary; if the secondary slot also
//!    animates it, cross-fade the two poses by the session blend factor.
//! 3. Otherwise: the node's bind-pose transform.
//!
//! The world transform is `parent_world * local`; bound bones receive
//! `world * inverse_bind`. Bones the binding does not know are traversed
//! but never written, and output slots for bones absent from the hierarchy
//! keep their previous value.

use glam::Mat4;

use crate::binding::SkeletonBinding;
use crate::hierarchy::BoneNode;
use crate::session::{BlendSession, BoneMask, ClipSlot};
use crate::tracks::BoneTrack;
use crate::values::BonePose;

/// Fixed-capacity array of skinning matrices indexed by bone index.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneMatrices {
    matrices: Vec<Mat4>,
}

impl BoneMatrices {
    /// Identity-initialised array of `capacity` matrices.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; capacity],
        }
    }

    #[must_use]
    pub fn for_binding(binding: &SkeletonBinding) -> Self {
        Self::new(binding.capacity())
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Mat4> {
        self.matrices.get(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Resets every entry to identity.
    pub fn reset(&mut self) {
        self.matrices.fill(Mat4::IDENTITY);
    }
}

impl std::ops::Index<usize> for BoneMatrices {
    type Output = Mat4;

    fn index(&self, index: usize) -> &Mat4 {
        &self.matrices[index]
    }
}

/// Counters from one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlendStats {
    /// Hierarchy nodes visited.
    pub visited: usize,
    /// Output entries written (bound bones reached).
    pub written: usize,
}

/// Computes the skinning matrices for `hierarchy` under `session`.
///
/// `mask` selects the bones pinned to the lower slot; it has no effect when
/// the session has no lower slot.
///
/// # Panics
///
/// Panics if a bone index in `binding` is outside `output`. Size `output`
/// with [`BoneMatrices::for_binding`].
pub fn compute_bone_matrices(
    hierarchy: &BoneNode,
    session: &BlendSession,
    mask: Option<&BoneMask>,
    binding: &SkeletonBinding,
    output: &mut BoneMatrices,
) -> BlendStats {
    let mut stats = BlendStats::default();
    let pass = BlendPass {
        session,
        mask,
        binding,
    };
    pass.visit(hierarchy, Mat4::IDENTITY, output, &mut stats);
    stats
}

struct BlendPass<'a> {
    session: &'a BlendSession,
    mask: Option<&'a BoneMask>,
    binding: &'a SkeletonBinding,
}

impl BlendPass<'_> {
    fn visit(&self, node: &BoneNode, parent_world: Mat4, output: &mut BoneMatrices, stats: &mut BlendStats) {
        stats.visited += 1;

        let world = parent_world * self.local_transform(node);

        if let Some(info) = self.binding.get(&node.name) {
            output.matrices[info.index] = world * info.inverse_bind;
            stats.written += 1;
        }

        for child in &node.children {
            self.visit(child, world, output, stats);
        }
    }

    fn local_transform(&self, node: &BoneNode) -> Mat4 {
        let name = node.name.as_str();

        // Partial-body override
        if self.mask.is_some_and(|mask| mask.contains(name)) {
            if let Some((track, slot)) = slot_track(self.session.lower.as_ref(), name) {
                return track.local_transform_at(slot.time());
            }
        }

        let Some((primary, primary_slot)) = slot_track(self.session.primary.as_ref(), name) else {
            return node.transform;
        };

        let Some((secondary, secondary_slot)) = slot_track(self.session.secondary.as_ref(), name) else {
            return primary.local_transform_at(primary_slot.time());
        };

        let factor = self.session.blend_factor();
        if factor <= 0.0 {
            return primary.local_transform_at(primary_slot.time());
        }
        if factor >= 1.0 {
            return secondary.local_transform_at(secondary_slot.time());
        }

        BonePose::blend(
            &primary.pose_at(primary_slot.time()),
            &secondary.pose_at(secondary_slot.time()),
            factor,
        )
        .to_matrix()
    }
}

#[inline]
fn slot_track<'a>(slot: Option<&'a ClipSlot>, name: &str) -> Option<(&'a BoneTrack, &'a ClipSlot)> {
    let slot = slot?;
    slot.clip().track(name).map(|track| (track, slot))
}
