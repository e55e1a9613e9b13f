use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::clip::AnimationClip;
use crate::errors::{AnimationError, Result};

/// Default size of the output matrix array.
pub const MAX_BONES: usize = 100;

/// Per-bone skinning data: slot in the output array and inverse bind matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfo {
    pub index: usize,
    /// Maps mesh space into the bone's rest-pose local space ("offset" matrix).
    pub inverse_bind: Mat4,
}

/// Bone name to [`BoneInfo`] map shared by every clip of one character.
///
/// Indices are assigned once and never change; every index is below
/// [`capacity`](Self::capacity), which is what lets the blend pass write into
/// the output array without bounds failures.
#[derive(Debug, Clone)]
pub struct SkeletonBinding {
    bones: FxHashMap<String, BoneInfo>,
    // index -> bone name, for duplicate detection and reverse lookups
    names: Vec<Option<String>>,
    capacity: usize,
}

impl Default for SkeletonBinding {
    fn default() -> Self {
        Self::with_capacity(MAX_BONES)
    }
}

impl SkeletonBinding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bones: FxHashMap::default(),
            names: Vec::new(),
            capacity,
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BoneInfo> {
        self.bones.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    /// Bone name bound to `index`, if any.
    #[must_use]
    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index)?.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoneInfo)> {
        self.bones.iter().map(|(name, info)| (name.as_str(), info))
    }

    /// Binds `name` at an explicit index.
    ///
    /// Rebinding an existing name to its own index only replaces the inverse
    /// bind matrix.
    pub fn insert(&mut self, name: impl Into<String>, index: usize, inverse_bind: Mat4) -> Result<()> {
        let name = name.into();
        if index >= self.capacity {
            return Err(AnimationError::BoneCapacityExceeded {
                bone: name,
                index,
                capacity: self.capacity,
            });
        }

        if let Some(Some(existing)) = self.names.get(index) {
            if *existing != name {
                return Err(AnimationError::DuplicateBoneIndex {
                    bone: name,
                    index,
                    existing: existing.clone(),
                });
            }
        }

        if let Some(previous) = self.bones.get(&name) {
            if previous.index != index {
                return Err(AnimationError::DuplicateBoneIndex {
                    bone: name.clone(),
                    index,
                    existing: name,
                });
            }
        }

        if self.names.len() <= index {
            self.names.resize(index + 1, None);
        }
        self.names[index] = Some(name.clone());
        self.bones.insert(name, BoneInfo { index, inverse_bind });
        Ok(())
    }

    /// Returns the index of `name`, assigning the next free one on first use.
    pub fn register(&mut self, name: &str, inverse_bind: Mat4) -> Result<usize> {
        if let Some(info) = self.bones.get(name) {
            return Ok(info.index);
        }

        let index = self
            .names
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.names.len());
        let before = self.len();
        self.insert(name, index, inverse_bind)?;

        if crosses_fill_warning(before, self.len(), self.capacity) {
            log::warn!(
                "Skeleton binding nearly full: {} of {} bone slots used",
                self.len(),
                self.capacity
            );
        }
        Ok(index)
    }

    /// Binds every animated bone of `clip` that the mesh did not declare,
    /// using an identity inverse bind matrix. Returns how many were added.
    pub fn register_missing_bones(&mut self, clip: &AnimationClip) -> Result<usize> {
        let mut missing: Vec<&str> = clip
            .tracks()
            .map(|track| track.bone_name())
            .filter(|name| !self.contains(name))
            .collect();
        // Deterministic index assignment regardless of hash order
        missing.sort_unstable();

        for name in &missing {
            self.register(name, Mat4::IDENTITY)?;
        }
        if !missing.is_empty() {
            log::debug!(
                "Clip '{}' bound {} bones missing from the skeleton",
                clip.name,
                missing.len()
            );
        }
        Ok(missing.len())
    }
}

/// Whether growing from `before` to `after` bound bones first reaches 90% of
/// `capacity`.
fn crosses_fill_warning(before: usize, after: usize, capacity: usize) -> bool {
    let threshold = capacity * 9;
    before * 10 < threshold && after * 10 >= threshold
}
