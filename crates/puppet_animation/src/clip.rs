use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::errors::{AnimationError, Result};
use crate::hierarchy::BoneNode;
use crate::tracks::BoneTrack;

/// A named animation: per-bone tracks over the skeleton it was authored for.
///
/// Immutable once built; share it between characters with `Arc<AnimationClip>`.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    hierarchy: Arc<BoneNode>,
    tracks: FxHashMap<String, BoneTrack>,
    /// Length in ticks.
    duration: f32,
    ticks_per_second: f32,
}

impl AnimationClip {
    pub fn new(
        name: impl Into<String>,
        hierarchy: Arc<BoneNode>,
        tracks: impl IntoIterator<Item = BoneTrack>,
        duration: f32,
        ticks_per_second: f32,
    ) -> Result<Self> {
        let name = name.into();

        if !(duration > 0.0 && duration.is_finite()) {
            return Err(AnimationError::InvalidDuration {
                clip: name,
                duration,
            });
        }
        if !(ticks_per_second > 0.0 && ticks_per_second.is_finite()) {
            return Err(AnimationError::InvalidTicksPerSecond {
                clip: name,
                ticks_per_second,
            });
        }

        let tracks = tracks
            .into_iter()
            .map(|track| (track.bone_name().to_string(), track))
            .collect();

        Ok(Self {
            name,
            hierarchy,
            tracks,
            duration,
            ticks_per_second,
        })
    }

    /// Builds a clip whose duration is the latest keyframe time across all
    /// tracks.
    pub fn from_tracks(
        name: impl Into<String>,
        hierarchy: Arc<BoneNode>,
        tracks: Vec<BoneTrack>,
        ticks_per_second: f32,
    ) -> Result<Self> {
        let duration = tracks
            .iter()
            .map(BoneTrack::end_time)
            .fold(0.0_f32, f32::max);
        Self::new(name, hierarchy, tracks, duration, ticks_per_second)
    }

    #[inline]
    #[must_use]
    pub fn hierarchy(&self) -> &BoneNode {
        &self.hierarchy
    }

    #[must_use]
    pub fn shared_hierarchy(&self) -> &Arc<BoneNode> {
        &self.hierarchy
    }

    #[inline]
    #[must_use]
    pub fn track(&self, bone_name: &str) -> Option<&BoneTrack> {
        self.tracks.get(bone_name)
    }

    pub fn tracks(&self) -> impl Iterator<Item = &BoneTrack> {
        self.tracks.values()
    }

    /// Number of animated bones.
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.duration / self.ticks_per_second
    }

    /// Maps a tick time to `[0, 1)` progress through the clip.
    #[must_use]
    pub fn normalized(&self, time: f32) -> f32 {
        time.rem_euclid(self.duration) / self.duration
    }
}
