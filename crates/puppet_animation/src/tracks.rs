use glam::{Mat4, Quat, Vec3};

use crate::errors::{AnimationError, Result};
use crate::values::{BonePose, Interpolatable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
}

/// Time-ordered samples of a single value channel.
///
/// Times are in clip ticks. Sampling never extrapolates: before the first
/// sample the first value is returned, past the last sample the last value.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    /// Linear track from `(time, value)` pairs.
    #[must_use]
    pub fn from_samples(samples: impl IntoIterator<Item = (f32, T)>) -> Self {
        let (times, values) = samples.into_iter().unzip();
        Self::new(times, values, InterpolationMode::Linear)
    }

    /// Single-sample track that returns `value` at any time.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self::new(vec![0.0], vec![value], InterpolationMode::Linear)
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last sample, 0 for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Checks the load-time invariants: non-empty, one value per time,
    /// times non-decreasing.
    pub fn validate(&self, bone: &str) -> Result<()> {
        if self.times.is_empty() {
            return Err(AnimationError::EmptyTrack {
                bone: bone.to_string(),
            });
        }
        if self.times.len() != self.values.len() {
            return Err(AnimationError::MismatchedTrackLengths {
                bone: bone.to_string(),
                times: self.times.len(),
                values: self.values.len(),
            });
        }
        if let Some(index) = self.times.windows(2).position(|w| w[1] < w[0]) {
            return Err(AnimationError::NonMonotonicTrack {
                bone: bone.to_string(),
                index: index + 1,
            });
        }
        Ok(())
    }

    /// Samples the track at `time`. Returns `None` only for an empty track.
    ///
    /// A non-finite `time` samples as if before the first keyframe.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let first = *self.values.first()?;
        let len = self.times.len().min(self.values.len());

        // Fast path: static data (single keyframe)
        if len == 1 || !time.is_finite() || time <= self.times[0] {
            return Some(first);
        }

        // partition_point finds the first index where t > time, i.e. next_index
        let next_idx = self.times[..len].partition_point(|&t| t <= time);
        let index = next_idx.saturating_sub(1);

        // No next frame available: hold the last sample
        if index >= len - 1 {
            return Some(self.values[len - 1]);
        }

        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let dt = t1 - t0;

        // Prevent division by zero on zero-length segments
        let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
        let t = t.clamp(0.0, 1.0);

        Some(match self.interpolation {
            InterpolationMode::Step => self.values[index],
            InterpolationMode::Linear => {
                T::interpolate_linear(self.values[index], self.values[index + 1], t)
            }
        })
    }
}

/// The position, rotation and scale channels animating one bone.
///
/// All three channels are validated on construction, so sampling is
/// infallible.
#[derive(Debug, Clone)]
pub struct BoneTrack {
    bone_name: String,
    positions: KeyframeTrack<Vec3>,
    rotations: KeyframeTrack<Quat>,
    scales: KeyframeTrack<Vec3>,
}

impl BoneTrack {
    pub fn new(
        bone_name: impl Into<String>,
        positions: KeyframeTrack<Vec3>,
        rotations: KeyframeTrack<Quat>,
        scales: KeyframeTrack<Vec3>,
    ) -> Result<Self> {
        let bone_name = bone_name.into();
        positions.validate(&bone_name)?;
        rotations.validate(&bone_name)?;
        scales.validate(&bone_name)?;
        Ok(Self {
            bone_name,
            positions,
            rotations,
            scales,
        })
    }

    /// Track holding a single pose for the whole clip.
    #[must_use]
    pub fn from_pose(bone_name: impl Into<String>, pose: BonePose) -> Self {
        Self {
            bone_name: bone_name.into(),
            positions: KeyframeTrack::constant(pose.translation),
            rotations: KeyframeTrack::constant(pose.rotation),
            scales: KeyframeTrack::constant(pose.scale),
        }
    }

    #[inline]
    #[must_use]
    pub fn bone_name(&self) -> &str {
        &self.bone_name
    }

    #[must_use]
    pub fn positions(&self) -> &KeyframeTrack<Vec3> {
        &self.positions
    }

    #[must_use]
    pub fn rotations(&self) -> &KeyframeTrack<Quat> {
        &self.rotations
    }

    #[must_use]
    pub fn scales(&self) -> &KeyframeTrack<Vec3> {
        &self.scales
    }

    /// Latest sample time across the three channels.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.positions
            .end_time()
            .max(self.rotations.end_time())
            .max(self.scales.end_time())
    }

    #[must_use]
    pub fn position_at(&self, time: f32) -> Vec3 {
        self.positions.sample(time).unwrap_or(Vec3::ZERO)
    }

    /// Always a unit quaternion.
    #[must_use]
    pub fn rotation_at(&self, time: f32) -> Quat {
        self.rotations
            .sample(time)
            .map_or(Quat::IDENTITY, Quat::normalize)
    }

    #[must_use]
    pub fn scale_at(&self, time: f32) -> Vec3 {
        self.scales.sample(time).unwrap_or(Vec3::ONE)
    }

    #[must_use]
    pub fn pose_at(&self, time: f32) -> BonePose {
        BonePose::new(
            self.position_at(time),
            self.rotation_at(time),
            self.scale_at(time),
        )
    }

    #[must_use]
    pub fn local_transform_at(&self, time: f32) -> Mat4 {
        self.pose_at(time).to_matrix()
    }
}
