use glam::{Mat4, Quat, Vec3};

/// Values that can be stored in a [`KeyframeTrack`](crate::tracks::KeyframeTrack).
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Slerp, re-normalized to keep the result on the unit sphere.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.slerp(end, t).normalize()
    }
}

/// Decomposed local transform of one bone at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BonePose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl BonePose {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Cross-fades two poses: lerp for translation and scale, slerp for rotation.
    ///
    /// `factor = 0` returns `a`, `factor = 1` returns `b`.
    #[must_use]
    pub fn blend(a: &Self, b: &Self, factor: f32) -> Self {
        Self {
            translation: Vec3::interpolate_linear(a.translation, b.translation, factor),
            rotation: Quat::interpolate_linear(a.rotation, b.rotation, factor),
            scale: Vec3::interpolate_linear(a.scale, b.scale, factor),
        }
    }

    /// Composes `T * R * S`.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
