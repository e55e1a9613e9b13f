use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::clip::AnimationClip;
use crate::cursor::PlaybackCursor;

/// One active clip and its playback cursor.
#[derive(Debug, Clone)]
pub struct ClipSlot {
    clip: Arc<AnimationClip>,
    pub cursor: PlaybackCursor,
    /// Paused slots keep their time; used to hold the last pose of an
    /// outgoing clip while the next one fades in.
    pub paused: bool,
    looped: bool,
}

impl ClipSlot {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>, time: f32) -> Self {
        Self {
            clip,
            cursor: PlaybackCursor::new(time),
            paused: false,
            looped: false,
        }
    }

    /// A slot whose cursor stays at `time`.
    #[must_use]
    pub fn paused(clip: Arc<AnimationClip>, time: f32) -> Self {
        Self {
            paused: true,
            ..Self::new(clip, time)
        }
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.cursor.time
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.cursor.progress(&self.clip)
    }

    /// Whether the last [`advance`](Self::advance) wrapped around the clip.
    #[must_use]
    pub fn looped(&self) -> bool {
        self.looped
    }

    pub fn advance(&mut self, dt: f32) {
        self.looped = !self.paused && self.cursor.advance(dt, &self.clip);
    }
}

/// Which slots drive which bones for the current frame.
///
/// `primary` and `secondary` are cross-faded by `blend_factor`
/// (0 = primary only, 1 = secondary only). Bones listed in the active
/// [`BoneMask`] ignore both and sample `lower` instead.
#[derive(Debug, Clone, Default)]
pub struct BlendSession {
    pub primary: Option<ClipSlot>,
    pub secondary: Option<ClipSlot>,
    pub lower: Option<ClipSlot>,
    blend_factor: f32,
}

impl BlendSession {
    #[must_use]
    pub fn new(
        primary: Option<ClipSlot>,
        secondary: Option<ClipSlot>,
        lower: Option<ClipSlot>,
        blend_factor: f32,
    ) -> Self {
        let mut session = Self {
            primary,
            secondary,
            lower,
            blend_factor: 0.0,
        };
        session.set_blend_factor(blend_factor);
        session
    }

    /// One clip, no blending.
    #[must_use]
    pub fn single(clip: Arc<AnimationClip>, time: f32) -> Self {
        Self::new(Some(ClipSlot::new(clip, time)), None, None, 0.0)
    }

    /// Fade from `from` to `to`, starting at `blend_factor`.
    #[must_use]
    pub fn cross_fade(from: ClipSlot, to: ClipSlot, blend_factor: f32) -> Self {
        Self::new(Some(from), Some(to), None, blend_factor)
    }

    /// Adds the clip that frozen bones sample.
    #[must_use]
    pub fn with_lower(mut self, lower: Option<ClipSlot>) -> Self {
        self.lower = lower;
        self
    }

    #[inline]
    #[must_use]
    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    /// Sets the cross-fade weight, clamped to `[0, 1]`. NaN is treated as 0.
    pub fn set_blend_factor(&mut self, factor: f32) {
        self.blend_factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none() && self.lower.is_none()
    }

    /// Advances every non-paused slot once. Slots are independent.
    pub fn advance(&mut self, dt: f32) {
        for slot in [&mut self.primary, &mut self.secondary, &mut self.lower]
            .into_iter()
            .flatten()
        {
            slot.advance(dt);
        }
    }
}

/// Set of bones pinned to the lower slot (partial-body override).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoneMask {
    bones: FxHashSet<String>,
}

impl BoneMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.bones.insert(name.into())
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bones.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.bones.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for BoneMask {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            bones: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::BoneNode;
    use glam::Mat4;

    fn clip(name: &str, duration: f32) -> Arc<AnimationClip> {
        let root = Arc::new(BoneNode::new("root", Mat4::IDENTITY));
        Arc::new(AnimationClip::new(name, root, [], duration, 10.0).unwrap())
    }

    #[test]
    fn blend_factor_is_clamped() {
        let mut session = BlendSession::single(clip("a", 10.0), 0.0);
        session.set_blend_factor(1.7);
        assert_eq!(session.blend_factor(), 1.0);
        session.set_blend_factor(-0.3);
        assert_eq!(session.blend_factor(), 0.0);
        session.set_blend_factor(f32::NAN);
        assert_eq!(session.blend_factor(), 0.0);
    }

    #[test]
    fn slots_advance_independently() {
        let mut session = BlendSession::new(
            Some(ClipSlot::new(clip("a", 10.0), 0.0)),
            Some(ClipSlot::new(clip("b", 4.0), 3.0)),
            Some(ClipSlot::paused(clip("c", 10.0), 2.0)),
            0.5,
        );
        session.advance(0.2);

        let primary = session.primary.as_ref().unwrap();
        let secondary = session.secondary.as_ref().unwrap();
        let lower = session.lower.as_ref().unwrap();
        assert!((primary.time() - 2.0).abs() < 1e-5);
        assert!(!primary.looped());
        assert!((secondary.time() - 1.0).abs() < 1e-5);
        assert!(secondary.looped());
        assert!((lower.time() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn bone_mask_from_names() {
        let mask: BoneMask = ["LeftLeg", "RightLeg"].into_iter().collect();
        assert!(mask.contains("LeftLeg"));
        assert!(!mask.contains("Head"));
        assert_eq!(mask.len(), 2);
    }
}
