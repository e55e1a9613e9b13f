use crate::clip::AnimationClip;

/// Playback time of one clip slot, in ticks.
///
/// Always loops: the time is wrapped into `[0, duration)` after every
/// advance. Reaching the end of a clip is never an error; callers that care
/// about loop boundaries watch [`progress`](Self::progress) or the wrap flag
/// returned by [`advance`](Self::advance).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackCursor {
    pub time: f32,
}

impl PlaybackCursor {
    #[must_use]
    pub fn new(time: f32) -> Self {
        Self { time }
    }

    /// Advances by `dt` seconds at the clip's tick rate.
    ///
    /// Returns `true` when the cursor crossed the end (or, playing backwards,
    /// the start) of the clip. A non-finite `dt` leaves the cursor where it
    /// is.
    pub fn advance(&mut self, dt: f32, clip: &AnimationClip) -> bool {
        if dt == 0.0 || !dt.is_finite() {
            return false;
        }

        let duration = clip.duration();
        let unwrapped = self.time + clip.ticks_per_second() * dt;

        // Modulo handles any number of wraps in one step
        self.time = unwrapped.rem_euclid(duration);
        // rem_euclid can round up to exactly `duration` for tiny negatives
        if self.time >= duration {
            self.time = 0.0;
        }

        !(0.0..duration).contains(&unwrapped)
    }

    /// Normalized position in the clip, in `[0, 1)`.
    #[must_use]
    pub fn progress(&self, clip: &AnimationClip) -> f32 {
        clip.normalized(self.time)
    }
}
