use serde::{Deserialize, Serialize};

/// How fast a cross-fade moves its blend factor from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendRate {
    /// Blend factor units per second, scaled by frame time.
    PerSecond(f32),
    /// Fixed increment per frame regardless of frame time. Fade duration
    /// then depends on frame rate; kept to reproduce legacy timing.
    PerFrame(f32),
}

impl Default for BlendRate {
    /// 0.1 per frame at 60 fps.
    fn default() -> Self {
        Self::PerSecond(6.0)
    }
}

impl BlendRate {
    /// Increment for a frame of `dt` seconds.
    #[must_use]
    pub fn step(self, dt: f32) -> f32 {
        match self {
            Self::PerSecond(rate) => rate * dt.max(0.0),
            Self::PerFrame(step) => step,
        }
    }

    #[must_use]
    pub fn is_frame_locked(self) -> bool {
        matches!(self, Self::PerFrame(_))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        match self {
            Self::PerSecond(v) | Self::PerFrame(v) => v,
        }
    }
}
