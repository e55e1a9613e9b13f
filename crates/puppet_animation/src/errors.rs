//! Error Types
//!
//! Load-time data-integrity faults for animation data.
//!
//! # Overview
//!
//! The blending path itself is infallible: missing tracks, missing clips and
//! unbound bones all degrade silently. [`AnimationError`] only covers data
//! that is structurally invalid when it is handed to the engine:
//! - empty or non-monotonic keyframe tracks
//! - clips with a non-positive duration or playback rate
//! - skeleton bindings that overflow the output matrix capacity
//!
//! ```rust,ignore
//! use puppet_animation::errors::Result;
//!
//! fn load_track() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Errors raised while building tracks, clips and skeleton bindings.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    // ========================================================================
    // Keyframe Track Errors
    // ========================================================================
    /// A keyframe track was built without any sample.
    #[error("Keyframe track for bone '{bone}' has no samples")]
    EmptyTrack {
        /// Bone the track animates
        bone: String,
    },

    /// Sample times went backwards.
    #[error("Keyframe track for bone '{bone}' is not sorted by time (sample {index})")]
    NonMonotonicTrack {
        /// Bone the track animates
        bone: String,
        /// Index of the first out-of-order sample
        index: usize,
    },

    /// The times and values arrays differ in length.
    #[error("Keyframe track for bone '{bone}' has {times} times but {values} values")]
    MismatchedTrackLengths {
        /// Bone the track animates
        bone: String,
        /// Number of timestamps
        times: usize,
        /// Number of values
        values: usize,
    },

    // ========================================================================
    // Clip Errors
    // ========================================================================
    /// Clip duration must be strictly positive.
    #[error("Clip '{clip}' has invalid duration {duration}")]
    InvalidDuration {
        /// Clip name
        clip: String,
        /// The rejected duration (ticks)
        duration: f32,
    },

    /// Clip playback rate must be strictly positive.
    #[error("Clip '{clip}' has invalid ticks-per-second {ticks_per_second}")]
    InvalidTicksPerSecond {
        /// Clip name
        clip: String,
        /// The rejected rate
        ticks_per_second: f32,
    },

    // ========================================================================
    // Skeleton Binding Errors
    // ========================================================================
    /// The bone index does not fit in the output matrix array.
    #[error("Bone '{bone}' index {index} exceeds skeleton capacity {capacity}")]
    BoneCapacityExceeded {
        /// Bone name
        bone: String,
        /// Requested index
        index: usize,
        /// Output array capacity
        capacity: usize,
    },

    /// Two bones were given the same output index.
    #[error("Bone '{bone}' reuses index {index} already assigned to '{existing}'")]
    DuplicateBoneIndex {
        /// Bone being inserted
        bone: String,
        /// Index it asked for
        index: usize,
        /// Bone that already owns the index
        existing: String,
    },
}

/// Alias for `Result<T, AnimationError>`.
pub type Result<T> = std::result::Result<T, AnimationError>;
