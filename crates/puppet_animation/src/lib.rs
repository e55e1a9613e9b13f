//! Skeletal animation blending core.
//!
//! Samples keyframe tracks, cross-fades up to two clips, pins a subset of
//! bones to a third "lower" clip and produces one skinning matrix per bone.
//!
//! Data flow:
//!
//! ```text
//! AnimationClip (tracks + BoneNode tree) ─┐
//! SkeletonBinding (name -> index, IBM) ───┼─> compute_bone_matrices -> BoneMatrices
//! BlendSession (slots, cursors, factor) ──┘
//! ```

pub mod animator;
pub mod binding;
pub mod blend;
pub mod clip;
pub mod cursor;
pub mod errors;
pub mod hierarchy;
pub mod session;
pub mod tracks;
pub mod values;

pub use animator::Animator;
pub use binding::{BoneInfo, MAX_BONES, SkeletonBinding};
pub use blend::{BlendStats, BoneMatrices, compute_bone_matrices};
pub use clip::AnimationClip;
pub use cursor::PlaybackCursor;
pub use errors::{AnimationError, Result};
pub use hierarchy::BoneNode;
pub use session::{BlendSession, BoneMask, ClipSlot};
pub use tracks::{BoneTrack, InterpolationMode, KeyframeTrack};
pub use values::{BonePose, Interpolatable};
