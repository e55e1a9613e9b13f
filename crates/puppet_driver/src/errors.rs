//! Error Types
//!
//! Failures while configuring drivers: settings that fail to parse,
//! transition tables that reference undeclared states, and animation data
//! rejected at load time. Per-frame driving never fails; transitions whose
//! clips are not loaded are skipped instead.

use puppet_animation::AnimationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    /// Settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed.
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    /// A transition or start request names a state the table never declared.
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// Threshold or rate outside its valid range.
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting {
        /// Setting key
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Animation data rejected while building a character.
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),
}

/// Alias for `Result<T, DriverError>`.
pub type Result<T> = std::result::Result<T, DriverError>;
