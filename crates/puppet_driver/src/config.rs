use std::collections::BTreeMap;
use std::path::Path;

use puppet_animation::{BoneMask, MAX_BONES};
use serde::{Deserialize, Serialize};

use crate::archetypes::duelist;
use crate::errors::{DriverError, Result};
use crate::ramp::BlendRate;

/// Lower-body and head bones of the runner rig that keep the run cycle while
/// the upper body casts.
pub const DEFAULT_FROZEN_BONES: &[&str] = &[
    "LeftFoot_58",
    "LeftToeBase_57",
    "RightFoot_63",
    "RightToeBase_62",
    "LeftLeg_59",
    "LeftUpLeg_60",
    "RightLeg_64",
    "RightUpLeg_65",
    "Hips_66",
    "Neck_4",
    "Head_3",
    "LeftEye_1",
    "RightEye_2",
    "HeadTop_End_0",
];

/// Tunables shared by the bundled archetypes.
///
/// ```json
/// {
///   "blend_rate": { "per_second": 6.0 },
///   "archetype_blend_rates": { "duelist": { "per_second": 3.3 } },
///   "progress_thresholds": { "magic_release": 0.73 },
///   "frozen_bones": ["LeftLeg_59", "RightLeg_64"],
///   "bone_capacity": 100
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSettings {
    pub blend_rate: BlendRate,
    /// Per-archetype rates that take precedence over `blend_rate`, keyed by
    /// archetype name.
    pub archetype_blend_rates: BTreeMap<String, BlendRate>,
    /// Normalized clip progress at which timed transitions fire, keyed by
    /// transition label.
    pub progress_thresholds: BTreeMap<String, f32>,
    pub frozen_bones: Vec<String>,
    pub bone_capacity: usize,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            blend_rate: BlendRate::default(),
            archetype_blend_rates: BTreeMap::from([(duelist::ARCHETYPE.to_string(), duelist::BLEND_RATE)]),
            progress_thresholds: BTreeMap::new(),
            frozen_bones: DEFAULT_FROZEN_BONES.iter().map(ToString::to_string).collect(),
            bone_capacity: MAX_BONES,
        }
    }
}

impl DriverSettings {
    /// Fixed 0.1 step per frame regardless of frame time, 0.055 for the
    /// duelist.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            blend_rate: BlendRate::PerFrame(0.1),
            archetype_blend_rates: BTreeMap::from([(duelist::ARCHETYPE.to_string(), duelist::LEGACY_BLEND_RATE)]),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loading driver settings from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        check_rate("blend_rate".into(), self.blend_rate)?;
        for (archetype, &rate) in &self.archetype_blend_rates {
            check_rate(format!("archetype_blend_rates.{archetype}"), rate)?;
        }
        for (label, &threshold) in &self.progress_thresholds {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(DriverError::InvalidSetting {
                    name: format!("progress_thresholds.{label}"),
                    reason: format!("must be within [0, 1], got {threshold}"),
                });
            }
        }
        if self.bone_capacity == 0 {
            return Err(DriverError::InvalidSetting {
                name: "bone_capacity".into(),
                reason: "must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Blend rate of `archetype`: its override if configured, else the
    /// shared `blend_rate`.
    #[must_use]
    pub fn blend_rate_for(&self, archetype: &str) -> BlendRate {
        self.archetype_blend_rates.get(archetype).copied().unwrap_or(self.blend_rate)
    }

    /// Threshold for `label`, or `default` when unset.
    #[must_use]
    pub fn threshold(&self, label: &str, default: f32) -> f32 {
        self.progress_thresholds.get(label).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn frozen_mask(&self) -> BoneMask {
        self.frozen_bones.iter().cloned().collect()
    }
}

fn check_rate(name: String, rate: BlendRate) -> Result<()> {
    let value = rate.value();
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(DriverError::InvalidSetting {
            name,
            reason: format!("must be positive, got {value}"),
        })
    }
}
