//! Named color modes and their ranges.

use crate::profile::CustomColorProfile;
use colortrack_core::{ColorRange, Hsv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BLUE: ColorRange =
    ColorRange::new_unchecked(Hsv::new(100, 120, 120), Hsv::new(140, 255, 255));
pub const YELLOW: ColorRange =
    ColorRange::new_unchecked(Hsv::new(15, 120, 120), Hsv::new(35, 255, 255));
/// Wraps through the hue origin.
pub const RED: ColorRange =
    ColorRange::new_unchecked(Hsv::new(170, 120, 120), Hsv::new(10, 255, 255));

/// Which color to track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Track nothing.
    None,
    Blue,
    #[default]
    Yellow,
    Red,
    /// Use the range of the current [`CustomColorProfile`].
    Custom,
}

impl ThresholdMode {
    pub const ALL: [ThresholdMode; 5] = [
        ThresholdMode::None,
        ThresholdMode::Blue,
        ThresholdMode::Yellow,
        ThresholdMode::Red,
        ThresholdMode::Custom,
    ];

    /// Constant range of a preset mode; `None` for `None` and `Custom`.
    pub fn preset(self) -> Option<ColorRange> {
        match self {
            ThresholdMode::Blue => Some(BLUE),
            ThresholdMode::Yellow => Some(YELLOW),
            ThresholdMode::Red => Some(RED),
            ThresholdMode::None | ThresholdMode::Custom => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThresholdMode::None => "none",
            ThresholdMode::Blue => "blue",
            ThresholdMode::Yellow => "yellow",
            ThresholdMode::Red => "red",
            ThresholdMode::Custom => "custom",
        }
    }
}

impl fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown threshold mode {0:?} (expected none, blue, yellow, red or custom)")]
pub struct ParseModeError(pub String);

impl FromStr for ThresholdMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        ThresholdMode::ALL
            .into_iter()
            .find(|m| m.name() == lower)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Mode -> range lookup: three constant entries plus the custom profile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTable {
    #[serde(default)]
    pub custom: CustomColorProfile,
}

impl RangeTable {
    pub fn new(custom: CustomColorProfile) -> Self {
        Self { custom }
    }

    /// Range to threshold for `mode`, or `None` when nothing is tracked.
    pub fn resolve(&self, mode: ThresholdMode) -> Option<ColorRange> {
        match mode {
            ThresholdMode::Custom => Some(self.custom.range),
            other => other.preset(),
        }
    }

    /// Table with the custom entry replaced.
    pub fn with_custom(mut self, custom: CustomColorProfile) -> Self {
        self.custom = custom;
        self
    }
}
