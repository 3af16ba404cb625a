use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel constants the layout is computed against.
///
/// Missing fields fall back to the defaults when deserialized, so a config
/// file only needs to name the constants it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Width reserved for each activity box.
    pub box_width: f64,
    /// Height of each activity box.
    pub box_height: f64,
    /// Minimum horizontal space between neighbouring boxes.
    pub min_spacing: f64,
    /// Lower bound on the proportional base width, so a handful of
    /// activities still spread out.
    pub floor_width: f64,
    /// Distance from the timeline to the near edge of a box in inline mode.
    pub inline_gap: f64,
    /// Distance from the timeline to the near edge of a box in outline mode.
    pub outline_gap: f64,
}

impl LayoutConfig {
    /// Minimum center-to-center distance between consecutive activities.
    pub fn min_gap(&self) -> f64 {
        self.box_width + self.min_spacing
    }

    /// Check that every constant is finite and in range.
    ///
    /// Boxes need a positive width; every other constant may be zero but
    /// never negative, or boxes could be placed closer than their width.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        let bounds = [
            ("boxWidth", self.box_width, Bound::Positive),
            ("boxHeight", self.box_height, Bound::NonNegative),
            ("minSpacing", self.min_spacing, Bound::NonNegative),
            ("floorWidth", self.floor_width, Bound::NonNegative),
            ("inlineGap", self.inline_gap, Bound::NonNegative),
            ("outlineGap", self.outline_gap, Bound::NonNegative),
        ];
        for (field, value, bound) in bounds {
            let ok = value.is_finite()
                && match bound {
                    Bound::Positive => value > 0.0,
                    Bound::NonNegative => value >= 0.0,
                };
            if !ok {
                return Err(InvalidConfigError {
                    field,
                    value,
                    expected: bound.describe(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Positive,
    NonNegative,
}

impl Bound {
    fn describe(self) -> &'static str {
        match self {
            Self::Positive => "a finite number above zero",
            Self::NonNegative => "a finite number, zero or above",
        }
    }
}

/// A layout constant outside the range the engine can place boxes with.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("layout constant `{field}` must be {expected}, got {value}")]
pub struct InvalidConfigError {
    pub field: &'static str,
    pub value: f64,
    pub expected: &'static str,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width: 140.0,
            box_height: 48.0,
            min_spacing: 40.0,
            floor_width: 900.0,
            inline_gap: 100.0,
            outline_gap: 32.0,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown layout mode `{0}` (expected `inline` or `outline`)")]
pub struct UnknownModeError(pub String);

/// How boxes are placed vertically around the timeline.
///
/// Both modes share the same x positions; they differ only in the gap
/// between the line and the boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Boxes float along a single shared band with long connectors.
    #[default]
    Inline,
    /// Boxes sit in two fixed rows with short connector stems.
    Outline,
}

impl LayoutMode {
    pub fn vertical_gap(self, config: &LayoutConfig) -> f64 {
        match self {
            Self::Inline => config.inline_gap,
            Self::Outline => config.outline_gap,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Inline => Self::Outline,
            Self::Outline => Self::Inline,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Outline => "outline",
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "outline" => Ok(Self::Outline),
            _ => Err(UnknownModeError(s.to_string())),
        }
    }
}
