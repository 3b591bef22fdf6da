use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lower and upper bound of every knob.
pub const KNOB_MIN: f32 = 0.0;
pub const KNOB_MAX: f32 = 100.0;

/// One of the four front-panel knobs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Drive,
    Tone,
    Mix,
    Level,
}

impl Param {
    pub const ALL: [Param; 4] = [Param::Drive, Param::Tone, Param::Mix, Param::Level];

    pub fn as_str(self) -> &'static str {
        match self {
            Param::Drive => "drive",
            Param::Tone => "tone",
            Param::Mix => "mix",
            Param::Level => "level",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Param {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(Param::Drive),
            "tone" => Ok(Param::Tone),
            "mix" => Ok(Param::Mix),
            "level" => Ok(Param::Level),
            _ => Err(EngineError::UnknownParameter(s.to_string())),
        }
    }
}

/// Clamp a knob value into `[0, 100]`.
///
/// Infinities land on the nearest bound; NaN is treated as the bottom of
/// the range.
#[inline]
pub fn clamp_knob(value: f32) -> f32 {
    if value.is_nan() {
        KNOB_MIN
    } else {
        value.clamp(KNOB_MIN, KNOB_MAX)
    }
}

/// The four live knob values, always within `[0, 100]`.
///
/// Read once at the start of each iteration build; changes never reach an
/// iteration that is already playing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveParams {
    drive: f32,
    tone: f32,
    mix: f32,
    level: f32,
}

impl LiveParams {
    /// Build with every value clamped.
    pub fn new(drive: f32, tone: f32, mix: f32, level: f32) -> Self {
        Self {
            drive: clamp_knob(drive),
            tone: clamp_knob(tone),
            mix: clamp_knob(mix),
            level: clamp_knob(level),
        }
    }

    /// Settings used by the one-shot preview, independent of the knobs.
    pub fn preview() -> Self {
        Self::new(70.0, 60.0, 100.0, 70.0)
    }

    /// Store a clamped value; returns what was actually stored.
    pub fn set(&mut self, param: Param, value: f32) -> f32 {
        let value = clamp_knob(value);
        *self.slot(param) = value;
        value
    }

    pub fn get(&self, param: Param) -> f32 {
        match param {
            Param::Drive => self.drive,
            Param::Tone => self.tone,
            Param::Mix => self.mix,
            Param::Level => self.level,
        }
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn tone(&self) -> f32 {
        self.tone
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    fn slot(&mut self, param: Param) -> &mut f32 {
        match param {
            Param::Drive => &mut self.drive,
            Param::Tone => &mut self.tone,
            Param::Mix => &mut self.mix,
            Param::Level => &mut self.level,
        }
    }
}

impl Default for LiveParams {
    fn default() -> Self {
        Self::new(60.0, 55.0, 80.0, 75.0)
    }
}
