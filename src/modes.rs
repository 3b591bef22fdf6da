//! Mode catalog.
//!
//! A mode is a named bundle of everything that gives the kick its character:
//! tempo, the 16-step pattern and its accents, how hard the shaper stack is
//! driven, which three transfer curves it runs through, the two peaking EQs
//! around it, and the kick's own pitch, decay and level.
//!
//! The catalog is constant. [`ModeCatalog`] adds the one piece of derived
//! state: the 12 transfer tables (3 stages × 4 modes), generated once and
//! shared by every session built afterwards.

use std::{fmt, str::FromStr, sync::Arc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    dsp::curve::{CurveShape, TransferCurve},
    error::EngineError,
};

/// Steps in one pattern cycle.
pub const STEPS: usize = 16;

/// Number of cascaded shaper stages.
pub const STAGES: usize = 3;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModeName {
    #[default]
    Tube,
    Fuzz,
    Clip,
    Fold,
}

impl ModeName {
    pub const ALL: [ModeName; 4] = [ModeName::Tube, ModeName::Fuzz, ModeName::Clip, ModeName::Fold];

    /// Look a mode up by name, falling back to `Tube` for anything unknown.
    pub fn resolve(name: &str) -> ModeName {
        name.parse().unwrap_or_else(|_| {
            warn!(mode = name, "unknown mode, falling back to tube");
            ModeName::Tube
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModeName::Tube => "tube",
            ModeName::Fuzz => "fuzz",
            ModeName::Clip => "clip",
            ModeName::Fold => "fold",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse; use [`ModeName::resolve`] for the forgiving lookup.
impl FromStr for ModeName {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tube" => Ok(ModeName::Tube),
            "fuzz" => Ok(ModeName::Fuzz),
            "clip" => Ok(ModeName::Clip),
            "fold" => Ok(ModeName::Fold),
            _ => Err(EngineError::UnknownMode(s.to_string())),
        }
    }
}

/// 16 on/off steps plus a parallel accent table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPattern {
    pub steps: [bool; STEPS],
    /// Relative intensity per step, in (0, 1]
    pub accents: [f32; STEPS],
}

impl StepPattern {
    /// Build from a compact `"1000 1000 1001 0010"` string. Spaces are ignored.
    ///
    /// Panics if the string does not hold exactly 16 steps; only used with
    /// constant tables.
    pub const fn parse(pattern: &str, accents: [f32; STEPS]) -> Self {
        let bytes = pattern.as_bytes();
        let mut steps = [false; STEPS];
        let mut count = 0;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'1' => {
                    steps[count] = true;
                    count += 1;
                }
                b'0' => count += 1,
                _ => {}
            }
            i += 1;
        }
        assert!(count == STEPS, "step pattern must have 16 steps");
        Self { steps, accents }
    }

    #[inline]
    pub fn is_hit(&self, step: usize) -> bool {
        self.steps[step % STEPS]
    }

    #[inline]
    pub fn accent(&self, step: usize) -> f32 {
        self.accents[step % STEPS]
    }

    pub fn hit_count(&self) -> usize {
        self.steps.iter().filter(|&&on| on).count()
    }
}

/// Peaking EQ band.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakingEq {
    pub freq_hz: f32,
    pub q: f32,
    pub gain_db: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KickParams {
    pub pitch_hz: f32,
    pub decay_s: f32,
    pub level: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mode {
    pub name: ModeName,
    pub bpm: f32,
    pub pattern: StepPattern,
    pub base_drive: f32,
    pub curves: [CurveShape; STAGES],
    pub pre_eq: PeakingEq,
    pub post_eq: PeakingEq,
    pub kick: KickParams,
}

impl Mode {
    pub fn get(name: ModeName) -> &'static Mode {
        &MODES[name.index()]
    }
}

pub static MODES: [Mode; 4] = [TUBE, FUZZ, CLIP, FOLD];

/// Warm four-on-the-floor with a syncopated pickup.
pub const TUBE: Mode = Mode {
    name: ModeName::Tube,
    bpm: 128.0,
    pattern: StepPattern::parse(
        "1000 1000 1001 0010",
        [
            1.0, 0.5, 0.5, 0.5, //
            0.85, 0.5, 0.5, 0.5, //
            0.95, 0.5, 0.5, 0.6, //
            0.5, 0.5, 0.7, 0.5,
        ],
    ),
    base_drive: 2.0,
    curves: [
        CurveShape::Saturate(4.0),
        CurveShape::Saturate(12.0),
        CurveShape::Saturate(20.0),
    ],
    pre_eq: PeakingEq {
        freq_hz: 120.0,
        q: 0.9,
        gain_db: 4.0,
    },
    post_eq: PeakingEq {
        freq_hz: 2500.0,
        q: 0.7,
        gain_db: -3.0,
    },
    kick: KickParams {
        pitch_hz: 52.0,
        decay_s: 0.45,
        level: 1.0,
    },
};

/// Faster, busier, diode-asymmetric.
pub const FUZZ: Mode = Mode {
    name: ModeName::Fuzz,
    bpm: 145.0,
    pattern: StepPattern::parse(
        "1000 1010 1000 1011",
        [
            1.0, 0.5, 0.5, 0.5, //
            0.9, 0.5, 0.55, 0.5, //
            1.0, 0.5, 0.5, 0.5, //
            0.9, 0.5, 0.6, 0.75,
        ],
    ),
    base_drive: 4.0,
    curves: [
        CurveShape::Fuzz(3.0),
        CurveShape::Fuzz(8.0),
        CurveShape::Saturate(15.0),
    ],
    pre_eq: PeakingEq {
        freq_hz: 90.0,
        q: 1.2,
        gain_db: 6.0,
    },
    post_eq: PeakingEq {
        freq_hz: 1800.0,
        q: 1.0,
        gain_db: 2.0,
    },
    kick: KickParams {
        pitch_hz: 48.0,
        decay_s: 0.38,
        level: 1.1,
    },
};

/// Broken beat into hard walls.
pub const CLIP: Mode = Mode {
    name: ModeName::Clip,
    bpm: 138.0,
    pattern: StepPattern::parse(
        "1001 0010 1000 1010",
        [
            1.0, 0.5, 0.5, 0.7, //
            0.5, 0.5, 0.8, 0.5, //
            0.95, 0.5, 0.5, 0.5, //
            0.85, 0.5, 0.65, 0.5,
        ],
    ),
    base_drive: 3.0,
    curves: [
        CurveShape::HardClip(0.9),
        CurveShape::Saturate(6.0),
        CurveShape::HardClip(0.6),
    ],
    pre_eq: PeakingEq {
        freq_hz: 150.0,
        q: 0.8,
        gain_db: 3.0,
    },
    post_eq: PeakingEq {
        freq_hz: 3200.0,
        q: 0.9,
        gain_db: -4.0,
    },
    kick: KickParams {
        pitch_hz: 56.0,
        decay_s: 0.32,
        level: 1.0,
    },
};

/// Sparse, slow and long-tailed; the folder fills the space.
pub const FOLD: Mode = Mode {
    name: ModeName::Fold,
    bpm: 124.0,
    pattern: StepPattern::parse(
        "1000 0010 0100 1000",
        [
            1.0, 0.5, 0.5, 0.5, //
            0.5, 0.5, 0.7, 0.5, //
            0.5, 0.8, 0.5, 0.5, //
            0.9, 0.5, 0.5, 0.5,
        ],
    ),
    base_drive: 2.5,
    curves: [
        CurveShape::Fold(2.0),
        CurveShape::Saturate(8.0),
        CurveShape::Fold(3.5),
    ],
    pre_eq: PeakingEq {
        freq_hz: 100.0,
        q: 1.0,
        gain_db: 5.0,
    },
    post_eq: PeakingEq {
        freq_hz: 4000.0,
        q: 0.6,
        gain_db: 3.0,
    },
    kick: KickParams {
        pitch_hz: 45.0,
        decay_s: 0.55,
        level: 0.95,
    },
};

/// The mode table plus every mode's transfer curves, generated once.
pub struct ModeCatalog {
    curves: [[Arc<TransferCurve>; STAGES]; 4],
}

impl ModeCatalog {
    pub fn new() -> Self {
        let curves = MODES.map(|mode| mode.curves.map(|shape| Arc::new(TransferCurve::generate(shape))));
        Self { curves }
    }

    pub fn mode(&self, name: ModeName) -> &'static Mode {
        Mode::get(name)
    }

    /// Forgiving lookup by name.
    pub fn lookup(&self, name: &str) -> &'static Mode {
        Mode::get(ModeName::resolve(name))
    }

    pub fn curves(&self, name: ModeName) -> &[Arc<TransferCurve>; STAGES] {
        &self.curves[name.index()]
    }
}

impl Default for ModeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModeCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeCatalog")
            .field("modes", &ModeName::ALL)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tube_pattern_hits() {
        let hits: Vec<usize> = (0..STEPS).filter(|&i| TUBE.pattern.is_hit(i)).collect();
        assert_eq!(hits, vec![0, 4, 8, 11, 14]);
    }

    #[test]
    fn catalog_is_indexed_by_name() {
        for name in ModeName::ALL {
            assert_eq!(Mode::get(name).name, name);
        }
    }

    #[test]
    fn accents_are_in_unit_range() {
        for mode in &MODES {
            assert!(mode.pattern.accents.iter().all(|&a| a > 0.0 && a <= 1.0), "{}", mode.name);
            assert!(mode.pattern.hit_count() > 0);
        }
    }

    #[test]
    fn unknown_names_fall_back_to_tube() {
        assert_eq!(ModeName::resolve("FUZZ"), ModeName::Fuzz);
        assert_eq!(ModeName::resolve(" fold "), ModeName::Fold);
        assert_eq!(ModeName::resolve("wobble"), ModeName::Tube);
        assert_eq!(ModeName::resolve(""), ModeName::Tube);
        assert!(matches!(
            "wobble".parse::<ModeName>(),
            Err(EngineError::UnknownMode(name)) if name == "wobble"
        ));
    }

    #[test]
    fn catalog_shares_precomputed_curves() {
        let catalog = ModeCatalog::new();
        for name in ModeName::ALL {
            let curves = catalog.curves(name);
            for (curve, shape) in curves.iter().zip(Mode::get(name).curves) {
                assert_eq!(curve.shape(), shape);
            }
        }

        let a = Arc::clone(&catalog.curves(ModeName::Fuzz)[0]);
        let b = Arc::clone(&catalog.curves(ModeName::Fuzz)[0]);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn catalog_curves_stay_in_range() {
        let catalog = ModeCatalog::new();
        for name in ModeName::ALL {
            for curve in catalog.curves(name) {
                assert!(curve
                    .table()
                    .iter()
                    .all(|y| y.is_finite() && y.abs() <= 1.01));
            }
        }
    }
}
