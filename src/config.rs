#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{modes::ModeName, params::LiveParams};

/// Engine tuning knobs that are not front-panel knobs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Mode selected at power-on
    pub default_mode: ModeName,
    /// Knob positions at power-on
    pub initial_params: LiveParams,
    /// Fixed settings the preview plays with, regardless of the knobs
    pub preview_params: LiveParams,
    /// Pattern cycles in one preview
    pub preview_iterations: usize,
    /// Delay before a freshly started session becomes audible (seconds).
    /// Also the length of every stop fade, so a fading session is always
    /// silent before its successor starts.
    pub fade_out: f64,
    /// How long before an iteration ends the next one is built (seconds)
    pub reschedule_overlap: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mode: ModeName::Tube,
            initial_params: LiveParams::default(),
            preview_params: LiveParams::preview(),
            preview_iterations: 2,
            fade_out: 0.03,
            reschedule_overlap: 0.05,
        }
    }
}

impl EngineConfig {
    pub fn with_mode(mut self, mode: ModeName) -> Self {
        self.default_mode = mode;
        self
    }

    pub fn with_params(mut self, params: LiveParams) -> Self {
        self.initial_params = params;
        self
    }

    pub fn with_preview_params(mut self, params: LiveParams) -> Self {
        self.preview_params = params;
        self
    }

    pub fn with_preview_iterations(mut self, iterations: usize) -> Self {
        self.preview_iterations = iterations.max(1);
        self
    }

    pub fn with_fade_out(mut self, seconds: f64) -> Self {
        self.fade_out = seconds.max(0.0);
        self
    }

    pub fn with_reschedule_overlap(mut self, seconds: f64) -> Self {
        self.reschedule_overlap = seconds.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();

        assert_eq!(config.default_mode, ModeName::Tube);
        assert_eq!(config.preview_iterations, 2);
        assert_eq!(config.fade_out, 0.03);
        assert_eq!(config.reschedule_overlap, 0.05);
        assert_eq!(config.preview_params.get(Param::Drive), 70.0);
        assert_eq!(config.preview_params.get(Param::Mix), 100.0);
    }

    #[test]
    fn builder_guards_ranges() {
        let config = EngineConfig::default()
            .with_mode(ModeName::Fold)
            .with_preview_iterations(0)
            .with_fade_out(-1.0);

        assert_eq!(config.default_mode, ModeName::Fold);
        assert_eq!(config.preview_iterations, 1);
        assert_eq!(config.fade_out, 0.0);
    }
}
