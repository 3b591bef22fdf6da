//! Peak limiter, the last stage before the master gain.
//!
//! A feed-forward compressor with a very high ratio. The level detector is a
//! peak follower with separate attack and release smoothing; the gain
//! computer applies a quadratic soft knee centred on the threshold.
//!
//! ```text
//!   out dB
//!     │            ratio 20:1 → nearly flat
//!   T ┤        ╭───────────────
//!     │      ╭╯ ← knee (T ± knee/2)
//!     │    ╱
//!     │  ╱  1:1 below the knee
//!     └──────────────────────── in dB
//! ```

/// Static limiter settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterSettings {
    /// Threshold in dB
    pub threshold_db: f32,
    /// Knee width in dB (0 = hard knee)
    pub knee_db: f32,
    /// Ratio, e.g. 20.0 for 20:1
    pub ratio: f32,
    /// Attack time in seconds
    pub attack: f32,
    /// Release time in seconds
    pub release: f32,
}

impl LimiterSettings {
    /// The fixed settings of the output stage.
    pub const OUTPUT: LimiterSettings = LimiterSettings {
        threshold_db: -6.0,
        knee_db: 3.0,
        ratio: 20.0,
        attack: 0.001,
        release: 0.05,
    };
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self::OUTPUT
    }
}

#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 1e-6 {
        -120.0
    } else {
        20.0 * linear.log10()
    }
}

#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

pub struct Limiter {
    settings: LimiterSettings,
    envelope: f32,
    coeff_rate: f32,
    attack_coef: f32,
    release_coef: f32,
}

impl Limiter {
    pub fn new(settings: LimiterSettings) -> Self {
        Self {
            settings: LimiterSettings {
                ratio: settings.ratio.max(1.0),
                knee_db: settings.knee_db.max(0.0),
                attack: settings.attack.max(crate::MIN_TIME),
                release: settings.release.max(crate::MIN_TIME),
                ..settings
            },
            envelope: 0.0,
            coeff_rate: 0.0,
            attack_coef: 0.0,
            release_coef: 0.0,
        }
    }

    pub fn settings(&self) -> LimiterSettings {
        self.settings
    }

    /// Gain change in dB for a detector level in dB (always <= 0).
    #[inline]
    pub fn gain_reduction_db(&self, input_db: f32) -> f32 {
        let LimiterSettings {
            threshold_db,
            knee_db,
            ratio,
            ..
        } = self.settings;
        let slope = 1.0 - 1.0 / ratio;

        if knee_db <= 0.0 {
            return if input_db <= threshold_db {
                0.0
            } else {
                (threshold_db - input_db) * slope
            };
        }

        let half_knee = knee_db / 2.0;
        if input_db <= threshold_db - half_knee {
            0.0
        } else if input_db >= threshold_db + half_knee {
            (threshold_db - input_db) * slope
        } else {
            let x = input_db - threshold_db + half_knee;
            -slope * x * x / (2.0 * knee_db)
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        if self.coeff_rate != sample_rate {
            self.attack_coef = (-1.0 / (self.settings.attack * sample_rate)).exp();
            self.release_coef = (-1.0 / (self.settings.release * sample_rate)).exp();
            self.coeff_rate = sample_rate;
        }

        let level = sample.abs();
        let coef = if level > self.envelope {
            self.attack_coef
        } else {
            self.release_coef
        };
        self.envelope = coef * self.envelope + (1.0 - coef) * level;

        let reduction = self.gain_reduction_db(linear_to_db(self.envelope));
        sample * db_to_linear(reduction)
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample, sample_rate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_signal_passes_untouched() {
        let limiter = Limiter::new(LimiterSettings::OUTPUT);
        assert_eq!(limiter.gain_reduction_db(-20.0), 0.0);
        assert_eq!(limiter.gain_reduction_db(-7.5), 0.0);
    }

    #[test]
    fn knee_is_continuous() {
        let limiter = Limiter::new(LimiterSettings::OUTPUT);
        let top = limiter.gain_reduction_db(-4.5);
        let just_above = limiter.gain_reduction_db(-4.4999);
        assert!((top - just_above).abs() < 1e-3);
        // At the top of the knee: (T - in) * slope = -1.5 * 0.95
        assert!((top + 1.425).abs() < 1e-4);
    }

    #[test]
    fn hot_signal_is_pulled_to_threshold() {
        let mut limiter = Limiter::new(LimiterSettings::OUTPUT);
        let mut buffer = vec![1.2f32; 4800];
        limiter.render(&mut buffer, 48_000.0);

        let settled = buffer[4799];
        // 20:1 above -6 dB: a +1.6 dB input lands a hair above threshold
        assert!(settled < db_to_linear(-5.0), "got {settled}");
        assert!(settled > db_to_linear(-7.0), "got {settled}");
    }
}
