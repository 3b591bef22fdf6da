/*
Kick Chain
==========

Every iteration gets a freshly built graph. Nothing in a running graph is
ever retuned; knob changes reach the sound at the next iteration boundary.

  kick bus ─▶ pre EQ ─┬──────────────────────────────────────────────┐ dry
                      │                                              │
                      └─▶ drive ─▶ shaper ×3 (4×) ─▶ post EQ ─▶ tone ┤ wet
                                                                     ▼
                                                          dry/wet ─▶ limiter

The session adds the master gain (output level) after the limiter.

Knob mapping (knobs are 0-100):

  drive_amount = drive/100 · base_drive · 3
  tone_hz      = 800 + tone/100 · 6000
  wet          = mix/100,  dry = 1 - wet
  output_level = level/100 · 0.5

The dry path keeps the transient punch that heavy distortion would smear;
mix brings it back.
*/

use crate::{
    graph::{
        filter::FilterNode, gain::GainNode, limiter::LimiterNode, shaper::ShaperNode, GraphNode,
        NodeExt,
    },
    modes::{Mode, ModeCatalog},
    params::LiveParams,
    voices::{KickBus, KickHit},
};

/// Lowest tone corner (knob at 0).
pub const TONE_MIN_HZ: f32 = 800.0;
/// Tone corner sweep across the knob's travel.
pub const TONE_RANGE_HZ: f32 = 6000.0;
/// Output level with the level knob fully up.
pub const MAX_OUTPUT_LEVEL: f32 = 0.5;

/// Knob values turned into chain quantities for one mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainSettings {
    pub drive_amount: f32,
    pub tone_hz: f32,
    pub wet: f32,
    pub dry: f32,
    pub output_level: f32,
}

impl ChainSettings {
    pub fn derive(mode: &Mode, params: &LiveParams) -> Self {
        let wet = params.mix() / 100.0;
        Self {
            drive_amount: params.drive() / 100.0 * mode.base_drive * 3.0,
            tone_hz: TONE_MIN_HZ + params.tone() / 100.0 * TONE_RANGE_HZ,
            wet,
            dry: 1.0 - wet,
            output_level: params.level() / 100.0 * MAX_OUTPUT_LEVEL,
        }
    }
}

/// Assemble the processing graph for one iteration, up to and including the
/// limiter.
pub fn build_chain(
    catalog: &ModeCatalog,
    mode: &Mode,
    settings: &ChainSettings,
    hits: &[KickHit],
    sample_rate: f32,
    seed: u64,
) -> impl GraphNode {
    let [first, second, third] = catalog.curves(mode.name).clone();
    let pre = mode.pre_eq;
    let post = mode.post_eq;

    let wet = GainNode::new(settings.drive_amount)
        .through(ShaperNode::new(first))
        .through(ShaperNode::new(second))
        .through(ShaperNode::new(third))
        .through(FilterNode::peaking(post.freq_hz, post.q, post.gain_db))
        .through(FilterNode::lowpass(settings.tone_hz));

    KickBus::new(hits, sample_rate, seed)
        .through(FilterNode::peaking(pre.freq_hz, pre.q, pre.gain_db))
        .dry_wet(wet, settings.wet)
        .through(LimiterNode::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::RenderCtx,
        modes::{ModeName, FUZZ, TUBE},
        params::Param,
        sequencing::schedule_iteration,
    };

    #[test]
    fn knob_mapping() {
        let params = LiveParams::new(50.0, 50.0, 25.0, 100.0);
        let settings = ChainSettings::derive(&FUZZ, &params);

        assert!((settings.drive_amount - 6.0).abs() < 1e-6);
        assert!((settings.tone_hz - 3800.0).abs() < 1e-3);
        assert!((settings.wet - 0.25).abs() < 1e-6);
        assert!((settings.dry - 0.75).abs() < 1e-6);
        assert!((settings.output_level - 0.5).abs() < 1e-6);
    }

    #[test]
    fn knob_extremes() {
        let mut params = LiveParams::default();
        for param in Param::ALL {
            params.set(param, 0.0);
        }
        let settings = ChainSettings::derive(&TUBE, &params);

        assert_eq!(settings.drive_amount, 0.0);
        assert_eq!(settings.tone_hz, TONE_MIN_HZ);
        assert_eq!(settings.wet, 0.0);
        assert_eq!(settings.dry, 1.0);
        assert_eq!(settings.output_level, 0.0);
    }

    #[test]
    fn chain_renders_bounded_audio() {
        let catalog = ModeCatalog::new();
        let sample_rate = 48_000.0;
        for name in ModeName::ALL {
            let mode = catalog.mode(name);
            let iteration = schedule_iteration(mode, 0.0, 1);
            let settings = ChainSettings::derive(mode, &LiveParams::new(100.0, 100.0, 100.0, 100.0));
            let mut chain = build_chain(&catalog, mode, &settings, &iteration.hits, sample_rate, 1);

            let mut block = vec![0.0; 512];
            let mut peak = 0.0f32;
            for n in 0..40 {
                let ctx = RenderCtx::new(sample_rate, n as f64 * 512.0 / sample_rate as f64);
                chain.render_block(&mut block, &ctx);
                assert!(block.iter().all(|s| s.is_finite()), "{name}");
                peak = block.iter().fold(peak, |acc, &s| acc.max(s.abs()));
            }
            assert!(peak > 0.05, "{name}: peak={peak}");
            assert!(peak < 2.0, "{name}: peak={peak}");
        }
    }

    fn render_chain(mode: &Mode, params: LiveParams, blocks: usize) -> Vec<f32> {
        let catalog = ModeCatalog::new();
        let sample_rate = 48_000.0;
        let iteration = schedule_iteration(mode, 0.0, 1);
        let settings = ChainSettings::derive(mode, &params);
        let mut chain = build_chain(&catalog, mode, &settings, &iteration.hits, sample_rate, 5);

        let mut out = vec![0.0; blocks * 512];
        for (n, block) in out.chunks_mut(512).enumerate() {
            let ctx = RenderCtx::new(sample_rate, n as f64 * 512.0 / sample_rate as f64);
            chain.render_block(block, &ctx);
        }
        out
    }

    #[test]
    fn fully_dry_mix_bypasses_the_drive_stack() {
        let gentle = render_chain(&FUZZ, LiveParams::new(0.0, 50.0, 0.0, 80.0), 20);
        let driven = render_chain(&FUZZ, LiveParams::new(100.0, 50.0, 0.0, 80.0), 20);
        assert!(gentle.iter().zip(&driven).all(|(a, b)| a == b));

        // Same as the kick bus through the pre EQ and limiter alone
        let iteration = schedule_iteration(&FUZZ, 0.0, 1);
        let pre = FUZZ.pre_eq;
        let mut dry = KickBus::new(&iteration.hits, 48_000.0, 5)
            .through(FilterNode::peaking(pre.freq_hz, pre.q, pre.gain_db))
            .through(LimiterNode::default());
        let mut expected = vec![0.0; 20 * 512];
        for (n, block) in expected.chunks_mut(512).enumerate() {
            dry.render_block(block, &RenderCtx::new(48_000.0, n as f64 * 512.0 / 48_000.0));
        }
        assert!(gentle
            .iter()
            .zip(&expected)
            .all(|(a, b)| (a - b).abs() < 1e-6));
        assert!(gentle.iter().fold(0.0f32, |acc, &s| acc.max(s.abs())) > 0.1);
    }

    #[test]
    fn fully_wet_mix_drops_the_dry_path() {
        // Zero drive feeds silence into the shapers; with no dry path left
        // nothing reaches the output
        let out = render_chain(&TUBE, LiveParams::new(0.0, 50.0, 100.0, 80.0), 20);
        let peak = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!(peak < 1e-3, "peak={peak}");
    }
}
