use crate::{
    dsp::{
        amplify::{apply_gain, multiply_in_place},
        automation::Automation,
    },
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/// Gain stage, either fixed or driven by an automation timeline.
pub struct GainNode {
    gain: Gain,
    curve_buffer: Vec<f32>,
}

enum Gain {
    Fixed(f32),
    Automated(Automation),
}

impl GainNode {
    pub fn new(gain: f32) -> Self {
        Self {
            gain: Gain::Fixed(gain),
            curve_buffer: Vec::new(),
        }
    }

    /// Gain that follows a timeline; starts at `initial` from time zero.
    pub fn automated(initial: f32) -> Self {
        let mut timeline = Automation::new(initial);
        timeline.set_value_at(initial, 0.0);
        Self {
            gain: Gain::Automated(timeline),
            curve_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Current gain value at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        match &self.gain {
            Gain::Fixed(gain) => *gain,
            Gain::Automated(timeline) => timeline.value_at(time),
        }
    }

    /// Ramp linearly to silence over `duration`, starting from the value at `time`.
    pub fn fade_out(&mut self, time: f64, duration: f64) {
        if let Gain::Fixed(gain) = self.gain {
            let mut timeline = Automation::new(gain);
            timeline.set_value_at(gain, 0.0);
            self.gain = Gain::Automated(timeline);
            self.curve_buffer.resize(MAX_BLOCK_SIZE, 0.0);
        }

        if let Gain::Automated(timeline) = &mut self.gain {
            timeline
                .cancel_and_hold(time)
                .linear_ramp_to(0.0, time + duration);
        }
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        match &self.gain {
            Gain::Fixed(gain) => apply_gain(out, *gain),
            Gain::Automated(timeline) => {
                let len = out.len().min(self.curve_buffer.len());
                let gains = &mut self.curve_buffer[..len];
                timeline.render(gains, ctx.time, ctx.sample_rate);
                multiply_in_place(&mut out[..len], gains);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_gain_scales() {
        let mut node = GainNode::new(0.5);
        let mut buffer = vec![1.0; 16];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!(buffer.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn fade_out_reaches_silence() {
        let mut node = GainNode::automated(0.4);
        node.fade_out(1.0, 0.03);

        assert!((node.value_at(0.5) - 0.4).abs() < 1e-6);
        assert!((node.value_at(1.015) - 0.2).abs() < 1e-4);
        assert_eq!(node.value_at(1.03), 0.0);
        assert_eq!(node.value_at(2.0), 0.0);
    }

    #[test]
    fn fading_a_fixed_gain_switches_to_a_timeline() {
        let mut node = GainNode::new(1.0);
        node.fade_out(0.0, 0.01);

        let mut buffer = vec![1.0; 960];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!((buffer[0] - 1.0).abs() < 1e-6);
        assert_eq!(buffer[959], 0.0);
    }
}
