//! Playback sessions.
//!
//! A session is one iteration (or, for a preview, a few back-to-back
//! iterations) turned into an owned, self-contained graph. It is built on the
//! control thread, moved to the renderer, and dropped once its tail has rung
//! out or its fade has finished. The only thing ever changed on a live
//! session is its master gain, and only to fade it out.

use crate::{
    chain::{build_chain, ChainSettings},
    graph::{gain::GainNode, GraphNode, RenderCtx},
    modes::{Mode, ModeCatalog, ModeName},
    params::LiveParams,
    sequencing::schedule_iteration,
    voices::KickHit,
};

/// Extra time after the last kick for the limiter to release.
pub const RELEASE_TAIL: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// One iteration of the continuous loop
    Loop,
    /// Fixed-parameter one-shot demo
    Preview,
}

/// Everything needed to build a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionSpec<'a> {
    pub id: u64,
    pub kind: SessionKind,
    pub mode: &'a Mode,
    pub params: LiveParams,
    pub start: f64,
    pub cycles: usize,
    pub sample_rate: f32,
}

pub struct Session {
    id: u64,
    kind: SessionKind,
    mode: ModeName,
    start: f64,
    duration: f64,
    tail_end: f64,
    hit_count: usize,
    settings: ChainSettings,
    chain: Box<dyn GraphNode>,
    master: GainNode,
    fade_end: Option<f64>,
}

impl Session {
    pub fn build(catalog: &ModeCatalog, spec: SessionSpec<'_>) -> Self {
        let iteration = schedule_iteration(spec.mode, spec.start, spec.cycles);
        let settings = ChainSettings::derive(spec.mode, &spec.params);
        let chain = build_chain(
            catalog,
            spec.mode,
            &settings,
            &iteration.hits,
            spec.sample_rate,
            spec.id,
        );
        let tail_end = iteration
            .hits
            .iter()
            .map(KickHit::end_time)
            .fold(iteration.end(), f64::max)
            + RELEASE_TAIL;

        Self {
            id: spec.id,
            kind: spec.kind,
            mode: spec.mode.name,
            start: iteration.start,
            duration: iteration.duration,
            tail_end,
            hit_count: iteration.hits.len(),
            settings,
            chain: Box::new(chain),
            master: GainNode::automated(settings.output_level),
            fade_end: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn mode(&self) -> ModeName {
        self.mode
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Start time plus duration: where the next iteration begins.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Time after which the session makes no more sound.
    pub fn tail_end(&self) -> f64 {
        match self.fade_end {
            Some(fade_end) => fade_end.min(self.tail_end),
            None => self.tail_end,
        }
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    pub fn settings(&self) -> &ChainSettings {
        &self.settings
    }

    pub fn is_fading(&self) -> bool {
        self.fade_end.is_some()
    }

    /// Ramp the master gain to zero over `duration`, starting at `time`.
    ///
    /// A second fade never extends the first.
    pub fn fade_out(&mut self, time: f64, duration: f64) {
        if self.fade_end.is_some_and(|end| end <= time + duration) {
            return;
        }
        self.master.fade_out(time, duration);
        self.fade_end = Some(time + duration);
    }

    /// Whether the session is silent for good at `now`.
    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.tail_end() || !self.chain.is_active()
    }

    /// Master gain value at `time`.
    pub fn gain_at(&self, time: f64) -> f32 {
        self.master.value_at(time)
    }
}

impl GraphNode for Session {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        if ctx.block_end(out.len()) <= self.start {
            out.fill(0.0);
            return;
        }
        self.chain.render_block(out, ctx);
        self.master.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.chain.is_active()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("mode", &self.mode)
            .field("start", &self.start)
            .field("duration", &self.duration)
            .field("tail_end", &self.tail_end())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn build(start: f64) -> Session {
        let catalog = ModeCatalog::new();
        Session::build(
            &catalog,
            SessionSpec {
                id: 1,
                kind: SessionKind::Loop,
                mode: catalog.mode(ModeName::Tube),
                params: LiveParams::default(),
                start,
                cycles: 1,
                sample_rate: SAMPLE_RATE,
            },
        )
    }

    fn render(session: &mut Session, from: f64, seconds: f64) -> Vec<f32> {
        let total = (seconds * SAMPLE_RATE as f64) as usize;
        let mut out = vec![0.0; total];
        for (n, block) in out.chunks_mut(256).enumerate() {
            let ctx = RenderCtx::new(SAMPLE_RATE, from + (n * 256) as f64 / SAMPLE_RATE as f64);
            session.render_block(block, &ctx);
        }
        out
    }

    #[test]
    fn session_timing() {
        let session = build(1.0);
        let step = 15.0 / 128.0;

        assert_eq!(session.hit_count(), 5);
        assert!((session.duration() - 16.0 * step).abs() < 1e-9);
        assert!((session.end() - (1.0 + 16.0 * step)).abs() < 1e-9);
        assert!(session.tail_end() > session.end());
        assert!((session.gain_at(1.0) - 0.375).abs() < 1e-6);
    }

    #[test]
    fn silent_until_start() {
        let mut session = build(0.1);
        let out = render(&mut session, 0.0, 0.2);
        let start = (0.1 * SAMPLE_RATE) as usize;

        assert!(out[..start - 1].iter().all(|&s| s.abs() < 1e-4));
        assert!(out[start..].iter().any(|&s| s.abs() > 0.01));
    }

    #[test]
    fn fade_out_silences_and_finishes() {
        let mut session = build(0.0);
        session.fade_out(0.1, 0.03);

        assert!(session.is_fading());
        assert!((session.tail_end() - 0.13).abs() < 1e-9);
        assert!(!session.is_finished(0.12));
        assert!(session.is_finished(0.14));

        let out = render(&mut session, 0.0, 0.3);
        let faded = (0.131 * SAMPLE_RATE) as usize;
        assert!(out[faded..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn second_fade_does_not_extend_the_first() {
        let mut session = build(0.0);
        session.fade_out(0.1, 0.03);
        session.fade_out(0.2, 0.03);

        assert!((session.tail_end() - 0.13).abs() < 1e-9);
    }
}
