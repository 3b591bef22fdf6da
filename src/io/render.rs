use tracing::debug;

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::{
    dsp::mix::sum_in_place,
    graph::{GraphNode, RenderCtx},
    session::{Session, SessionKind},
    MAX_BLOCK_SIZE,
};

/// Sessions the renderer holds without reallocating.
const SESSION_CAPACITY: usize = 8;

/// Control thread → render thread messages.
#[derive(Debug)]
pub enum RenderCommand {
    /// Start rendering a session; it stays silent until its start time.
    Play(Box<Session>),
    /// Fade every matching session out over `fade` seconds from `at`.
    /// `kind: None` silences everything.
    Silence {
        kind: Option<SessionKind>,
        at: f64,
        fade: f64,
    },
}

/// Anything the renderer can pull commands from.
pub trait CommandSource {
    fn pop(&mut self) -> Option<RenderCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandSource for Consumer<RenderCommand> {
    fn pop(&mut self) -> Option<RenderCommand> {
        Consumer::pop(self).ok()
    }
}

/// Owns the audible sessions and mixes them block by block.
///
/// The frame counter is the engine's clock: time only advances as audio is
/// rendered.
pub struct Renderer {
    sample_rate: f32,
    frames: u64,
    sessions: Vec<Box<Session>>,
    scratch: Vec<f32>,
}

impl Renderer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frames: 0,
            sessions: Vec::with_capacity(SESSION_CAPACITY),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn current_time(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn sessions(&self) -> &[Box<Session>] {
        &self.sessions
    }

    pub fn apply(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::Play(session) => self.sessions.push(session),
            RenderCommand::Silence { kind, at, fade } => {
                let at = at.max(self.current_time());
                for session in &mut self.sessions {
                    if kind.map_or(true, |kind| session.kind() == kind) {
                        session.fade_out(at, fade);
                    }
                }
            }
        }
    }

    /// Apply every pending command.
    pub fn drain(&mut self, source: &mut impl CommandSource) {
        while let Some(command) = source.pop() {
            self.apply(command);
        }
    }

    /// Mix all sessions into `out`, handing finished ones to `retire`.
    ///
    /// Sessions leave still boxed so the caller decides which thread frees
    /// them.
    pub fn render(&mut self, out: &mut [f32], mut retire: impl FnMut(Box<Session>)) {
        for block in out.chunks_mut(MAX_BLOCK_SIZE) {
            block.fill(0.0);
            let ctx = RenderCtx::new(self.sample_rate, self.current_time());
            let scratch = &mut self.scratch[..block.len()];

            for session in &mut self.sessions {
                session.render_block(scratch, &ctx);
                sum_in_place(block, scratch);
            }

            self.frames += block.len() as u64;

            let now = self.current_time();
            let mut i = 0;
            while i < self.sessions.len() {
                if self.sessions[i].is_finished(now) {
                    retire(self.sessions.swap_remove(i));
                } else {
                    i += 1;
                }
            }
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("sample_rate", &self.sample_rate)
            .field("frames", &self.frames)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

/// Drop a retired session, noting it at debug level.
pub(crate) fn release(session: Box<Session>) {
    debug!(id = session.id(), kind = ?session.kind(), "session released");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        modes::{ModeCatalog, ModeName},
        params::LiveParams,
        session::SessionSpec,
    };

    const SAMPLE_RATE: f32 = 48_000.0;

    fn session(catalog: &ModeCatalog, id: u64, kind: SessionKind, start: f64) -> Box<Session> {
        Box::new(Session::build(
            catalog,
            SessionSpec {
                id,
                kind,
                mode: catalog.mode(ModeName::Clip),
                params: LiveParams::default(),
                start,
                cycles: 1,
                sample_rate: SAMPLE_RATE,
            },
        ))
    }

    #[test]
    fn clock_advances_with_rendered_frames() {
        let mut renderer = Renderer::new(SAMPLE_RATE);
        let mut out = vec![0.0; 4800];
        renderer.render(&mut out, drop);

        assert_eq!(renderer.frames(), 4800);
        assert!((renderer.current_time() - 0.1).abs() < 1e-12);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn silence_only_touches_matching_sessions() {
        let catalog = ModeCatalog::new();
        let mut renderer = Renderer::new(SAMPLE_RATE);
        renderer.apply(RenderCommand::Play(session(&catalog, 1, SessionKind::Loop, 0.0)));
        renderer.apply(RenderCommand::Play(session(&catalog, 2, SessionKind::Preview, 0.0)));

        renderer.apply(RenderCommand::Silence {
            kind: Some(SessionKind::Preview),
            at: 0.0,
            fade: 0.03,
        });

        let fading: Vec<u64> = renderer
            .sessions()
            .iter()
            .filter(|s| s.is_fading())
            .map(|s| s.id())
            .collect();
        assert_eq!(fading, vec![2]);
    }

    #[test]
    fn finished_sessions_are_retired() {
        let catalog = ModeCatalog::new();
        let mut renderer = Renderer::new(SAMPLE_RATE);
        renderer.apply(RenderCommand::Play(session(&catalog, 7, SessionKind::Loop, 0.0)));
        renderer.apply(RenderCommand::Silence {
            kind: None,
            at: 0.0,
            fade: 0.03,
        });

        let mut retired = Vec::new();
        let mut out = vec![0.0; 4800];
        renderer.render(&mut out, |s| retired.push(s.id()));

        assert_eq!(retired, vec![7]);
        assert!(renderer.sessions().is_empty());
    }

    #[test]
    fn retired_sessions_keep_their_allocation() {
        let catalog = ModeCatalog::new();
        let mut renderer = Renderer::new(SAMPLE_RATE);
        let boxed = session(&catalog, 3, SessionKind::Preview, 0.0);
        let address: *const Session = &*boxed;
        renderer.apply(RenderCommand::Play(boxed));
        renderer.apply(RenderCommand::Silence {
            kind: None,
            at: 0.0,
            fade: 0.01,
        });

        let mut retired = Vec::new();
        let mut out = vec![0.0; 2400];
        renderer.render(&mut out, |s| retired.push(s));

        assert_eq!(retired.len(), 1);
        assert!(std::ptr::eq(&*retired[0], address));
    }
}
