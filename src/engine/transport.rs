//! Loop transport.
//!
//! Owns playback state (power, active mode, knobs) and keeps the loop going
//! by rebuilding one iteration at a time. Each iteration is a fresh
//! [`Session`] handed to the backend; a timer armed slightly before it ends
//! builds the next one, scheduled to start exactly where the previous one
//! stops.
//!
//! The transport also owns the one-shot preview so the two can exclude each
//! other: starting either one fades every session still sounding, and every
//! new session starts `fade_out` seconds (plus the backend's command
//! latency) in the future so the fade has finished before it becomes
//! audible.

use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    engine::scheduler::{Scheduler, TimerId, TimerTask},
    error::Result,
    io::{AudioBackend, RenderCommand},
    modes::{ModeCatalog, ModeName},
    params::{LiveParams, Param},
    session::{Session, SessionKind, SessionSpec},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
}

/// The loop iteration most recently handed to the backend.
#[derive(Debug, Clone, Copy)]
struct Iteration {
    session_id: u64,
    start: f64,
    duration: f64,
    timer: TimerId,
}

impl Iteration {
    fn end(&self) -> f64 {
        self.start + self.duration
    }
}

#[derive(Debug, Clone, Copy)]
struct Preview {
    session_id: u64,
    mode: ModeName,
    end: f64,
    timer: TimerId,
}

pub struct LoopTransport<B> {
    backend: B,
    catalog: ModeCatalog,
    config: EngineConfig,
    params: LiveParams,
    mode: ModeName,
    state: TransportState,
    generation: u64,
    preview_generation: u64,
    scheduler: Scheduler,
    current: Option<Iteration>,
    preview: Option<Preview>,
    next_session_id: u64,
}

impl<B: AudioBackend> LoopTransport<B> {
    pub fn new(backend: B, config: EngineConfig) -> Self {
        if !backend.is_available() {
            warn!("audio backend unavailable; transport will stay silent");
        }

        Self {
            backend,
            catalog: ModeCatalog::new(),
            params: config.initial_params,
            mode: config.default_mode,
            config,
            state: TransportState::Stopped,
            generation: 0,
            preview_generation: 0,
            scheduler: Scheduler::new(),
            current: None,
            preview: None,
            next_session_id: 1,
        }
    }

    /// Start the loop in `mode`, restarting it if it is already running.
    ///
    /// Silently does nothing when the backend is unavailable.
    pub fn start(&mut self, mode: ModeName) {
        if !self.backend.is_available() {
            warn!(%mode, "start ignored: audio backend unavailable");
            return;
        }

        self.stop_preview();
        self.stop();
        // A preview that has played out is no longer tracked but may still
        // be ringing
        self.silence(None);

        self.mode = mode;
        self.generation += 1;
        let start = self.earliest_start();

        match self.launch_iteration(start) {
            Ok(()) => {
                self.state = TransportState::Running;
                info!(%mode, generation = self.generation, "loop started");
            }
            Err(err) => warn!(error = %err, "loop could not start"),
        }
    }

    /// Stop the loop with a short fade. Does nothing when already stopped.
    pub fn stop(&mut self) {
        if self.state == TransportState::Stopped {
            return;
        }

        if let Some(iteration) = self.current.take() {
            self.scheduler.cancel(iteration.timer);
        }
        self.generation += 1;
        self.state = TransportState::Stopped;
        self.silence(Some(SessionKind::Loop));
        info!(generation = self.generation, "loop stopped");
    }

    /// Switch modes; a running loop restarts in the new mode.
    pub fn set_mode(&mut self, mode: ModeName) {
        self.mode = mode;
        if self.state == TransportState::Running {
            self.stop();
            self.start(mode);
        }
    }

    /// Clamp and store a knob value. Returns the stored value.
    ///
    /// Takes effect when the next iteration is built.
    pub fn set_parameter(&mut self, param: Param, value: f32) -> f32 {
        let stored = self.params.set(param, value);
        debug!(%param, value, stored, "parameter set");
        stored
    }

    /// Play `mode` once with the fixed preview settings.
    pub fn play_preview(&mut self, mode: ModeName) {
        if !self.backend.is_available() {
            warn!(%mode, "preview ignored: audio backend unavailable");
            return;
        }

        self.stop();
        self.stop_preview();
        self.silence(None);

        self.preview_generation += 1;
        let start = self.earliest_start();
        let session = self.build_session(
            SessionKind::Preview,
            mode,
            self.config.preview_params,
            start,
            self.config.preview_iterations,
        );
        let session_id = session.id();
        let end = session.end();

        if let Err(err) = self.backend.submit(RenderCommand::Play(Box::new(session))) {
            warn!(error = %err, "preview could not start");
            return;
        }

        let timer = self.scheduler.schedule(
            end,
            TimerTask::PreviewEnd {
                generation: self.preview_generation,
            },
        );
        self.preview = Some(Preview {
            session_id,
            mode,
            end,
            timer,
        });
        info!(%mode, end, "preview started");
    }

    /// Fade the preview out early. Does nothing when no preview is playing.
    pub fn stop_preview(&mut self) {
        let Some(preview) = self.preview.take() else {
            return;
        };

        self.scheduler.cancel(preview.timer);
        self.preview_generation += 1;
        self.silence(Some(SessionKind::Preview));
        info!(mode = %preview.mode, "preview stopped");
    }

    /// Fire every due timer. Call regularly from the control thread.
    pub fn poll(&mut self) {
        self.backend.maintain();

        if !self.backend.is_available() && self.state == TransportState::Running {
            warn!("audio backend failed; stopping loop");
            if let Some(iteration) = self.current.take() {
                self.scheduler.cancel(iteration.timer);
            }
            self.generation += 1;
            self.state = TransportState::Stopped;
        }

        let now = self.backend.current_time();
        while let Some((_, task)) = self.scheduler.take_due(now) {
            self.handle_timer(task);
        }
    }

    /// Run one timer task. Stale tasks (armed before a stop, restart or
    /// mode switch) are ignored.
    pub fn handle_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::Reschedule { generation, mode } => {
                if generation != self.generation
                    || mode != self.mode
                    || self.state != TransportState::Running
                {
                    debug!(generation, current = self.generation, "stale reschedule ignored");
                    return;
                }
                let Some(previous) = self.current else {
                    return;
                };

                let earliest = self.earliest_start();
                let mut start = previous.end();
                if start < earliest {
                    warn!(late_by = earliest - start, "reschedule fired late");
                    start = earliest;
                }

                debug!(generation, start, "rescheduling loop");
                if let Err(err) = self.launch_iteration(start) {
                    warn!(error = %err, "loop iteration could not be queued; stopping");
                    self.current = None;
                    self.generation += 1;
                    self.state = TransportState::Stopped;
                }
            }
            TimerTask::PreviewEnd { generation } => {
                if generation != self.preview_generation {
                    debug!(generation, "stale preview end ignored");
                    return;
                }
                if let Some(preview) = self.preview.take() {
                    debug!(session = preview.session_id, "preview finished");
                }
            }
        }
    }

    fn launch_iteration(&mut self, start: f64) -> Result<()> {
        let session = self.build_session(SessionKind::Loop, self.mode, self.params, start, 1);
        let session_id = session.id();
        let duration = session.duration();
        debug!(
            session = session_id,
            mode = %self.mode,
            start,
            duration,
            hits = session.hit_count(),
            "iteration built"
        );

        self.backend.submit(RenderCommand::Play(Box::new(session)))?;

        let due = (start + duration - self.config.reschedule_overlap).max(start);
        let timer = self.scheduler.schedule(
            due,
            TimerTask::Reschedule {
                generation: self.generation,
                mode: self.mode,
            },
        );
        self.current = Some(Iteration {
            session_id,
            start,
            duration,
            timer,
        });
        Ok(())
    }

    fn build_session(
        &mut self,
        kind: SessionKind,
        mode: ModeName,
        params: LiveParams,
        start: f64,
        cycles: usize,
    ) -> Session {
        let id = self.next_session_id;
        self.next_session_id += 1;

        Session::build(
            &self.catalog,
            SessionSpec {
                id,
                kind,
                mode: self.catalog.mode(mode),
                params,
                start,
                cycles,
                sample_rate: self.backend.sample_rate(),
            },
        )
    }

    /// New sessions wait for the stop fade plus the backend's command
    /// latency, so they never begin mid-envelope or overlap a fading one.
    fn earliest_start(&self) -> f64 {
        self.backend.current_time() + self.config.fade_out + self.backend.latency()
    }

    /// Fade out every session of `kind`, or every session for `None`.
    fn silence(&mut self, kind: Option<SessionKind>) {
        let command = RenderCommand::Silence {
            kind,
            at: self.backend.current_time(),
            fade: self.config.fade_out,
        };
        if let Err(err) = self.backend.submit(command) {
            warn!(error = %err, ?kind, "silence could not be queued");
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Running
    }

    pub fn mode(&self) -> ModeName {
        self.mode
    }

    pub fn params(&self) -> &LiveParams {
        &self.params
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether audio can be produced at all.
    pub fn is_unavailable(&self) -> bool {
        !self.backend.is_available()
    }

    pub fn is_preview_playing(&self) -> bool {
        self.preview.is_some()
    }

    /// Session id, start and duration of the current loop iteration.
    pub fn current_iteration(&self) -> Option<(u64, f64, f64)> {
        self.current.map(|it| (it.session_id, it.start, it.duration))
    }

    /// When the preview's last iteration ends.
    pub fn preview_end(&self) -> Option<f64> {
        self.preview.map(|preview| preview.end)
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
