//! TUI front panel for perdak
//!
//! Power, mode selector, four knobs and a preview button, plus a scope and a
//! spectrum of what the device is playing.

mod knobs;
mod pattern;
mod scope;
mod spectrum;
mod state;
mod transport;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use perdak::{io::DeviceBackend, Engine, ModeName, Param, UiEvent};

use knobs::render_knobs;
use pattern::render_pattern;
use scope::render_scope;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use state::PanelState;
use transport::{render_transport, AudioStats};

/// Samples kept for the scope and the FFT
const VIS_BUFFER_SIZE: usize = 1024;
/// Knob movement per key press
const KNOB_STEP: f32 = 5.0;

pub struct UiApp {
    engine: Engine<DeviceBackend>,
    /// Mono tap of the device output
    scope_rx: Option<Consumer<f32>>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    selected_knob: usize,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        engine: Engine<DeviceBackend>,
        scope_rx: Option<Consumer<f32>>,
        sample_rate: f32,
    ) -> Self {
        Self {
            engine,
            scope_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            selected_knob: 0,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.engine.poll();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps; also the control loop's tick
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        if self.engine.is_running() {
            self.engine.power_toggle();
        }
        Ok(())
    }

    /// Drain the scope tap, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let Some(rx) = self.scope_rx.as_mut() else {
            return;
        };

        while let Ok(sample) = rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => self.engine.handle(UiEvent::PowerToggle),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                let mode = ModeName::ALL[index];
                self.engine.handle(UiEvent::SelectMode(mode.to_string()));
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                let mode = self.engine.mode();
                self.engine.handle(UiEvent::PlayPreview(mode.to_string()));
            }
            KeyCode::Char('s') | KeyCode::Char('S') => self.engine.handle(UiEvent::StopPreview),
            KeyCode::Left => {
                self.selected_knob = (self.selected_knob + Param::ALL.len() - 1) % Param::ALL.len();
            }
            KeyCode::Right => {
                self.selected_knob = (self.selected_knob + 1) % Param::ALL.len();
            }
            KeyCode::Up => self.nudge_knob(KNOB_STEP),
            KeyCode::Down => self.nudge_knob(-KNOB_STEP),
            _ => {}
        }
    }

    fn nudge_knob(&mut self, delta: f32) {
        let param = Param::ALL[self.selected_knob];
        let value = self.engine.params().get(param) + delta;
        self.engine.handle(UiEvent::SetKnob {
            name: param.to_string(),
            value,
        });
    }

    fn render(&self, frame: &mut Frame) {
        let panel = PanelState::capture(&self.engine, self.sample_rate, self.selected_knob);
        let stats = AudioStats::from_buffer(&self.audio_buffer);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(4), // Knobs
                Constraint::Length(4), // Pattern
                Constraint::Min(8),    // Scope + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_transport(frame, chunks[0], &panel, &stats);
        render_knobs(frame, chunks[1], &panel);
        render_pattern(frame, chunks[2], &panel);

        let views = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[3]);
        render_scope(frame, views[0], &self.audio_buffer);
        render_spectrum(frame, views[1], self.spectrum.data());

        let help = Paragraph::new(
            " [Space] Power  [1-4] Mode  [P] Preview  [S] Stop preview  [←→] Knob  [↑↓] ±5  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}
