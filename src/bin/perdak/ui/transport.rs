//! Transport bar widget - power, mode, tempo and output stats

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use perdak::ModeName;

use super::PanelState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, panel: &PanelState, stats: &AudioStats) {
    let block = Block::default().title(" PERDAK ").borders(Borders::ALL);

    let (power, power_color) = if panel.unavailable {
        ("✕ NO DEVICE", Color::Red)
    } else if panel.running {
        ("● ON ", Color::Green)
    } else {
        ("○ OFF", Color::Yellow)
    };

    let mut spans = vec![
        Span::styled(format!(" {power}  "), Style::default().fg(power_color)),
    ];

    for (i, mode) in ModeName::ALL.iter().enumerate() {
        let style = if *mode == panel.mode {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, mode), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::styled(
        format!(" BPM: {:.0}  ", panel.bpm),
        Style::default().fg(Color::Cyan),
    ));
    if panel.preview {
        spans.push(Span::styled("▶ PREVIEW  ", Style::default().fg(Color::Magenta)));
    }
    spans.push(Span::styled(
        format!("{:.1}kHz  ", panel.sample_rate / 1000.0),
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
        Style::default().fg(Color::Magenta),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
