//! Step pattern widget - the mode's 16 steps with accents and playhead

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use perdak::modes::STEPS;

use super::PanelState;

pub fn render_pattern(frame: &mut Frame, area: Rect, panel: &PanelState) {
    let block = Block::default()
        .title(format!(" Pattern: {} ", panel.mode))
        .borders(Borders::ALL);

    let mut steps = Vec::with_capacity(STEPS * 2);
    let mut markers = Vec::with_capacity(STEPS * 2);

    for step in 0..STEPS {
        let hit = panel.pattern.is_hit(step);
        let accent = panel.pattern.accent(step);
        let under_playhead = panel.current_step == Some(step);

        let glyph = match (hit, accent) {
            (false, _) => "·",
            (true, a) if a >= 0.9 => "█",
            (true, a) if a >= 0.7 => "▆",
            (true, _) => "▃",
        };
        let mut style = if hit {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if under_playhead {
            style = style.bg(Color::White).add_modifier(Modifier::BOLD);
        }

        // Beat separators every 4 steps
        let gap = if step % 4 == 3 { "  " } else { " " };
        steps.push(Span::styled(format!(" {glyph}"), style));
        steps.push(Span::raw(gap));

        let marker = if under_playhead { " ▲" } else { "  " };
        markers.push(Span::styled(marker, Style::default().fg(Color::White)));
        markers.push(Span::raw(gap));
    }

    let paragraph = Paragraph::new(vec![Line::from(steps), Line::from(markers)]).block(block);
    frame.render_widget(paragraph, area);
}
