//! Knob row - one gauge per live parameter

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Gauge},
    Frame,
};

use perdak::Param;

use super::PanelState;

pub fn render_knobs(frame: &mut Frame, area: Rect, panel: &PanelState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (i, param) in Param::ALL.iter().enumerate() {
        let value = panel.params.get(*param);
        let selected = i == panel.selected_knob;

        let border = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(format!(" {} ", param.as_str().to_uppercase()))
            .borders(Borders::ALL)
            .border_style(border);

        let gauge = Gauge::default()
            .block(block)
            .gauge_style(Style::default().fg(if selected { Color::Cyan } else { Color::Blue }))
            .percent(value.round() as u16)
            .label(format!("{value:.0}"));

        frame.render_widget(gauge, columns[i]);
    }
}
