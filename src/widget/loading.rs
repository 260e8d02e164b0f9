use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Gauge, Paragraph},
};

use crate::loading_screen::LoadingScreen;
use crate::theme::Base16Palette;

const GAUGE_WIDTH: u16 = 40;

/// Full-screen overlay with the start-up progress.
pub fn render_loading(f: &mut Frame, area: Rect, screen: &LoadingScreen, palette: &Base16Palette) {
    f.render_widget(Clear, area);
    f.render_widget(
        Block::default().style(Style::default().bg(palette.base_00)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "Loading",
        Style::default()
            .fg(palette.base_07)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, rows[1]);

    let width = GAUGE_WIDTH.min(area.width);
    let gauge_area = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..rows[3]
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(palette.base_0c).bg(palette.base_01))
        .percent(screen.progress().min(100))
        .label(screen.label());
    f.render_widget(gauge, gauge_area);
}
