use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::ruler_navigation::{Page, RulerSink, TickKind};
use crate::theme::Base16Palette;

const PREV_ARROW: &str = "◀ prev";
const NEXT_ARROW: &str = "next ▶";
const LABEL_GAP: u16 = 6;
/// Rows needed for labels, the tallest tick and the center needle.
pub const RULER_HEIGHT: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerHit {
    Container,
    Prev,
    Next,
}

/// Terminal-side state of the ruler: what the navigation widget last wrote,
/// plus the areas of the last render for mouse hit testing.
#[derive(Debug, Clone)]
pub struct RulerView {
    ticks: Vec<TickKind>,
    offset_px: f64,
    active: Page,
    grabbing: bool,
    mounted: bool,
    last_container: Option<Rect>,
    last_prev: Option<Rect>,
    last_next: Option<Rect>,
}

impl Default for RulerView {
    fn default() -> Self {
        Self::new()
    }
}

impl RulerView {
    pub fn new() -> Self {
        Self {
            ticks: Vec::new(),
            offset_px: 0.0,
            active: Page::Home,
            grabbing: false,
            mounted: true,
            last_container: None,
            last_prev: None,
            last_next: None,
        }
    }

    /// A view with nothing to draw into.
    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            ..Self::new()
        }
    }

    pub fn offset_px(&self) -> f64 {
        self.offset_px
    }

    pub fn active(&self) -> Page {
        self.active
    }

    pub fn is_grabbing(&self) -> bool {
        self.grabbing
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.len()
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<RulerHit> {
        let position = Position::new(column, row);
        if self.last_prev.is_some_and(|r| r.contains(position)) {
            Some(RulerHit::Prev)
        } else if self.last_next.is_some_and(|r| r.contains(position)) {
            Some(RulerHit::Next)
        } else if self.last_container.is_some_and(|r| r.contains(position)) {
            Some(RulerHit::Container)
        } else {
            None
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, cell_width_px: f64, palette: &Base16Palette) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let buf = f.buffer_mut();
        self.render_labels(buf, area, palette);

        let ticks_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        self.last_container = Some(ticks_area);
        self.render_ticks(buf, ticks_area, cell_width_px, palette);
    }

    fn render_labels(&mut self, buf: &mut Buffer, area: Rect, palette: &Base16Palette) {
        let arrow_style = Style::default().fg(palette.base_0c);
        let prev_width = PREV_ARROW.width() as u16;
        let next_width = NEXT_ARROW.width() as u16;

        buf.set_string(area.x, area.y, PREV_ARROW, arrow_style);
        self.last_prev = Some(Rect::new(area.x, area.y, prev_width.min(area.width), 1));

        let next_x = area.right().saturating_sub(next_width).max(area.x);
        buf.set_string(next_x, area.y, NEXT_ARROW, arrow_style);
        self.last_next = Some(Rect::new(next_x, area.y, next_width.min(area.width), 1));

        let labels_width: u16 = Page::ALL
            .iter()
            .map(|p| p.label().width() as u16)
            .sum::<u16>()
            + LABEL_GAP * (Page::ALL.len() as u16 - 1);
        let mut x = area.x + area.width.saturating_sub(labels_width) / 2;

        for page in Page::ALL {
            let is_active = page == self.active;
            let mut style = Style::default().fg(palette.label_colors(is_active));
            if is_active {
                style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            }
            buf.set_string(x, area.y, page.label(), style);
            x += page.label().width() as u16 + LABEL_GAP;
        }
    }

    fn render_ticks(
        &self,
        buf: &mut Buffer,
        area: Rect,
        cell_width_px: f64,
        palette: &Base16Palette,
    ) {
        let tick_rows = area.height.min(RULER_HEIGHT - 1);
        if tick_rows == 0 {
            return;
        }
        let color = if self.grabbing {
            palette.base_06
        } else {
            palette.base_04
        };
        let style = Style::default().fg(color);

        // The ruler is centered in the container, then shifted by the offset.
        let shift = (self.offset_px / cell_width_px).round() as i64;
        let center = area.x as i64 + area.width as i64 / 2;
        let first = center - self.ticks.len() as i64 / 2 + shift;
        let bottom = area.y + tick_rows.min(3) - 1;

        for (i, tick) in self.ticks.iter().enumerate() {
            let column = first + i as i64;
            if column < area.left() as i64 || column >= area.right() as i64 {
                continue;
            }
            let height = match tick {
                TickKind::Long => 3,
                TickKind::Medium => 2,
                TickKind::Short => 1,
            }
            .min(tick_rows.min(3));
            for row in 0..height {
                if let Some(cell) = buf.cell_mut((column as u16, bottom - row)) {
                    cell.set_symbol("│").set_style(style);
                }
            }
        }

        if tick_rows > 3 {
            if let Some(cell) = buf.cell_mut((center as u16, area.y + 3)) {
                cell.set_symbol("▲")
                    .set_style(Style::default().fg(palette.base_0a));
            }
        }
    }
}

impl RulerSink for RulerView {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn build_ticks(&mut self, ticks: Vec<TickKind>) {
        self.ticks = ticks;
    }

    fn set_offset(&mut self, offset_px: f64) {
        self.offset_px = offset_px;
    }

    fn set_active_label(&mut self, page: Page) {
        self.active = page;
    }

    fn set_grabbing(&mut self, grabbing: bool) {
        self.grabbing = grabbing;
    }
}
