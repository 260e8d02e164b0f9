use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::contact_form::{BannerKind, ContactForm, Field};
use crate::page_manager::PageManager;
use crate::ruler_navigation::Page;
use crate::theme::{Base16Palette, fade};
use crate::typing_effect::TypingEffect;

/// Vertical offsets are animated in pixels; one terminal row stands for this many.
const ROW_HEIGHT_PX: f64 = 20.0;

const HOME_TAGLINE: &str = "Designing and building things for the screen.";
const CONTACT_BUTTON: &str = "[ c ] Contact me";
const SCROLL_ARROWS: &str = "⌄ ⌄  more (j)  ⌄ ⌄";

const ABOUT_SUMMARY: &[&str] = &[
    "I'm a designer who writes code, and a developer who cares about",
    "how things look and feel. I like small tools, clean interfaces and",
    "the details that make an interaction feel right.",
    "",
    "Scroll down to read the longer story.",
];

const ABOUT_DETAILS: &[(&str, &str)] = &[
    (
        "Where it started",
        "Sketching logos for school clubs turned into learning the tools, then into learning how websites are put together.",
    ),
    (
        "What I do now",
        "Visual identity, interface design and front-end development, usually all three for the same project.",
    ),
    (
        "How I work",
        "Prototype early, test with real people, and keep iterating until the rough edges are gone.",
    ),
    (
        "Outside of work",
        "Photography, long walks and exploring whatever new piece of tech caught my attention this month.",
    ),
];

/// Row at which the About detail block starts inside the About content.
pub fn about_detail_anchor() -> f64 {
    (ABOUT_SUMMARY.len() + 1) as f64
}

fn offset_rows(offset_px: f64) -> i32 {
    (offset_px / ROW_HEIGHT_PX).round() as i32
}

/// Move `area` down by `rows` inside itself; rows past the edge are clipped.
fn shift(area: Rect, rows: i32) -> Rect {
    let rows = rows.clamp(0, area.height as i32) as u16;
    Rect {
        y: area.y + rows,
        height: area.height - rows,
        ..area
    }
}

/// Clickable controls inside a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageHit {
    ScrollArrows,
    ContactButton,
}

/// Where the clickable controls ended up in the last render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageHits {
    scroll_arrows: Option<Rect>,
    contact_button: Option<Rect>,
}

impl PageHits {
    pub fn hit(&self, column: u16, row: u16) -> Option<PageHit> {
        let position = Position::new(column, row);
        if self.scroll_arrows.is_some_and(|r| r.contains(position)) {
            Some(PageHit::ScrollArrows)
        } else if self.contact_button.is_some_and(|r| r.contains(position)) {
            Some(PageHit::ContactButton)
        } else {
            None
        }
    }
}

/// One-row rect for `text` centered on line `index` of `area`, if that line is shown.
fn centered_line(area: Rect, index: usize, text: &str) -> Option<Rect> {
    if index >= area.height as usize {
        return None;
    }
    let width = (text.width() as u16).min(area.width);
    Some(Rect::new(
        area.x + (area.width / 2).saturating_sub(width / 2),
        area.y + index as u16,
        width,
        1,
    ))
}

pub struct PageView<'a> {
    pub pages: &'a PageManager,
    pub typing: &'a TypingEffect,
    pub form: &'a ContactForm,
    pub palette: &'a Base16Palette,
}

impl PageView<'_> {
    /// Draw the visible page and return where its controls landed.
    pub fn render(&self, f: &mut Frame, area: Rect) -> PageHits {
        let bg = self.palette.backdrop(self.pages.backdrop());
        f.render_widget(Block::default().style(Style::default().bg(bg)), area);

        let mut hits = PageHits::default();
        let Some(page) = self.pages.visible_page() else {
            return hits;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        self.render_title(f, chunks[0], bg);

        let values = self.pages.values();
        let section = shift(chunks[1], offset_rows(values.section_offset_y));
        match page {
            Page::Home => hits.contact_button = self.render_home(f, section, bg),
            Page::About => hits.scroll_arrows = self.render_about(f, section, bg),
            Page::Contact => self.render_contact(f, section, bg),
        }
        hits
    }

    fn text(&self, color: Color, bg: Color, opacity: f64) -> Style {
        Style::default().fg(fade(color, bg, opacity)).bg(bg)
    }

    fn render_title(&self, f: &mut Frame, area: Rect, bg: Color) {
        let values = self.pages.values();
        // Title sits on the middle row so it can slide one row either way.
        let row = (1 + offset_rows(values.title_offset_y)).clamp(0, 2);
        let title_area = shift(area, row);
        let style = self
            .text(self.palette.base_07, bg, values.title_opacity)
            .add_modifier(Modifier::BOLD);
        let title = Paragraph::new(Line::from(Span::styled(self.pages.title(), style)))
            .alignment(Alignment::Center);
        f.render_widget(title, Rect { height: title_area.height.min(1), ..title_area });
    }

    fn render_home(&self, f: &mut Frame, area: Rect, bg: Color) -> Option<Rect> {
        let opacity = self.pages.values().section_opacity;
        let mut lines = Vec::new();

        if self.pages.is_typing_visible() {
            lines.push(Line::from(vec![
                Span::styled("I'm a ", self.text(self.palette.base_05, bg, opacity)),
                Span::styled(
                    self.typing.text().to_string(),
                    self.text(self.palette.base_0a, bg, opacity),
                ),
                Span::styled("▌", self.text(self.palette.base_0a, bg, opacity)),
            ]));
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            HOME_TAGLINE,
            self.text(self.palette.base_04, bg, opacity),
        )));
        lines.push(Line::default());
        let button_line = lines.len();
        lines.push(Line::from(Span::styled(
            CONTACT_BUTTON,
            self.text(self.palette.base_0c, bg, opacity)
                .add_modifier(Modifier::BOLD),
        )));

        f.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            area,
        );
        centered_line(area, button_line, CONTACT_BUTTON)
    }

    fn render_about(&self, f: &mut Frame, area: Rect, bg: Color) -> Option<Rect> {
        let values = self.pages.values();
        let body = self.text(self.palette.base_05, bg, values.section_opacity);

        let mut lines: Vec<Line> = ABOUT_SUMMARY
            .iter()
            .map(|line| Line::from(Span::styled(*line, body)))
            .collect();
        lines.push(Line::default());

        if values.detail_opacity > 0.0 {
            let detail_opacity = values.section_opacity.min(values.detail_opacity);
            for (heading, text) in ABOUT_DETAILS {
                lines.push(Line::from(Span::styled(
                    *heading,
                    self.text(self.palette.base_0d, bg, detail_opacity)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    *text,
                    self.text(self.palette.base_05, bg, detail_opacity),
                )));
                lines.push(Line::default());
            }
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let scroll = values.content_scroll.max(0.0).round() as u16;
        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0)),
            chunks[0],
        );

        if values.scroll_arrows_opacity <= 0.0 {
            return None;
        }
        let arrows = Paragraph::new(Line::from(Span::styled(
            SCROLL_ARROWS,
            self.text(self.palette.base_0c, bg, values.scroll_arrows_opacity),
        )))
        .alignment(Alignment::Center);
        f.render_widget(arrows, chunks[1]);
        centered_line(chunks[1], 0, SCROLL_ARROWS)
    }

    fn render_contact(&self, f: &mut Frame, area: Rect, bg: Color) {
        let opacity = self.pages.values().section_opacity;
        let mut lines = Vec::new();

        if let Some(banner) = self.form.banner() {
            let color = match banner.kind {
                BannerKind::Success => self.palette.base_0b,
                BannerKind::Error => self.palette.base_08,
            };
            lines.push(Line::from(Span::styled(
                format!(" {} ", banner.message),
                self.text(color, bg, opacity).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::default());
        }

        for field in Field::ALL {
            let focused = field == self.form.focused();
            let marker = if focused { "› " } else { "  " };
            let label_color = if focused {
                self.palette.base_0d
            } else {
                self.palette.base_04
            };
            lines.push(Line::from(vec![
                Span::styled(marker, self.text(self.palette.base_0d, bg, opacity)),
                Span::styled(
                    format!("{:<8}", field.label()),
                    self.text(label_color, bg, opacity),
                ),
                Span::styled(
                    self.form.data().get(field).to_string(),
                    self.text(self.palette.base_06, bg, opacity),
                ),
            ]));
            if let Some(error) = self.form.error(field) {
                lines.push(Line::from(Span::styled(
                    format!("          {error}"),
                    self.text(self.palette.base_08, bg, opacity),
                )));
            }
        }

        lines.push(Line::default());
        let button_color = if self.form.is_submitting() {
            self.palette.base_03
        } else {
            self.palette.base_0b
        };
        lines.push(Line::from(Span::styled(
            format!("[ {} ]  (Enter)", self.form.submit_label()),
            self.text(button_color, bg, opacity)
                .add_modifier(Modifier::BOLD),
        )));

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_clips_inside_area() {
        let area = Rect::new(0, 10, 20, 5);
        assert_eq!(shift(area, 1), Rect::new(0, 11, 20, 4));
        assert_eq!(shift(area, -3), area);
        assert_eq!(shift(area, 9), Rect::new(0, 15, 20, 0));
    }

    #[test]
    fn test_centered_line_matches_paragraph_alignment() {
        let area = Rect::new(0, 5, 40, 3);
        assert_eq!(
            centered_line(area, 2, CONTACT_BUTTON),
            Some(Rect::new(12, 7, 16, 1))
        );
        assert_eq!(centered_line(area, 3, CONTACT_BUTTON), None);
    }

    #[test]
    fn test_page_hits() {
        let hits = PageHits {
            scroll_arrows: Some(Rect::new(10, 20, 19, 1)),
            contact_button: None,
        };
        assert_eq!(hits.hit(10, 20), Some(PageHit::ScrollArrows));
        assert_eq!(hits.hit(29, 20), None);
        assert_eq!(PageHits::default().hit(0, 0), None);
    }

    #[test]
    fn test_offset_rows() {
        assert_eq!(offset_rows(20.0), 1);
        assert_eq!(offset_rows(-20.0), -1);
        assert_eq!(offset_rows(4.0), 0);
    }
}
