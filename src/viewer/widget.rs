//! Widgets rendering the materialized document and the status line

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use super::ViewerState;
use crate::config::ThemeConfig;

/// Marker row drawn just past the materialized tail while chunks remain
const TAIL_MARKER: &str = "· · ·";

/// Renders the visible slice of the materialized layout
///
/// Rows inside the active highlight span get the theme's highlight style.
/// While unmaterialized chunks remain, a dim marker row is drawn just past
/// the content tail when it falls inside the drawing area; it disappears
/// once the document is fully materialized.
pub struct DocumentWidget<'a> {
    state: &'a ViewerState,
}

impl<'a> DocumentWidget<'a> {
    pub fn new(state: &'a ViewerState) -> Self {
        Self { state }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let layout = self.state.layout();
        let visible = self.state.viewport().visible_range();
        let visible_start = visible.start;
        let highlight = self.state.highlight();

        let highlight_style = Style::default()
            .fg(theme.highlight_fg)
            .bg(theme.highlight_bg);

        for (row, line) in visible.clone().zip(layout.lines(visible.clone())) {
            let screen_y = area.y + (row - visible_start) as u16;
            if screen_y >= area.y + area.height {
                break;
            }

            let style = match highlight {
                Some(h) if h.rows.contains(&row) => highlight_style,
                _ => Style::default(),
            };
            buf.set_stringn(area.x, screen_y, line, area.width as usize, style);
        }

        if self.state.window().has_more() {
            let tail_row = visible.end.saturating_sub(visible_start);
            let screen_y = area.y + tail_row as u16;
            if screen_y < area.y + area.height {
                let x = area.x + centered_x(area.width, TAIL_MARKER);
                buf.set_stringn(
                    x,
                    screen_y,
                    TAIL_MARKER,
                    area.width as usize,
                    Style::default().add_modifier(Modifier::DIM),
                );
            }
        }
    }
}

/// One-row status line: materialization progress and scroll position
pub struct StatusLine<'a> {
    state: &'a ViewerState,
    /// Overrides the default status text (e.g. the goto-anchor prompt)
    message: Option<&'a str>,
}

impl<'a> StatusLine<'a> {
    pub fn new(state: &'a ViewerState) -> Self {
        Self {
            state,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text = match self.message {
            Some(message) => message.to_string(),
            None => self.default_text(),
        };
        buf.set_stringn(
            area.x,
            area.y,
            &text,
            area.width as usize,
            Style::default().add_modifier(Modifier::REVERSED),
        );
        // Pad the rest of the row so the reversed bar spans the full width
        let used = text.width().min(area.width as usize) as u16;
        for x in area.x + used..area.x + area.width {
            buf[(x, area.y)]
                .set_symbol(" ")
                .set_style(Style::default().add_modifier(Modifier::REVERSED));
        }
    }

    fn default_text(&self) -> String {
        let state = self.state;
        let total = state.chunks().len();
        let percent = match state.layout().height() {
            0 => 100,
            height => {
                let bottom = state.viewport().visible_range().end;
                bottom * 100 / height
            }
        };

        let mut text = format!(
            " chunks {}/{} · {}%",
            state.layout().chunk_count(),
            total,
            percent
        );
        if let Some(error) = state.last_abandoned() {
            text.push_str(&format!(" · {}", error));
        }
        text
    }
}

fn centered_x(width: u16, text: &str) -> u16 {
    let text_width = text.width().min(width as usize) as u16;
    (width - text_width) / 2
}
