//! ratatui-backed render surface for the diff view

use crate::config::ResolvedTheme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};
use revu_core::{RenderSurface, SurfaceError};
use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 4;

/// A bordered panel inside a ratatui buffer
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: &'a ResolvedTheme,
    focused: bool,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: &'a ResolvedTheme, focused: bool) -> Self {
        // never reach outside the buffer
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            theme,
            focused,
        }
    }

    fn content_width(&self) -> u16 {
        self.area.width.saturating_sub(2)
    }

    fn check_content_row(&self, row: usize) -> Result<u16, SurfaceError> {
        let rows = self.area.height as usize;
        if row == 0 || row + 1 >= rows {
            return Err(SurfaceError::RowOutOfBounds { row, rows });
        }
        Ok(self.area.y + row as u16)
    }

    fn border_style(&self) -> Style {
        let color = if self.focused {
            self.theme.border_active
        } else {
            self.theme.border
        };
        Style::default().fg(color)
    }

    fn write_on_border(&mut self, y: u16, label: &str, what: &'static str) -> Result<(), SurfaceError> {
        if self.area.width < 5 || self.area.height < 2 {
            return Err(SurfaceError::TooSmall(what));
        }
        let max_width = self.area.width as usize - 4;
        let style = self.border_style().add_modifier(Modifier::BOLD);
        self.buf
            .set_stringn(self.area.x + 2, y, format!(" {label} "), max_width, style);
        Ok(())
    }
}

impl RenderSurface for BufferSurface<'_> {
    type Error = SurfaceError;

    fn rows(&self) -> usize {
        self.area.height as usize
    }

    fn cols(&self) -> usize {
        self.area.width as usize
    }

    fn set_row(&mut self, row: usize, start_column: usize, text: &str) -> Result<(), SurfaceError> {
        let y = self.check_content_row(row)?;
        let width = self.content_width();
        if width == 0 {
            return Ok(());
        }
        let style = diff_line_style(text, self.theme);
        let expanded = expand_tabs(text);
        let visible = skip_columns(&expanded, start_column);
        self.buf.set_stringn(
            self.area.x + 1,
            y,
            format!(" {visible}"),
            width as usize,
            style,
        );
        Ok(())
    }

    fn set_selected_row(&mut self, row: usize, active: bool) -> Result<(), SurfaceError> {
        let y = self.check_content_row(row)?;
        let style = if active {
            Style::default()
                .bg(self.theme.selection)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        };
        self.buf
            .set_style(Rect::new(self.area.x + 1, y, self.content_width(), 1), style);
        Ok(())
    }

    fn draw_border(&mut self) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style())
            .render(self.area, self.buf);
    }

    fn set_title(&mut self, title: &str) -> Result<(), SurfaceError> {
        let y = self.area.y;
        self.write_on_border(y, title, "title")
    }

    fn set_footer(&mut self, footer: &str) -> Result<(), SurfaceError> {
        let y = self.area.bottom().saturating_sub(1);
        self.write_on_border(y, footer, "footer")
    }
}

/// Style a unified diff line by its leading marker
pub fn diff_line_style(text: &str, theme: &ResolvedTheme) -> Style {
    let style = Style::default();
    if text.starts_with("+++") || text.starts_with("---") {
        style.fg(theme.header).add_modifier(Modifier::BOLD)
    } else if text.starts_with("@@") {
        style.fg(theme.hunk)
    } else if text.starts_with('+') {
        style.fg(theme.added)
    } else if text.starts_with('-') {
        style.fg(theme.removed)
    } else if text.starts_with("diff ") || text.starts_with("index ") {
        style.fg(theme.header)
    } else {
        style
    }
}

fn expand_tabs(text: &str) -> Cow<'_, str> {
    if text.contains('\t') {
        Cow::Owned(text.replace('\t', &" ".repeat(TAB_WIDTH)))
    } else {
        Cow::Borrowed(text)
    }
}

/// Drop the first `columns` display columns of `text`.
///
/// A wide character straddling the cut is dropped whole.
fn skip_columns(text: &str, columns: usize) -> &str {
    let mut skipped = 0;
    for (idx, ch) in text.char_indices() {
        if skipped >= columns {
            return &text[idx..];
        }
        skipped += ch.width().unwrap_or(0);
    }
    ""
}
