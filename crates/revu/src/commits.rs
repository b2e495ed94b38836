//! Commit list pane: picks the commit the diff view shows

use crate::config::ResolvedTheme;
use crate::time_format::CommitTimeFormatter;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use revu_core::CommitEntry;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SELECTED_MARKER: &str = "▸ ";
const UNSELECTED_MARKER: &str = "  ";
const AUTHOR_WIDTH: usize = 12;
const MERGE_TAG: &str = "merge ";

#[derive(Debug, Clone)]
pub struct CommitList {
    entries: Vec<CommitEntry>,
    selected: usize,
    scroll: usize,
    view_height: usize,
    time_format: CommitTimeFormatter,
}

impl CommitList {
    pub fn new(entries: Vec<CommitEntry>, time_format: CommitTimeFormatter) -> Self {
        Self {
            entries,
            selected: 0,
            scroll: 0,
            view_height: 0,
            time_format,
        }
    }

    #[cfg(test)]
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_commit(&self) -> Option<&CommitEntry> {
        self.entries.get(self.selected)
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Move the selection by `delta`, clamped to the list. Returns whether it moved.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        if self.entries.is_empty() {
            self.selected = 0;
            self.scroll = 0;
            return false;
        }
        let len = self.entries.len() as isize;
        let next = (self.selected as isize + delta).clamp(0, len - 1) as usize;
        let moved = next != self.selected;
        self.selected = next;
        self.ensure_visible();
        moved
    }

    pub fn select_first(&mut self) -> bool {
        self.move_selection(-(self.selected as isize))
    }

    pub fn select_last(&mut self) -> bool {
        let last = self.entries.len().saturating_sub(1);
        self.move_selection(last as isize - self.selected as isize)
    }

    pub fn page_up(&mut self) -> bool {
        let delta = self.view_height.saturating_sub(1).max(1) as isize;
        self.move_selection(-delta)
    }

    pub fn page_down(&mut self) -> bool {
        let delta = self.view_height.saturating_sub(1).max(1) as isize;
        self.move_selection(delta)
    }

    fn ensure_visible(&mut self) {
        if self.view_height == 0 {
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + self.view_height {
            self.scroll = self.selected + 1 - self.view_height;
        }
    }

    pub fn draw(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        focused: bool,
        theme: &ResolvedTheme,
        now: i64,
    ) {
        let border = if focused {
            theme.border_active
        } else {
            theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" Commits ({}) ", self.entries.len()),
                Style::default().fg(border).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        self.view_height = inner.height as usize;
        self.ensure_visible();

        if self.entries.is_empty() {
            let message = Paragraph::new(Line::from(Span::styled(
                "No commits",
                Style::default().fg(theme.muted).add_modifier(Modifier::DIM),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let width = inner.width as usize;
        let lines: Vec<Line<'static>> = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.view_height)
            .map(|(idx, entry)| self.render_line(entry, idx == self.selected, focused, width, theme, now))
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_line(
        &self,
        entry: &CommitEntry,
        selected: bool,
        focused: bool,
        width: usize,
        theme: &ResolvedTheme,
        now: i64,
    ) -> Line<'static> {
        let marker = if selected {
            SELECTED_MARKER
        } else {
            UNSELECTED_MARKER
        };
        let age = self.time_format.format(entry.author_time, now);
        let author = truncate_text(&entry.author, AUTHOR_WIDTH);
        let stats = entry
            .stats
            .map(|stats| (format!("+{}", stats.insertions), format!("-{}", stats.deletions)));
        let stats_width = stats
            .as_ref()
            .map(|(added, removed)| added.len() + removed.len() + 2)
            .unwrap_or(0);
        let merge_tag = if entry.is_merge() { MERGE_TAG } else { "" };
        let fixed = text_width(marker)
            + entry.short_id.len()
            + merge_tag.len()
            + 1
            + 1
            + text_width(&author)
            + stats_width
            + 1
            + text_width(&age);
        let summary_width = width.saturating_sub(fixed);
        let summary = pad_to_width(&truncate_text(&entry.summary, summary_width), summary_width);

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(theme.border_active)),
            Span::styled(entry.short_id.clone(), Style::default().fg(theme.header)),
            Span::raw(" "),
            Span::styled(merge_tag, Style::default().fg(theme.hunk)),
            Span::raw(summary),
            Span::raw(" "),
            Span::styled(author, Style::default().fg(theme.muted)),
        ];
        if let Some((added, removed)) = stats {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(added, Style::default().fg(theme.added)));
            spans.push(Span::raw(" "));
            spans.push(Span::styled(removed, Style::default().fg(theme.removed)));
        }
        spans.push(Span::raw(" "));
        spans.push(Span::styled(age, Style::default().fg(theme.muted)));

        let mut line = Line::from(spans);
        if selected {
            let style = if focused {
                Style::default()
                    .bg(theme.selection)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            line = line.style(style);
        }
        line
    }
}

fn truncate_text(text: &str, max_width: usize) -> String {
    if text_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let budget = max_width - 3;
    let mut acc = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > budget {
            break;
        }
        acc.push(ch);
        width += ch_width;
    }
    format!("{acc}...")
}

fn pad_to_width(text: &str, width: usize) -> String {
    let current = text_width(text);
    if current >= width {
        return text.to_string();
    }
    format!("{text}{}", " ".repeat(width - current))
}

fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}
