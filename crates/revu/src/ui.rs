//! Screen layout: commit list, diff panel and status bar

use crate::app::{App, Focus};
use crate::surface::BufferSurface;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use revu_core::DiffSource;
use time::OffsetDateTime;

const HELP_LINES: &[(&str, &str)] = &[
    ("Tab", "switch pane"),
    ("j/k ↑/↓", "move"),
    ("PgUp/PgDn", "page commits"),
    ("g/G", "first/last commit"),
    ("Enter", "focus diff"),
    ("h/l ←/→", "scroll diff sideways"),
    ("Esc", "back to commits"),
    ("?", "toggle help"),
    ("q", "quit"),
];

pub fn draw<S: DiffSource>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.commit_panel_width),
            Constraint::Min(0),
        ])
        .split(chunks[0]);

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let commits_focused = app.focus == Focus::Commits;
    app.commits
        .draw(frame, panes[0], commits_focused, &app.theme, now);

    draw_diff_panel(frame, app, panes[1]);
    draw_status_bar(frame, app, chunks[1]);

    if app.show_help {
        draw_help(frame, app);
    }
}

fn draw_diff_panel<S: DiffSource>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let focused = app.focus == Focus::Diff;

    if app.diff_view.active_commit().is_none() {
        let border = if focused {
            app.theme.border_active
        } else {
            app.theme.border
        };
        let placeholder = Paragraph::new(Span::styled(
            " No commit selected",
            Style::default().fg(app.theme.muted),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        frame.render_widget(placeholder, area);
    }

    let result = {
        let mut surface = BufferSurface::new(frame.buffer_mut(), area, &app.theme, focused);
        app.diff_view.render(&mut surface)
    };
    app.render_error = match result {
        Ok(()) => None,
        Err(err) => {
            log::warn!("Diff panel render failed: {err}");
            Some(format!("Cannot draw diff: {err}"))
        }
    };
}

fn draw_status_bar<S: DiffSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let location = match &app.branch {
        Some(branch) => format!(" {} on {} ", app.repo_name, branch),
        None => format!(" {} ", app.repo_name),
    };

    let mut spans = vec![Span::styled(
        location,
        Style::default()
            .fg(app.theme.header)
            .add_modifier(Modifier::BOLD),
    )];

    match app.status.as_ref().or(app.render_error.as_ref()) {
        Some(message) => spans.push(Span::styled(
            format!(" {message}"),
            Style::default().fg(app.theme.removed),
        )),
        None => {
            let view = app.diff_view.position();
            spans.push(Span::styled(
                format!(
                    " {} cached · col {} · Tab switch pane · ? help · q quit",
                    app.diff_view.cached_commits(),
                    view.view_start_column
                ),
                Style::default().fg(app.theme.muted),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help<S: DiffSource>(frame: &mut Frame, app: &App<S>) {
    let area = centered_rect(frame.area(), 44, HELP_LINES.len() as u16 + 2);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<12}"),
                    Style::default().fg(app.theme.hunk),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_active))
            .title(" Keys "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
