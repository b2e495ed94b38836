//! Application state: the commit list, the diff view and which one has focus

use crate::commits::CommitList;
use crate::config::{ResolvedTheme, TimeMode};
use crate::time_format::CommitTimeFormatter;
use revu_core::{
    CachePolicy, CommitEntry, DiffSource, DiffView, InputDispatcher, Key, RefreshFlag,
};


/// Which pane receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Commits,
    Diff,
}

/// Settings the binary hands to [`App::new`]
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub repo_name: String,
    pub branch: Option<String>,
    pub cache_policy: CachePolicy,
    pub dispatcher: InputDispatcher,
    pub theme: ResolvedTheme,
    pub time_mode: TimeMode,
    pub commit_panel_width: u16,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            repo_name: String::new(),
            branch: None,
            cache_policy: CachePolicy::default(),
            dispatcher: InputDispatcher::default(),
            theme: ResolvedTheme::default(),
            time_mode: TimeMode::default(),
            commit_panel_width: 56,
        }
    }
}

pub struct App<S: DiffSource> {
    pub repo_name: String,
    pub branch: Option<String>,
    pub commits: CommitList,
    pub diff_view: DiffView<S, RefreshFlag>,
    pub focus: Focus,
    /// Message shown in the status bar, usually the last error
    pub status: Option<String>,
    /// Why the last frame could not draw the diff panel; cleared by the next good frame
    pub render_error: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    pub theme: ResolvedTheme,
    pub commit_panel_width: u16,
    refresh: RefreshFlag,
}

impl<S: DiffSource> App<S> {
    pub fn new(source: S, commits: Vec<CommitEntry>, options: AppOptions) -> Self {
        let refresh = RefreshFlag::new();
        let diff_view = DiffView::new(source, refresh.clone())
            .with_cache_policy(options.cache_policy)
            .with_dispatcher(options.dispatcher);
        Self {
            repo_name: options.repo_name,
            branch: options.branch,
            commits: CommitList::new(commits, CommitTimeFormatter::new(options.time_mode)),
            diff_view,
            focus: Focus::Commits,
            status: None,
            render_error: None,
            show_help: false,
            should_quit: false,
            theme: options.theme,
            commit_panel_width: options.commit_panel_width,
            refresh,
        }
    }

    /// Show the diff of the commit under the list cursor.
    ///
    /// Failures keep the previous diff on screen and land in the status bar.
    pub fn select_current_commit(&mut self) {
        let Some(entry) = self.commits.selected_commit() else {
            return;
        };
        match self.diff_view.on_commit_select(&entry.id) {
            Ok(()) => self.status = None,
            Err(err) => {
                log::warn!("Failed to load diff for {}: {err}", entry.id);
                self.status = Some(format!("Failed to load diff for {}: {err}", entry.short_id));
                self.request_redraw();
            }
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus == focus {
            return;
        }
        self.focus = focus;
        self.diff_view.on_active_change(focus == Focus::Diff);
        self.request_redraw();
    }

    pub fn toggle_focus(&mut self) {
        let next = match self.focus {
            Focus::Commits => Focus::Diff,
            Focus::Diff => Focus::Commits,
        };
        self.set_focus(next);
    }

    pub fn handle_key(&mut self, key: Key) {
        if self.show_help {
            self.show_help = false;
            self.request_redraw();
            return;
        }

        match key {
            Key::Char('q') => self.should_quit = true,
            Key::Char('?') => {
                self.show_help = true;
                self.request_redraw();
            }
            Key::Tab | Key::BackTab => self.toggle_focus(),
            _ => match self.focus {
                Focus::Commits => self.handle_commit_key(key),
                Focus::Diff => self.handle_diff_key(key),
            },
        }
    }

    fn handle_commit_key(&mut self, key: Key) {
        let moved = match key {
            Key::Up | Key::Char('k') => self.commits.move_selection(-1),
            Key::Down | Key::Char('j') => self.commits.move_selection(1),
            Key::PageUp => self.commits.page_up(),
            Key::PageDown => self.commits.page_down(),
            Key::Home | Key::Char('g') => self.commits.select_first(),
            Key::End | Key::Char('G') => self.commits.select_last(),
            Key::Enter | Key::Right => {
                self.set_focus(Focus::Diff);
                return;
            }
            _ => return,
        };
        if moved {
            self.select_current_commit();
        }
    }

    fn handle_diff_key(&mut self, key: Key) {
        if key == Key::Esc {
            self.set_focus(Focus::Commits);
        } else {
            self.diff_view.handle(key);
        }
    }

    pub fn request_redraw(&self) {
        self.refresh.raise();
    }

    /// Whether a redraw was requested since the last call
    pub fn take_redraw(&self) -> bool {
        self.refresh.take()
    }
}
