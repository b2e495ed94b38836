//! The diff view: caches commit diffs, remembers where each was left, and
//! paints the visible window of the active one

use crate::cache::{CachePolicy, DiffCache};
use crate::git::CommitId;
use crate::input::{InputDispatcher, Key};
use crate::position::ViewPosition;
use crate::surface::{RenderSurface, ViewDimension};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Rows taken by the border; title and footer sit on it
pub const CHROME_ROWS: usize = 2;

/// Produces the raw diff text of a commit
pub trait DiffSource {
    type Error: std::error::Error;

    fn diff(&self, commit: &CommitId) -> Result<String, Self::Error>;
}

/// Asks the host to redraw when it next can.
///
/// May fire any number of times; the host coalesces.
pub trait RefreshSignal {
    fn update_display(&self);
}

impl<F: Fn()> RefreshSignal for F {
    fn update_display(&self) {
        self()
    }
}

/// A shareable "needs redraw" flag
#[derive(Debug, Clone, Default)]
pub struct RefreshFlag(Arc<AtomicBool>);

impl RefreshFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }
}

impl RefreshSignal for RefreshFlag {
    fn update_display(&self) {
        self.raise();
    }
}

#[derive(Debug, Default)]
struct DiffViewState {
    active_commit: Option<CommitId>,
    cache: DiffCache,
    position: ViewPosition,
    dimension: ViewDimension,
    has_focus: bool,
}

impl DiffViewState {
    fn active_line_count(&self) -> usize {
        self.active_commit
            .as_ref()
            .and_then(|commit| self.cache.get(commit))
            .map(|diff| diff.line_count())
            .unwrap_or(0)
    }
}

/// Diff viewer for a sequence of selected commits.
///
/// Every operation holds one lock for its whole duration, including the diff
/// computation on a cache miss, so selection, rendering and key handling never
/// interleave.
pub struct DiffView<S, R> {
    source: S,
    refresh: R,
    dispatcher: InputDispatcher,
    state: Mutex<DiffViewState>,
}

impl<S: DiffSource, R: RefreshSignal> DiffView<S, R> {
    pub fn new(source: S, refresh: R) -> Self {
        Self {
            source,
            refresh,
            dispatcher: InputDispatcher::default(),
            state: Mutex::new(DiffViewState::default()),
        }
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.state.get_mut().cache = DiffCache::with_policy(policy);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: InputDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Switch to `commit`, computing its diff if it has never been shown.
    ///
    /// The outgoing commit keeps its position for later. On error nothing
    /// changes and the previous commit stays active.
    pub fn on_commit_select(&self, commit: &CommitId) -> Result<(), S::Error> {
        {
            let mut guard = self.state.lock();
            let state = &mut *guard;

            if let Some(active) = &state.active_commit {
                state.cache.save_position(active, state.position);
            }

            let diff = state
                .cache
                .get_or_create(commit, |commit| self.source.diff(commit))?;
            state.position = diff.saved_position();
            state.active_commit = Some(commit.clone());

            log::debug!(
                "DiffView showing {} ({} lines) at row {}",
                commit.short(),
                diff.line_count(),
                state.position.active_row_index
            );
        }

        self.refresh.update_display();
        Ok(())
    }

    /// Paint the visible part of the active diff onto `win`.
    ///
    /// Surface errors abort the frame and are returned as-is.
    pub fn render<W: RenderSurface>(&self, win: &mut W) -> Result<(), W::Error> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.dimension = win.dimension();

        let Some(commit) = state.active_commit.as_ref() else {
            return Ok(());
        };
        let Some(diff) = state.cache.get(commit) else {
            return Ok(());
        };

        let rows = win.rows().saturating_sub(CHROME_ROWS);
        state.position.determine_view_start_row(rows);
        let position = state.position;

        let visible = diff
            .lines()
            .iter()
            .skip(position.view_start_row_index)
            .take(rows);
        for (row_index, line) in visible.enumerate() {
            win.set_row(row_index + 1, position.view_start_column, line.text())?;
        }

        if rows > 0 {
            let cursor_row = position
                .active_row_index
                .saturating_sub(position.view_start_row_index);
            win.set_selected_row(cursor_row + 1, state.has_focus)?;
        }

        win.draw_border();
        win.set_title(&format!("Diff for commit {commit}"))?;
        win.set_footer(&format!(
            "Line {} of {}",
            position.active_row_index + 1,
            diff.line_count()
        ))?;

        Ok(())
    }

    /// Record whether the view has focus; only changes how the cursor row is drawn
    pub fn on_active_change(&self, has_focus: bool) {
        log::debug!("DiffView active: {has_focus}");
        self.state.lock().has_focus = has_focus;
    }

    /// Run the action bound to `key`, if any. Returns whether the view moved.
    pub fn handle(&self, key: Key) -> bool {
        let Some(action) = self.dispatcher.action(key) else {
            return false;
        };

        let changed = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let line_count = state.active_line_count();
            let page_width = state.dimension.cols;
            let changed = action.apply(&mut state.position, line_count, page_width);
            if changed {
                log::debug!("DiffView {:?} -> {:?}", action, state.position);
            }
            changed
        };

        if changed {
            self.refresh.update_display();
        }
        changed
    }

    pub fn active_commit(&self) -> Option<CommitId> {
        self.state.lock().active_commit.clone()
    }

    pub fn position(&self) -> ViewPosition {
        self.state.lock().position
    }

    pub fn has_focus(&self) -> bool {
        self.state.lock().has_focus
    }

    /// Line count of the active diff, 0 when nothing is selected
    pub fn line_count(&self) -> usize {
        self.state.lock().active_line_count()
    }

    /// Number of diffs currently held in the cache
    pub fn cached_commits(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn is_cached(&self, commit: &CommitId) -> bool {
        self.state.lock().cache.contains(commit)
    }

    /// Surface size seen by the last render
    pub fn dimension(&self) -> ViewDimension {
        self.state.lock().dimension
    }
}
