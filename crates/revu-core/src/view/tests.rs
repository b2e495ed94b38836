use super::*;
use crate::input::NavAction;
use crate::surface::SurfaceError;
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no diff available for {0}")]
struct MissingDiff(String);

/// Serves canned diff text and counts how often each commit is asked for
#[derive(Default)]
struct FixtureSource {
    diffs: Mutex<HashMap<CommitId, String>>,
    calls: Mutex<HashMap<CommitId, usize>>,
}

impl FixtureSource {
    fn with(diffs: &[(&str, &str)]) -> Self {
        let source = Self::default();
        for (id, text) in diffs {
            source.insert(id, text);
        }
        source
    }

    fn insert(&self, id: &str, text: &str) {
        self.diffs.lock().insert(CommitId::new(id), text.to_string());
    }

    fn calls(&self, id: &str) -> usize {
        self.calls
            .lock()
            .get(&CommitId::new(id))
            .copied()
            .unwrap_or(0)
    }
}

impl DiffSource for FixtureSource {
    type Error = MissingDiff;

    fn diff(&self, commit: &CommitId) -> Result<String, MissingDiff> {
        *self.calls.lock().entry(commit.clone()).or_default() += 1;
        self.diffs
            .lock()
            .get(commit)
            .cloned()
            .ok_or_else(|| MissingDiff(commit.to_string()))
    }
}

/// Records everything drawn so assertions can inspect a frame
#[derive(Debug, Default)]
struct RecordingSurface {
    rows: usize,
    cols: usize,
    written: Vec<(usize, usize, String)>,
    selected: Option<(usize, bool)>,
    border: bool,
    title: Option<String>,
    footer: Option<String>,
    fail_at_row: Option<usize>,
}

impl RecordingSurface {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    fn texts(&self) -> Vec<&str> {
        self.written.iter().map(|(_, _, text)| text.as_str()).collect()
    }

    fn clear(&mut self) {
        *self = Self {
            fail_at_row: self.fail_at_row,
            ..Self::new(self.rows, self.cols)
        };
    }
}

impl RenderSurface for RecordingSurface {
    type Error = SurfaceError;

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn set_row(&mut self, row: usize, start_column: usize, text: &str) -> Result<(), SurfaceError> {
        if row >= self.rows || self.fail_at_row == Some(row) {
            return Err(SurfaceError::RowOutOfBounds {
                row,
                rows: self.rows,
            });
        }
        self.written.push((row, start_column, text.to_string()));
        Ok(())
    }

    fn set_selected_row(&mut self, row: usize, active: bool) -> Result<(), SurfaceError> {
        self.selected = Some((row, active));
        Ok(())
    }

    fn draw_border(&mut self) {
        self.border = true;
    }

    fn set_title(&mut self, title: &str) -> Result<(), SurfaceError> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn set_footer(&mut self, footer: &str) -> Result<(), SurfaceError> {
        self.footer = Some(footer.to_string());
        Ok(())
    }
}

type TestView = DiffView<FixtureSource, Box<dyn Fn()>>;

fn make_view(diffs: &[(&str, &str)]) -> (TestView, Arc<AtomicUsize>) {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&refreshes);
    let refresh: Box<dyn Fn()> = Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (DiffView::new(FixtureSource::with(diffs), refresh), refreshes)
}

const HUNK: &str = "@@ -1,3 +1,3 @@\n-old\n+new\n";

fn commit(id: &str) -> CommitId {
    CommitId::new(id)
}

#[test]
fn test_render_without_commit_is_noop() {
    let (view, _) = make_view(&[]);
    let mut surface = RecordingSurface::new(10, 40);

    view.render(&mut surface).unwrap();

    assert!(surface.written.is_empty());
    assert!(!surface.border);
    assert!(surface.title.is_none());
    // Dimension is still recorded for page scrolling
    assert_eq!(view.dimension(), ViewDimension { rows: 10, cols: 40 });
}

#[test]
fn test_select_sets_active_and_refreshes() {
    let (view, refreshes) = make_view(&[("a", HUNK)]);

    view.on_commit_select(&commit("a")).unwrap();

    assert_eq!(view.active_commit(), Some(commit("a")));
    assert_eq!(view.position(), ViewPosition::default());
    assert_eq!(view.line_count(), 3);
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scroll_follows_cursor_scenario() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();
    view.on_active_change(true);

    // Two visible rows once the border is taken off
    let mut surface = RecordingSurface::new(2 + CHROME_ROWS, 40);
    view.render(&mut surface).unwrap();
    assert_eq!(surface.texts(), vec!["@@ -1,3 +1,3 @@", "-old"]);
    assert_eq!(surface.written[0].0, 1);
    assert_eq!(surface.selected, Some((1, true)));
    assert_eq!(surface.footer.as_deref(), Some("Line 1 of 3"));

    assert!(view.handle(Key::Down));
    assert!(view.handle(Key::Down));
    assert_eq!(view.position().active_row_index, 2);

    surface.clear();
    view.render(&mut surface).unwrap();
    assert_eq!(view.position().view_start_row_index, 1);
    assert_eq!(surface.texts(), vec!["-old", "+new"]);
    assert_eq!(surface.selected, Some((2, true)));
    assert_eq!(surface.footer.as_deref(), Some("Line 3 of 3"));
}

#[test]
fn test_render_title_border_and_column() {
    let (view, _) = make_view(&[("abc123", HUNK)]);
    view.on_commit_select(&commit("abc123")).unwrap();

    let mut surface = RecordingSurface::new(10, 30);
    view.render(&mut surface).unwrap();
    assert!(surface.border);
    assert_eq!(surface.title.as_deref(), Some("Diff for commit abc123"));
    assert!(surface.written.iter().all(|(_, col, _)| *col == 0));

    assert!(view.handle(Key::Right));
    surface.clear();
    view.render(&mut surface).unwrap();
    assert!(surface.written.iter().all(|(_, col, _)| *col == 30));
}

#[test]
fn test_unfocused_cursor_is_plain() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    let mut surface = RecordingSurface::new(6, 20);
    view.render(&mut surface).unwrap();
    assert_eq!(surface.selected, Some((1, false)));
    assert!(!view.has_focus());

    view.on_active_change(true);
    surface.clear();
    view.render(&mut surface).unwrap();
    assert_eq!(surface.selected, Some((1, true)));
}

#[test]
fn test_position_restored_on_reselect() {
    let long: String = (0..50).map(|i| format!("line {i}\n")).collect();
    let (view, _) = make_view(&[("a", &long), ("b", HUNK)]);
    let mut surface = RecordingSurface::new(12, 40);

    view.on_commit_select(&commit("a")).unwrap();
    view.render(&mut surface).unwrap();
    for _ in 0..17 {
        view.handle(Key::Down);
    }
    view.handle(Key::Right);
    view.render(&mut surface).unwrap();
    let left_at = view.position();
    assert_eq!(left_at.active_row_index, 17);
    assert_eq!(left_at.view_start_row_index, 8);
    assert_eq!(left_at.view_start_column, 40);

    view.on_commit_select(&commit("b")).unwrap();
    assert_eq!(view.position(), ViewPosition::default());
    view.handle(Key::Down);

    view.on_commit_select(&commit("a")).unwrap();
    assert_eq!(view.position(), left_at);

    view.on_commit_select(&commit("b")).unwrap();
    assert_eq!(view.position().active_row_index, 1);
}

#[test]
fn test_source_called_once_per_commit() {
    let (view, _) = make_view(&[("a", HUNK), ("b", HUNK)]);

    for id in ["a", "b", "a", "a", "b", "a"] {
        view.on_commit_select(&commit(id)).unwrap();
    }

    assert_eq!(view.source().calls("a"), 1);
    assert_eq!(view.source().calls("b"), 1);
    assert_eq!(view.cached_commits(), 2);
}

#[test]
fn test_failed_select_keeps_previous_commit() {
    let (view, refreshes) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();
    view.handle(Key::Down);

    let err = view.on_commit_select(&commit("x")).unwrap_err();
    assert_eq!(err, MissingDiff("x".to_string()));
    assert_eq!(view.active_commit(), Some(commit("a")));
    assert_eq!(view.position().active_row_index, 1);
    assert!(!view.is_cached(&commit("x")));
    // One refresh for the select, one for the move
    assert_eq!(refreshes.load(Ordering::SeqCst), 2);

    view.source().insert("x", "+late\n");
    view.on_commit_select(&commit("x")).unwrap();
    assert_eq!(view.source().calls("x"), 2);
    assert_eq!(view.active_commit(), Some(commit("x")));
}

#[test]
fn test_failed_first_select_stays_unselected() {
    let (view, _) = make_view(&[]);
    assert!(view.on_commit_select(&commit("x")).is_err());
    assert_eq!(view.active_commit(), None);
    assert_eq!(view.line_count(), 0);
}

#[test]
fn test_unbound_key_is_ignored() {
    let (view, refreshes) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    assert!(!view.handle(Key::Char('z')));
    assert!(!view.handle(Key::Enter));
    assert_eq!(view.position(), ViewPosition::default());
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unchanged_moves_do_not_refresh() {
    let (view, refreshes) = make_view(&[("a", "only line")]);
    view.on_commit_select(&commit("a")).unwrap();

    assert!(!view.handle(Key::Up));
    assert!(!view.handle(Key::Down));
    assert!(!view.handle(Key::Left));
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);

    assert!(view.handle(Key::Right));
    assert_eq!(refreshes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cursor_bounded_by_line_count() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    for _ in 0..10 {
        view.handle(Key::Down);
    }
    assert_eq!(view.position().active_row_index, 2);
    for _ in 0..10 {
        view.handle(Key::Up);
    }
    assert_eq!(view.position().active_row_index, 0);
}

#[test]
fn test_page_width_comes_from_last_render() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    view.render(&mut RecordingSurface::new(8, 25)).unwrap();
    view.handle(Key::Right);
    view.handle(Key::Right);
    assert_eq!(view.position().view_start_column, 50);

    view.render(&mut RecordingSurface::new(8, 30)).unwrap();
    assert!(view.handle(Key::Left));
    assert_eq!(view.position().view_start_column, 20);
    assert!(view.handle(Key::Left));
    assert_eq!(view.position().view_start_column, 0);
}

#[test]
fn test_surface_error_aborts_frame() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    let mut surface = RecordingSurface::new(10, 20);
    surface.fail_at_row = Some(2);
    let err = view.render(&mut surface).unwrap_err();

    assert_eq!(err, SurfaceError::RowOutOfBounds { row: 2, rows: 10 });
    assert_eq!(surface.written.len(), 1);
    assert!(!surface.border);
    assert!(surface.footer.is_none());
    assert_eq!(view.active_commit(), Some(commit("a")));

    surface.fail_at_row = None;
    surface.clear();
    view.render(&mut surface).unwrap();
    assert_eq!(surface.written.len(), 3);
}

#[test]
fn test_tiny_surface_draws_only_chrome() {
    let (view, _) = make_view(&[("a", HUNK)]);
    view.on_commit_select(&commit("a")).unwrap();

    let mut surface = RecordingSurface::new(CHROME_ROWS, 10);
    view.render(&mut surface).unwrap();
    assert!(surface.written.is_empty());
    assert!(surface.selected.is_none());
    assert!(surface.border);
    assert_eq!(surface.footer.as_deref(), Some("Line 1 of 3"));
}

#[test]
fn test_empty_diff() {
    let (view, _) = make_view(&[("empty", "")]);
    view.on_commit_select(&commit("empty")).unwrap();

    assert!(!view.handle(Key::Down));
    let mut surface = RecordingSurface::new(6, 20);
    view.render(&mut surface).unwrap();
    assert!(surface.written.is_empty());
    assert_eq!(surface.footer.as_deref(), Some("Line 1 of 0"));
}

#[test]
fn test_custom_bindings() {
    let dispatcher = InputDispatcher::with_bindings([
        (Key::Char('j'), NavAction::LineDown),
        (Key::Char('k'), NavAction::LineUp),
    ]);
    let (view, _) = make_view(&[("a", HUNK)]);
    let view = view.with_dispatcher(dispatcher);
    view.on_commit_select(&commit("a")).unwrap();

    assert!(view.handle(Key::Char('j')));
    assert!(!view.handle(Key::Down));
    assert_eq!(view.position().active_row_index, 1);
    assert!(view.handle(Key::Char('k')));
    assert_eq!(view.position().active_row_index, 0);
}

#[test]
fn test_bounded_cache_restores_evicted_position() {
    let (view, _) = make_view(&[("a", HUNK), ("b", HUNK), ("c", HUNK)]);
    let view = view.with_cache_policy(CachePolicy::from_capacity(2));

    view.on_commit_select(&commit("a")).unwrap();
    view.handle(Key::Down);
    view.handle(Key::Down);
    view.on_commit_select(&commit("b")).unwrap();
    view.on_commit_select(&commit("c")).unwrap();
    assert_eq!(view.cached_commits(), 2);
    assert!(!view.is_cached(&commit("a")));

    view.on_commit_select(&commit("a")).unwrap();
    assert_eq!(view.source().calls("a"), 2);
    assert_eq!(view.position().active_row_index, 2);
}

#[test]
fn test_refresh_flag() {
    let flag = RefreshFlag::new();
    let view = DiffView::new(FixtureSource::with(&[("a", HUNK)]), flag.clone());
    assert!(!flag.is_raised());

    view.on_commit_select(&commit("a")).unwrap();
    assert!(flag.take());
    assert!(!flag.take());

    view.handle(Key::Down);
    assert!(flag.is_raised());
}

#[test]
fn test_view_is_shareable_across_threads() {
    let flag = RefreshFlag::new();
    let view = Arc::new(DiffView::new(
        FixtureSource::with(&[("a", HUNK)]),
        flag.clone(),
    ));
    view.on_commit_select(&commit("a")).unwrap();

    let worker = {
        let view = Arc::clone(&view);
        std::thread::spawn(move || {
            for _ in 0..100 {
                view.handle(Key::Down);
                view.handle(Key::Up);
            }
        })
    };
    for _ in 0..100 {
        view.render(&mut RecordingSurface::new(4, 10)).unwrap();
    }
    worker.join().unwrap();

    let pos = view.position();
    assert!(pos.active_row_index < 3);
    assert!(pos.view_start_row_index <= pos.active_row_index);
}
