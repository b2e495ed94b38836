//! revu-core: a cached, scrollable diff view over a sequence of commits
//!
//! The [`DiffView`] computes each selected commit's diff once through a
//! [`DiffSource`], remembers the cursor and scroll position of every commit it
//! has shown, and paints the visible window onto any [`RenderSurface`].

pub mod cache;
pub mod git;
pub mod input;
pub mod position;
pub mod surface;
pub mod view;

pub use cache::{CachePolicy, Diff, DiffCache, DiffLine};
pub use git::{CommitEntry, CommitId, CommitStats, GitDiffSource, GitError};
pub use input::{InputDispatcher, Key, NavAction};
pub use position::ViewPosition;
pub use surface::{RenderSurface, SurfaceError, ViewDimension};
pub use view::{DiffSource, DiffView, RefreshFlag, RefreshSignal, CHROME_ROWS};
