//! Git integration: commit listing and per-commit diff text

use crate::view::DiffSource;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepo,
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity of a commit: its full object id.
///
/// Only ever compared by id; the diff view uses it as a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated id for narrow displays
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommitId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CommitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Summary stats for a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitStats {
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

/// Commit metadata for the commit list
#[derive(Debug, Clone)]
pub struct CommitEntry {
    pub id: CommitId,
    pub short_id: String,
    pub parents: Vec<String>,
    pub author: String,
    pub author_time: Option<i64>,
    pub summary: String,
    pub stats: Option<CommitStats>,
}

impl CommitEntry {
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Check if a directory is a git repository
pub fn is_git_repo(path: &Path) -> bool {
    git(path)
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get the current git branch name
pub fn get_current_branch(path: &Path) -> Result<String, GitError> {
    let output = git(path)
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the root of the git repository
pub fn get_repo_root(path: &Path) -> Result<PathBuf, GitError> {
    let output = git(path)
        .args(["rev-parse", "--show-toplevel"])
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

const LOG_FORMAT: &str = "%H%x1f%h%x1f%P%x1f%an%x1f%at%x1f%s";
const FIELD_SEPARATOR: char = '\u{1f}';

/// Get recent commits, newest first, with short stats
pub fn get_recent_commits(repo_path: &Path, limit: usize) -> Result<Vec<CommitEntry>, GitError> {
    let output = git(repo_path)
        .arg("log")
        .arg("-n")
        .arg(limit.to_string())
        .arg(format!("--pretty=format:{LOG_FORMAT}"))
        .arg("--shortstat")
        .output()?;

    if !output.status.success() {
        return Err(command_failed(&output.stderr));
    }

    Ok(parse_log(&String::from_utf8_lossy(&output.stdout)))
}

/// Raw patch text introduced by a commit, relative to its first parent
pub fn get_commit_diff(repo_path: &Path, commit: &CommitId) -> Result<String, GitError> {
    let output = git(repo_path)
        .args(["show", "--no-color", "--format=", "--patch"])
        .arg(commit.as_str())
        .output()?;

    if !output.status.success() {
        return Err(command_failed(&output.stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Diff source backed by the `git` command line
#[derive(Debug, Clone)]
pub struct GitDiffSource {
    repo_root: PathBuf,
}

impl GitDiffSource {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

impl DiffSource for GitDiffSource {
    type Error = GitError;

    fn diff(&self, commit: &CommitId) -> Result<String, GitError> {
        get_commit_diff(&self.repo_root, commit)
    }
}

fn git(path: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(path);
    cmd
}

fn command_failed(stderr: &[u8]) -> GitError {
    GitError::CommandFailed(String::from_utf8_lossy(stderr).trim().to_string())
}

fn parse_log(output: &str) -> Vec<CommitEntry> {
    let mut commits: Vec<CommitEntry> = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(entry) = parse_log_header(line) {
            commits.push(entry);
        } else if let (Some(stats), Some(last)) = (parse_shortstat(line), commits.last_mut()) {
            last.stats = Some(stats);
        }
    }

    commits
}

fn parse_log_header(line: &str) -> Option<CommitEntry> {
    if !line.contains(FIELD_SEPARATOR) {
        return None;
    }
    let parts: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    let [id, short_id, parents, author, time, summary, ..] = parts.as_slice() else {
        return None;
    };

    Some(CommitEntry {
        id: CommitId::new(*id),
        short_id: short_id.to_string(),
        parents: parents.split_whitespace().map(str::to_string).collect(),
        author: author.to_string(),
        author_time: time.trim().parse().ok(),
        summary: summary.to_string(),
        stats: None,
    })
}

fn parse_shortstat(line: &str) -> Option<CommitStats> {
    if !line.contains("changed") {
        return None;
    }

    let mut stats = CommitStats::default();
    for part in line.split(',') {
        let part = part.trim();
        let count = part
            .split_whitespace()
            .next()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0);
        if part.contains("changed") {
            stats.files_changed = count;
        } else if part.contains("insertion") {
            stats.insertions = count;
        } else if part.contains("deletion") {
            stats.deletions = count;
        }
    }

    Some(stats)
}
