//! revu CLI - browse a repository's recent commits and their diffs

mod app;
mod commits;
mod config;
mod logger;
mod surface;
mod time_format;
mod ui;

use anyhow::{bail, Context, Result};
use app::{App, AppOptions};
use clap::Parser;
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use revu_core::{git, CachePolicy, GitDiffSource, Key};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "revu")]
#[command(author, version, about = "Browse recent commits and their diffs")]
struct Args {
    /// Repository to open (defaults to the current directory)
    path: Option<PathBuf>,

    /// Number of commits to list
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Maximum diffs kept in memory; 0 keeps all of them
    #[arg(long)]
    cache_capacity: Option<usize>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (defaults to the user cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_path = logger::init(args.log_file.clone())?;
    log::info!("revu {} starting", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let cwd = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    if !git::is_git_repo(&cwd) {
        bail!("Not a git repository: {}", cwd.display());
    }
    let repo_root = git::get_repo_root(&cwd).context("Failed to locate repository root")?;
    let branch = git::get_current_branch(&repo_root).ok();

    let limit = args.limit.unwrap_or(config.log.limit);
    let commits = git::get_recent_commits(&repo_root, limit).context("Failed to read commit log")?;
    if commits.is_empty() {
        println!("No commits found.");
        return Ok(());
    }
    log::info!(
        "Loaded {} commits from {} (log: {})",
        commits.len(),
        repo_root.display(),
        log_path.display()
    );

    let cache_policy = match args.cache_capacity {
        Some(capacity) => CachePolicy::from_capacity(capacity),
        None => config.cache.policy(),
    };
    let repo_name = repo_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_root.display().to_string());

    let mut app = App::new(
        GitDiffSource::new(repo_root.clone()),
        commits,
        AppOptions {
            repo_name,
            branch,
            cache_policy,
            dispatcher: config.keys.dispatcher(),
            theme: config.theme.resolve(),
            time_mode: config.ui.time,
            commit_panel_width: config.ui.commit_panel_width,
        },
    );
    app.select_current_commit();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        log::error!("{err:#}");
        eprintln!("Error: {}", err);
        return Err(err);
    }

    log::info!("revu exiting");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<GitDiffSource>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    app.request_redraw();

    loop {
        if app.take_redraw() {
            terminal.draw(|f| ui::draw(f, app))?;
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }
                    if let Some(key) = map_key(key) {
                        app.handle_key(key);
                    }
                }
                Event::Resize(_, _) => app.request_redraw(),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn map_key(event: KeyEvent) -> Option<Key> {
    let key = match event.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Esc => Key::Esc,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}
