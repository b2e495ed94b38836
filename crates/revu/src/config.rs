//! Configuration file support for revu
//!
//! Config file location: `~/.config/revu/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [log]
//! limit = 200
//!
//! [cache]
//! capacity = 0        # 0 keeps every diff
//!
//! [ui]
//! commit_panel_width = 56
//! time = "relative"   # or "absolute"
//!
//! [keys]
//! up = ["Up", "k"]
//! down = ["Down", "j"]
//! left = ["Left", "h"]
//! right = ["Right", "l"]
//!
//! [theme]
//! added = "green"
//! removed = "red"
//! hunk = "cyan"
//! header = "yellow"
//! selection = "#3a3a3a"
//! border_active = "white"
//! border = "darkgray"
//! ```

use anyhow::{Context, Result};
use ratatui::style::Color;
use revu_core::{CachePolicy, InputDispatcher, Key, NavAction};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Commit log configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Number of commits to list
    pub limit: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { limit: 200 }
    }
}

/// Diff cache configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum diffs kept in memory; 0 keeps all of them
    pub capacity: usize,
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy::from_capacity(self.capacity)
    }
}

/// How commit times are shown in the commit list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeMode {
    #[default]
    Relative,
    Absolute,
}

/// UI configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Width of the commit list (in columns)
    pub commit_panel_width: u16,
    pub time: TimeMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            commit_panel_width: 56,
            time: TimeMode::Relative,
        }
    }
}

/// Diff view key bindings, as key names
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        let keys = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            up: keys(&["Up", "k"]),
            down: keys(&["Down", "j"]),
            left: keys(&["Left", "h"]),
            right: keys(&["Right", "l"]),
        }
    }
}

impl KeysConfig {
    /// Build the diff view dispatcher; unknown key names are skipped
    pub fn dispatcher(&self) -> InputDispatcher {
        let groups = [
            (&self.up, NavAction::LineUp),
            (&self.down, NavAction::LineDown),
            (&self.left, NavAction::PageLeft),
            (&self.right, NavAction::PageRight),
        ];
        let bindings = groups.into_iter().flat_map(|(names, action)| {
            names.iter().filter_map(move |name| match Key::parse(name) {
                Some(key) => Some((key, action)),
                None => {
                    log::warn!("Ignoring unknown key binding {name:?}");
                    None
                }
            })
        });
        InputDispatcher::with_bindings(bindings)
    }
}

/// Color names or hex values (anything ratatui's `Color` parses)
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub added: String,
    pub removed: String,
    pub hunk: String,
    pub header: String,
    pub selection: String,
    pub border_active: String,
    pub border: String,
    pub muted: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            added: "green".to_string(),
            removed: "red".to_string(),
            hunk: "cyan".to_string(),
            header: "yellow".to_string(),
            selection: "#3a3a3a".to_string(),
            border_active: "white".to_string(),
            border: "darkgray".to_string(),
            muted: "gray".to_string(),
        }
    }
}

/// Resolved theme: ratatui colors ready to use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub added: Color,
    pub removed: Color,
    pub hunk: Color,
    pub header: Color,
    pub selection: Color,
    pub border_active: Color,
    pub border: Color,
    pub muted: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve()
    }
}

impl ThemeConfig {
    pub fn resolve(&self) -> ResolvedTheme {
        ResolvedTheme {
            added: parse_color(&self.added, Color::Green),
            removed: parse_color(&self.removed, Color::Red),
            hunk: parse_color(&self.hunk, Color::Cyan),
            header: parse_color(&self.header, Color::Yellow),
            selection: parse_color(&self.selection, Color::DarkGray),
            border_active: parse_color(&self.border_active, Color::White),
            border: parse_color(&self.border, Color::DarkGray),
            muted: parse_color(&self.muted, Color::Gray),
        }
    }
}

fn parse_color(value: &str, fallback: Color) -> Color {
    Color::from_str(value.trim()).unwrap_or_else(|_| {
        log::warn!("Unknown color {value:?}, using {fallback}");
        fallback
    })
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub cache: CacheConfig,
    pub ui: UiConfig,
    pub keys: KeysConfig,
    pub theme: ThemeConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("revu").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("revu").join("config.toml"));
        }

        // ~/Library/Application Support on macOS
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("revu").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from the default locations.
    /// Returns default config if no file exists or it can't be parsed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_else(|e| {
            eprintln!("Warning: {e:#}");
            log::warn!("{e:#}");
            Self::default()
        })
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
