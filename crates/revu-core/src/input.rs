//! Navigation keys and the actions they trigger in the diff view

use crate::position::ViewPosition;
use std::collections::HashMap;

/// A key press, independent of the terminal backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
    Tab,
    BackTab,
    Esc,
    Char(char),
}

impl Key {
    /// Parse a binding name as written in the config file: `Up`, `Tab`, `k`, ...
    pub fn parse(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(ch));
        }
        let key = match name.to_ascii_lowercase().as_str() {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "pageup" | "pgup" => Key::PageUp,
            "pagedown" | "pgdn" => Key::PageDown,
            "home" => Key::Home,
            "end" => Key::End,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backtab" => Key::BackTab,
            "esc" | "escape" => Key::Esc,
            "space" => Key::Char(' '),
            _ => return None,
        };
        Some(key)
    }
}

/// What a bound key does to the view position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    LineUp,
    LineDown,
    PageLeft,
    PageRight,
}

impl NavAction {
    /// Apply the action; returns whether anything moved.
    ///
    /// Scrolling right always counts as a change.
    pub fn apply(self, position: &mut ViewPosition, line_count: usize, page_width: usize) -> bool {
        match self {
            NavAction::LineUp => position.move_line_up(),
            NavAction::LineDown => position.move_line_down(line_count),
            NavAction::PageLeft => position.move_page_left(page_width),
            NavAction::PageRight => {
                position.move_page_right(page_width);
                true
            }
        }
    }
}

/// Key → action table, fixed once built
#[derive(Debug, Clone)]
pub struct InputDispatcher {
    bindings: HashMap<Key, NavAction>,
}

impl Default for InputDispatcher {
    fn default() -> Self {
        Self::with_bindings([
            (Key::Up, NavAction::LineUp),
            (Key::Down, NavAction::LineDown),
            (Key::Right, NavAction::PageRight),
            (Key::Left, NavAction::PageLeft),
        ])
    }
}

impl InputDispatcher {
    pub fn with_bindings(bindings: impl IntoIterator<Item = (Key, NavAction)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    pub fn action(&self, key: Key) -> Option<NavAction> {
        self.bindings.get(&key).copied()
    }

    pub fn is_bound(&self, key: Key) -> bool {
        self.bindings.contains_key(&key)
    }
}
