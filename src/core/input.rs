//! UI-agnostic input vocabulary. The TUI adapter translates terminal key
//! events into these; the controller and the form engine only see `Input`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Char(char),
    /// Bracketed paste.
    Paste(String),
    Enter,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Tab,
    BackTab,
    Backspace,
    Delete,
    /// Ctrl+C.
    Interrupt,
}

impl Input {
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Input::Char(actual) if *actual == c)
    }
}
