use std::fmt::Display;

use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy)]
pub struct Hotkey<'a> {
    pub keycode: KeyCode,
    pub description: &'a str,
}

impl Display for Hotkey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.keycode {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::BackTab => f.write_str("S-tab"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::Enter => f.write_str("enter"),
            keycode => write!(f, "{keycode}"),
        }
    }
}
