use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::widgets::{picker::Picker, text_input::TextInput};

/// What a key did to an open text editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    /// The text or cursor changed
    Edited,
    Submit,
    Cancel,
    Ignored,
}

/// What a key did to an open picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Moved,
    Chosen,
    Cancel,
    Ignored,
}

/// Macro to generate text input key handling logic
macro_rules! handle_text_input {
    ($key:expr, $widget:expr) => {{
        match ($key.modifiers, $key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                $widget.move_cursor_to_start();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                $widget.move_cursor_to_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                $widget.clear();
                true
            }
            (_, KeyCode::Char(ch)) if !ch.is_control() => {
                $widget.add_char(ch);
                true
            }
            (_, KeyCode::Backspace) => {
                $widget.delete_char();
                true
            }
            (_, KeyCode::Left) => {
                $widget.move_cursor_left();
                true
            }
            (_, KeyCode::Right) => {
                $widget.move_cursor_right();
                true
            }
            (_, KeyCode::Home) => {
                $widget.move_cursor_to_start();
                true
            }
            (_, KeyCode::End) => {
                $widget.move_cursor_to_end();
                true
            }
            _ => false,
        }
    }};
}

/// Handles key events for the filter value editor
pub fn handle_value_input(key: KeyEvent, input: &mut TextInput) -> EditorAction {
    match key.code {
        KeyCode::Enter => EditorAction::Submit,
        KeyCode::Esc => EditorAction::Cancel,
        _ => {
            if handle_text_input!(key, input) {
                EditorAction::Edited
            } else {
                EditorAction::Ignored
            }
        }
    }
}

/// Handles key events for an open picker
pub fn handle_picker_input(key: KeyEvent, picker: &mut Picker) -> PickerAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
            picker.next();
            PickerAction::Moved
        }
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
            picker.previous();
            PickerAction::Moved
        }
        KeyCode::Enter if picker.selected().is_some() => PickerAction::Chosen,
        KeyCode::Esc | KeyCode::Char('q') => PickerAction::Cancel,
        _ => PickerAction::Ignored,
    }
}
