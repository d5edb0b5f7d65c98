use crossterm::event::KeyCode;
use ratatui::widgets::TableState;

use crate::widgets::table::ResultsTable;

/// Default terminal width used for column offset calculations
const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Helper for table navigation operations
pub struct TableNavigationHandler;

impl TableNavigationHandler {
    /// Clamps a row selection to `len` rows
    pub fn clamp_selection(state: &mut TableState, len: usize) {
        if len == 0 {
            state.select(None);
        } else if state.selected().is_none_or(|selected| selected >= len) {
            state.select(Some(state.selected().map_or(0, |_| len - 1)));
        }
    }

    /// Moves the selection of a list of `len` rows with j/k/g/G
    pub fn navigate_rows(state: &mut TableState, len: usize, key: KeyCode) {
        match key {
            KeyCode::Char('j') | KeyCode::Down => state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => state.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => state.select_first(),
            KeyCode::Char('G') | KeyCode::End => {
                state.select(len.checked_sub(1));
            }
            _ => return,
        }
        Self::clamp_selection(state, len);
    }

    /// Navigation for the results grid; arrows scroll columns
    pub fn navigate_results(table: &mut ResultsTable, key: KeyCode) {
        let num_columns = table.model.columns.len();
        match key {
            KeyCode::Left => {
                if table.view.state.selected_column().is_none() {
                    table
                        .view
                        .state
                        .select_column(num_columns.checked_sub(1));
                } else {
                    table.view.state.select_previous_column();
                }
            }
            KeyCode::Right => {
                if table.view.state.selected_column().is_none() {
                    table.view.state.select_column(Some(0));
                } else {
                    table.view.state.select_next_column();
                }
            }
            _ => {
                let len = table.model.rows.len();
                Self::navigate_rows(&mut table.view.state, len, key);
                if matches!(key, KeyCode::Char('g') | KeyCode::Home) {
                    table.view.column_offset = 0;
                }
                return;
            }
        }

        if let Some(selected_col) = table.view.state.selected_column() {
            let clamped = selected_col.min(num_columns.saturating_sub(1));
            table.view.state.select_column((num_columns > 0).then_some(clamped));
            table.adjust_offset_for_selected_column(clamped, DEFAULT_TERMINAL_WIDTH);
        }
    }
}
