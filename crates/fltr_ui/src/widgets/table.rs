use fltr_gateway::{Column, Record};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{Cell, HighlightSpacing, Row, StatefulWidget, Table, TableState},
};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Text shown for a record value
#[must_use]
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => String::from(if *b { "✓" } else { "✗" }),
        Some(other) => other.to_string(),
    }
}

/// Model for the results table: the columns and the visible page
#[derive(Clone, Debug, Default)]
pub struct TableModel {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// Record keys of `rows`, used to report the selection
    pub keys: Vec<String>,
    pub longest_item_lens: Vec<u16>,
}

/// View state for the table (selection, horizontal scrolling)
#[derive(Clone, Debug, Default)]
pub struct TableViewState {
    pub state: TableState,
    pub column_offset: usize,
}

/// The results grid
#[derive(Clone, Debug, Default)]
pub struct ResultsTable {
    pub model: TableModel,
    pub view: TableViewState,
    /// Keys of selected records, kept across pages
    pub selected_keys: Vec<String>,
}

impl ResultsTable {
    /// Show a new page of records; `key_field` names the field that
    /// identifies a record for selection
    pub fn reset(&mut self, columns: &[Column], records: &[Record], key_field: &str) {
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|column| cell_text(record.get(&column.field_name)))
                    .collect()
            })
            .collect();
        let keys = records
            .iter()
            .map(|record| cell_text(record.get(key_field)))
            .collect();

        self.model.longest_item_lens = constraint_len_calculator(columns, &rows);
        self.model.columns = columns.to_vec();
        self.model.rows = rows;
        self.model.keys = keys;
        self.view.state.select((!self.model.rows.is_empty()).then_some(0));
        self.view.column_offset = 0;
    }

    /// Forget columns, records and selection
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.rows.is_empty()
    }

    /// Toggle the highlighted record in the selection; returns the new selection
    pub fn toggle_selected(&mut self) -> Option<&[String]> {
        let index = self.view.state.selected()?;
        let key = self.model.keys.get(index)?.clone();
        if key.is_empty() {
            return None;
        }
        if let Some(pos) = self.selected_keys.iter().position(|k| *k == key) {
            self.selected_keys.remove(pos);
        } else {
            self.selected_keys.push(key);
        }
        Some(&self.selected_keys)
    }

    fn is_key_selected(&self, index: usize) -> bool {
        self.model
            .keys
            .get(index)
            .is_some_and(|key| self.selected_keys.contains(key))
    }

    /// Adjusts `column_offset` so the selected column is visible
    pub fn adjust_offset_for_selected_column(
        &mut self,
        selected_col: usize,
        area_width: u16,
    ) {
        if self.model.longest_item_lens.is_empty() {
            return;
        }
        let visible_end = visible_columns(
            &self.model.longest_item_lens,
            self.view.column_offset,
            area_width,
        )
        .last()
        .map_or(self.view.column_offset, |last| last + 1);

        if selected_col < self.view.column_offset || selected_col >= visible_end {
            self.view.column_offset = selected_col;
        }
        self.view.column_offset = self
            .view
            .column_offset
            .min(self.model.longest_item_lens.len().saturating_sub(1));
    }
}

/// Column widths: the wider of header and widest cell
fn constraint_len_calculator(columns: &[Column], rows: &[Vec<String>]) -> Vec<u16> {
    let mut longest_lens = columns
        .iter()
        .map(|column| u16::try_from(column.label.width()).unwrap_or(u16::MAX))
        .collect::<Vec<u16>>();

    for row in rows {
        for (len, value) in longest_lens.iter_mut().zip(row) {
            let width = value.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
            *len = (*len).max(u16::try_from(width).unwrap_or(u16::MAX));
        }
    }

    longest_lens
}

/// Columns that fit in `area_width` starting at `offset`; at least one
fn visible_columns(longest_item_lens: &[u16], offset: usize, area_width: u16) -> Vec<usize> {
    let mut vis_cols = Vec::new();
    let mut cumulative_width = 0u16;
    for (idx, &len) in longest_item_lens.iter().enumerate().skip(offset) {
        let col_width = len.saturating_add(1);
        if cumulative_width.saturating_add(col_width) > area_width {
            break;
        }
        cumulative_width += col_width;
        vis_cols.push(idx);
    }

    if vis_cols.is_empty() && !longest_item_lens.is_empty() {
        vis_cols.push(offset.min(longest_item_lens.len() - 1));
    }
    vis_cols
}

impl StatefulWidget for &ResultsTable {
    type State = TableViewState;

    fn render(
        self,
        area: Rect,
        buf: &mut ratatui::buffer::Buffer,
        state: &mut Self::State,
    ) {
        if self.model.longest_item_lens.is_empty() {
            return;
        }

        // Keep the selected column on screen, then select it relative to the window
        let selected_col = state.state.selected_column();
        let mut offset = state.column_offset;
        if let Some(col) = selected_col {
            let end = visible_columns(&self.model.longest_item_lens, offset, area.width)
                .last()
                .map_or(offset, |last| last + 1);
            if col < offset || col >= end {
                offset = col;
            }
        }
        let visible_cols = visible_columns(&self.model.longest_item_lens, offset, area.width);
        let relative_col = selected_col.and_then(|col| visible_cols.iter().position(|&idx| idx == col));
        state.state.select_column(relative_col);

        let header = visible_cols
            .iter()
            .map(|&idx| {
                let label = self
                    .model
                    .columns
                    .get(idx)
                    .map(|column| column.label.clone())
                    .unwrap_or_default();
                Cell::from(label)
            })
            .collect::<Row>()
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);

        let rows = self.model.rows.iter().enumerate().map(|(i, row)| {
            let style = if self.is_key_selected(i) {
                Style::default().fg(Color::Green)
            } else {
                Style::new()
            };
            visible_cols
                .iter()
                .map(|&idx| Cell::from(row.get(idx).cloned().unwrap_or_default()))
                .collect::<Row>()
                .style(style)
                .height(1)
        });

        let constraints = visible_cols
            .iter()
            .map(|&idx| {
                let len = self.model.longest_item_lens.get(idx).copied().unwrap_or(0);
                Constraint::Length(len.saturating_add(1))
            })
            .collect::<Vec<_>>();

        let table = Table::new(rows, constraints)
            .header(header)
            .row_highlight_style(
                Style::default()
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
                    .fg(Color::Black)
                    .bg(Color::Yellow),
            )
            .column_highlight_style(Style::default().fg(Color::Cyan))
            .cell_highlight_style(
                Style::default()
                    .add_modifier(Modifier::REVERSED)
                    .fg(Color::Magenta),
            )
            .highlight_symbol(Text::from(" █ "))
            .highlight_spacing(HighlightSpacing::Always);

        StatefulWidget::render(table, area, buf, &mut state.state);
        state.state.select_column(selected_col);
    }
}
