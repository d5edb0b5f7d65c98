use fltr_filters::FilterRow;
use fltr_gateway::FilterValue;
use ratatui::{
    layout::{Constraint, Rect},
    prelude::{Buffer, StatefulWidget, Widget},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Row, Table, TableState},
};

use super::text_input::TextInput;

/// The part of a filter row being edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditColumn {
    #[default]
    Field,
    Condition,
    Value,
}

impl EditColumn {
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Field => Self::Condition,
            Self::Condition => Self::Value,
            Self::Value => Self::Field,
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Field => 0,
            Self::Condition => 1,
            Self::Value => 2,
        }
    }
}

/// Text shown in a row's value cell
#[must_use]
pub fn value_text(row: &FilterRow) -> String {
    match row.selected_value() {
        Some(FilterValue::Flag(true)) => "[x] true".to_string(),
        Some(FilterValue::Flag(false)) => "[ ] false".to_string(),
        Some(FilterValue::Text(text)) => row
            .predefined_options()
            .and_then(|options| options.iter().find(|o| o.value == *text))
            .map_or_else(|| text.clone(), |option| option.label.clone()),
        None => String::new(),
    }
}

/// The filter builder: one line per row with field, condition and value
pub struct FilterRowsView<'a> {
    pub rows: &'a [FilterRow],
    pub column: EditColumn,
    /// Input shown in place of the value cell of the selected row
    pub editing: Option<&'a TextInput>,
    pub focused: bool,
}

fn placeholder(text: &str) -> Cell<'static> {
    Cell::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

impl StatefulWidget for FilterRowsView<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" Filters ({}) ", self.rows.len()));
        let inner = block.inner(area);
        block.render(area, buf);

        let selected = state.selected();
        let rows = self.rows.iter().enumerate().map(|(i, row)| {
            let field = if row.selected_field_api_name().is_some() {
                Cell::from(row.selected_field_label().to_string())
            } else {
                placeholder("Select field")
            };
            let condition = row
                .selected_condition()
                .map_or_else(|| placeholder("-"), |c| Cell::from(c.label()));
            let value = match self.editing {
                Some(input) if selected == Some(i) => {
                    let (before, after) = input.split_at_cursor();
                    Cell::from(Line::from(vec![
                        Span::raw(before),
                        Span::styled("█", Style::default().fg(Color::White)),
                        Span::raw(after),
                    ]))
                }
                _ if row.selected_field_api_name().is_none() => placeholder(""),
                _ => {
                    let text = value_text(row);
                    if text.is_empty() {
                        placeholder(row.ui_data_type().as_str())
                    } else {
                        Cell::from(text)
                    }
                }
            };
            Row::new([field, condition, value])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(35),
                Constraint::Percentage(25),
                Constraint::Percentage(40),
            ],
        )
        .header(
            Row::new(["Field", "Condition", "Value"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .cell_highlight_style(if self.focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        })
        .highlight_symbol(" █ ")
        .highlight_spacing(HighlightSpacing::Always);

        state.select_column(Some(self.column.index()));
        StatefulWidget::render(table, inner, buf, state);
    }
}
