use ratatui::{
    prelude::{Alignment, Buffer, Rect, StatefulWidget, Widget},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub label: String,
    pub value: String,
}

impl PickerOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A popup list to choose one value from
#[derive(Debug, Clone, Default)]
pub struct Picker {
    pub title: String,
    pub options: Vec<PickerOption>,
    pub state: ListState,
}

impl Picker {
    /// Open on `options`, highlighting the one whose value is `current`
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        options: Vec<PickerOption>,
        current: Option<&str>,
    ) -> Self {
        let selected = current
            .and_then(|value| options.iter().position(|o| o.value == value))
            .or_else(|| (!options.is_empty()).then_some(0));
        Self {
            title: title.into(),
            options,
            state: ListState::default().with_selected(selected),
        }
    }

    pub fn next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let next = self
            .state
            .selected()
            .map_or(0, |i| (i + 1) % self.options.len());
        self.state.select(Some(next));
    }

    pub fn previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let last = self.options.len() - 1;
        let previous = self
            .state
            .selected()
            .map_or(last, |i| if i == 0 { last } else { i - 1 });
        self.state.select(Some(previous));
    }

    #[must_use]
    pub fn selected(&self) -> Option<&PickerOption> {
        self.state.selected().and_then(|i| self.options.get(i))
    }
}

impl Widget for &mut Picker {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widest = self
            .options
            .iter()
            .map(|o| o.label.width())
            .chain(std::iter::once(self.title.width()))
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 8)
            .unwrap_or(u16::MAX)
            .clamp(24, area.width.max(24))
            .min(area.width);
        let height = u16::try_from(self.options.len() + 2)
            .unwrap_or(u16::MAX)
            .clamp(3, area.height.saturating_sub(4).max(3))
            .min(area.height);

        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black));

        let items = if self.options.is_empty() {
            vec![ListItem::new("(no options)").style(Style::default().fg(Color::DarkGray))]
        } else {
            self.options
                .iter()
                .map(|o| ListItem::new(o.label.as_str()))
                .collect()
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ")
            .highlight_spacing(HighlightSpacing::Always);

        Clear.render(popup_area, buf);
        StatefulWidget::render(list, popup_area, buf, &mut self.state);
    }
}
