use fltr_ui::{FilterRowsView, PaginationBar, TopBarView};
use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::{APP_NAME, App, TOPBAR_HEIGHT},
    app_state::{Focus, Overlay},
};

impl App {
    /// Renders the user interface.
    ///
    /// Top bar, filter rows, results, pagination bar and the status line
    /// stack vertically; an open picker floats over everything.
    pub fn render(&mut self, frame: &mut Frame) {
        let filter_height = u16::try_from(self.panel.rows().len())
            .unwrap_or(u16::MAX)
            .saturating_add(3)
            .clamp(4, 12);

        let [top, filters, results, pagination, status] = Layout::vertical([
            Constraint::Length(TOPBAR_HEIGHT),
            Constraint::Length(filter_height),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            TopBarView {
                object_type: &self.panel.config().object_type,
                primary_field: &self.panel.config().primary_field,
                busy: self.is_busy(),
                hotkeys: self.hotkeys(),
                app_name: APP_NAME,
            },
            top,
        );

        let editing = match &self.overlay {
            Overlay::Editing(_, input) => Some(input),
            Overlay::None | Overlay::Picker(..) => None,
        };
        frame.render_stateful_widget(
            FilterRowsView {
                rows: self.panel.rows(),
                column: self.column,
                editing,
                focused: self.focus == Focus::Filters,
            },
            filters,
            &mut self.filter_state,
        );

        self.render_results(frame, results);

        if self.panel.pagination().total_records() > 0 {
            frame.render_widget(
                PaginationBar {
                    pagination: self.panel.pagination(),
                },
                pagination,
            );
        }

        frame.render_widget(&self.status_line, status);

        if let Overlay::Picker(_, picker) = &mut self.overlay {
            frame.render_widget(picker, frame.area());
        }
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus == Focus::Results {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" Results ({}) ", self.panel.result().rows.len()))
            .title_alignment(Alignment::Center);
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        if self.results.is_empty() {
            let hint = if self.panel.pagination().total_records() == 0
                && !self.panel.result().columns.is_empty()
            {
                "No records match these filters"
            } else {
                "Press r to run the filters"
            };
            frame.render_widget(
                Paragraph::new(hint)
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                inner_area,
            );
            return;
        }

        let table = self.results.clone();
        frame.render_stateful_widget(&table, inner_area, &mut self.results.view);
    }
}
