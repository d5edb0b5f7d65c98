use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fltr_filters::{FilterResult, PAGE_SIZE_OPTIONS, RowId};
use fltr_gateway::FilterValue;
use fltr_ui::{
    EditColumn, EditorAction, Picker, PickerAction, PickerOption, TableNavigationHandler, TextInput,
    handle_picker_input, handle_value_input,
};

use crate::{
    app::App,
    app_state::{Focus, Overlay, PendingAction, PickerKind},
};

/// Failures are already on the status line as toasts
fn settled<T>(result: FilterResult<T>) -> Option<T> {
    result.ok()
}

impl App {
    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Waits at most `timeout` so background picklist fetches keep landing
    /// while no key is pressed.
    pub fn handle_crossterm_events(&mut self, timeout: Duration) -> Result<()> {
        if !event::poll(timeout)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.on_key_event(key);
            }
            Event::Key(_) => {} // Ignore non-press key events
            Event::FocusGained => {}
            Event::FocusLost => {}
            Event::Mouse(_) => {}
            Event::Paste(_) => {}
            Event::Resize(_, _) => {} // Terminal resize is handled automatically by ratatui
        }

        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.quit();
            return;
        }

        match std::mem::take(&mut self.overlay) {
            Overlay::None => {}
            Overlay::Picker(kind, picker) => {
                self.on_picker_key(key, kind, picker);
                return;
            }
            Overlay::Editing(id, input) => {
                self.on_editor_key(key, id, input);
                return;
            }
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Char('q')) => self.quit(),
            (_, KeyCode::BackTab) => self.focus = self.focus.toggle(),
            (_, KeyCode::Char('r')) => self.request(PendingAction::Apply),
            (_, KeyCode::Char('c')) => {
                self.panel.cancel();
                self.column = EditColumn::Field;
                self.filter_state.select(Some(0));
                self.focus = Focus::Filters;
            }
            (_, KeyCode::Char('n')) => {
                self.panel.next_page();
                self.refresh_results();
            }
            (_, KeyCode::Char('p')) => {
                self.panel.previous_page();
                self.refresh_results();
            }
            (_, KeyCode::Char('f')) => {
                self.panel.first_page();
                self.refresh_results();
            }
            (_, KeyCode::Char('l')) => {
                self.panel.last_page();
                self.refresh_results();
            }
            (_, KeyCode::Char('s')) => self.open_page_size_picker(),
            (_, code) => match self.focus {
                Focus::Filters => self.on_filters_key(code),
                Focus::Results => self.on_results_key(code),
            },
        }
    }

    /// Queue gateway work unless some is already running
    fn request(&mut self, action: PendingAction) {
        if self.is_busy() {
            tracing::debug!(?action, "ignored while busy");
            return;
        }
        self.pending = Some(action);
    }

    fn selected_row(&self) -> Option<RowId> {
        self.filter_state
            .selected()
            .and_then(|index| self.panel.row_id_at(index))
    }

    fn on_filters_key(&mut self, code: KeyCode) {
        match (code, self.column) {
            (KeyCode::Char('a'), _) => {
                let id = self.panel.add_row();
                self.filter_state.select(self.panel.row_position(id));
                self.column = EditColumn::Field;
            }
            (KeyCode::Char('x'), _) => {
                if let Some(id) = self.selected_row() {
                    settled(self.panel.remove_row(id));
                }
            }
            (KeyCode::Tab, column) => self.column = column.next(),
            (KeyCode::Enter, _) => self.open_editor(),
            (KeyCode::Char(' '), _) => self.toggle_flag(),
            (code, _) => TableNavigationHandler::navigate_rows(
                &mut self.filter_state,
                self.panel.rows().len(),
                code,
            ),
        }
    }

    fn on_results_key(&mut self, code: KeyCode) {
        if code == KeyCode::Char(' ') {
            if let Some(selection) = self.results.toggle_selected() {
                let selection = selection.to_vec();
                self.panel.set_selection(selection);
            }
        } else {
            TableNavigationHandler::navigate_results(&mut self.results, code);
        }
    }

    fn toggle_flag(&mut self) {
        let Some(id) = self.selected_row() else {
            return;
        };
        let current = self
            .panel
            .row(id)
            .filter(|row| row.is_checkbox())
            .map(|row| row.selected_value().and_then(FilterValue::as_flag).unwrap_or(false));
        if let Some(flag) = current {
            settled(self.panel.set_value(id, FilterValue::Flag(!flag)));
        }
    }

    /// Enter on a filter cell: a picker for field and condition, a picker or
    /// a text editor for the value
    fn open_editor(&mut self) {
        let Some(id) = self.selected_row() else {
            return;
        };
        let is_flag = self.panel.row(id).is_some_and(|row| row.is_checkbox());
        if self.column == EditColumn::Value && is_flag {
            self.toggle_flag();
            return;
        }
        let Some(row) = self.panel.row(id) else {
            return;
        };

        let overlay = match self.column {
            EditColumn::Field => {
                let options = row
                    .available_fields()
                    .iter()
                    .map(|field| PickerOption::new(&field.label, &field.api_name))
                    .collect();
                let picker = Picker::new("Field", options, row.selected_field_api_name());
                Overlay::Picker(PickerKind::Field(id), picker)
            }
            EditColumn::Condition => {
                let options = row
                    .conditions()
                    .iter()
                    .map(|condition| PickerOption::new(condition.label(), condition.value()))
                    .collect();
                let current = row.selected_condition().map(|condition| condition.value());
                let picker = Picker::new("Condition", options, current);
                Overlay::Picker(PickerKind::Condition(id), picker)
            }
            EditColumn::Value if row.selected_field_api_name().is_none() => Overlay::None,
            EditColumn::Value => {
                let current = row.selected_value().map(ToString::to_string);
                let choices = row
                    .predefined_options()
                    .filter(|options| self.panel.config().predefined_options && !options.is_empty());
                match choices {
                    Some(options) => {
                        let options = options
                            .iter()
                            .map(|option| PickerOption::new(&option.label, &option.value))
                            .collect();
                        let picker = Picker::new("Value", options, current.as_deref());
                        Overlay::Picker(PickerKind::Value(id), picker)
                    }
                    None => Overlay::Editing(id, TextInput::with_text(current.unwrap_or_default())),
                }
            }
        };
        self.overlay = overlay;
    }

    fn open_page_size_picker(&mut self) {
        let options = PAGE_SIZE_OPTIONS
            .iter()
            .map(|size| PickerOption::new(size.to_string(), size.to_string()))
            .collect();
        let current = self.panel.pagination().page_size().to_string();
        self.overlay = Overlay::Picker(
            PickerKind::PageSize,
            Picker::new("Page size", options, Some(current.as_str())),
        );
    }

    fn on_picker_key(&mut self, key: KeyEvent, kind: PickerKind, mut picker: Picker) {
        match handle_picker_input(key, &mut picker) {
            PickerAction::Moved | PickerAction::Ignored => {
                self.overlay = Overlay::Picker(kind, picker);
            }
            PickerAction::Cancel => {}
            PickerAction::Chosen => {
                if let Some(option) = picker.selected() {
                    let value = option.value.clone();
                    self.apply_choice(kind, value);
                }
            }
        }
    }

    fn apply_choice(&mut self, kind: PickerKind, value: String) {
        match kind {
            PickerKind::Field(id) => {
                if let Some(Some(request)) = settled(self.panel.select_field(id, &value)) {
                    self.spawn_picklist(request);
                }
            }
            PickerKind::Condition(id) => {
                let condition = self.panel.row(id).and_then(|row| {
                    row.conditions()
                        .iter()
                        .copied()
                        .find(|condition| condition.value() == value)
                });
                if let Some(condition) = condition {
                    settled(self.panel.select_condition(id, condition));
                }
            }
            PickerKind::Value(id) => {
                settled(self.panel.set_value(id, FilterValue::Text(value)));
            }
            PickerKind::PageSize => {
                if let Ok(page_size) = value.parse() {
                    self.panel.change_page_size(page_size);
                    self.refresh_results();
                }
            }
        }
    }

    fn on_editor_key(&mut self, key: KeyEvent, id: RowId, mut input: TextInput) {
        match handle_value_input(key, &mut input) {
            EditorAction::Edited | EditorAction::Ignored => {
                self.overlay = Overlay::Editing(id, input);
            }
            EditorAction::Cancel => {}
            EditorAction::Submit => {
                settled(self.panel.set_value(id, FilterValue::Text(input.into_text())));
            }
        }
    }
}
