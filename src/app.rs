use std::time::Duration;

use color_eyre::Result;
use fltr_filters::{FilterPanel, PanelEvent, PicklistOutcome, PicklistRequest};
use fltr_ui::{
    EditColumn, ResultsTable, StatusLine, TableNavigationHandler,
    widgets::{
        hotkey::Hotkey,
        top_bar_view::{FILTER_HOTKEYS, RESULTS_HOTKEYS},
    },
};
use ratatui::{DefaultTerminal, widgets::TableState};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::app_state::{Focus, Overlay, PendingAction};

pub const APP_NAME: &str = r"
  __ _ _
 / _| | |_ _ __
| |_| | __| '__|
|  _| | |_| |
|_| |_|\__|_|
";

/// Height of the top bar in rows
pub const TOPBAR_HEIGHT: u16 = 8;

/// How long to wait for a key before checking background work again
const TICK: Duration = Duration::from_millis(100);

/// The terminal host around a [`FilterPanel`]
pub struct App {
    pub(crate) running: bool,
    pub(crate) panel: FilterPanel,
    /// Highlighted filter row
    pub(crate) filter_state: TableState,
    pub(crate) column: EditColumn,
    pub(crate) focus: Focus,
    pub(crate) overlay: Overlay,
    pub(crate) results: ResultsTable,
    pub(crate) status_line: StatusLine,
    pub(crate) pending: Option<PendingAction>,
    picklist_tx: UnboundedSender<PicklistOutcome>,
    picklist_rx: UnboundedReceiver<PicklistOutcome>,
}

impl App {
    #[must_use]
    pub fn new(panel: FilterPanel) -> Self {
        let (picklist_tx, picklist_rx) = mpsc::unbounded_channel();
        Self {
            running: false,
            panel,
            filter_state: TableState::default().with_selected(Some(0)),
            column: EditColumn::default(),
            focus: Focus::default(),
            overlay: Overlay::default(),
            results: ResultsTable::default(),
            status_line: StatusLine::new(),
            pending: Some(PendingAction::Activate),
            picklist_tx,
            picklist_rx,
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            if let Some(action) = self.pending.take() {
                self.run_pending(action).await;
            } else {
                self.handle_crossterm_events(TICK)?;
                self.drain_picklists();
            }
            self.sync_panel();
        }
        Ok(())
    }

    /// Set running to false to quit the application.
    pub(crate) fn quit(&mut self) {
        self.running = false;
    }

    #[must_use]
    pub(crate) fn hotkeys(&self) -> &'static [Hotkey<'static>] {
        match self.focus {
            Focus::Filters => &FILTER_HOTKEYS,
            Focus::Results => &RESULTS_HOTKEYS,
        }
    }

    /// Busy while gateway work runs or is about to
    #[must_use]
    pub(crate) fn is_busy(&self) -> bool {
        self.pending.is_some() || self.panel.is_busy()
    }

    async fn run_pending(&mut self, action: PendingAction) {
        // Failures reach the status line through the panel's events
        let outcome = match action {
            PendingAction::Activate => self.panel.activate().await,
            PendingAction::Apply => self.panel.apply_filters().await,
        };
        if let Err(err) = outcome {
            tracing::debug!(?action, error = %err, "pending action failed");
        }
    }

    /// Start fetching picklist values without blocking the UI loop
    pub(crate) fn spawn_picklist(&self, request: PicklistRequest) {
        let gateway = self.panel.gateway();
        let tx = self.picklist_tx.clone();
        tracing::debug!(row = %request.row, field = %request.field_api_name, "fetching picklist values");
        tokio::spawn(async move {
            let outcome = request.fetch(gateway.as_ref()).await;
            if tx.send(outcome).is_err() {
                tracing::debug!("picklist result arrived after shutdown");
            }
        });
    }

    fn drain_picklists(&mut self) {
        while let Ok(outcome) = self.picklist_rx.try_recv() {
            self.panel.apply_picklist(outcome);
        }
    }

    /// Pull queued panel events into the widgets
    fn sync_panel(&mut self) {
        for event in self.panel.drain_events() {
            match event {
                PanelEvent::FiltersApplied(applied) => {
                    tracing::debug!(
                        records = applied.records.len(),
                        selected = applied.selection.len(),
                        "filters applied"
                    );
                    self.results.reset(
                        &applied.columns,
                        &applied.records,
                        &applied.primary_field,
                    );
                }
                PanelEvent::Toast(toast) => self.status_line.set_toast(toast),
            }
        }
        if self.panel.result().rows.is_empty() && !self.results.is_empty() {
            self.results.clear();
        }
        TableNavigationHandler::clamp_selection(
            &mut self.filter_state,
            self.panel.rows().len(),
        );
    }

    /// Show the current page after a paging change
    pub(crate) fn refresh_results(&mut self) {
        let columns = &self.panel.result().columns;
        self.results.reset(
            columns,
            self.panel.visible_records(),
            &self.panel.config().primary_field,
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use fltr_filters::{Condition, FilterConfig};
    use fltr_gateway::{FilterValue, SqliteGateway};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    use super::*;

    fn seeded_app(config: FilterConfig) -> (NamedTempFile, App) {
        let file = NamedTempFile::new().unwrap();
        let conn = rusqlite::Connection::open(file.path()).unwrap();
        conn.execute_batch(
            "CREATE TABLE account (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                industry PICKLIST,
                is_active CHECKBOX
            );
            INSERT INTO account (name, industry, is_active) VALUES
                ('Acme', 'Manufacturing', 1),
                ('Globex', 'Energy', 0),
                ('Initech', 'Technology', 1);",
        )
        .unwrap();

        let gateway = Arc::new(SqliteGateway::new(file.path()));
        let panel = FilterPanel::new(gateway, config);
        (file, App::new(panel))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn first_row(app: &App) -> &fltr_filters::FilterRow {
        app.panel.rows().first().unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    async fn settle(app: &mut App) {
        if let Some(action) = app.pending.take() {
            app.run_pending(action).await;
        }
        app.sync_panel();
    }

    fn config() -> FilterConfig {
        let mut config = FilterConfig::new("account", "name");
        config.additional_fields = vec!["industry".to_string()];
        config.row_limit = 10;
        config
    }

    #[tokio::test]
    async fn test_build_and_run_a_filter_from_keys() {
        let (_file, mut app) = seeded_app(config());
        settle(&mut app).await;
        assert_eq!(app.panel.rows().len(), 1);

        // field: id, name, ...
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(first_row(&app).selected_field_api_name(), Some("name"));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        assert_eq!(first_row(&app).selected_condition(), Some(Condition::Contains));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::Editing(..)));
        type_text(&mut app, "tech");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.overlay, Overlay::None));
        assert_eq!(
            first_row(&app).selected_value(),
            Some(&FilterValue::Text("tech".to_string()))
        );

        press(&mut app, KeyCode::Char('r'));
        assert!(app.is_busy());
        settle(&mut app).await;

        assert!(!app.is_busy());
        assert_eq!(app.results.model.rows.len(), 1);
        assert_eq!(app.results.model.keys, vec!["Initech"]);
    }

    #[tokio::test]
    async fn test_run_without_complete_rows_shows_error() {
        let (_file, mut app) = seeded_app(config());
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('r'));
        settle(&mut app).await;

        assert!(app.results.is_empty());
        assert_eq!(
            app.status_line.message(),
            "Please add at least one valid filter condition"
        );
    }

    #[tokio::test]
    async fn test_picklist_values_arrive_through_channel() {
        let mut config = config();
        config.predefined_options = true;
        let (_file, mut app) = seeded_app(config);
        settle(&mut app).await;

        // industry is the third field
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);

        let outcome = app.picklist_rx.recv().await.unwrap();
        assert!(app.panel.apply_picklist(outcome));
        let labels: Vec<&str> = first_row(&app)
            .predefined_options()
            .unwrap()
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Energy", "Manufacturing", "Technology"]);

        app.column = EditColumn::Value;
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.overlay,
            Overlay::Picker(crate::app_state::PickerKind::Value(_), _)
        ));
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            first_row(&app).selected_value(),
            Some(&FilterValue::Text("Energy".to_string()))
        );
    }

    #[tokio::test]
    async fn test_space_toggles_checkbox_rows() {
        let (_file, mut app) = seeded_app(config());
        settle(&mut app).await;

        let id = first_row(&app).id();
        app.panel.select_field(id, "is_active").unwrap();
        assert_eq!(
            first_row(&app).selected_value(),
            Some(&FilterValue::Flag(false))
        );

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(
            first_row(&app).selected_value(),
            Some(&FilterValue::Flag(true))
        );
    }

    #[tokio::test]
    async fn test_add_remove_and_cancel_rows() {
        let (_file, mut app) = seeded_app(config());
        settle(&mut app).await;

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.panel.rows().len(), 3);
        assert_eq!(app.filter_state.selected(), Some(2));

        press(&mut app, KeyCode::Char('x'));
        app.sync_panel();
        assert_eq!(app.panel.rows().len(), 2);
        assert_eq!(app.filter_state.selected(), Some(1));

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.panel.rows().len(), 1);
        assert_eq!(app.filter_state.selected(), Some(0));
    }

    #[tokio::test]
    async fn test_results_paging_and_selection() {
        let mut config = config();
        config.row_limit = 100;
        let (_file, mut app) = seeded_app(config);
        settle(&mut app).await;

        let id = first_row(&app).id();
        app.panel.select_field(id, "name").unwrap();
        app.panel.select_condition(id, Condition::Contains).unwrap();
        app.panel
            .set_value(id, FilterValue::Text("e".to_string()))
            .unwrap();
        press(&mut app, KeyCode::Char('r'));
        settle(&mut app).await;
        assert_eq!(app.results.model.rows.len(), 3);

        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Results);
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.panel.selection(), ["Acme".to_string()]);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.panel.pagination().page_size(), 25);
    }
}
