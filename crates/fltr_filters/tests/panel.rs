use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fltr_filters::{
    BusyFlag, Condition, FilterConfig, FilterError, FilterPanel, PanelEvent,
    PicklistOutcome, Toast, ToastVariant, UiDataType,
};
use fltr_gateway::{
    Column, FieldOption, FieldType, FilterValue, Gateway, GatewayError,
    GatewayResult, QueryRequest, Record, SearchResult,
};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fields(Option<Vec<String>>),
    Picklist(String),
    Query {
        fields_to_return: Vec<String>,
        request: QueryRequest,
    },
}

/// In-memory gateway that records every call
#[derive(Default)]
struct ScriptedGateway {
    fields: Vec<FieldOption>,
    records: usize,
    fail_fields: bool,
    fail_query: Mutex<Option<String>>,
    calls: Mutex<Vec<Call>>,
    busy: Mutex<Option<BusyFlag>>,
    busy_during_query: Mutex<Option<bool>>,
}

impl ScriptedGateway {
    fn new(records: usize) -> Self {
        Self {
            fields: vec![
                FieldOption::new("Name", "Account Name", FieldType::String),
                FieldOption::new("Amount", "Amount", FieldType::Currency),
                FieldOption::new("StageName", "Stage", FieldType::Picklist),
                FieldOption::new("IsClosed", "Closed", FieldType::Checkbox),
            ],
            records,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn query_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Query { .. }))
            .count()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn fetch_filterable_fields(
        &self,
        _object_type: &str,
        field_names: Option<&[String]>,
    ) -> GatewayResult<Vec<FieldOption>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Fields(field_names.map(<[String]>::to_vec)));
        if self.fail_fields {
            return Err(GatewayError::Service { message: None });
        }
        Ok(self.fields.clone())
    }

    async fn fetch_picklist_values(
        &self,
        _object_type: &str,
        field_api_name: &str,
    ) -> GatewayResult<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Picklist(field_api_name.to_string()));
        Ok(vec!["Prospecting".to_string(), "Closed Won".to_string()])
    }

    async fn execute_query(
        &self,
        _object_type: &str,
        fields_to_return: &[String],
        request: &QueryRequest,
        _row_limit: usize,
    ) -> GatewayResult<SearchResult> {
        self.calls.lock().unwrap().push(Call::Query {
            fields_to_return: fields_to_return.to_vec(),
            request: request.clone(),
        });
        let busy = self.busy.lock().unwrap().as_ref().map(BusyFlag::is_busy);
        *self.busy_during_query.lock().unwrap() = busy;

        if let Some(message) = self.fail_query.lock().unwrap().clone() {
            return Err(GatewayError::Service {
                message: Some(message),
            });
        }

        let rows = (0..self.records)
            .map(|i| {
                let mut record = Record::new();
                record.insert("Name".to_string(), json!(format!("Account {i}")));
                record
            })
            .collect();
        Ok(SearchResult {
            columns: vec![Column {
                label: "Account Name".to_string(),
                field_name: "Name".to_string(),
                field_type: "text".to_string(),
            }],
            rows,
        })
    }
}

fn config() -> FilterConfig {
    let mut config = FilterConfig::new("Opportunity", "Name");
    config.row_limit = 25;
    config.additional_fields = vec!["Amount".to_string()];
    config
}

async fn active_panel(gateway: ScriptedGateway) -> (Arc<ScriptedGateway>, FilterPanel) {
    let gateway = Arc::new(gateway);
    let mut panel = FilterPanel::new(gateway.clone(), config());
    *gateway.busy.lock().unwrap() = Some(panel.busy_flag());
    panel.activate().await.unwrap();
    (gateway, panel)
}

fn toasts(events: &[PanelEvent]) -> Vec<&Toast> {
    events
        .iter()
        .filter_map(|event| match event {
            PanelEvent::Toast(toast) => Some(toast),
            PanelEvent::FiltersApplied(_) => None,
        })
        .collect()
}

#[tokio::test]
async fn test_activation_loads_fields_and_adds_one_row() {
    let (gateway, panel) = active_panel(ScriptedGateway::new(0)).await;

    assert_eq!(panel.fields().len(), 4);
    assert_eq!(panel.rows().len(), 1);
    assert_eq!(panel.rows()[0].available_fields().len(), 4);
    assert_eq!(gateway.calls(), vec![Call::Fields(None)]);
    assert!(!panel.is_busy());
}

#[tokio::test]
async fn test_activation_passes_searchable_subset() {
    let gateway = Arc::new(ScriptedGateway::new(0));
    let mut config = config();
    config.searchable_fields = Some(vec!["Name".to_string(), "Amount".to_string()]);
    let mut panel = FilterPanel::new(gateway.clone(), config);
    panel.activate().await.unwrap();

    assert_eq!(
        gateway.calls(),
        vec![Call::Fields(Some(vec!["Name".to_string(), "Amount".to_string()]))]
    );
}

#[tokio::test]
async fn test_activation_failure_leaves_no_rows() {
    let gateway = Arc::new(ScriptedGateway {
        fail_fields: true,
        ..ScriptedGateway::new(0)
    });
    let mut panel = FilterPanel::new(gateway, config());

    let err = panel.activate().await.unwrap_err();
    assert!(matches!(err, FilterError::Gateway(_)));
    assert!(panel.fields().is_empty());
    assert!(panel.rows().is_empty());
    assert!(!panel.is_busy());

    let events = panel.drain_events();
    let toasts = toasts(&events);
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].variant, ToastVariant::Error);
    assert_eq!(
        toasts[0].message,
        "An unexpected error occurred. Please try again."
    );
}

#[tokio::test]
async fn test_selecting_amount_derives_currency_conditions() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let id = panel.row_id_at(0).unwrap();

    let picklist = panel.select_field(id, "Amount").unwrap();
    assert!(picklist.is_none());

    let row = panel.row(id).unwrap();
    assert_eq!(
        row.conditions(),
        &[
            Condition::Equals,
            Condition::GreaterOrEqual,
            Condition::GreaterThan,
            Condition::LessOrEqual,
            Condition::LessThan,
            Condition::NotEquals,
        ]
    );
    assert_eq!(row.ui_data_type(), UiDataType::Currency);
    assert_eq!(row.selected_condition(), Some(Condition::Equals));
    assert_eq!(row.selected_value(), None);
    assert_eq!(row.selected_field_label(), "Amount");
}

#[tokio::test]
async fn test_duplicate_field_raises_error_and_changes_nothing() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let first = panel.row_id_at(0).unwrap();
    let second = panel.add_row();
    panel.select_field(first, "Amount").unwrap();
    let before: Vec<_> = panel
        .rows()
        .iter()
        .map(|row| (row.selected_field_api_name().map(str::to_string), row.selected_condition()))
        .collect();
    panel.drain_events();

    let err = panel.select_field(second, "Amount").unwrap_err();
    assert!(matches!(err, FilterError::DuplicateField { .. }));

    let after: Vec<_> = panel
        .rows()
        .iter()
        .map(|row| (row.selected_field_api_name().map(str::to_string), row.selected_condition()))
        .collect();
    assert_eq!(before, after);

    let events = panel.drain_events();
    assert_eq!(
        toasts(&events)[0].message,
        "This field is already being filtered on"
    );
}

#[tokio::test]
async fn test_submit_without_complete_rows_makes_no_call() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(3)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();

    let err = panel.apply_filters().await.unwrap_err();
    assert!(matches!(err, FilterError::NoQualifiedFilters));
    assert_eq!(gateway.query_calls(), 0);

    let events = panel.drain_events();
    assert_eq!(
        toasts(&events)[0].message,
        "Please add at least one valid filter condition"
    );
}

#[tokio::test]
async fn test_untouched_checkbox_row_does_not_qualify() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(3)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "IsClosed").unwrap();
    panel.drain_events();

    let err = panel.apply_filters().await.unwrap_err();
    assert!(matches!(err, FilterError::NoQualifiedFilters));
    assert_eq!(gateway.query_calls(), 0);

    let events = panel.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        toasts(&events)[0].message,
        "Please add at least one valid filter condition"
    );
}

#[tokio::test]
async fn test_checkbox_value_flips_equality() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "IsClosed").unwrap();
    assert_eq!(panel.row(id).unwrap().selected_value(), Some(&FilterValue::Flag(false)));

    panel.set_value(id, FilterValue::Flag(true)).unwrap();
    assert_eq!(panel.row(id).unwrap().selected_condition(), Some(Condition::Equals));
    panel.set_value(id, FilterValue::Flag(false)).unwrap();
    assert_eq!(panel.row(id).unwrap().selected_condition(), Some(Condition::NotEquals));
    panel.set_value(id, FilterValue::Flag(true)).unwrap();
    assert_eq!(panel.row(id).unwrap().selected_condition(), Some(Condition::Equals));

    panel.select_condition(id, Condition::IsFalse).unwrap();
    panel.set_value(id, FilterValue::Flag(false)).unwrap();
    panel.set_value(id, FilterValue::Flag(true)).unwrap();
    assert_eq!(panel.row(id).unwrap().selected_condition(), Some(Condition::IsFalse));
}

#[tokio::test]
async fn test_apply_filters_sends_request_and_emits_event() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(23)).await;
    let first = panel.row_id_at(0).unwrap();
    let second = panel.add_row();
    panel.add_row();
    panel.select_field(first, "Amount").unwrap();
    panel.select_condition(first, Condition::GreaterThan).unwrap();
    panel.set_value(first, FilterValue::Text("1000".to_string())).unwrap();
    panel.select_field(second, "IsClosed").unwrap();
    panel.set_value(second, FilterValue::Flag(true)).unwrap();
    panel.set_selection(vec!["006A".to_string()]);
    panel.drain_events();

    panel.apply_filters().await.unwrap();

    let Some(Call::Query { fields_to_return, request }) = gateway.calls().pop() else {
        panic!("expected a query call");
    };
    assert_eq!(fields_to_return, vec!["Amount"]);
    assert_eq!(request.fields_names, "Name,Amount");
    assert_eq!(request.row_limit, 25);
    assert_eq!(request.conditions.len(), 2);
    assert_eq!(request.conditions[0].field_name, "Amount");
    assert_eq!(request.conditions[0].condition, "greater than");
    assert_eq!(request.conditions[0].field_type, "currency");
    assert_eq!(request.conditions[1].condition, "equals");
    assert_eq!(request.conditions[1].value, FilterValue::Flag(true));

    assert_eq!(*gateway.busy_during_query.lock().unwrap(), Some(true));
    assert!(!panel.is_busy());
    assert_eq!(panel.pagination().page_size(), 10);
    assert_eq!(panel.pagination().total_pages(), 3);
    assert_eq!(panel.visible_records().len(), 10);

    let events = panel.drain_events();
    assert_eq!(events.len(), 1);
    let PanelEvent::FiltersApplied(applied) = &events[0] else {
        panic!("expected applied filters, got {events:?}");
    };
    assert_eq!(applied.primary_field, "Name");
    assert_eq!(applied.records.len(), 10);
    assert_eq!(applied.columns[0].field_name, "Name");
    assert_eq!(applied.selection, vec!["006A"]);
}

#[tokio::test]
async fn test_full_page_raises_truncation_notice_after_event() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(25)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();

    panel.apply_filters().await.unwrap();

    let events = panel.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], PanelEvent::FiltersApplied(_)));
    let PanelEvent::Toast(toast) = &events[1] else {
        panic!("expected a toast");
    };
    assert_eq!(toast.title, "Info");
    assert_eq!(toast.variant, ToastVariant::Info);
    assert_eq!(
        toast.message,
        "Showing maximum 25 records. Narrow your search for more specific results."
    );
}

#[tokio::test]
async fn test_query_failure_keeps_previous_results() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(12)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();
    panel.apply_filters().await.unwrap();
    panel.next_page();
    panel.drain_events();

    *gateway.fail_query.lock().unwrap() = Some("Insufficient access".to_string());
    let err = panel.apply_filters().await.unwrap_err();

    assert_eq!(err.user_message(), "Insufficient access");
    assert_eq!(gateway.query_calls(), 2);
    assert!(!panel.is_busy());
    assert_eq!(panel.result().rows.len(), 12);
    assert_eq!(panel.pagination().page_number(), 2);

    let events = panel.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(toasts(&events)[0].message, "Insufficient access");
    assert_eq!(toasts(&events)[0].title, "Error");
}

#[tokio::test]
async fn test_removing_only_row_is_a_cancel() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(8)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();
    panel.apply_filters().await.unwrap();
    assert_eq!(panel.result().rows.len(), 8);

    panel.remove_row(id).unwrap();

    assert_eq!(panel.rows().len(), 1);
    assert_eq!(panel.rows()[0].selected_field_api_name(), None);
    assert!(panel.result().rows.is_empty());
    assert!(panel.visible_records().is_empty());
    assert_eq!(panel.pagination().total_pages(), 0);
}

#[tokio::test]
async fn test_cancel_resets_rows_and_results() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(4)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.add_row();
    panel.add_row();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();
    panel.apply_filters().await.unwrap();

    panel.cancel();

    assert_eq!(panel.rows().len(), 1);
    assert_ne!(panel.row_id_at(0), Some(id));
    assert!(panel.result().rows.is_empty());
}

#[tokio::test]
async fn test_cancel_clears_selection() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(4)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();
    panel.set_selection(vec!["006A".to_string()]);
    panel.apply_filters().await.unwrap();

    panel.cancel();
    assert!(panel.selection().is_empty());

    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Acme".to_string())).unwrap();
    panel.drain_events();
    panel.apply_filters().await.unwrap();

    assert_eq!(gateway.query_calls(), 2);
    let events = panel.drain_events();
    let PanelEvent::FiltersApplied(applied) = &events[0] else {
        panic!("expected applied filters, got {events:?}");
    };
    assert!(applied.selection.is_empty());
}

#[tokio::test]
async fn test_picklist_error_for_rebound_row_is_silent() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let id = panel.row_id_at(0).unwrap();
    let request = panel.select_field(id, "StageName").unwrap().unwrap();
    panel.select_field(id, "Amount").unwrap();
    panel.drain_events();

    let outcome = PicklistOutcome {
        request: request.clone(),
        values: Err(GatewayError::Service { message: None }),
    };
    assert!(!panel.apply_picklist(outcome));
    assert!(panel.drain_events().is_empty());

    panel.remove_row(id).unwrap();
    panel.drain_events();
    let outcome = PicklistOutcome {
        request,
        values: Err(GatewayError::Service { message: None }),
    };
    assert!(!panel.apply_picklist(outcome));
    assert!(panel.drain_events().is_empty());
}

#[tokio::test]
async fn test_picklist_error_for_bound_row_raises_toast() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let id = panel.row_id_at(0).unwrap();
    let request = panel.select_field(id, "StageName").unwrap().unwrap();
    panel.drain_events();

    let outcome = PicklistOutcome {
        request,
        values: Err(GatewayError::Service {
            message: Some("Picklist unavailable".to_string()),
        }),
    };
    assert!(!panel.apply_picklist(outcome));

    let events = panel.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(toasts(&events)[0].message, "Picklist unavailable");
    assert_eq!(toasts(&events)[0].variant, ToastVariant::Error);
}

#[tokio::test]
async fn test_picklist_values_follow_row_identity() {
    let (gateway, mut panel) = active_panel(ScriptedGateway::new(0)).await;
    let first = panel.row_id_at(0).unwrap();
    let second = panel.add_row();

    let request = panel.select_field(first, "StageName").unwrap().unwrap();
    assert_eq!(request.row, first);
    assert_eq!(request.field_api_name, "StageName");

    // Row order shifts before the fetch completes
    panel.remove_row(first).unwrap();
    assert_eq!(panel.row_id_at(0), Some(second));
    let late = panel.select_field(second, "StageName").unwrap().unwrap();

    assert!(!panel.load_picklist(request).await);
    assert!(panel.row(second).unwrap().predefined_options().is_none());

    assert!(panel.load_picklist(late).await);
    let options = panel.row(second).unwrap().predefined_options().unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].label, "Prospecting");
    assert_eq!(
        gateway.calls().last(),
        Some(&Call::Picklist("StageName".to_string()))
    );
}

#[tokio::test]
async fn test_paging_through_results() {
    let (_gateway, mut panel) = active_panel(ScriptedGateway::new(23)).await;
    let id = panel.row_id_at(0).unwrap();
    panel.select_field(id, "Name").unwrap();
    panel.set_value(id, FilterValue::Text("Account".to_string())).unwrap();
    panel.apply_filters().await.unwrap();

    panel.last_page();
    assert_eq!(panel.visible_records().len(), 3);
    assert_eq!(panel.visible_records()[0]["Name"], "Account 20");
    assert!(panel.pagination().is_last_disabled());

    panel.change_page_size(25);
    assert_eq!(panel.pagination().page_number(), 1);
    assert_eq!(panel.visible_records().len(), 23);

    panel.change_page_size(10);
    panel.next_page();
    panel.previous_page();
    panel.first_page();
    assert!(panel.pagination().is_first_disabled());
}
