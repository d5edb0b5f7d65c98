use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use fltr_gateway::{
    FieldOption, FieldType, FilterValue, Gateway, Record, SearchResult,
};

use crate::{
    composer::{compose_request, display_fields},
    conditions::{Condition, PAGE_SIZE_OPTIONS},
    config::FilterConfig,
    error::{FilterError, FilterResult},
    events::{AppliedFilters, PanelEvent, Toast},
    pagination::Pagination,
    picklist::{PicklistOutcome, PicklistRequest},
    row::{FilterRow, RowId},
    rows::{FilterRows, Removal},
};

/// Marks the panel busy for as long as it lives
struct BusyGuard(Arc<AtomicUsize>);

impl BusyGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Read-only view of the panel's busy state, usable from another task
#[derive(Debug, Clone)]
pub struct BusyFlag(Arc<AtomicUsize>);

impl BusyFlag {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }
}

/// The filter builder: rows, the last result set and its pagination.
///
/// Every failure is reported twice: as the returned error and as an error
/// [`Toast`] in the outbox, so a host that only drains events still shows
/// it. Nothing here is fatal; the panel stays usable after any error.
pub struct FilterPanel {
    gateway: Arc<dyn Gateway>,
    config: FilterConfig,
    rows: FilterRows,
    result: SearchResult,
    pagination: Pagination,
    selection: Vec<String>,
    busy: Arc<AtomicUsize>,
    events: Vec<PanelEvent>,
}

impl std::fmt::Debug for FilterPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterPanel")
            .field("config", &self.config)
            .field("rows", &self.rows.len())
            .field("records", &self.result.rows.len())
            .field("pagination", &self.pagination)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

impl FilterPanel {
    #[must_use]
    pub fn new(gateway: Arc<dyn Gateway>, config: FilterConfig) -> Self {
        Self {
            gateway,
            config,
            rows: FilterRows::default(),
            result: SearchResult::default(),
            pagination: Pagination::default(),
            selection: Vec::new(),
            busy: Arc::new(AtomicUsize::new(0)),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    #[must_use]
    pub fn rows(&self) -> &[FilterRow] {
        self.rows.rows()
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&FilterRow> {
        self.rows.get(id)
    }

    #[must_use]
    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.rows.id_at(index)
    }

    #[must_use]
    pub fn row_position(&self, id: RowId) -> Option<usize> {
        self.rows.position(id)
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldOption] {
        self.rows.fields()
    }

    #[must_use]
    pub const fn result(&self) -> &SearchResult {
        &self.result
    }

    /// Records on the current page
    #[must_use]
    pub fn visible_records(&self) -> &[Record] {
        self.pagination.slice(&self.result.rows)
    }

    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[must_use]
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst) > 0
    }

    #[must_use]
    pub fn busy_flag(&self) -> BusyFlag {
        BusyFlag(Arc::clone(&self.busy))
    }

    /// Take every event queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    fn toast(&mut self, toast: Toast) {
        self.events.push(PanelEvent::Toast(toast));
    }

    fn report<T>(&mut self, result: FilterResult<T>) -> FilterResult<T> {
        if let Err(err) = &result {
            if err.is_validation() {
                tracing::debug!(error = %err, "filter edit rejected");
            } else {
                tracing::warn!(error = %err, "filter operation failed");
            }
            self.toast(Toast::error(err.user_message()));
        }
        result
    }

    /// Load the filterable fields and start with one empty row.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; the field list then stays empty and no
    /// row is added.
    pub async fn activate(&mut self) -> FilterResult<()> {
        let gateway = Arc::clone(&self.gateway);
        let fetched = {
            let _busy = BusyGuard::new(&self.busy);
            gateway
                .fetch_filterable_fields(
                    &self.config.object_type,
                    self.config.searchable_fields.as_deref(),
                )
                .await
        };

        let fields = self.report(fetched.map_err(FilterError::from))?;
        tracing::info!(
            object = %self.config.object_type,
            fields = fields.len(),
            "loaded filterable fields"
        );
        self.rows.set_fields(fields);
        if self.rows.is_empty() {
            self.rows.add_row();
        }
        Ok(())
    }

    pub fn add_row(&mut self) -> RowId {
        self.rows.add_row()
    }

    /// Remove a row. Removing the only row behaves like [`Self::cancel`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownRow`] if the row does not exist.
    pub fn remove_row(&mut self, id: RowId) -> FilterResult<()> {
        let removal = self.rows.remove_row(id);
        if let Removal::Reset(_) = self.report(removal)? {
            self.clear_results();
        }
        Ok(())
    }

    /// Bind a row to a field. For picklist fields the returned request
    /// fetches the allowed values; hand its outcome to
    /// [`Self::apply_picklist`] or run it with [`Self::load_picklist`].
    ///
    /// # Errors
    ///
    /// Rejects a field already used on another row, leaving every row as it was.
    pub fn select_field(
        &mut self,
        id: RowId,
        field_api_name: &str,
    ) -> FilterResult<Option<PicklistRequest>> {
        let selected = self.rows.select_field(id, field_api_name);
        let field_type = self.report(selected)?;

        Ok((field_type == FieldType::Picklist).then(|| PicklistRequest {
            row: id,
            object_type: self.config.object_type.clone(),
            field_api_name: field_api_name.to_string(),
        }))
    }

    /// Fetch and apply picklist values in one step; returns whether they
    /// landed on a row
    pub async fn load_picklist(&mut self, request: PicklistRequest) -> bool {
        let gateway = Arc::clone(&self.gateway);
        let outcome = request.fetch(gateway.as_ref()).await;
        self.apply_picklist(outcome)
    }

    /// Apply a finished picklist fetch. Values or errors for a row that is
    /// gone or now refers to another field are dropped.
    pub fn apply_picklist(&mut self, outcome: PicklistOutcome) -> bool {
        let PicklistOutcome { request, values } = outcome;
        match values {
            Ok(values) => self.rows.apply_picklist_values(
                request.row,
                &request.field_api_name,
                values,
            ),
            Err(err) => {
                let still_bound = self
                    .rows
                    .get(request.row)
                    .and_then(FilterRow::selected_field_api_name)
                    == Some(request.field_api_name.as_str());
                if still_bound {
                    self.toast(Toast::error(err.user_message()));
                } else {
                    tracing::debug!(
                        row = %request.row,
                        field = %request.field_api_name,
                        error = %err,
                        "dropping picklist error for a rebound row"
                    );
                }
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownRow`] if the row does not exist.
    pub fn select_condition(
        &mut self,
        id: RowId,
        condition: Condition,
    ) -> FilterResult<()> {
        let selected = self.rows.select_condition(id, condition);
        self.report(selected)
    }

    /// # Errors
    ///
    /// Fails if the row is gone or a flag row gets a non-boolean value.
    pub fn set_value(&mut self, id: RowId, value: FilterValue) -> FilterResult<()> {
        let set = self.rows.set_value(id, value);
        self.report(set)
    }

    /// Back to a single empty row with no results
    pub fn cancel(&mut self) {
        self.rows.reset();
        self.clear_results();
        tracing::debug!("filters cancelled");
    }

    fn clear_results(&mut self) {
        self.result = SearchResult::default();
        self.pagination = Pagination::default();
        self.selection.clear();
    }

    /// Run the query built from every complete row.
    ///
    /// On success the results are replaced, paging restarts on the first
    /// page at the smallest page size, and a [`PanelEvent::FiltersApplied`]
    /// is queued. A full page of `row_limit` records also queues an info
    /// toast saying the results may be cut off.
    ///
    /// # Errors
    ///
    /// [`FilterError::NoQualifiedFilters`] without calling the gateway when
    /// no row is complete, or the gateway error. Previous results are kept
    /// on failure.
    pub async fn apply_filters(&mut self) -> FilterResult<()> {
        let composed = compose_request(&self.config, self.rows.qualified_conditions());
        let request = self.report(composed)?;
        let fields_to_return = display_fields(&self.config);
        let row_limit = self.config.row_limit;

        tracing::info!(
            object = %request.object_type,
            conditions = request.conditions.len(),
            row_limit,
            "applying filters"
        );

        let gateway = Arc::clone(&self.gateway);
        let executed = {
            let _busy = BusyGuard::new(&self.busy);
            gateway
                .execute_query(
                    &self.config.object_type,
                    &fields_to_return,
                    &request,
                    row_limit,
                )
                .await
        };
        let result = self.report(executed.map_err(FilterError::from))?;

        let total = result.rows.len();
        tracing::info!(records = total, "query returned");
        self.result = result;
        self.pagination = Pagination::new(total, PAGE_SIZE_OPTIONS[0]);

        let applied = AppliedFilters {
            columns: self.result.columns.clone(),
            primary_field: self.config.primary_field.clone(),
            records: self.visible_records().to_vec(),
            selection: self.selection.clone(),
        };
        self.events.push(PanelEvent::FiltersApplied(applied));
        if total == row_limit {
            self.toast(Toast::info(format!(
                "Showing maximum {row_limit} records. Narrow your search for more specific results."
            )));
        }
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.pagination.next();
    }

    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    pub fn first_page(&mut self) {
        self.pagination.first();
    }

    pub fn last_page(&mut self) {
        self.pagination.last();
    }

    pub fn change_page_size(&mut self, page_size: usize) {
        self.pagination.change_page_size(page_size);
    }

    /// Host-tracked record selection, echoed in the next applied-filters event
    pub fn set_selection(&mut self, selection: Vec<String>) {
        self.selection = selection;
    }
}
