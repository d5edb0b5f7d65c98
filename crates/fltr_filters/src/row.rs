use std::{fmt::Display, sync::Arc};

use fltr_gateway::{FieldOption, FieldType, FilterCondition, FilterValue};

use crate::conditions::{Condition, UiDataType, conditions_for, ui_data_type};

/// Stable identity of a filter row.
///
/// Rows are addressed by id rather than position so that late async
/// results can never land on a row that shifted into the old slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A selectable value of a picklist field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PicklistOption {
    pub label: String,
    pub value: String,
}

impl From<String> for PicklistOption {
    fn from(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// One line of the filter builder: field, condition and value
#[derive(Debug, Clone)]
pub struct FilterRow {
    id: RowId,
    ui_data_type: UiDataType,
    conditions: &'static [Condition],
    available_fields: Arc<[FieldOption]>,
    field: Option<FieldOption>,
    condition: Option<Condition>,
    value: Option<FilterValue>,
    predefined_options: Option<Vec<PicklistOption>>,
    is_checkbox: bool,
}

impl FilterRow {
    pub(crate) fn empty(id: RowId, available_fields: Arc<[FieldOption]>) -> Self {
        Self {
            id,
            ui_data_type: UiDataType::Text,
            conditions: &[],
            available_fields,
            field: None,
            condition: None,
            value: None,
            predefined_options: None,
            is_checkbox: false,
        }
    }

    #[must_use]
    pub const fn id(&self) -> RowId {
        self.id
    }

    #[must_use]
    pub const fn ui_data_type(&self) -> UiDataType {
        self.ui_data_type
    }

    #[must_use]
    pub const fn conditions(&self) -> &'static [Condition] {
        self.conditions
    }

    #[must_use]
    pub fn available_fields(&self) -> &[FieldOption] {
        &self.available_fields
    }

    #[must_use]
    pub fn selected_field_api_name(&self) -> Option<&str> {
        self.field.as_ref().map(|f| f.api_name.as_str())
    }

    #[must_use]
    pub fn selected_field_label(&self) -> &str {
        self.field.as_ref().map_or("", |f| f.label.as_str())
    }

    #[must_use]
    pub fn selected_field_type(&self) -> Option<FieldType> {
        self.field.as_ref().map(|f| f.field_type)
    }

    #[must_use]
    pub const fn selected_condition(&self) -> Option<Condition> {
        self.condition
    }

    #[must_use]
    pub const fn selected_value(&self) -> Option<&FilterValue> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn predefined_options(&self) -> Option<&[PicklistOption]> {
        self.predefined_options.as_deref()
    }

    #[must_use]
    pub const fn is_checkbox(&self) -> bool {
        self.is_checkbox
    }

    /// A row takes part in a query once field, condition and a non-empty
    /// value are all set. An unchecked flag counts as empty.
    #[must_use]
    pub fn is_qualified(&self) -> bool {
        self.field.is_some()
            && self.condition.is_some()
            && self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    #[must_use]
    pub fn to_filter_condition(&self) -> Option<FilterCondition> {
        if !self.is_qualified() {
            return None;
        }
        Some(FilterCondition {
            condition: self.condition?.value().to_string(),
            field_name: self.field.as_ref()?.api_name.clone(),
            field_type: self.ui_data_type.as_str().to_string(),
            value: self.value.clone()?,
        })
    }

    pub(crate) fn set_available_fields(&mut self, fields: Arc<[FieldOption]>) {
        self.available_fields = fields;
    }

    /// Bind the row to `field`, resetting everything derived from the old one
    pub(crate) fn bind_field(&mut self, field: FieldOption) {
        let field_type = field.field_type;
        self.is_checkbox = field_type.is_flag();
        self.ui_data_type = ui_data_type(field_type);
        self.conditions = conditions_for(field_type);
        self.condition = self.conditions.first().copied();
        self.value = self.is_checkbox.then_some(FilterValue::Flag(false));
        self.predefined_options = None;
        self.field = Some(field);
    }

    pub(crate) const fn set_condition(&mut self, condition: Condition) {
        self.condition = Some(condition);
    }

    /// Store a flag value, keeping `equals`/`not equals` consistent with it
    pub(crate) fn set_flag(&mut self, flag: bool) {
        self.value = Some(FilterValue::Flag(flag));
        match (self.condition, flag) {
            (Some(Condition::Equals), false) => {
                self.condition = Some(Condition::NotEquals);
            }
            (Some(Condition::NotEquals), true) => {
                self.condition = Some(Condition::Equals);
            }
            _ => {}
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.value = Some(FilterValue::Text(text));
    }

    pub(crate) fn set_predefined_options(&mut self, values: Vec<String>) {
        self.predefined_options =
            Some(values.into_iter().map(PicklistOption::from).collect());
    }
}
