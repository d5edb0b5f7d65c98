pub mod error;
pub mod http;
pub mod sqlite;

use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use sqlite::SqliteGateway;

/// A single result record, keyed by field api name.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Platform field types a filterable field can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Boolean,
    Checkbox,
    Currency,
    Date,
    Datetime,
    Email,
    Id,
    Lookup,
    Number,
    Phone,
    Picklist,
    String,
    Url,
    /// Any type the filter tables do not know about
    #[serde(other)]
    Other,
}

impl FieldType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Checkbox => "CHECKBOX",
            Self::Currency => "CURRENCY",
            Self::Date => "DATE",
            Self::Datetime => "DATETIME",
            Self::Email => "EMAIL",
            Self::Id => "ID",
            Self::Lookup => "LOOKUP",
            Self::Number => "NUMBER",
            Self::Phone => "PHONE",
            Self::Picklist => "PICKLIST",
            Self::String => "STRING",
            Self::Url => "URL",
            Self::Other => "OTHER",
        }
    }

    /// Whether a field of this type holds a true/false flag
    #[must_use]
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Boolean | Self::Checkbox)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that can be filtered on.
///
/// On the wire this is the combobox option shape `{value, label, fieldtype}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    #[serde(rename = "value")]
    pub api_name: String,
    pub label: String,
    #[serde(rename = "fieldtype")]
    pub field_type: FieldType,
}

impl FieldOption {
    pub fn new(
        api_name: impl Into<String>,
        label: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            api_name: api_name.into(),
            label: label.into(),
            field_type,
        }
    }
}

/// Column descriptor for a result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub label: String,
    pub field_name: String,
    #[serde(rename = "type", default = "Column::default_type")]
    pub field_type: String,
}

impl Column {
    fn default_type() -> String {
        "text".to_string()
    }
}

/// Columns and rows returned by a query. Replaced wholesale on every query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "filterDataColumns", default)]
    pub columns: Vec<Column>,
    #[serde(rename = "filterData", default)]
    pub rows: Vec<Record>,
}

/// The value side of a filter condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Flag(bool),
    Text(String),
}

impl FilterValue {
    /// Only a set flag or non-empty text takes part in a query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flag(flag) => !flag,
            Self::Text(text) => text.is_empty(),
        }
    }

    #[must_use]
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

impl Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(flag) => write!(f, "{flag}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// One qualified filter row as sent to the record service.
///
/// The `condtion` spelling is part of the service contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(rename = "condtion")]
    pub condition: String,
    #[serde(rename = "fieldName")]
    pub field_name: String,
    /// UI data type of the field (`text`, `checkbox`, `currency`, ...)
    #[serde(rename = "fieldType")]
    pub field_type: String,
    #[serde(rename = "fieldValue")]
    pub value: FilterValue,
}

/// The lookup search the record service executes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "fieldsNames")]
    pub fields_names: String,
    #[serde(rename = "objectType")]
    pub object_type: String,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(rename = "retrieveFields")]
    pub retrieve_fields: String,
    #[serde(rename = "rowLimit")]
    pub row_limit: usize,
    #[serde(rename = "searchFieldsWithCondtions")]
    pub conditions: Vec<FilterCondition>,
}

impl QueryRequest {
    /// Fields to retrieve, in request order
    pub fn retrieve_field_list(&self) -> impl Iterator<Item = &str> {
        self.retrieve_fields
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// The record service the filter component talks to
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Fields of `object_type` that can be filtered on, optionally
    /// restricted to `field_names`.
    async fn fetch_filterable_fields(
        &self,
        object_type: &str,
        field_names: Option<&[String]>,
    ) -> GatewayResult<Vec<FieldOption>>;

    /// Raw allowed values of a picklist field
    async fn fetch_picklist_values(
        &self,
        object_type: &str,
        field_api_name: &str,
    ) -> GatewayResult<Vec<String>>;

    /// Run a filtered lookup and return columns for `fields_to_return`
    async fn execute_query(
        &self,
        object_type: &str,
        fields_to_return: &[String],
        request: &QueryRequest,
        row_limit: usize,
    ) -> GatewayResult<SearchResult>;
}
