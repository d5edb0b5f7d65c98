use serde::{Deserialize, Deserializer, Serialize};

/// Number of rows requested when nothing else is configured
pub const DEFAULT_ROW_LIMIT: usize = 5;

/// Host-supplied settings, set once when the component is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Object the filters and query run against
    pub object_type: String,
    /// Field the host identifies records by
    pub primary_field: String,
    /// Restrict the filterable fields to these names
    #[serde(default, deserialize_with = "field_list_opt")]
    pub searchable_fields: Option<Vec<String>>,
    /// Extra fields shown as result columns
    #[serde(default, deserialize_with = "field_list")]
    pub additional_fields: Vec<String>,
    /// Fields retrieved with each record but not shown
    #[serde(default, deserialize_with = "field_list")]
    pub hidden_fields: Vec<String>,
    #[serde(default = "default_row_limit")]
    pub row_limit: usize,
    #[serde(default)]
    pub order_by: Option<String>,
    /// Offer picklist values as choices instead of free text
    #[serde(default)]
    pub predefined_options: bool,
}

const fn default_row_limit() -> usize {
    DEFAULT_ROW_LIMIT
}

impl FilterConfig {
    pub fn new(
        object_type: impl Into<String>,
        primary_field: impl Into<String>,
    ) -> Self {
        Self {
            object_type: object_type.into(),
            primary_field: primary_field.into(),
            searchable_fields: None,
            additional_fields: Vec::new(),
            hidden_fields: Vec::new(),
            row_limit: DEFAULT_ROW_LIMIT,
            order_by: None,
            predefined_options: false,
        }
    }
}

/// Split a comma-separated field list, dropping blanks
#[must_use]
pub fn split_field_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// A field list written either as `"A, B"` or `["A", "B"]`
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldList {
    Joined(String),
    Items(Vec<String>),
}

impl FieldList {
    fn into_names(self) -> Vec<String> {
        match self {
            Self::Joined(list) => split_field_list(&list),
            Self::Items(items) => items
                .iter()
                .flat_map(|item| split_field_list(item))
                .collect(),
        }
    }
}

fn field_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FieldList>::deserialize(deserializer)?
        .map(FieldList::into_names)
        .unwrap_or_default())
}

fn field_list_opt<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<FieldList>::deserialize(deserializer)?
        .map(FieldList::into_names)
        .filter(|names| !names.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lists_accept_strings_and_arrays() {
        let config: FilterConfig = serde_json::from_str(
            r#"{
                "objectType": "Contact",
                "primaryField": "Name",
                "searchableFields": "Email, Phone,,",
                "additionalFields": ["Title", "Department"]
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.searchable_fields,
            Some(vec!["Email".to_string(), "Phone".to_string()])
        );
        assert_eq!(config.additional_fields, vec!["Title", "Department"]);
        assert!(config.hidden_fields.is_empty());
        assert_eq!(config.row_limit, DEFAULT_ROW_LIMIT);
        assert!(!config.predefined_options);
    }

    #[test]
    fn test_blank_searchable_fields_mean_all() {
        let config: FilterConfig = serde_json::from_str(
            r#"{"objectType": "Contact", "primaryField": "Name", "searchableFields": " "}"#,
        )
        .unwrap();
        assert_eq!(config.searchable_fields, None);
    }
}
