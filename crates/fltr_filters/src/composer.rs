use fltr_gateway::{FilterCondition, QueryRequest};

use crate::{
    config::FilterConfig,
    error::{FilterError, FilterResult},
};

/// Fields fetched with every record: primary, additional, then hidden,
/// without blanks or repeats
#[must_use]
pub fn retrieve_fields(config: &FilterConfig) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let names = std::iter::once(&config.primary_field)
        .chain(&config.additional_fields)
        .chain(&config.hidden_fields);
    for name in names {
        let name = name.trim();
        if !name.is_empty() && !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

/// Additional fields handed to the gateway as display fields, without
/// blanks or repeats. The primary field travels in the retrieve list only.
#[must_use]
pub fn display_fields(config: &FilterConfig) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for name in &config.additional_fields {
        let name = name.trim();
        if !name.is_empty() && !fields.iter().any(|f| f == name) {
            fields.push(name.to_string());
        }
    }
    fields
}

/// Build the query for a set of qualified conditions.
///
/// # Errors
///
/// Returns [`FilterError::NoQualifiedFilters`] when `conditions` is empty.
pub fn compose_request(
    config: &FilterConfig,
    conditions: Vec<FilterCondition>,
) -> FilterResult<QueryRequest> {
    if conditions.is_empty() {
        return Err(FilterError::NoQualifiedFilters);
    }

    let fields = retrieve_fields(config).join(",");
    Ok(QueryRequest {
        fields_names: fields.clone(),
        object_type: config.object_type.clone(),
        order_by: config
            .order_by
            .as_deref()
            .map(str::trim)
            .filter(|order| !order.is_empty())
            .map(ToString::to_string),
        retrieve_fields: fields,
        row_limit: config.row_limit,
        conditions,
    })
}

#[cfg(test)]
mod tests {
    use fltr_gateway::FilterValue;

    use super::*;

    fn config() -> FilterConfig {
        let mut config = FilterConfig::new("Opportunity", "Name");
        config.additional_fields = vec!["Amount".to_string(), "Name".to_string()];
        config.hidden_fields = vec![" ".to_string(), "OwnerId".to_string(), "Amount".to_string()];
        config.order_by = Some("Amount DESC".to_string());
        config
    }

    #[test]
    fn test_field_lists_are_deduplicated() {
        let config = config();
        assert_eq!(retrieve_fields(&config), vec!["Name", "Amount", "OwnerId"]);
        assert_eq!(display_fields(&config), vec!["Amount", "Name"]);
    }

    #[test]
    fn test_compose_request() {
        let condition = FilterCondition {
            condition: "greater than".to_string(),
            field_name: "Amount".to_string(),
            field_type: "currency".to_string(),
            value: FilterValue::Text("1000".to_string()),
        };
        let request = compose_request(&config(), vec![condition.clone()]).unwrap();

        assert_eq!(request.fields_names, "Name,Amount,OwnerId");
        assert_eq!(request.retrieve_fields, request.fields_names);
        assert_eq!(request.object_type, "Opportunity");
        assert_eq!(request.order_by.as_deref(), Some("Amount DESC"));
        assert_eq!(request.row_limit, 5);
        assert_eq!(request.conditions, vec![condition]);
    }

    #[test]
    fn test_compose_without_conditions_fails() {
        let err = compose_request(&config(), Vec::new()).unwrap_err();
        assert!(matches!(err, FilterError::NoQualifiedFilters));
    }
}
