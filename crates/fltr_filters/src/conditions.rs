use std::fmt::Display;

use fltr_gateway::FieldType;
use serde::{Deserialize, Serialize};

/// Page sizes offered for the result table; the first one is the default.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 25, 50, 75, 100];

/// Comparison applied between a field and a filter value.
///
/// Labels and wire values are the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "equals")]
    Equals,
    #[serde(rename = "not equals")]
    NotEquals,
    #[serde(rename = "greater or equal")]
    GreaterOrEqual,
    #[serde(rename = "greater than")]
    GreaterThan,
    #[serde(rename = "less or equal")]
    LessOrEqual,
    #[serde(rename = "less than")]
    LessThan,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts with")]
    StartsWith,
    #[serde(rename = "is true")]
    IsTrue,
    #[serde(rename = "is false")]
    IsFalse,
}

impl Condition {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not equals",
            Self::GreaterOrEqual => "greater or equal",
            Self::GreaterThan => "greater than",
            Self::LessOrEqual => "less or equal",
            Self::LessThan => "less than",
            Self::Contains => "contains",
            Self::StartsWith => "starts with",
            Self::IsTrue => "is true",
            Self::IsFalse => "is false",
        }
    }

    #[must_use]
    pub const fn value(self) -> &'static str {
        self.label()
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

use Condition::{
    Contains, Equals, GreaterOrEqual, GreaterThan, IsFalse, IsTrue,
    LessOrEqual, LessThan, NotEquals, StartsWith,
};

const BOOLEAN_CONDITIONS: &[Condition] = &[Equals, NotEquals];
const CHECKBOX_CONDITIONS: &[Condition] = &[Equals, NotEquals, IsTrue, IsFalse];
const RANGE_CONDITIONS: &[Condition] = &[
    Equals,
    GreaterOrEqual,
    GreaterThan,
    LessOrEqual,
    LessThan,
    NotEquals,
];
const DATETIME_CONDITIONS: &[Condition] =
    &[Equals, GreaterThan, LessThan, NotEquals];
const EMAIL_CONDITIONS: &[Condition] =
    &[Equals, NotEquals, Contains, StartsWith];
const IDENTITY_CONDITIONS: &[Condition] = &[Equals, NotEquals];
const PHONE_CONDITIONS: &[Condition] = &[Contains, Equals, NotEquals];
const STRING_CONDITIONS: &[Condition] =
    &[Contains, Equals, NotEquals, StartsWith];
const URL_CONDITIONS: &[Condition] = &[Contains, Equals, NotEquals];

/// Conditions that apply to a field type, in display order
#[must_use]
pub const fn conditions_for(field_type: FieldType) -> &'static [Condition] {
    match field_type {
        FieldType::Boolean => BOOLEAN_CONDITIONS,
        FieldType::Checkbox => CHECKBOX_CONDITIONS,
        FieldType::Currency | FieldType::Date | FieldType::Number => {
            RANGE_CONDITIONS
        }
        FieldType::Datetime => DATETIME_CONDITIONS,
        FieldType::Email => EMAIL_CONDITIONS,
        FieldType::Id | FieldType::Lookup | FieldType::Picklist => {
            IDENTITY_CONDITIONS
        }
        FieldType::Phone => PHONE_CONDITIONS,
        FieldType::String => STRING_CONDITIONS,
        FieldType::Url => URL_CONDITIONS,
        FieldType::Other => &[],
    }
}

/// Input kind used to edit a filter value
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UiDataType {
    Checkbox,
    Currency,
    Date,
    Datetime,
    Email,
    Number,
    Phone,
    #[default]
    Text,
}

impl UiDataType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checkbox => "checkbox",
            Self::Currency => "currency",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Email => "email",
            Self::Number => "number",
            Self::Phone => "phone",
            Self::Text => "text",
        }
    }
}

impl Display for UiDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub const fn ui_data_type(field_type: FieldType) -> UiDataType {
    match field_type {
        FieldType::Checkbox => UiDataType::Checkbox,
        FieldType::Currency => UiDataType::Currency,
        FieldType::Date => UiDataType::Date,
        FieldType::Datetime => UiDataType::Datetime,
        FieldType::Email => UiDataType::Email,
        FieldType::Number => UiDataType::Number,
        FieldType::Phone => UiDataType::Phone,
        FieldType::Boolean
        | FieldType::Id
        | FieldType::Lookup
        | FieldType::Picklist
        | FieldType::String
        | FieldType::Url
        | FieldType::Other => UiDataType::Text,
    }
}
