use std::{collections::HashSet, path::PathBuf};

use rusqlite::{
    Connection as SqliteConnection, params_from_iter,
    types::{Value as SqlValue, ValueRef},
};
use serde_json::Value;

use crate::{
    Column, FieldOption, FieldType, FilterValue, Gateway, GatewayError,
    GatewayResult, QueryRequest, Record, SearchResult,
};

/// Serves field metadata and filtered queries from a local `SQLite` file.
///
/// Every table is an object type and every column a filterable field. The
/// field type comes from the declared column type, so a table declared as
/// `status PICKLIST` or `amount CURRENCY` filters the way the platform would.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    pub path: PathBuf,
}

/// A column as reported by `PRAGMA table_info`
#[derive(Debug, Clone)]
struct TableColumn {
    name: String,
    declared_type: String,
    primary_key: bool,
    foreign_key: bool,
}

impl TableColumn {
    fn field_type(&self) -> FieldType {
        infer_field_type(self)
    }
}

impl SqliteGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn get_connection(&self) -> GatewayResult<SqliteConnection> {
        // TODO keep one connection per gateway once queries move off the UI task
        Ok(SqliteConnection::open(&self.path)?)
    }

    fn table_columns(
        conn: &SqliteConnection,
        object_type: &str,
    ) -> GatewayResult<Vec<TableColumn>> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1)",
            [object_type],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(GatewayError::UnknownObject(object_type.to_string()));
        }

        let table = quote_identifier(object_type);

        let mut fk_stmt =
            conn.prepare(&format!("PRAGMA foreign_key_list({table})"))?;
        let foreign_keys = fk_stmt
            .query_map([], |row| row.get::<_, String>(3))?
            .collect::<Result<HashSet<_>, _>>()?;

        let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let columns = stmt
            .query_map([], |row| {
                let name: String = row.get(1)?;
                let declared_type: Option<String> = row.get(2)?;
                let pk: i64 = row.get(5)?;
                Ok(TableColumn {
                    foreign_key: foreign_keys.contains(&name),
                    name,
                    declared_type: declared_type.unwrap_or_default(),
                    primary_key: pk > 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(columns)
    }

    fn resolve<'a>(
        columns: &'a [TableColumn],
        object_type: &str,
        field: &str,
    ) -> GatewayResult<&'a TableColumn> {
        columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(field.trim()))
            .ok_or_else(|| GatewayError::UnknownField {
                object: object_type.to_string(),
                field: field.to_string(),
            })
    }

    fn filterable_fields(
        &self,
        object_type: &str,
        field_names: Option<&[String]>,
    ) -> GatewayResult<Vec<FieldOption>> {
        let conn = self.get_connection()?;
        let columns = Self::table_columns(&conn, object_type)?;

        let to_option = |column: &TableColumn| {
            FieldOption::new(
                column.name.clone(),
                humanize(&column.name),
                column.field_type(),
            )
        };

        let fields = match field_names {
            Some(names) if !names.is_empty() => names
                .iter()
                .filter_map(|name| {
                    let found = Self::resolve(&columns, object_type, name).ok();
                    if found.is_none() {
                        tracing::debug!(
                            object_type,
                            field = %name,
                            "skipping unknown searchable field"
                        );
                    }
                    found
                })
                .map(to_option)
                .collect(),
            _ => columns.iter().map(to_option).collect(),
        };

        Ok(fields)
    }

    fn picklist_values(
        &self,
        object_type: &str,
        field_api_name: &str,
    ) -> GatewayResult<Vec<String>> {
        let conn = self.get_connection()?;
        let columns = Self::table_columns(&conn, object_type)?;
        let column = Self::resolve(&columns, object_type, field_api_name)?;
        let name = quote_identifier(&column.name);

        let mut stmt = conn.prepare(&format!(
            "SELECT DISTINCT {name} FROM {} WHERE {name} IS NOT NULL ORDER BY {name}",
            quote_identifier(object_type)
        ))?;
        let values = stmt
            .query_map([], |row| Ok(value_to_string(row.get_ref(0)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(values)
    }

    fn query(
        &self,
        object_type: &str,
        fields_to_return: &[String],
        request: &QueryRequest,
        row_limit: usize,
    ) -> GatewayResult<SearchResult> {
        let conn = self.get_connection()?;
        let columns = Self::table_columns(&conn, object_type)?;

        let mut selected: Vec<&TableColumn> = Vec::new();
        for field in request.retrieve_field_list() {
            let column = Self::resolve(&columns, object_type, field)?;
            if !selected.iter().any(|c| c.name == column.name) {
                selected.push(column);
            }
        }
        for field in fields_to_return {
            let column = Self::resolve(&columns, object_type, field)?;
            if !selected.iter().any(|c| c.name == column.name) {
                selected.push(column);
            }
        }
        if selected.is_empty() {
            selected = columns.iter().collect();
        }

        let mut clauses = Vec::with_capacity(request.conditions.len());
        let mut params: Vec<SqlValue> = Vec::new();
        for condition in &request.conditions {
            let column =
                Self::resolve(&columns, object_type, &condition.field_name)?;
            let (clause, param) = condition_clause(
                &condition.condition,
                column,
                &condition.field_type,
                &condition.value,
            )?;
            clauses.push(clause);
            params.extend(param);
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            selected
                .iter()
                .map(|c| quote_identifier(&c.name))
                .collect::<Vec<_>>()
                .join(", "),
            quote_identifier(object_type)
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(order_by) = request.order_by.as_deref()
            && !order_by.trim().is_empty()
        {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_clause(&columns, order_by)?);
        }
        sql.push_str(" LIMIT ?");
        params.push(SqlValue::Integer(
            i64::try_from(row_limit).unwrap_or(i64::MAX),
        ));

        tracing::debug!(%sql, params = params.len(), "executing filtered query");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let mut record = Record::new();
                for (i, column) in selected.iter().enumerate() {
                    let flag = column.field_type().is_flag();
                    record.insert(
                        column.name.clone(),
                        value_to_json(row.get_ref(i)?, flag),
                    );
                }
                Ok(record)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // The primary field leads the retrieve list and always heads the columns
        let display_fields: Vec<&str> = request
            .retrieve_field_list()
            .take(1)
            .chain(fields_to_return.iter().map(String::as_str))
            .collect();
        let mut result_columns: Vec<Column> = Vec::new();
        for field in display_fields {
            let column = Self::resolve(&columns, object_type, field)?;
            if result_columns.iter().any(|c| c.field_name == column.name) {
                continue;
            }
            result_columns.push(Column {
                label: humanize(&column.name),
                field_name: column.name.clone(),
                field_type: datatable_type(column.field_type()).to_string(),
            });
        }

        Ok(SearchResult {
            columns: result_columns,
            rows,
        })
    }
}

#[async_trait::async_trait]
impl Gateway for SqliteGateway {
    #[tracing::instrument(skip(self))]
    async fn fetch_filterable_fields(
        &self,
        object_type: &str,
        field_names: Option<&[String]>,
    ) -> GatewayResult<Vec<FieldOption>> {
        // rusqlite is synchronous, so we just run it in the async context
        self.filterable_fields(object_type, field_names)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_picklist_values(
        &self,
        object_type: &str,
        field_api_name: &str,
    ) -> GatewayResult<Vec<String>> {
        self.picklist_values(object_type, field_api_name)
    }

    #[tracing::instrument(skip(self, request))]
    async fn execute_query(
        &self,
        object_type: &str,
        fields_to_return: &[String],
        request: &QueryRequest,
        row_limit: usize,
    ) -> GatewayResult<SearchResult> {
        self.query(object_type, fields_to_return, request, row_limit)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn infer_field_type(column: &TableColumn) -> FieldType {
    if column.foreign_key {
        return FieldType::Lookup;
    }
    if column.primary_key && column.name.eq_ignore_ascii_case("id") {
        return FieldType::Id;
    }

    let declared = column.declared_type.to_ascii_uppercase();
    let base = declared
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match base {
        "BOOLEAN" | "BOOL" => FieldType::Boolean,
        "CHECKBOX" => FieldType::Checkbox,
        "CURRENCY" | "DECIMAL" | "MONEY" => FieldType::Currency,
        "DATE" => FieldType::Date,
        "DATETIME" | "TIMESTAMP" => FieldType::Datetime,
        "EMAIL" => FieldType::Email,
        "INTEGER" | "INT" | "BIGINT" | "SMALLINT" | "REAL" | "FLOAT"
        | "DOUBLE" | "NUMERIC" | "NUMBER" => FieldType::Number,
        "PHONE" => FieldType::Phone,
        "PICKLIST" => FieldType::Picklist,
        "URL" => FieldType::Url,
        _ => FieldType::String,
    }
}

/// Turn a column name into a display label (`first_name` -> `First Name`)
fn humanize(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    let mut previous: Option<char> = None;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            if !label.ends_with(' ') && !label.is_empty() {
                label.push(' ');
            }
            previous = Some(' ');
            continue;
        }
        let starts_word = match previous {
            None | Some(' ') => true,
            Some(prev) => prev.is_lowercase() && ch.is_uppercase(),
        };
        if starts_word {
            if previous.is_some_and(|prev| prev != ' ') {
                label.push(' ');
            }
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
        previous = Some(ch);
    }
    label.trim_end().to_string()
}

/// Column type understood by the result table
const fn datatable_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Boolean | FieldType::Checkbox => "boolean",
        FieldType::Currency => "currency",
        FieldType::Number => "number",
        FieldType::Date => "date-local",
        FieldType::Datetime => "date",
        FieldType::Email => "email",
        FieldType::Phone => "phone",
        FieldType::Url => "url",
        FieldType::Id
        | FieldType::Lookup
        | FieldType::Picklist
        | FieldType::String
        | FieldType::Other => "text",
    }
}

fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn bind_value(
    column: &TableColumn,
    ui_type: &str,
    value: &FilterValue,
) -> SqlValue {
    match value {
        FilterValue::Flag(flag) => SqlValue::Integer(i64::from(*flag)),
        FilterValue::Text(text) => {
            let text = text.trim();
            if column.field_type().is_flag() {
                if let Ok(flag) = text.parse::<bool>() {
                    return SqlValue::Integer(i64::from(flag));
                }
            }
            if matches!(ui_type, "number" | "currency") {
                if let Ok(int) = text.parse::<i64>() {
                    return SqlValue::Integer(int);
                }
                if let Ok(real) = text.parse::<f64>() {
                    return SqlValue::Real(real);
                }
            }
            SqlValue::Text(text.to_string())
        }
    }
}

fn condition_clause(
    condition: &str,
    column: &TableColumn,
    ui_type: &str,
    value: &FilterValue,
) -> GatewayResult<(String, Option<SqlValue>)> {
    let name = quote_identifier(&column.name);
    let comparison = |op: &str| -> GatewayResult<(String, Option<SqlValue>)> {
        Ok((
            format!("{name} {op} ?"),
            Some(bind_value(column, ui_type, value)),
        ))
    };

    match condition {
        "equals" => comparison("="),
        "not equals" => comparison("<>"),
        "greater than" => comparison(">"),
        "greater or equal" => comparison(">="),
        "less than" => comparison("<"),
        "less or equal" => comparison("<="),
        "contains" => Ok((
            format!("{name} LIKE ? ESCAPE '\\'"),
            Some(SqlValue::Text(format!(
                "%{}%",
                escape_like(value.to_string().trim())
            ))),
        )),
        "starts with" => Ok((
            format!("{name} LIKE ? ESCAPE '\\'"),
            Some(SqlValue::Text(format!(
                "{}%",
                escape_like(value.to_string().trim())
            ))),
        )),
        "is true" => Ok((format!("{name} = 1"), None)),
        "is false" => Ok((format!("{name} = 0"), None)),
        other => Err(GatewayError::UnsupportedCondition(other.to_string())),
    }
}

/// Validate an `ORDER BY` specification like `Name DESC, CreatedDate`
fn order_clause(
    columns: &[TableColumn],
    order_by: &str,
) -> GatewayResult<String> {
    let invalid = || GatewayError::InvalidOrder(order_by.to_string());

    order_by
        .split(',')
        .map(|term| {
            let mut parts = term.split_whitespace();
            let field = parts.next().ok_or_else(invalid)?;
            let column = columns
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(field))
                .ok_or_else(invalid)?;
            let direction = match parts.next() {
                None => "ASC",
                Some(dir) if dir.eq_ignore_ascii_case("asc") => "ASC",
                Some(dir) if dir.eq_ignore_ascii_case("desc") => "DESC",
                Some(_) => return Err(invalid()),
            };
            if parts.next().is_some() {
                return Err(invalid());
            }
            Ok(format!("{} {direction}", quote_identifier(&column.name)))
        })
        .collect::<GatewayResult<Vec<_>>>()
        .map(|terms| terms.join(", "))
}

/// Convert a `SQLite` value to a JSON value for a result record
fn value_to_json(value: ValueRef<'_>, flag: bool) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) if flag => Value::Bool(int != 0),
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => {
            serde_json::Number::from_f64(real).map_or(Value::Null, Value::Number)
        }
        ValueRef::Text(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
        ValueRef::Blob(bytes) => Value::String(format!("<{} bytes>", bytes.len())),
    }
}

/// Convert a `SQLite` value to a string representation
fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(int) => int.to_string(),
        ValueRef::Real(real) => real.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}
