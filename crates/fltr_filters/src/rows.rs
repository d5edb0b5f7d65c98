use std::sync::Arc;

use fltr_gateway::{FieldOption, FieldType, FilterCondition, FilterValue};

use crate::{
    conditions::Condition,
    error::{FilterError, FilterResult},
    row::{FilterRow, RowId},
};

/// What happened when a row was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The row was deleted
    Removed,
    /// It was the only row, so the set went back to a single empty row
    Reset(RowId),
}

/// The ordered set of filter rows and the field list they share
#[derive(Debug, Clone)]
pub struct FilterRows {
    fields: Arc<[FieldOption]>,
    rows: Vec<FilterRow>,
    next_id: u64,
}

impl Default for FilterRows {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FilterRows {
    #[must_use]
    pub fn new(fields: Vec<FieldOption>) -> Self {
        Self {
            fields: Arc::from(fields),
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Replace the shared field list; existing rows see the new list
    pub fn set_fields(&mut self, fields: Vec<FieldOption>) {
        self.fields = Arc::from(fields);
        for row in &mut self.rows {
            row.set_available_fields(Arc::clone(&self.fields));
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldOption] {
        &self.fields
    }

    #[must_use]
    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: RowId) -> Option<&FilterRow> {
        self.rows.iter().find(|row| row.id() == id)
    }

    #[must_use]
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    #[must_use]
    pub fn id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(FilterRow::id)
    }

    fn get_mut(&mut self, id: RowId) -> FilterResult<&mut FilterRow> {
        self.rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(FilterError::UnknownRow(id))
    }

    /// Append an empty row
    pub fn add_row(&mut self) -> RowId {
        let id = RowId::new(self.next_id);
        self.next_id += 1;
        self.rows.push(FilterRow::empty(id, Arc::clone(&self.fields)));
        tracing::debug!(row = %id, rows = self.rows.len(), "added filter row");
        id
    }

    /// Drop every row and start over with one empty row
    pub fn reset(&mut self) -> RowId {
        self.rows.clear();
        self.add_row()
    }

    /// Remove a row; removing the last one resets instead of leaving none.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownRow`] if the row does not exist.
    pub fn remove_row(&mut self, id: RowId) -> FilterResult<Removal> {
        let index = self.position(id).ok_or(FilterError::UnknownRow(id))?;
        if self.rows.len() > 1 {
            self.rows.remove(index);
            tracing::debug!(row = %id, rows = self.rows.len(), "removed filter row");
            Ok(Removal::Removed)
        } else {
            Ok(Removal::Reset(self.reset()))
        }
    }

    /// Bind a row to a field and return the field's type.
    ///
    /// # Errors
    ///
    /// Fails without touching any row when the field is already selected on
    /// another row, when the field is unknown, or when the row is gone.
    pub fn select_field(
        &mut self,
        id: RowId,
        field_api_name: &str,
    ) -> FilterResult<FieldType> {
        if self.get(id).is_none() {
            return Err(FilterError::UnknownRow(id));
        }

        let is_duplicate = self.rows.iter().any(|row| {
            row.id() != id && row.selected_field_api_name() == Some(field_api_name)
        });
        if is_duplicate {
            return Err(FilterError::DuplicateField {
                api_name: field_api_name.to_string(),
            });
        }

        let field = self
            .fields
            .iter()
            .find(|field| field.api_name == field_api_name)
            .cloned()
            .ok_or_else(|| FilterError::UnknownField(field_api_name.to_string()))?;
        let field_type = field.field_type;

        self.get_mut(id)?.bind_field(field);
        tracing::debug!(row = %id, field = field_api_name, %field_type, "selected filter field");
        Ok(field_type)
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownRow`] if the row does not exist.
    pub fn select_condition(
        &mut self,
        id: RowId,
        condition: Condition,
    ) -> FilterResult<()> {
        self.get_mut(id)?.set_condition(condition);
        Ok(())
    }

    /// Set a row's value. Flag rows take booleans (or `"true"`/`"false"`)
    /// and keep their equality condition in step with the flag.
    ///
    /// # Errors
    ///
    /// Fails if the row is gone or a flag row gets a non-boolean value.
    pub fn set_value(&mut self, id: RowId, value: FilterValue) -> FilterResult<()> {
        let row = self.get_mut(id)?;
        if row.is_checkbox() {
            let flag = match value {
                FilterValue::Flag(flag) => flag,
                FilterValue::Text(text) => text
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| FilterError::InvalidFlag(text))?,
            };
            row.set_flag(flag);
        } else {
            let text = match value {
                FilterValue::Flag(flag) => flag.to_string(),
                FilterValue::Text(text) => text,
            };
            row.set_text(text);
        }
        Ok(())
    }

    /// Store picklist values on a row if it still exists and still refers to
    /// `field_api_name`. Returns whether the values were applied.
    pub fn apply_picklist_values(
        &mut self,
        id: RowId,
        field_api_name: &str,
        values: Vec<String>,
    ) -> bool {
        match self.rows.iter_mut().find(|row| row.id() == id) {
            Some(row) if row.selected_field_api_name() == Some(field_api_name) => {
                row.set_predefined_options(values);
                true
            }
            Some(_) => {
                tracing::debug!(row = %id, field = field_api_name, "row changed field, discarding picklist values");
                false
            }
            None => {
                tracing::debug!(row = %id, field = field_api_name, "row removed, discarding picklist values");
                false
            }
        }
    }

    /// Rows with field, condition and value set, in row order
    #[must_use]
    pub fn qualified_conditions(&self) -> Vec<FilterCondition> {
        self.rows
            .iter()
            .filter_map(FilterRow::to_filter_condition)
            .collect()
    }
}
