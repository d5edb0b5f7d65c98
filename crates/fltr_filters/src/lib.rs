pub mod composer;
pub mod conditions;
pub mod config;
pub mod error;
pub mod events;
pub mod pagination;
pub mod panel;
pub mod picklist;
pub mod row;
pub mod rows;

pub use conditions::{Condition, PAGE_SIZE_OPTIONS, UiDataType};
pub use config::{DEFAULT_ROW_LIMIT, FilterConfig};
pub use error::{FilterError, FilterResult};
pub use events::{AppliedFilters, PanelEvent, Toast, ToastVariant};
pub use pagination::Pagination;
pub use panel::{BusyFlag, FilterPanel};
pub use picklist::{PicklistOutcome, PicklistRequest};
pub use row::{FilterRow, PicklistOption, RowId};
pub use rows::{FilterRows, Removal};
