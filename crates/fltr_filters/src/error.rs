use fltr_gateway::GatewayError;
use thiserror::Error;

use crate::row::RowId;

pub type FilterResult<T> = Result<T, FilterError>;

/// Why a filter operation was refused or failed.
///
/// The display text of the validation variants is what the user sees.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("This field is already being filtered on")]
    DuplicateField { api_name: String },

    #[error("Please add at least one valid filter condition")]
    NoQualifiedFilters,

    #[error("Filter row {0} no longer exists")]
    UnknownRow(RowId),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("'{0}' is not true or false")]
    InvalidFlag(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FilterError {
    /// Text for the error notification
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Gateway(err) => err.user_message(),
            Self::DuplicateField { .. }
            | Self::NoQualifiedFilters
            | Self::UnknownRow(_)
            | Self::UnknownField(_)
            | Self::InvalidFlag(_) => self.to_string(),
        }
    }

    /// Validation failures abort an operation; everything else came from the service
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        !matches!(self, Self::Gateway(_))
    }
}
