use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Message shown when a failure carries nothing more useful
pub const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Please try again.";

/// Failures talking to the record service
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service answered with an error, optionally with its own message
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Service { message: Option<String> },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Could not read service response: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown object type '{0}'")]
    UnknownObject(String),

    #[error("Unknown field '{field}' on '{object}'")]
    UnknownField { object: String, field: String },

    #[error("Invalid order specification '{0}'")]
    InvalidOrder(String),

    #[error("Unsupported condition '{0}'")]
    UnsupportedCondition(String),
}

impl GatewayError {
    /// The text to show the user for this failure
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { message: Some(message) }
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            Self::Service { .. } => GENERIC_ERROR_MESSAGE.to_string(),
            Self::Transport(_)
            | Self::Decode(_)
            | Self::Sqlite(_)
            | Self::UnknownObject(_)
            | Self::UnknownField { .. }
            | Self::InvalidOrder(_)
            | Self::UnsupportedCondition(_) => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_message_is_surfaced() {
        let err = GatewayError::Service {
            message: Some("Insufficient access".to_string()),
        };
        assert_eq!(err.user_message(), "Insufficient access");
    }

    #[test]
    fn test_service_without_message_falls_back() {
        let err = GatewayError::Service { message: None };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let blank = GatewayError::Service {
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
