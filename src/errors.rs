use std::path::PathBuf;

use fltr_gateway::GatewayError;
use thiserror::Error;

/// Failures while setting up the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not read config file {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no object type given; pass --object or set filter.objectType in the config")]
    MissingObject,

    #[error("no primary field given; pass --primary-field or set filter.primaryField in the config")]
    MissingPrimaryField,

    #[error("no gateway given; pass --sqlite or --endpoint, or set gateway in the config")]
    MissingGateway,

    #[error("could not resolve the platform {0} directory")]
    NoProjectDir(&'static str),

    #[error("could not prepare log directory {path}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
