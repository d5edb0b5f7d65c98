use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use directories::ProjectDirs;
use fltr_filters::FilterConfig;
use fltr_gateway::{Gateway, HttpGateway, SqliteGateway};
use serde::Deserialize;
use url::Url;

use crate::{cli::CliArgs, errors::AppError};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GatewayConfig {
    Sqlite {
        path: PathBuf,
    },
    Http {
        base_url: Url,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
}

impl GatewayConfig {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(&self) -> Result<Arc<dyn Gateway>, AppError> {
        Ok(match self {
            Self::Sqlite { path } => Arc::new(SqliteGateway::new(path)),
            Self::Http {
                base_url,
                timeout_secs,
            } => Arc::new(HttpGateway::new(
                base_url.clone(),
                timeout_secs.map(Duration::from_secs),
            )?),
        })
    }
}

/// Settings as written in the config file; every part is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub filter: Option<PartialFilter>,
    #[serde(default)]
    pub gateway: Option<GatewayConfig>,
}

/// A filter section that may lack the fields the CLI can supply
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialFilter {
    pub object_type: Option<String>,
    pub primary_field: Option<String>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Everything the application needs to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub gateway: GatewayConfig,
}

pub fn project_dirs() -> Result<ProjectDirs, AppError> {
    ProjectDirs::from("com", "fltr", "fltr").ok_or(AppError::NoProjectDir("home"))
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "fltr", "fltr").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Read a config file. A missing file at the default location is not an
/// error; a missing file that was asked for explicitly is.
fn read_file_config(path: &Path, explicit: bool) -> Result<FileConfig, AppError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(AppError::ConfigRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_str(&contents).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config file and apply CLI overrides
pub fn load(args: &CliArgs) -> Result<AppConfig, AppError> {
    let file = match &args.config {
        Some(path) => read_file_config(path, true)?,
        None => match default_config_path() {
            Some(path) => read_file_config(&path, false)?,
            None => FileConfig::default(),
        },
    };
    merge(file, args)
}

/// Combine file settings with CLI flags, flags winning
pub fn merge(file: FileConfig, args: &CliArgs) -> Result<AppConfig, AppError> {
    let partial = file.filter.unwrap_or_default();
    let object_type = args
        .object
        .clone()
        .or(partial.object_type)
        .ok_or(AppError::MissingObject)?;
    let primary_field = args
        .primary_field
        .clone()
        .or(partial.primary_field)
        .ok_or(AppError::MissingPrimaryField)?;

    let mut fields = partial.rest;
    fields.insert("objectType".to_string(), object_type.into());
    fields.insert("primaryField".to_string(), primary_field.into());
    let mut filter: FilterConfig =
        serde_json::from_value(serde_json::Value::Object(fields)).map_err(|source| {
            AppError::ConfigParse {
                path: args.config.clone().unwrap_or_default(),
                source,
            }
        })?;
    if let Some(row_limit) = args.row_limit {
        filter.row_limit = row_limit;
    }

    let gateway = match (&args.sqlite, &args.endpoint, file.gateway) {
        (Some(path), _, _) => GatewayConfig::Sqlite { path: path.clone() },
        (None, Some(base_url), file_gateway) => {
            let file_timeout = match file_gateway {
                Some(GatewayConfig::Http { timeout_secs, .. }) => timeout_secs,
                Some(GatewayConfig::Sqlite { .. }) | None => None,
            };
            GatewayConfig::Http {
                base_url: base_url.clone(),
                timeout_secs: args.timeout.or(file_timeout),
            }
        }
        (None, None, Some(GatewayConfig::Http { base_url, timeout_secs })) => GatewayConfig::Http {
            base_url,
            timeout_secs: args.timeout.or(timeout_secs),
        },
        (None, None, Some(gateway)) => gateway,
        (None, None, None) => return Err(AppError::MissingGateway),
    };

    Ok(AppConfig { filter, gateway })
}
