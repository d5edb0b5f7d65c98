use std::path::PathBuf;

use clap::Parser;
use url::Url;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "fltr",
    version,
    about = "Build field filters, query a record service, page through the results",
    long_about = "fltr is a terminal filter builder. Pick fields, conditions and values, run the query against a record service (a SQLite file or an HTTP endpoint) and page through what comes back.\n\nExamples:\n  fltr --sqlite crm.db --object account --primary-field name\n  fltr --endpoint https://records.example.com/api/filters --object Contact --primary-field Name\n  fltr --config ./fltr.json"
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help_heading = "Configuration",
        help = "JSON config file (default: <config dir>/fltr/config.json)."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "endpoint",
        help_heading = "Gateway",
        help = "Query a SQLite database file; tables are object types."
    )]
    pub sqlite: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        help_heading = "Gateway",
        help = "Query a record service over HTTP."
    )]
    pub endpoint: Option<Url>,

    #[arg(
        long,
        value_name = "SECS",
        help_heading = "Gateway",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long,
        value_name = "NAME",
        help_heading = "Filters",
        help = "Object type to filter."
    )]
    pub object: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        help_heading = "Filters",
        help = "Field that identifies a record."
    )]
    pub primary_field: Option<String>,

    #[arg(
        long,
        value_name = "N",
        help_heading = "Filters",
        help = "Maximum number of records a query returns."
    )]
    pub row_limit: Option<usize>,

    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "info",
        help_heading = "Output",
        help = "Log filter when RUST_LOG is unset (error, warn, info, debug, trace)."
    )]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_invocation() {
        let args = CliArgs::parse_from([
            "fltr",
            "--sqlite",
            "crm.db",
            "--object",
            "account",
            "--primary-field",
            "name",
            "--row-limit",
            "50",
        ]);
        assert_eq!(args.sqlite, Some(PathBuf::from("crm.db")));
        assert_eq!(args.object.as_deref(), Some("account"));
        assert_eq!(args.primary_field.as_deref(), Some("name"));
        assert_eq!(args.row_limit, Some(50));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_sqlite_and_endpoint_conflict() {
        let result = CliArgs::try_parse_from([
            "fltr",
            "--sqlite",
            "crm.db",
            "--endpoint",
            "https://records.example.com",
        ]);
        assert!(result.is_err());
    }
}
