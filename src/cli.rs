//! Command-line surface for the `samanage` binary.
//!
//! Flags map one-to-one onto a single client call; the result is written
//! to the given output (stdout in the binary) one record per entry.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::SamanageError;
use crate::models::{Record, ResourceType};
use crate::samanage_client::{ApiResponse, ListParams, SamanageClient, DEFAULT_PER_PAGE};

/// Trims an optional string, dropping it if nothing is left.
fn trim_option(s: &Option<String>) -> Option<String> {
    s.as_ref().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// HTTP verb to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Verb {
    /// List records, or fetch one with `--id`.
    Get,
    /// Create a record from `--data`.
    Post,
    /// Update the record `--id` from `--data`.
    Put,
    /// Delete the record `--id`.
    Delete,
}

/// How records are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One sparse JSON object per line.
    Json,
    /// Name followed by indented `key: value` lines.
    Text,
}

/// Query and update a Samanage account.
#[derive(Clone, Parser)]
#[command(name = "samanage", version, about = "Query and update a Samanage account")]
pub struct Cli {
    /// Account user name.
    #[arg(short = 'u', long, env = "SAMANAGE_USERNAME")]
    pub username: String,

    /// Account password.
    #[arg(short = 'p', long, env = "SAMANAGE_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Resource type (hardwares, users, departments, catalog_items, incidents).
    #[arg(short = 'T', long = "type")]
    pub resource_type: String,

    /// Record id.
    #[arg(short = 'I', long)]
    pub id: Option<String>,

    /// Samanage API endpoint.
    #[arg(short = 'U', long, env = "SAMANAGE_URI", default_value = DEFAULT_BASE_URL)]
    pub uri: String,

    /// Search filter as a JSON object, e.g. '{"name": "web01"}'.
    #[arg(short = 's', long)]
    pub search: Option<String>,

    /// Records per page.
    #[arg(short = 'c', long, default_value_t = DEFAULT_PER_PAGE)]
    pub count: u32,

    /// Page to fetch.
    #[arg(short = 'P', long)]
    pub page: Option<u32>,

    /// HTTP verb.
    #[arg(short = 'X', long, value_enum, default_value_t = Verb::Get)]
    pub method: Verb,

    /// Record fields for post/put as a JSON object.
    #[arg(short = 'd', long)]
    pub data: Option<String>,

    /// List the incidents attached to the hardware given by --id.
    #[arg(long)]
    pub incidents: bool,

    /// Output format.
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Request timeout in seconds.
    #[arg(short = 't', long, env = "SAMANAGE_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Trims whitespace from the free-text arguments.
    #[must_use]
    pub fn sanitize(self) -> Self {
        Self {
            resource_type: self.resource_type.trim().to_string(),
            id: trim_option(&self.id),
            uri: self.uri.trim().to_string(),
            search: trim_option(&self.search),
            data: trim_option(&self.data),
            ..self
        }
    }

    /// Maps the `-v` count onto a level name.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "error",
            1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }

    /// Returns the log filter: `RUST_LOG` when set, otherwise the `-v` level
    /// for this crate.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("samanage={}", self.log_level())))
    }

    /// Builds the connection configuration from the flags.
    pub fn config(&self) -> Result<Config, SamanageError> {
        if self.timeout == 0 {
            return Err(SamanageError::invalid_config("--timeout must be at least 1 second"));
        }
        Ok(
            Config::new(self.username.as_str(), self.password.as_str(), self.uri.as_str())?
                .with_timeout(Duration::from_secs(self.timeout)),
        )
    }

    /// Builds the read parameters from `--count`, `--page` and `--search`.
    pub fn list_params(&self) -> Result<ListParams, SamanageError> {
        let mut params = ListParams::new().with_per_page(self.count);
        if let Some(page) = self.page {
            params = params.with_page(page);
        }
        if let Some(search) = &self.search {
            params = params.with_search_json(search)?;
        }
        Ok(params)
    }

    fn require_id(&self) -> Result<&str, SamanageError> {
        self.id.as_deref().ok_or_else(|| {
            SamanageError::validation(format!(
                "--id is required for {:?}",
                self.method
            ))
        })
    }

    /// Parses `--data` into a record of the requested type.
    ///
    /// Data already wrapped under the singular key (`{"hardware": {...}}`) is
    /// unwrapped first.
    pub fn payload(&self) -> Result<Record, SamanageError> {
        let kind: ResourceType = self.resource_type.parse()?;
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| SamanageError::validation("--data is required for writes"))?;
        let mut value: Value = serde_json::from_str(data)
            .map_err(|e| SamanageError::validation(format!("--data is not JSON: {}", e)))?;

        if let Value::Object(map) = &mut value {
            if map.len() == 1 {
                if let Some(inner) = map.remove(kind.singular()) {
                    value = inner;
                }
            }
        }

        Record::parse_as(Some(kind), value)
    }

    /// Rejects flag combinations that would otherwise be silently ignored.
    fn check_flags(&self) -> Result<(), SamanageError> {
        if self.incidents && self.method != Verb::Get {
            return Err(SamanageError::validation(format!(
                "--incidents cannot be combined with {:?}",
                self.method
            )));
        }
        if self.method == Verb::Post && self.id.is_some() {
            return Err(SamanageError::validation(
                "--id cannot be used with -X post; use -X put to update a record",
            ));
        }
        Ok(())
    }

    /// Issues the request described by the flags.
    pub async fn execute(&self, client: &SamanageClient) -> Result<ApiResponse, SamanageError> {
        self.check_flags()?;
        match self.method {
            Verb::Get if self.incidents => self.hardware_incidents(client).await,
            Verb::Get => {
                client
                    .get(&self.resource_type, self.id.as_deref(), &self.list_params()?)
                    .await
            }
            Verb::Post => client.post(&self.resource_type, &self.payload()?).await,
            Verb::Put => {
                let id = self.require_id()?;
                client.put(&self.resource_type, &self.payload()?, id).await
            }
            Verb::Delete => client.delete(&self.resource_type, self.require_id()?).await,
        }
    }

    async fn hardware_incidents(
        &self,
        client: &SamanageClient,
    ) -> Result<ApiResponse, SamanageError> {
        if self.resource_type.parse::<ResourceType>()? != ResourceType::Hardwares {
            return Err(SamanageError::validation(
                "--incidents is only valid with --type hardwares",
            ));
        }
        let id = self.require_id()?;

        let response = client
            .get(&self.resource_type, Some(id), &ListParams::new())
            .await?;
        let Some(hardware) = response.records().first().and_then(Record::as_hardware) else {
            return Ok(response);
        };

        client
            .get_hardware_incidents(hardware, &self.list_params()?)
            .await
    }

    /// Runs the request and prints the outcome to `out`.
    ///
    /// Failed responses have already been logged by the client and print
    /// nothing.
    pub async fn run<W: Write>(&self, client: &SamanageClient, out: &mut W) -> Result<()> {
        let response = self.execute(client).await?;

        match response {
            ApiResponse::Records(records) => {
                for record in records {
                    match self.output {
                        OutputFormat::Json => writeln!(out, "{}", record.to_json()?)?,
                        OutputFormat::Text => writeln!(out, "{}", record)?,
                    }
                }
            }
            ApiResponse::Accepted => writeln!(out, "OK")?,
            ApiResponse::Failed { status, .. } => {
                tracing::debug!(status = status.as_u16(), "nothing to print");
            }
        }

        out.flush().context("Failed to flush output")?;
        Ok(())
    }
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("resource_type", &self.resource_type)
            .field("id", &self.id)
            .field("uri", &self.uri)
            .field("search", &self.search)
            .field("count", &self.count)
            .field("page", &self.page)
            .field("method", &self.method)
            .field("data", &self.data)
            .field("incidents", &self.incidents)
            .field("output", &self.output)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["samanage", "-u", "admin", "-p", "secret"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().sanitize()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-T", "hardwares"]);
        assert_eq!(cli.uri, "https://api.samanage.com");
        assert_eq!(cli.count, 25);
        assert_eq!(cli.method, Verb::Get);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.id, None);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.log_level(), "error");
    }

    #[test]
    fn test_type_is_required() {
        let result = Cli::try_parse_from(["samanage", "-u", "admin", "-p", "secret"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["-T", "users", "-v"]).log_level(), "warn");
        assert_eq!(parse(&["-T", "users", "-vv"]).log_level(), "info");
        assert_eq!(parse(&["-T", "users", "-vvv"]).log_level(), "debug");
        assert_eq!(parse(&["-T", "users", "-v", "-v", "-v", "-v"]).log_level(), "debug");
    }

    #[test]
    fn test_sanitize_trims_arguments() {
        let cli = parse(&["-T", " users ", "-I", "  ", "-s", " {} "]);
        assert_eq!(cli.resource_type, "users");
        assert_eq!(cli.id, None);
        assert_eq!(cli.search.as_deref(), Some("{}"));
    }

    #[test]
    fn test_list_params_from_flags() {
        let cli = parse(&["-T", "users", "-c", "50", "-P", "2", "-s", r#"{"email": "a@b.c"}"#]);
        assert_eq!(
            cli.list_params().unwrap(),
            ListParams::new()
                .with_per_page(50)
                .with_page(2)
                .with_filter("email", "a@b.c")
        );
    }

    #[test]
    fn test_list_params_rejects_bad_search() {
        let cli = parse(&["-T", "users", "-s", "name=web01"]);
        assert!(matches!(
            cli.list_params().unwrap_err(),
            SamanageError::Validation(_)
        ));
    }

    #[test]
    fn test_payload_unwraps_singular_key() {
        let wrapped = parse(&["-T", "hardwares", "-X", "post", "-d", r#"{"hardware": {"name": "web01"}}"#]);
        let bare = parse(&["-T", "hardwares", "-X", "post", "-d", r#"{"name": "web01"}"#]);
        assert_eq!(wrapped.payload().unwrap(), bare.payload().unwrap());
        assert_eq!(bare.payload().unwrap().dump().unwrap(), json!({"name": "web01"}));
    }

    #[test]
    fn test_payload_requires_data() {
        let cli = parse(&["-T", "hardwares", "-X", "post"]);
        assert!(cli.payload().is_err());
    }

    #[test]
    fn test_payload_rejects_unsupported_type() {
        let cli = parse(&["-T", "printers", "-X", "post", "-d", "{}"]);
        assert!(matches!(
            cli.payload().unwrap_err(),
            SamanageError::UnsupportedResourceType(_)
        ));
    }

    #[test]
    fn test_require_id_for_delete() {
        let cli = parse(&["-T", "users", "-X", "delete"]);
        let err = cli.require_id().unwrap_err();
        assert!(err.to_string().contains("--id is required"));
    }

    #[test]
    fn test_config_from_flags() {
        let cli = parse(&["-T", "users", "-U", "https://eu.samanage.com/"]);
        let config = cli.config().unwrap();
        assert_eq!(config.base_url, "https://eu.samanage.com");
        assert_eq!(config.username, "admin");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_timeout_flag_reaches_config() {
        let cli = parse(&["-T", "users", "-t", "5"]);
        assert_eq!(cli.config().unwrap().timeout, Duration::from_secs(5));

        let cli = parse(&["-T", "users", "--timeout", "0"]);
        assert!(matches!(cli.config().unwrap_err(), SamanageError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let cli = parse(&["-T", "users"]);
        let debug = format!("{:?}", cli);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("admin"));
    }

    #[test]
    fn test_incidents_only_with_get() {
        assert!(parse(&["-T", "hardwares", "-I", "42", "--incidents"]).check_flags().is_ok());

        for verb in ["post", "put", "delete"] {
            let cli = parse(&["-T", "hardwares", "-I", "42", "--incidents", "-X", verb]);
            let err = cli.check_flags().unwrap_err();
            assert!(err.to_string().contains("--incidents"), "{}", verb);
        }
    }

    #[test]
    fn test_post_rejects_id() {
        let cli = parse(&["-T", "users", "-X", "post", "-I", "3", "-d", "{}"]);
        let err = cli.check_flags().unwrap_err();
        assert!(matches!(err, SamanageError::Validation(_)));

        assert!(parse(&["-T", "users", "-X", "post", "-d", "{}"]).check_flags().is_ok());
    }
}
