pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_STORE_PATH: &str = "./mock-store.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, clap::Parser)]
#[command(name = "mock-sync")]
#[command(about = "Import a mock-service snapshot into a configuration store without overwriting it")]
pub struct CliConfig {
    /// Snapshot to import: a .json/.zip file or an http(s) URL
    #[arg(long)]
    pub source: Option<String>,

    /// Store file the snapshot is reconciled into
    #[arg(long)]
    pub store: Option<String>,

    /// Optional TOML configuration; command line flags take precedence
    #[arg(long)]
    pub config: Option<String>,

    /// Request header for http sources, as "Name: value" (repeatable)
    #[arg(long = "header")]
    pub headers: Vec<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Reconcile and report without saving the store")]
    pub dry_run: bool,

    #[arg(long, help = "Print the reconciliation report as JSON")]
    pub json_report: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 用 TOML 設定補上命令列沒有指定的值
    pub fn apply_toml(&mut self, toml: &toml_config::TomlConfig) {
        if self.source.is_none() {
            self.source = Some(toml.source.location.clone());
        }
        if self.store.is_none() {
            self.store = Some(toml.store.path.clone());
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = toml.source.timeout_seconds;
        }
        if self.headers.is_empty() {
            if let Some(headers) = &toml.source.headers {
                let mut pairs: Vec<_> = headers.iter().collect();
                pairs.sort();
                self.headers = pairs
                    .into_iter()
                    .map(|(name, value)| format!("{}: {}", name, value))
                    .collect();
            }
        }
        self.dry_run = self.dry_run || toml.dry_run();
        self.verbose = self.verbose || toml.verbose();
    }

    pub fn header_map(&self) -> Result<HashMap<String, String>> {
        parse_headers(&self.headers)
    }
}

pub fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>> {
    raw.iter()
        .map(|entry| {
            let (name, value) =
                entry
                    .split_once(':')
                    .ok_or_else(|| ImportError::InvalidConfigValueError {
                        field: "header".to_string(),
                        value: entry.clone(),
                        reason: "Expected 'Name: value'".to_string(),
                    })?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn store_path(&self) -> &str {
        self.store.as_deref().unwrap_or(DEFAULT_STORE_PATH)
    }

    fn source_location(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let source = validation::validate_required_field("source", &self.source)?;
        validation::validate_source_location("source", source)?;
        validation::validate_file_path("store", self.store_path(), &["json"])?;
        if let Some(timeout) = self.timeout_seconds {
            validation::validate_range("timeout_seconds", timeout, 1, 600)?;
        }
        self.header_map()?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_cli_flags() {
        let config = CliConfig::parse_from([
            "mock-sync",
            "--source",
            "https://mocks.example.com/export.json",
            "--header",
            "Authorization: Bearer abc",
            "--dry-run",
        ]);

        assert_eq!(config.source_location(), "https://mocks.example.com/export.json");
        assert_eq!(config.store_path(), DEFAULT_STORE_PATH);
        assert!(config.dry_run());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.header_map().unwrap().get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_source_fails_validation() {
        let config = CliConfig::parse_from(["mock-sync"]);
        assert!(matches!(
            config.validate(),
            Err(ImportError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_bad_header_fails_validation() {
        let config = CliConfig::parse_from([
            "mock-sync",
            "--source",
            "snapshot.json",
            "--header",
            "no-colon-here",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_fills_only_missing_values() {
        let toml = toml_config::TomlConfig::from_toml_str(
            r#"
[store]
path = "./from-toml.json"

[source]
location = "./snapshot.json"
timeout_seconds = 10

[import]
dry_run = true
"#,
        )
        .unwrap();

        let mut config = CliConfig::parse_from(["mock-sync", "--store", "./cli-store.json"]);
        config.apply_toml(&toml);

        assert_eq!(config.store_path(), "./cli-store.json");
        assert_eq!(config.source_location(), "./snapshot.json");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.dry_run());
    }
}
