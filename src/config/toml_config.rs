use crate::config::{DEFAULT_TIMEOUT_SECONDS, parse_headers};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ImportError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub store: StoreConfig,
    pub source: SourceConfig,
    pub import: Option<ImportOptions>,
    pub export: Option<ExportConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub location: String,
    pub timeout_seconds: Option<u64>,
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
    pub filename: Option<String>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ImportError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ImportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNAPSHOT_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ImportError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_file_path("store.path", &self.store.path, &["json"])?;
        crate::utils::validation::validate_source_location("source.location", &self.source.location)?;

        if let Some(timeout) = self.source.timeout_seconds {
            crate::utils::validation::validate_range("source.timeout_seconds", timeout, 1, 600)?;
        }

        if let Some(export) = &self.export {
            crate::utils::validation::validate_path("export.output_path", &export.output_path)?;
        }

        Ok(())
    }

    pub fn dry_run(&self) -> bool {
        self.import.as_ref().and_then(|i| i.dry_run).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn headers(&self) -> Result<HashMap<String, String>> {
        let raw: Vec<String> = self
            .source
            .headers
            .iter()
            .flatten()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        parse_headers(&raw)
    }
}

impl ConfigProvider for TomlConfig {
    fn store_path(&self) -> &str {
        &self.store.path
    }

    fn source_location(&self) -> &str {
        &self.source.location
    }

    fn dry_run(&self) -> bool {
        self.dry_run()
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[store]
path = "./mock-store.json"

[source]
location = "https://mocks.example.com/export.json"
timeout_seconds = 15

[source.headers]
Authorization = "Bearer abc"

[import]
dry_run = true

[logging]
verbose = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.store_path(), "./mock-store.json");
        assert_eq!(config.source_location(), "https://mocks.example.com/export.json");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert!(ConfigProvider::dry_run(&config));
        assert!(config.verbose());
        assert!(!config.json_logs());
        assert_eq!(config.headers().unwrap().len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MOCK_SYNC_TEST_SOURCE", "https://test.mocks.com/export.json");

        let toml_content = r#"
[store]
path = "./store.json"

[source]
location = "${MOCK_SYNC_TEST_SOURCE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.location, "https://test.mocks.com/export.json");

        std::env::remove_var("MOCK_SYNC_TEST_SOURCE");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[store]
path = "./store.json"

[source]
location = "snapshot.xml"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let err = TomlConfig::from_toml_str("[store]\npath = \"./store.json\"\n").unwrap_err();
        assert!(matches!(err, ImportError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[store]
path = "./file-store.json"

[source]
location = "./snapshot.zip"

[export]
output_path = "./exports"
archive = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store.path, "./file-store.json");
        assert_eq!(config.export.unwrap().archive, Some(true));
    }
}
