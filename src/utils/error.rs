use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse document '{source_name}': {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("Archive operation failed: {0}")]
    ArchiveError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP source '{url}' answered with status {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parsing failed at '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Document,
    Network,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ImportError {
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. } | Self::SerializationError(_) | Self::ValidationError { .. } => {
                ErrorCategory::Document
            }
            Self::HttpError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::ArchiveError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Document | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ParseError { .. } | Self::SerializationError(_) => {
                "Check that the snapshot was produced by export_snapshot and is valid JSON"
            }
            Self::ValidationError { .. } => "Fix the offending entry in the snapshot and retry",
            Self::HttpError(_) | Self::HttpStatusError { .. } => {
                "Verify the source URL is reachable, then retry the import"
            }
            Self::ArchiveError(_) => "Make sure the archive contains a .json snapshot",
            Self::IoError(_) => "Check file paths and permissions",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the command line flags or the TOML configuration",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ParseError { source_name, .. } => {
                format!("The snapshot '{}' could not be read; nothing was imported", source_name)
            }
            Self::HttpStatusError { url, status } => {
                format!("Downloading '{}' failed with HTTP {}", url, status)
            }
            Self::MissingConfigError { field } => format!("Missing setting: {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_document_category() {
        let err = ImportError::parse("snapshot.json", "unexpected end of input");
        assert_eq!(err.category(), ErrorCategory::Document);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("snapshot.json"));
        assert!(err.user_friendly_message().contains("nothing was imported"));
    }

    #[test]
    fn test_http_status_is_retryable() {
        let err = ImportError::HttpStatusError {
            url: "http://mock.local/snapshot".to_string(),
            status: 503,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: ImportError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
