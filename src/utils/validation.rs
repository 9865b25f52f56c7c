use crate::utils::error::{ImportError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: impl Into<String>) -> ImportError {
    ImportError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field, path, "Path contains null bytes"));
    }
    Ok(())
}

/// 檔案路徑必須帶有其中一個副檔名，例如設定庫只能是 .json
pub fn validate_file_path(field: &str, path: &str, extensions: &[&str]) -> Result<()> {
    validate_path(field, path)?;
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if extensions.contains(&ext) => Ok(()),
        Some(ext) => Err(invalid(
            field,
            path,
            format!("Unsupported file extension: {}. Allowed: {}", ext, extensions.join(", ")),
        )),
        None => Err(invalid(
            field,
            path,
            format!("Missing file extension. Allowed: {}", extensions.join(", ")),
        )),
    }
}

pub fn is_http_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// 來源可以是 http(s) URL，或是本機的 .json/.zip 快照
pub fn validate_source_location(field: &str, location: &str) -> Result<()> {
    if !is_http_location(location) {
        return validate_file_path(field, location, &["json", "zip"]);
    }

    let url = url::Url::parse(location)
        .map_err(|e| invalid(field, location, format!("Invalid URL: {}", e)))?;
    if !matches!(url.host_str(), Some(host) if !host.is_empty()) {
        return Err(invalid(field, location, "URL has no host"));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ImportError::MissingConfigError {
        field: field.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("store", "./mock-store.json", &["json"]).is_ok());
        assert!(validate_file_path("store", "./mock-store.toml", &["json"]).is_err());
        assert!(validate_file_path("store", "./mock-store", &["json"]).is_err());
        assert!(validate_file_path("store", "  ", &["json"]).is_err());
    }

    #[test]
    fn test_validate_source_location() {
        assert!(validate_source_location("source", "./snapshot.json").is_ok());
        assert!(validate_source_location("source", "exports/mock.zip").is_ok());
        assert!(validate_source_location("source", "https://mocks.example.com/export").is_ok());
        assert!(validate_source_location("source", "http://").is_err());
        assert!(validate_source_location("source", "snapshot.xml").is_err());
        assert!(validate_source_location("source", "").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("./store.json".to_string());
        let missing: Option<String> = None;
        assert_eq!(validate_required_field("store.path", &present).unwrap(), "./store.json");
        assert!(matches!(
            validate_required_field("source.location", &missing),
            Err(ImportError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("source.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("source.timeout_seconds", 0, 1, 300).is_err());
    }
}
