use crate::domain::model::{ProxySettings, Service, Snapshot};
use crate::domain::ports::DocumentFormat;
use crate::utils::error::{ImportError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: u32 = 1;

fn default_format_version() -> u32 {
    FORMAT_VERSION
}

/// 匯出檔在磁碟上的樣子
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default = "default_format_version")]
    format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exported_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    proxy_settings: Option<ProxySettings>,
    #[serde(default)]
    services: Vec<Service>,
}

#[derive(Debug, Clone, Default)]
pub struct JsonDocumentFormat {
    pretty: bool,
}

impl JsonDocumentFormat {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl DocumentFormat for JsonDocumentFormat {
    fn parse(&self, source_name: &str, raw: &[u8]) -> Result<Snapshot> {
        let document: SnapshotDocument = serde_json::from_slice(raw)
            .map_err(|e| ImportError::parse(source_name, e.to_string()))?;

        if document.format_version > FORMAT_VERSION {
            return Err(ImportError::parse(
                source_name,
                format!(
                    "unsupported format_version {} (newest supported is {})",
                    document.format_version, FORMAT_VERSION
                ),
            ));
        }

        if let Some(service) = document
            .services
            .iter()
            .find(|service| service.duplicate_scenario_name().is_some())
        {
            return Err(ImportError::parse(
                source_name,
                format!(
                    "service '{}' declares scenario '{}' more than once",
                    service.name,
                    service.duplicate_scenario_name().unwrap_or_default()
                ),
            ));
        }

        tracing::debug!(
            "Parsed '{}': {} service(s), exported at {:?}",
            source_name,
            document.services.len(),
            document.exported_at
        );

        Ok(Snapshot {
            services: document.services,
            proxy: document.proxy_settings,
        })
    }

    fn render(&self, snapshot: &Snapshot) -> Result<Vec<u8>> {
        let document = SnapshotDocument {
            format_version: FORMAT_VERSION,
            exported_at: Some(Utc::now()),
            proxy_settings: snapshot.proxy.clone(),
            services: snapshot.services.clone(),
        };

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
