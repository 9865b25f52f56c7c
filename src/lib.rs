pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use adapters::local_storage::LocalStorage;

pub use adapters::json_document::JsonDocumentFormat;
pub use core::{
    engine::ImportEngine,
    report::ReconciliationReport,
    service::{reconcile, reconcile_snapshot},
};
pub use domain::store::MemoryStore;
pub use utils::error::{ImportError, Result};
