pub mod engine;
pub mod identity;
pub mod report;
pub mod scenario;
pub mod service;
pub mod set_merge;

pub use crate::domain::model::{Scenario, Service, Snapshot};
pub use crate::domain::ports::{ConfigProvider, DocumentFormat, DocumentSource, ServiceStore, Storage};
pub use crate::utils::error::Result;
