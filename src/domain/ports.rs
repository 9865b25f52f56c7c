use crate::domain::model::{ProxySettings, Service, Snapshot};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// 匯入的目標設定庫。呼叫端必須在整個 reconcile 期間持有獨佔存取。
pub trait ServiceStore {
    fn get_service_by_name(&self, name: &str) -> Option<&Service>;
    fn list_services(&self) -> Vec<&Service>;
    /// Replaces the service with the same name, or appends it.
    fn upsert_service(&mut self, service: Service);
    fn proxy_settings(&self) -> Option<&ProxySettings>;
    fn set_proxy_settings(&mut self, settings: ProxySettings);
}

pub trait DocumentFormat: Send + Sync {
    /// Either a fully materialized snapshot or a `ParseError`.
    fn parse(&self, source_name: &str, raw: &[u8]) -> Result<Snapshot>;
    fn render(&self, snapshot: &Snapshot) -> Result<Vec<u8>>;
    fn extension(&self) -> &'static str;
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;
    fn describe(&self) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn source_location(&self) -> &str;
    fn dry_run(&self) -> bool;
    fn request_timeout(&self) -> Duration;
}
