use crate::adapters::archive::{is_archive, pack_snapshot};
use crate::core::report::ReconciliationReport;
use crate::core::service::reconcile_snapshot;
use crate::domain::ports::{DocumentFormat, DocumentSource, ServiceStore, Storage};
use crate::domain::store::MemoryStore;
use crate::utils::error::Result;

/// 匯入流程：讀取 → 解析 → reconcile → 寫回設定庫
pub struct ImportEngine<S: Storage, F: DocumentFormat> {
    storage: S,
    format: F,
}

impl<S: Storage, F: DocumentFormat> ImportEngine<S, F> {
    pub fn new(storage: S, format: F) -> Self {
        Self { storage, format }
    }

    /// Parses the whole document before touching `store`; a parse failure leaves
    /// it unchanged.
    pub fn import_bytes<T: ServiceStore + ?Sized>(
        &self,
        store: &mut T,
        source_name: &str,
        raw: &[u8],
    ) -> Result<ReconciliationReport> {
        let snapshot = self.format.parse(source_name, raw)?;
        tracing::info!(
            "Reconciling {} service(s) from '{}'",
            snapshot.services.len(),
            source_name
        );
        Ok(reconcile_snapshot(store, &snapshot))
    }

    pub async fn import_from<T: ServiceStore + ?Sized>(
        &self,
        store: &mut T,
        source: &dyn DocumentSource,
    ) -> Result<ReconciliationReport> {
        let source_name = source.describe();
        tracing::info!("📥 Fetching snapshot from: {}", source_name);
        let raw = source.fetch().await?;
        self.import_bytes(store, &source_name, &raw)
    }

    /// A store file that does not exist yet is an empty store.
    pub async fn load_store(&self, path: &str) -> Result<MemoryStore> {
        if !self.storage.exists(path).await {
            tracing::info!("Store '{}' not found, starting from an empty store", path);
            return Ok(MemoryStore::new());
        }

        let raw = self.storage.read_file(path).await?;
        let store = MemoryStore::from_snapshot(self.format.parse(path, &raw)?);
        tracing::debug!("Loaded {} service(s) from store '{}'", store.len(), path);
        Ok(store)
    }

    pub async fn save_store(&self, store: &MemoryStore, path: &str) -> Result<()> {
        let data = self.format.render(&store.to_snapshot())?;
        self.storage.write_file(path, &data).await?;
        tracing::debug!("Saved {} service(s) to store '{}'", store.len(), path);
        Ok(())
    }

    /// 匯出快照；路徑以 .zip 結尾時打包成壓縮檔
    pub async fn export_snapshot(&self, store: &MemoryStore, path: &str) -> Result<String> {
        let document = self.format.render(&store.to_snapshot())?;

        let data = if is_archive(path) {
            let entry_name = format!(
                "{}.{}",
                std::path::Path::new(path)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("snapshot"),
                self.format.extension()
            );
            pack_snapshot(&entry_name, &document)?
        } else {
            document
        };

        self.storage.write_file(path, &data).await?;
        tracing::info!("📤 Exported {} service(s) to {}", store.len(), path);
        Ok(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::json_document::JsonDocumentFormat;
    use crate::domain::model::Service;
    use crate::utils::error::ImportError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ImportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> bool {
            self.files.lock().await.contains_key(path)
        }
    }

    fn engine(storage: MockStorage) -> ImportEngine<MockStorage, JsonDocumentFormat> {
        ImportEngine::new(storage, JsonDocumentFormat::new())
    }

    #[tokio::test]
    async fn test_missing_store_loads_empty() {
        let store = engine(MockStorage::default()).load_store("store.json").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_store() {
        let storage = MockStorage::default();
        let engine = engine(storage.clone());
        let mut store = MemoryStore::new();
        store.upsert_service(Service::new("Service 1").with_tags(&["abc"]));

        engine.save_store(&store, "store.json").await.unwrap();
        let loaded = engine.load_store("store.json").await.unwrap();

        assert_eq!(loaded, store);
        assert!(storage.get_file("store.json").await.is_some());
    }

    #[test]
    fn test_parse_error_leaves_store_untouched() {
        let engine = engine(MockStorage::default());
        let mut store = MemoryStore::new();
        store.upsert_service(Service::new("Service 1"));
        let before = store.clone();

        let result = engine.import_bytes(
            &mut store,
            "broken.json",
            br#"{"services": [{"name": "Service 2"}, "#,
        );

        assert!(matches!(result, Err(ImportError::ParseError { .. })));
        assert_eq!(store, before);
    }

    #[tokio::test]
    async fn test_export_zip_contains_json_entry() {
        let storage = MockStorage::default();
        let engine = engine(storage.clone());
        let mut store = MemoryStore::new();
        store.upsert_service(Service::new("Service 1"));

        let path = engine.export_snapshot(&store, "exports/mock.zip").await.unwrap();
        assert_eq!(path, "exports/mock.zip");

        let zip_data = storage.get_file("exports/mock.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "mock.json");
    }
}
