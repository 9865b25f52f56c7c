use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// 以本機目錄為根的 `Storage`，設定庫和匯出檔都相對於 `root`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path))
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(self.resolve(path)).await?)
    }

    /// Creates missing parent directories, so exports can target a fresh folder.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, data).await?;
        tracing::debug!("Wrote {} byte(s) to {}", data.len(), target.display());
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .is_ok_and(|meta| meta.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ImportError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage.write_file("exports/2024/snapshot.json", b"{}").await.unwrap();

        assert!(storage.exists("exports/2024/snapshot.json").await);
        assert_eq!(storage.read_file("exports/2024/snapshot.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_directories_and_missing_files_do_not_exist() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        std::fs::create_dir(temp_dir.path().join("exports")).unwrap();

        assert!(!storage.exists("exports").await);
        assert!(!storage.exists("store.json").await);
        assert!(matches!(
            storage.read_file("store.json").await,
            Err(ImportError::IoError(_))
        ));
    }
}
