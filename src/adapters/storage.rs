use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at `base_path`. Relative paths are joined onto
/// the root, absolute paths are used as-is. Parent directories are never
/// created; writing into a missing directory fails.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.resolve(path)).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        tokio::fs::write(self.resolve(path), data).await?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.resolve(path)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CardError;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let path = Path::new("card.jpg");

        tokio_test::block_on(async {
            assert!(!storage.exists(path).await.unwrap());
            storage.write_file(path, &[1, 2, 3]).await.unwrap();
            assert!(storage.exists(path).await.unwrap());
            assert_eq!(storage.read_file(path).await.unwrap(), vec![1, 2, 3]);
        });
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());
        let path = Path::new("card.jpg");

        storage.write_file(path, b"first version").await.unwrap();
        storage.write_file(path, b"v2").await.unwrap();

        assert_eq!(storage.read_file(path).await.unwrap(), b"v2".to_vec());
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_created() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = storage
            .write_file(Path::new("output/cat-card.jpg"), &[0xff])
            .await;

        assert!(matches!(result, Err(CardError::Io(_))));
        assert!(!temp_dir.path().join("output").exists());
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        let storage = LocalStorage::new("/srv/cards");
        assert_eq!(
            storage.resolve(Path::new("/tmp/card.jpg")),
            PathBuf::from("/tmp/card.jpg")
        );
        assert_eq!(
            storage.resolve(Path::new("output/cat-card.jpg")),
            PathBuf::from("/srv/cards/output/cat-card.jpg")
        );
    }
}
