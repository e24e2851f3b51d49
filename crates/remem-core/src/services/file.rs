//! File-backed secure store
//!
//! Values live in a single JSON object on disk. The file is written with
//! owner-only permissions on unix; confidentiality beyond that is left to the
//! platform.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::SecureStore;
use crate::error::Result;

/// Secure store persisted as a JSON map
pub struct FileSecureStore {
    /// Path to the store file
    path: PathBuf,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl FileSecureStore {
    /// Create a store backed by `path`
    ///
    /// The file is created lazily on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        write_owner_only(&tmp, contents.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// Write `contents` to a freshly created file readable only by its owner
async fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    // A leftover file would keep its old mode
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    Ok(())
}

#[async_trait]
impl SecureStore for FileSecureStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.load().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await?;
        tracing::debug!("Stored value for {} in {:?}", key, self.path);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        if entries.remove(key).is_none() {
            tracing::debug!("Nothing stored for {}", key);
            return Ok(());
        }
        self.persist(&entries).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let store = FileSecureStore::new(dir.path().join("store.json"));
        assert_eq!(store.get("reMem-pin").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let dir = tempdir().unwrap();
        let store = FileSecureStore::new(dir.path().join("nested").join("store.json"));

        store.set("reMem-pin", "12345").await.unwrap();
        assert_eq!(
            store.get("reMem-pin").await.unwrap(),
            Some("12345".to_string())
        );

        store.delete("reMem-pin").await.unwrap();
        assert_eq!(store.get("reMem-pin").await.unwrap(), None);

        // Deleting again is fine
        store.delete("reMem-pin").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        FileSecureStore::new(&path)
            .set("reMem-pin", "98765")
            .await
            .unwrap();

        let reopened = FileSecureStore::new(&path);
        assert_eq!(
            reopened.get("reMem-pin").await.unwrap(),
            Some("98765".to_string())
        );
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSecureStore::new(&path);
        assert!(store.get("reMem-pin").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileSecureStore::new(&path);
        store.set("reMem-pin", "12345").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_temp_file_does_not_leak_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let tmp = dir.path().join("store.tmp");
        std::fs::write(&tmp, "old").unwrap();
        std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_owner_only(&tmp, b"{}").await.unwrap();

        let mode = std::fs::metadata(&tmp).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&tmp).unwrap(), "{}");
    }
}
