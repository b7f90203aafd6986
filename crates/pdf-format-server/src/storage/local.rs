use super::{ArtifactStore, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Filesystem store served back through `GET /files/{key}`.
///
/// Retention is enforced by sweeping files older than the retention period
/// whenever a new artifact is written.
pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
    retention: Duration,
}

impl LocalStore {
    pub async fn new(
        root: PathBuf,
        public_base_url: impl Into<String>,
        retention: Duration,
    ) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            retention,
        })
    }

    /// Resolve a key to a path under the root, rejecting escapes
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let safe = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Delete artifacts older than the retention period; returns how many
    pub async fn sweep(&self) -> Result<usize, StorageError> {
        let root = self.root.clone();
        let retention = self.retention;
        let removed = tokio::task::spawn_blocking(move || sweep_dir(&root, retention, SystemTime::now()))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))??;
        if removed > 0 {
            log::info!("Swept {} expired artifacts", removed);
        }
        Ok(removed)
    }
}

fn sweep_dir(dir: &Path, retention: Duration, now: SystemTime) -> std::io::Result<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_dir() {
            removed += sweep_dir(&path, retention, now)?;
            continue;
        }
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age > retention) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
            }
        }
    }
    Ok(removed)
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        log::info!("Stored {} ({} bytes)", path.display(), bytes.len());

        if let Err(e) = self.sweep().await {
            log::warn!("Artifact sweep failed: {}", e);
        }
        Ok(format!("{}/{}", self.public_base_url, key))
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
