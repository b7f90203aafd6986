use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Per-request working directory, removed when dropped
#[derive(Debug)]
pub struct Scratch {
    id: Uuid,
    dir: TempDir,
}

impl Scratch {
    pub fn new(id: Uuid) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("pdff-{}-", id))
            .tempdir()?;
        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an intermediate artifact and return its path
    pub async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scratch_removed_on_drop() {
        let scratch = Scratch::new(Uuid::new_v4()).unwrap();
        let file = scratch.write("book.pdf", b"%PDF").await.unwrap();
        let dir = scratch.path().to_path_buf();
        assert!(file.exists());
        assert!(
            dir.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(&scratch.id().to_string()))
        );

        drop(scratch);
        assert!(!dir.exists());
    }
}
