//! Artifact storage for rendered PDFs.

mod local;
mod retry;
mod supabase;

pub use local::LocalStore;
pub use retry::{RetryPolicy, put_with_retry};
pub use supabase::SupabaseStore;

use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upload rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid object key '{0}'")]
    InvalidKey(String),

    #[error("Object '{0}' not found")]
    NotFound(String),

    #[error("Storage misconfigured: {0}")]
    Misconfigured(String),

    #[error("This backend does not serve files")]
    Unsupported,

    #[error("Upload failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

impl StorageError {
    /// Whether another attempt might succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::Io(_) => true,
            _ => false,
        }
    }
}

/// Destination for rendered PDFs
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object, and return
    /// the public URL
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Read a stored object back, for backends that serve files themselves
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let _ = key;
        Err(StorageError::Unsupported)
    }
}

/// Build the configured backend
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn ArtifactStore>, StorageError> {
    match config.backend {
        StorageBackend::Supabase => {
            let store = SupabaseStore::from_config(config)?;
            log::info!("Storing PDFs in Supabase bucket '{}'", config.bucket);
            Ok(Arc::new(store))
        }
        StorageBackend::Local => {
            let store = LocalStore::new(
                config.local_dir.clone(),
                config.public_base_url.clone(),
                config.retention(),
            )
            .await?;
            log::info!("Storing PDFs under {}", config.local_dir.display());
            Ok(Arc::new(store))
        }
    }
}
