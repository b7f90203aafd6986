//! Service configuration.
//!
//! Loaded from a JSON file (every field optional), then overridden from the
//! environment: `SUPABASE_URL` and `SUPABASE_KEY` select the Supabase
//! backend, `PDFF_BIND` replaces the listen address.

use crate::error::{Result, ServiceError};
use crate::storage::RetryPolicy;
use pdf_typeset::PageNumberOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_mb: usize,
    /// CORS origins; `*` allows any
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_upload_mb: 25,
            allowed_origins: vec!["https://kdpformatter.com".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Directory scanned for `.ttf`/`.otf` files at start-up
    pub dir: Option<PathBuf>,
    /// Extra names mapped onto registered fonts
    pub aliases: BTreeMap<String, String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert("Roboto-Regular".to_string(), "Helvetica".to_string());
        Self {
            dir: Some(PathBuf::from("fonts")),
            aliases,
        }
    }
}

/// Layout settings not exposed on the form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strict_trim_size: bool,
    /// Default for the `drop_caps` form field
    pub drop_caps: bool,
    pub page_numbers: PageNumberOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Supabase,
    #[default]
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    /// Key prefix inside the bucket
    pub prefix: String,
    pub supabase_url: Option<String>,
    #[serde(skip_serializing)]
    pub supabase_key: Option<String>,
    /// Local backend: where artifacts are written
    pub local_dir: PathBuf,
    /// Local backend: URL prefix returned to clients
    pub public_base_url: String,
    /// Local backend: artifacts older than this are swept
    pub retention_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Local,
            bucket: "pdfs".to_string(),
            prefix: "generated".to_string(),
            supabase_url: None,
            supabase_key: None,
            local_dir: PathBuf::from("artifacts"),
            public_base_url: "http://localhost:8000/files".to_string(),
            retention_secs: 24 * 60 * 60,
            max_retries: 3,
            retry_backoff_ms: 500,
            timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    /// Object key for a request: `{prefix}/{uuid}.pdf`
    pub fn object_key(&self, request_id: Uuid) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{}.pdf", request_id)
        } else {
            format!("{}/{}.pdf", prefix, request_id)
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            backoff_ms: self.retry_backoff_ms,
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub fonts: FontConfig,
    pub layout: LayoutConfig,
    pub storage: StorageConfig,
}

impl ServiceConfig {
    /// Load configuration from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let config = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults, then apply
    /// environment overrides and validate
    pub async fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path).await?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up through `var`
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        if let Some(bind) = non_empty("PDFF_BIND") {
            self.server.bind = bind;
        }
        let url = non_empty("SUPABASE_URL");
        let key = non_empty("SUPABASE_KEY");
        if url.is_some() && key.is_some() {
            self.storage.backend = StorageBackend::Supabase;
        }
        if url.is_some() {
            self.storage.supabase_url = url;
        }
        if key.is_some() {
            self.storage.supabase_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            ServiceError::Config(format!("Invalid bind address '{}': {}", self.server.bind, e))
        })?;

        if self.server.max_upload_mb == 0 {
            return Err(ServiceError::Config(
                "max_upload_mb must be at least 1".to_string(),
            ));
        }

        if self.storage.bucket.trim().is_empty() {
            return Err(ServiceError::Config("Storage bucket must not be empty".to_string()));
        }

        if self.storage.backend == StorageBackend::Supabase {
            if self.storage.supabase_url.is_none() {
                return Err(ServiceError::Config(
                    "Supabase storage requires SUPABASE_URL".to_string(),
                ));
            }
            if self.storage.supabase_key.is_none() {
                return Err(ServiceError::Config(
                    "Supabase storage requires SUPABASE_KEY".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }
}
