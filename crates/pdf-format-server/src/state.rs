use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::storage::{ArtifactStore, build_store};
use pdf_typeset::FontRegistry;
use std::sync::Arc;

/// Shared handler state; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub fonts: Arc<FontRegistry>,
    pub store: Arc<dyn ArtifactStore>,
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    pub fn new(fonts: FontRegistry, store: Arc<dyn ArtifactStore>, config: ServiceConfig) -> Self {
        Self {
            fonts: Arc::new(fonts),
            store,
            config: Arc::new(config),
        }
    }

    /// Load fonts and connect the configured store
    pub async fn from_config(config: ServiceConfig) -> Result<Self> {
        let aliases = config
            .fonts
            .aliases
            .iter()
            .map(|(alias, target)| (alias.clone(), target.clone()))
            .collect();
        let fonts = FontRegistry::load(config.fonts.dir.clone(), aliases)
            .await
            .map_err(|e| ServiceError::Config(format!("Font setup failed: {}", e)))?;
        log::info!("Registered fonts: {}", fonts.names().join(", "));

        let store = build_store(&config.storage).await?;
        Ok(Self::new(fonts, store, config))
    }
}
