use super::{ArtifactStore, StorageError};
use crate::config::StorageConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Supabase Storage bucket written through its REST API
pub struct SupabaseStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl SupabaseStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: bucket.into(),
        })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let (Some(url), Some(key)) = (&config.supabase_url, &config.supabase_key) else {
            return Err(StorageError::Misconfigured(
                "Supabase URL and key must both be set".to_string(),
            ));
        };
        Self::new(
            url.as_str(),
            key.as_str(),
            config.bucket.as_str(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, key)
    }

    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, key
        )
    }
}

#[async_trait]
impl ArtifactStore for SupabaseStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let response = self
            .client
            .post(self.upload_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, "application/pdf")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("Uploaded {} ({} bytes)", key, bytes.len());
        Ok(self.public_url(key))
    }
}
