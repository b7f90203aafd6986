use super::{ArtifactStore, StorageError};
use std::time::Duration;

/// Bounded retry with exponential backoff (`backoff_ms * 2^(attempt - 1)`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_ms: u64,
}

impl RetryPolicy {
    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

/// Upload, retrying transient failures until the policy is exhausted
pub async fn put_with_retry(
    store: &dyn ArtifactStore,
    key: &str,
    bytes: &[u8],
    policy: RetryPolicy,
) -> Result<String, StorageError> {
    let mut last = String::new();
    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let backoff = policy.delay(attempt);
            log::warn!(
                "Upload of {}: retry {}/{} after {}ms",
                key,
                attempt,
                policy.max_retries,
                backoff.as_millis()
            );
            tokio::time::sleep(backoff).await;
        }

        match store.put(key, bytes).await {
            Ok(url) => return Ok(url),
            Err(e) if !e.is_transient() => return Err(e),
            Err(e) => {
                log::warn!("Upload of {}: attempt {} failed: {}", key, attempt + 1, e);
                last = e.to_string();
            }
        }
    }

    Err(StorageError::RetriesExhausted {
        attempts: policy.max_retries + 1,
        last,
    })
}
