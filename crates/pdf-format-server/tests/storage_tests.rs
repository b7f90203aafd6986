use async_trait::async_trait;
use pdf_format_server::config::{ServiceConfig, StorageBackend};
use pdf_format_server::storage::*;
use pdf_format_server::ServiceError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime};

async fn local_store(dir: &std::path::Path) -> LocalStore {
    LocalStore::new(
        dir.to_path_buf(),
        "http://localhost:8000/files/",
        Duration::from_secs(60 * 60),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_local_put_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(dir.path()).await;

    let url = store.put("generated/book.pdf", b"%PDF-1.7").await.unwrap();
    assert_eq!(url, "http://localhost:8000/files/generated/book.pdf");
    assert!(dir.path().join("generated/book.pdf").exists());
    assert_eq!(store.get("generated/book.pdf").await.unwrap(), b"%PDF-1.7");

    // Same key overwrites
    store.put("generated/book.pdf", b"%PDF-2.0").await.unwrap();
    assert_eq!(store.get("generated/book.pdf").await.unwrap(), b"%PDF-2.0");
}

#[tokio::test]
async fn test_local_rejects_escaping_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(dir.path()).await;

    for key in ["../outside.pdf", "/etc/passwd", ""] {
        match store.put(key, b"x").await {
            Err(StorageError::InvalidKey(_)) => {}
            other => panic!("Expected InvalidKey for {:?}, got {:?}", key, other),
        }
    }

    match store.get("generated/missing.pdf").await {
        Err(StorageError::NotFound(key)) => assert_eq!(key, "generated/missing.pdf"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_local_sweep_removes_expired_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(dir.path()).await;

    store.put("generated/old.pdf", b"old").await.unwrap();
    let old_path = dir.path().join("generated/old.pdf");
    let two_hours_ago = SystemTime::now() - Duration::from_secs(2 * 60 * 60);
    std::fs::File::options()
        .write(true)
        .open(&old_path)
        .unwrap()
        .set_modified(two_hours_ago)
        .unwrap();

    store.put("generated/new.pdf", b"new").await.unwrap();

    assert!(!old_path.exists());
    assert!(dir.path().join("generated/new.pdf").exists());
    assert_eq!(store.sweep().await.unwrap(), 0);
}

/// Fails the first `failures` puts with the given error
struct FlakyStore {
    failures: u32,
    calls: AtomicU32,
    transient: bool,
}

impl FlakyStore {
    fn new(failures: u32, transient: bool) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            transient,
        }
    }
}

#[async_trait]
impl ArtifactStore for FlakyStore {
    async fn put(&self, key: &str, _bytes: &[u8]) -> Result<String, StorageError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(if self.transient {
                StorageError::Rejected {
                    status: 502,
                    body: "bad gateway".to_string(),
                }
            } else {
                StorageError::Rejected {
                    status: 401,
                    body: "invalid key".to_string(),
                }
            });
        }
        Ok(format!("https://cdn.test/{}", key))
    }
}

const FAST: RetryPolicy = RetryPolicy {
    max_retries: 3,
    backoff_ms: 1,
};

#[tokio::test]
async fn test_retry_recovers_from_transient_failures() {
    let store = FlakyStore::new(2, true);
    let url = put_with_retry(&store, "generated/a.pdf", b"%PDF", FAST)
        .await
        .unwrap();
    assert_eq!(url, "https://cdn.test/generated/a.pdf");
    assert_eq!(store.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_gives_up_after_policy() {
    let store = FlakyStore::new(u32::MAX, true);
    match put_with_retry(&store, "generated/a.pdf", b"%PDF", FAST).await {
        Err(StorageError::RetriesExhausted { attempts, last }) => {
            assert_eq!(attempts, 4);
            assert!(last.contains("502"));
        }
        other => panic!("Expected RetriesExhausted, got {:?}", other),
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_permanent_failure_is_not_retried() {
    let store = FlakyStore::new(u32::MAX, false);
    match put_with_retry(&store, "generated/a.pdf", b"%PDF", FAST).await {
        Err(StorageError::Rejected { status, .. }) => assert_eq!(status, 401),
        other => panic!("Expected Rejected, got {:?}", other),
    }
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_classification() {
    let rejected = |status| StorageError::Rejected {
        status,
        body: String::new(),
    };
    assert!(rejected(429).is_transient());
    assert!(rejected(500).is_transient());
    assert!(!rejected(400).is_transient());
    assert!(!StorageError::InvalidKey("..".to_string()).is_transient());
}

fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_env_selects_supabase_backend() {
    let config = ServiceConfig::default().with_env_overrides(env(&[
        ("SUPABASE_URL", "https://project.supabase.co"),
        ("SUPABASE_KEY", "service-role"),
        ("PDFF_BIND", "127.0.0.1:9000"),
    ]));
    assert_eq!(config.storage.backend, StorageBackend::Supabase);
    assert_eq!(config.server.bind, "127.0.0.1:9000");
    config.validate().unwrap();

    let only_url = ServiceConfig::default()
        .with_env_overrides(env(&[("SUPABASE_URL", "https://project.supabase.co")]));
    assert_eq!(only_url.storage.backend, StorageBackend::Local);
}

#[test]
fn test_config_validation() {
    let mut config = ServiceConfig::default();
    config.validate().unwrap();

    config.server.bind = "not an address".to_string();
    assert!(matches!(config.validate(), Err(ServiceError::Config(_))));

    let mut config = ServiceConfig::default();
    config.storage.backend = StorageBackend::Supabase;
    assert!(matches!(config.validate(), Err(ServiceError::Config(_))));

    let config = ServiceConfig::default();
    assert_eq!(config.max_upload_bytes(), 25 * 1024 * 1024);
    let key = config.storage.object_key(uuid::Uuid::nil());
    assert_eq!(key, "generated/00000000-0000-0000-0000-000000000000.pdf");
}

#[tokio::test]
async fn test_config_file_is_partial() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pdff.json");
    std::fs::write(
        &path,
        r#"{ "server": { "max_upload_mb": 5 }, "storage": { "prefix": "books" } }"#,
    )
    .unwrap();

    let config = ServiceConfig::load(&path).await.unwrap();
    assert_eq!(config.server.max_upload_mb, 5);
    assert_eq!(config.server.bind, "0.0.0.0:8000");
    assert_eq!(config.storage.prefix, "books");
    assert_eq!(config.storage.bucket, "pdfs");

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        ServiceConfig::load(&path).await,
        Err(ServiceError::Config(_))
    ));
}

#[tokio::test]
async fn test_build_store_requires_supabase_credentials() {
    let mut config = ServiceConfig::default();
    config.storage.backend = StorageBackend::Supabase;
    match build_store(&config.storage).await {
        Err(StorageError::Misconfigured(_)) => {}
        Err(other) => panic!("Expected Misconfigured, got {:?}", other),
        Ok(_) => panic!("Expected Misconfigured, got a store"),
    }
}
