use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    types::ServerSideEncryption,
    Client,
};

/// Read an env var, trying the primary name first then a fallback.
pub fn env_or(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .ok()
        .or_else(|| std::env::var(fallback).ok())
}

/// Bucket name for uploaded documents (from env or default).
fn documents_bucket() -> String {
    std::env::var("DOCUMENTS_BUCKET").unwrap_or_else(|_| "documents".to_string())
}

/// Download links stay valid for 15 minutes.
const PRESIGN_EXPIRY_SECS: u64 = 900;

/// Reference handed back by a blob store after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub url: String,
    pub public_id: String,
}

// ── Trait ────────────────────────────────────────────────────────────

/// Object storage for uploaded document files. Errors are plain strings:
/// callers log them and surface a generic upstream failure.
#[allow(async_fn_in_trait)]
pub trait BlobStore: Send + Sync {
    async fn store(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<BlobRef, String>;

    async fn delete(&self, public_id: &str) -> Result<(), String>;

    /// Short-lived URL the client can fetch the file from.
    async fn download_url(&self, public_id: &str) -> Result<String, String>;
}

// ── S3 implementation ───────────────────────────────────────────────

/// S3-compatible store (RustFS, MinIO, Tigris). Uploads use SSE-S3.
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn from_env() -> Result<Self, String> {
        let endpoint = env_or("AWS_ENDPOINT_URL_S3", "S3_ENDPOINT")
            .ok_or("AWS_ENDPOINT_URL_S3 or S3_ENDPOINT must be set")?;
        let access_key = env_or("AWS_ACCESS_KEY_ID", "S3_ACCESS_KEY")
            .ok_or("AWS_ACCESS_KEY_ID or S3_ACCESS_KEY must be set")?;
        let secret_key = env_or("AWS_SECRET_ACCESS_KEY", "S3_SECRET_KEY")
            .ok_or("AWS_SECRET_ACCESS_KEY or S3_SECRET_KEY must be set")?;
        let region =
            env_or("AWS_REGION", "S3_REGION").unwrap_or_else(|| "us-east-1".to_string());

        let creds = Credentials::new(&access_key, &secret_key, None, None, "env");

        let config = aws_sdk_s3::Config::builder()
            .endpoint_url(&endpoint)
            .region(Region::new(region))
            .credentials_provider(creds)
            .force_path_style(true)
            .behavior_version_latest()
            .build();

        Ok(Self {
            client: Client::from_conf(config),
            bucket: documents_bucket(),
        })
    }

    /// Create the documents bucket if missing. Failure is only logged; the
    /// first upload will report it.
    pub async fn ensure_bucket(&self) {
        let exists = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();

        if !exists {
            tracing::info!(bucket = %self.bucket, "Creating documents bucket");
            if let Err(e) = self.client.create_bucket().bucket(&self.bucket).send().await {
                tracing::warn!(bucket = %self.bucket, error = %e, "Failed to create documents bucket");
            }
        }
    }
}

impl BlobStore for S3BlobStore {
    async fn store(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<BlobRef, String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .server_side_encryption(ServerSideEncryption::Aes256)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| {
                let svc = e.into_service_error();
                format!("S3 PutObject failed for '{key}': {svc}")
            })?;

        Ok(BlobRef {
            url: format!("s3://{}/{}", self.bucket, key),
            public_id: key.to_string(),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await
            .map_err(|e| format!("S3 DeleteObject failed for '{public_id}': {e}"))?;
        Ok(())
    }

    async fn download_url(&self, public_id: &str) -> Result<String, String> {
        let presign_config = PresigningConfig::builder()
            .expires_in(Duration::from_secs(PRESIGN_EXPIRY_SECS))
            .build()
            .map_err(|e| format!("Presign config error: {e}"))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(public_id)
            .presigned(presign_config)
            .await
            .map_err(|e| format!("Presign GET failed: {e}"))?;

        Ok(presigned.uri().to_string())
    }
}

// ── In-memory implementation ────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryBlobStore {
    /// Make every subsequent `delete` fail. Used to exercise the
    /// swallow-on-delete path.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(public_id)
    }
}

impl BlobStore for MemoryBlobStore {
    async fn store(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<BlobRef, String> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(BlobRef {
            url: format!("memory://{key}"),
            public_id: key.to_string(),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), String> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(format!("delete of '{public_id}' refused"));
        }
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(public_id);
        Ok(())
    }

    async fn download_url(&self, public_id: &str) -> Result<String, String> {
        if self.contains(public_id) {
            Ok(format!("memory://{public_id}"))
        } else {
            Err(format!("no object '{public_id}'"))
        }
    }
}

// ── Selection ───────────────────────────────────────────────────────

/// Blob backend selected at startup.
#[derive(Clone)]
pub enum Blobs {
    S3(S3BlobStore),
    Memory(MemoryBlobStore),
}

impl Blobs {
    pub fn memory() -> Self {
        Blobs::Memory(MemoryBlobStore::default())
    }
}

impl BlobStore for Blobs {
    async fn store(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<BlobRef, String> {
        match self {
            Blobs::S3(s) => s.store(key, content_type, bytes).await,
            Blobs::Memory(m) => m.store(key, content_type, bytes).await,
        }
    }

    async fn delete(&self, public_id: &str) -> Result<(), String> {
        match self {
            Blobs::S3(s) => s.delete(public_id).await,
            Blobs::Memory(m) => m.delete(public_id).await,
        }
    }

    async fn download_url(&self, public_id: &str) -> Result<String, String> {
        match self {
            Blobs::S3(s) => s.download_url(public_id).await,
            Blobs::Memory(m) => m.download_url(public_id).await,
        }
    }
}
