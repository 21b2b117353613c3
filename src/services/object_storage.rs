//! Object store client
//!
//! Uploads KYC/bank documents into a private bucket and mints time-limited
//! signed URLs. The store is an external service consumed over its HTTP
//! surface; nothing here parses or persists file contents.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// Signed URL lifetime for documents embedded in the registration record
pub const DOCUMENT_URL_TTL_SECS: u64 = 60 * 60 * 24 * 365;

/// Signed URL lifetime for on-demand document access
pub const DOCUMENT_VIEW_TTL_SECS: u64 = 60 * 60;

/// Upload size limit enforced on the bucket (10 MB)
pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Content types the bucket accepts
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/jpg",
];

#[derive(Debug)]
pub enum StorageError {
    /// Transport-level failure talking to the store
    Request(String),
    /// The store answered with a non-success status
    Status { status: u16, message: String },
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Request(msg) => write!(f, "Storage request error: {}", msg),
            StorageError::Status { status, message } => {
                write!(f, "Storage error ({}): {}", status, message)
            }
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[derive(Clone)]
pub struct StorageService {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

impl StorageService {
    pub fn new(base_url: String, service_key: String, bucket: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    pub fn from_env() -> Self {
        let base_url = std::env::var("STORAGE_API_URL").expect("STORAGE_API_URL must be set");
        let service_key = std::env::var("SERVICE_API_KEY").expect("SERVICE_API_KEY must be set");
        let bucket =
            std::env::var("COMPANY_DOCS_BUCKET").unwrap_or_else(|_| "company-docs".to_string());
        Self::new(base_url, service_key, bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Create the private document bucket if it does not exist yet.
    /// Idempotent; called from the deploy-time seed step.
    pub async fn create_bucket_if_missing(&self) -> Result<bool, StorageError> {
        let url = format!("{}/storage/v1/bucket/{}", self.base_url, self.bucket);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if response.status().is_success() {
            return Ok(false);
        }

        let url = format!("{}/storage/v1/bucket", self.base_url);
        let body = json!({
            "name": self.bucket,
            "public": false,
            "file_size_limit": MAX_DOCUMENT_BYTES,
            "allowed_mime_types": ALLOWED_MIME_TYPES,
        });
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        info!(bucket = %self.bucket, "document storage bucket created");
        Ok(true)
    }

    /// Upload raw bytes at `path` inside the document bucket. Upsert is off:
    /// paths carry a millisecond timestamp and are never reused.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, path
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("content-type", content_type)
            .header("cache-control", "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }

    /// Mint a signed URL granting read access to `path` for `expires_in` seconds.
    pub async fn create_signed_url(
        &self,
        path: &str,
        expires_in: u64,
    ) -> Result<String, StorageError> {
        let url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.base_url, self.bucket, path
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&json!({ "expiresIn": expires_in }))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let signed: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        // The store returns a path relative to its v1 root
        Ok(format!("{}/storage/v1{}", self.base_url, signed.signed_url))
    }
}

async fn status_error(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unreadable response body".to_string());
    StorageError::Status { status, message }
}
