//! Resource clients: one narrow async API per backend CRUD resource.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::pagination::PaginatedResponse;
use crate::resources::errors::ClientResult;

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

/// Flat string-keyed query parameters of a list request.
pub type QueryParams = BTreeMap<String, String>;

/// CRUD operations of a single backend resource.
///
/// Every call either resolves with the typed payload or fails with a
/// [`errors::ClientError`]. Implementations perform no retries and no local
/// validation.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    type Item: Send + Sync;
    type Create: Send + Sync;
    type Update: Send + Sync;

    async fn list(&self, params: &QueryParams) -> ClientResult<PaginatedResponse<Self::Item>>;
    async fn create(&self, payload: &Self::Create) -> ClientResult<Self::Item>;
    async fn update(&self, id: &str, payload: &Self::Update) -> ClientResult<Self::Item>;
    async fn delete(&self, id: &str) -> ClientResult<()>;
}

/// Resources that accept multipart file uploads.
#[async_trait]
pub trait UploadResource: ResourceClient {
    async fn upload(&self, upload: &FileUpload) -> ClientResult<Self::Item>;
}

/// A file plus the metadata fields sent next to it.
///
/// Metadata is sent as individual form fields, never as nested JSON. A field
/// with several values is appended once per value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
            fields: Vec::new(),
        }
    }

    /// Reads the file from disk, keeping only its file name for the upload.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Appends a metadata field; blank values are skipped.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = value.trim();
        if !value.is_empty() {
            self.fields.push((name.into(), value.to_string()));
        }
        self
    }

    pub fn fields<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.field(name, value);
        }
        self
    }
}
