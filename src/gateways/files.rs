/// File store gateway: blob upload, preview-URL derivation, deletion
///
/// Pure pass-through to blob storage with error translation. Compensation
/// for partial failures is the caller's responsibility; nothing here
/// retries.
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use uuid::Uuid;

use crate::config::PreviewConfig;
use crate::error::{AppError, Result, StorageOp};
use crate::gateways::http::{error_message, BackendClient};
use crate::models::{FileHandle, FileUpload};

/// Maximum length of a file id accepted by the store.
const MAX_FILE_ID_LEN: usize = 36;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Upload a blob; returns the stored file's handle.
    async fn upload(&self, file: FileUpload) -> Result<FileHandle>;

    /// Derive a display URL for a stored file. No round trip; fails on an
    /// id the store could never have issued.
    fn preview_url(&self, file_id: &str, preview: &PreviewConfig) -> Result<String>;

    /// Delete a blob by id.
    async fn delete(&self, file_id: &str) -> Result<()>;
}

fn storage_error(operation: StorageOp, message: impl Into<String>) -> AppError {
    AppError::Storage {
        operation,
        message: message.into(),
    }
}

/// HTTP implementation of [`FileStore`].
#[derive(Debug, Clone)]
pub struct HttpFileStore {
    client: BackendClient,
    bucket_id: String,
}

impl HttpFileStore {
    pub fn new(client: BackendClient, bucket_id: impl Into<String>) -> Self {
        HttpFileStore {
            client,
            bucket_id: bucket_id.into(),
        }
    }

    fn files_path(&self) -> String {
        format!("/storage/buckets/{}/files", self.bucket_id)
    }
}

#[async_trait]
impl FileStore for HttpFileStore {
    async fn upload(&self, file: FileUpload) -> Result<FileHandle> {
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(file.content_type.as_ref())
            .map_err(|e| storage_error(StorageOp::Upload, e.to_string()))?;

        let form = Form::new()
            .text("fileId", Uuid::new_v4().to_string())
            .part("file", part);

        let response = self
            .client
            .request(Method::POST, &self.files_path())
            .multipart(form)
            .send()
            .await
            .map_err(|e| storage_error(StorageOp::Upload, e.to_string()))?;

        if !response.status().is_success() {
            return Err(storage_error(
                StorageOp::Upload,
                error_message(response).await,
            ));
        }

        response
            .json::<FileHandle>()
            .await
            .map_err(|e| storage_error(StorageOp::Upload, format!("malformed file payload: {e}")))
    }

    fn preview_url(&self, file_id: &str, preview: &PreviewConfig) -> Result<String> {
        if file_id.is_empty() {
            return Err(storage_error(StorageOp::Preview, "file id is empty"));
        }
        if file_id.len() > MAX_FILE_ID_LEN {
            return Err(storage_error(
                StorageOp::Preview,
                format!("file id exceeds {MAX_FILE_ID_LEN} characters"),
            ));
        }

        Ok(format!(
            "{}/storage/buckets/{}/files/{}/preview?width={}&height={}&gravity={}&quality={}&project={}",
            self.client.endpoint(),
            self.bucket_id,
            urlencoding::encode(file_id),
            preview.width,
            preview.height,
            preview.gravity.as_str(),
            preview.quality,
            self.client.project_id(),
        ))
    }

    async fn delete(&self, file_id: &str) -> Result<()> {
        let path = format!("{}/{}", self.files_path(), urlencoding::encode(file_id));
        let response = self
            .client
            .request(Method::DELETE, &path)
            .send()
            .await
            .map_err(|e| storage_error(StorageOp::Delete, e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found("file", file_id));
        }
        if !response.status().is_success() {
            return Err(storage_error(
                StorageOp::Delete,
                error_message(response).await,
            ));
        }
        Ok(())
    }
}
