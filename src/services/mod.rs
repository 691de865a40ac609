/// Workflow layer for snapgram-core
///
/// Multi-step orchestrations over the gateways, presented to callers as
/// single logical operations: each either returns its result or fails with
/// one error kind, never leaving a partially-linked document/file pair
/// behind (one documented exception on account creation).
use std::sync::Arc;

use crate::config::PreviewConfig;
use crate::error::{AppError, Result};
use crate::gateways::{decode, DocumentList, FileStore};
use crate::models::{FileHandle, FileUpload, Page};

pub mod accounts;
pub mod posts;
pub mod users;

pub use accounts::AccountService;
pub use posts::PostService;
pub use users::UserService;

/// A freshly uploaded image, staged but not yet referenced by a document.
pub(crate) struct StagedImage {
    pub url: String,
    pub handle: FileHandle,
}

/// Upload a file and derive its preview URL, deleting the upload again if
/// derivation fails. On success the staged image exists in storage but is
/// not referenced anywhere yet.
pub(crate) async fn stage_upload(
    files: &Arc<dyn FileStore>,
    preview: &PreviewConfig,
    file: FileUpload,
) -> Result<StagedImage> {
    let handle = files.upload(file).await?;

    match files.preview_url(&handle.id, preview) {
        Ok(url) => Ok(StagedImage { url, handle }),
        Err(err) => {
            cleanup_file(files, &handle.id, "orphaned upload").await;
            Err(AppError::PreviewGeneration {
                file_id: handle.id,
                message: err.to_string(),
            })
        }
    }
}

/// Best-effort file deletion: a compensation or post-commit cleanup step.
/// Failure is logged and never masks the primary outcome.
pub(crate) async fn cleanup_file(files: &Arc<dyn FileStore>, file_id: &str, context: &str) {
    if let Err(err) = files.delete(file_id).await {
        tracing::warn!(%file_id, "failed to delete {context}: {err}");
    }
}

/// Decode every document in a listing page.
pub(crate) fn decode_page<T: serde::de::DeserializeOwned>(
    collection: &str,
    list: DocumentList,
) -> Result<Page<T>> {
    let items = list
        .documents
        .into_iter()
        .map(|document| decode(collection, document))
        .collect::<Result<Vec<T>>>()?;
    Ok(Page {
        total: list.total,
        items,
    })
}

/// Generate a fresh document id, valid as a store key by construction.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
