/// Error types for the Snapgram workflow core
///
/// Every workflow either returns its result or fails with exactly one of
/// these kinds; callers never see a partially-populated success value.
/// Compensation failures are logged by the workflow layer and never mask
/// the primary error.
use std::fmt;

use thiserror::Error;

/// Result type for snapgram-core operations
pub type Result<T> = std::result::Result<T, AppError>;

/// File store operation that produced a [`AppError::Storage`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Upload,
    Preview,
    Delete,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageOp::Upload => write!(f, "upload"),
            StorageOp::Preview => write!(f, "preview"),
            StorageOp::Delete => write!(f, "delete"),
        }
    }
}

/// Document store operation that produced a [`AppError::DocumentStore`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentOp {
    Create,
    Get,
    Update,
    Delete,
    List,
    Decode,
}

impl fmt::Display for DocumentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentOp::Create => write!(f, "create"),
            DocumentOp::Get => write!(f, "get"),
            DocumentOp::Update => write!(f, "update"),
            DocumentOp::Delete => write!(f, "delete"),
            DocumentOp::List => write!(f, "list"),
            DocumentOp::Decode => write!(f, "decode"),
        }
    }
}

/// Application error types
///
/// A closed set of tagged error kinds carrying structured context
/// (field name, collection, underlying cause) instead of bare signals.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field is missing or malformed; detected before any
    /// remote call is made.
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// The account gateway rejected account creation (duplicate email,
    /// weak password, network failure).
    #[error("account creation failed: {0}")]
    AccountCreation(String),

    /// Session creation/deletion or account lookup failed.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Blob upload, preview derivation, or deletion failed at the file store.
    #[error("file store {operation} failed: {message}")]
    Storage {
        operation: StorageOp,
        message: String,
    },

    /// A document store round trip failed.
    #[error("document store {operation} on `{collection}` failed: {message}")]
    DocumentStore {
        collection: String,
        operation: DocumentOp,
        message: String,
    },

    /// Preview-URL derivation failed after a successful upload; the upload
    /// has already been compensated (deleted) when this surfaces.
    #[error("preview generation failed for file `{file_id}`: {message}")]
    PreviewGeneration { file_id: String, message: String },

    /// A post document write failed; any freshly uploaded file has already
    /// been compensated when this surfaces.
    #[error("post write failed: {0}")]
    PostPersistence(String),

    /// A user-profile document write failed.
    #[error("profile write failed: {0}")]
    ProfilePersistence(String),

    /// Resource not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },
}

impl AppError {
    /// Shorthand for a validation failure on a named input field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        AppError::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// True when the error is the "resource does not exist" kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}
