/// Snapgram workflow core
///
/// The backend-facing core of the Snapgram photo-sharing app: typed
/// gateways to an Appwrite-compatible backend (accounts, documents, blob
/// storage) and the mutation workflows built on top of them, including
/// the file-attachment lifecycle (upload, preview-URL derivation,
/// document write, compensating delete on partial failure).
///
/// # Modules
///
/// - `app`: Top-level wiring of gateways into services
/// - `config`: Environment-driven configuration
/// - `error`: Error types and handling
/// - `gateways`: Remote-service gateway traits and HTTP implementations
/// - `models`: Wire models and workflow inputs
/// - `query`: Typed query vocabulary for document listings
/// - `services`: Workflow layer (accounts, posts, users)
/// - `validators`: Identifier sanitization, tag parsing, input checks
pub mod app;
pub mod config;
pub mod error;
pub mod gateways;
pub mod models;
pub mod query;
pub mod services;
pub mod validators;

pub use app::Snapgram;
pub use config::Config;
pub use error::{AppError, Result};
