/// Remote-service gateways
///
/// Thin, single-attempt wrappers around the backend's auth, document, and
/// blob APIs. Each gateway is a trait seam so the workflow layer can be
/// exercised against in-memory implementations in tests.
pub mod account;
pub mod documents;
pub mod files;
mod http;

pub use account::{AccountGateway, HttpAccountGateway};
pub use documents::{decode, DocumentList, DocumentStore, HttpDocumentStore};
pub use files::{FileStore, HttpFileStore};
pub use http::BackendClient;
