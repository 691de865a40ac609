/// Document store gateway: CRUD and listing against remote collections
///
/// Every call is a single round trip; the gateway performs no retries and
/// no caching. Failures are translated into [`AppError::DocumentStore`]
/// (or [`AppError::NotFound`] for missing documents) and surface
/// immediately to the workflow layer.
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, DocumentOp, Result};
use crate::gateways::http::{error_message, BackendClient};
use crate::query::Query;

/// One page of raw documents from a listing.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Value>,
}

/// CRUD + list over named collections.
///
/// Documents travel as raw JSON here; the workflow layer decodes them into
/// typed models with [`decode`]. Keeping the trait untyped keeps it
/// object-safe, so tests can inject in-memory stores.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(&self, collection: &str, document_id: &str, data: Value) -> Result<Value>;
    async fn get(&self, collection: &str, document_id: &str) -> Result<Value>;
    async fn update(&self, collection: &str, document_id: &str, data: Value) -> Result<Value>;
    async fn delete(&self, collection: &str, document_id: &str) -> Result<()>;
    async fn list(&self, collection: &str, queries: &[Query]) -> Result<DocumentList>;
}

/// Decode a raw document into a typed model.
pub fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> Result<T> {
    serde_json::from_value(document).map_err(|e| AppError::DocumentStore {
        collection: collection.to_string(),
        operation: DocumentOp::Decode,
        message: e.to_string(),
    })
}

/// HTTP implementation of [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    client: BackendClient,
    database_id: String,
}

impl HttpDocumentStore {
    pub fn new(client: BackendClient, database_id: impl Into<String>) -> Self {
        HttpDocumentStore {
            client,
            database_id: database_id.into(),
        }
    }

    fn collection_path(&self, collection: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            self.database_id, collection
        )
    }

    fn document_path(&self, collection: &str, document_id: &str) -> String {
        format!("{}/{}", self.collection_path(collection), document_id)
    }

    fn store_error(collection: &str, operation: DocumentOp, message: String) -> AppError {
        AppError::DocumentStore {
            collection: collection.to_string(),
            operation,
            message,
        }
    }

    async fn expect_document(
        collection: &str,
        document_id: &str,
        operation: DocumentOp,
        response: reqwest::Response,
    ) -> Result<Value> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(collection, document_id));
        }
        if !response.status().is_success() {
            return Err(Self::store_error(
                collection,
                operation,
                error_message(response).await,
            ));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| Self::store_error(collection, operation, e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn create(&self, collection: &str, document_id: &str, data: Value) -> Result<Value> {
        let response = self
            .client
            .request(Method::POST, &self.collection_path(collection))
            .json(&json!({ "documentId": document_id, "data": data }))
            .send()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::Create, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::store_error(
                collection,
                DocumentOp::Create,
                error_message(response).await,
            ));
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::Create, e.to_string()))
    }

    async fn get(&self, collection: &str, document_id: &str) -> Result<Value> {
        let response = self
            .client
            .request(Method::GET, &self.document_path(collection, document_id))
            .send()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::Get, e.to_string()))?;

        Self::expect_document(collection, document_id, DocumentOp::Get, response).await
    }

    async fn update(&self, collection: &str, document_id: &str, data: Value) -> Result<Value> {
        let response = self
            .client
            .request(Method::PATCH, &self.document_path(collection, document_id))
            .json(&json!({ "data": data }))
            .send()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::Update, e.to_string()))?;

        Self::expect_document(collection, document_id, DocumentOp::Update, response).await
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<()> {
        let response = self
            .client
            .request(Method::DELETE, &self.document_path(collection, document_id))
            .send()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::Delete, e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::not_found(collection, document_id));
        }
        if !response.status().is_success() {
            return Err(Self::store_error(
                collection,
                DocumentOp::Delete,
                error_message(response).await,
            ));
        }
        Ok(())
    }

    async fn list(&self, collection: &str, queries: &[Query]) -> Result<DocumentList> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|query| ("queries[]", query.to_wire()))
            .collect();

        let response = self
            .client
            .request(Method::GET, &self.collection_path(collection))
            .query(&params)
            .send()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::List, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::store_error(
                collection,
                DocumentOp::List,
                error_message(response).await,
            ));
        }
        response
            .json::<DocumentList>()
            .await
            .map_err(|e| Self::store_error(collection, DocumentOp::List, e.to_string()))
    }
}
