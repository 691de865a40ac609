//! In-memory gateway fakes for workflow tests
//!
//! Each fake implements a gateway trait over plain maps, with per-operation
//! failure injection so tests can drive the compensation paths without a
//! live backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use snapgram_core::config::{Collections, FeedConfig, PreviewConfig};
use snapgram_core::error::{AppError, DocumentOp, Result, StorageOp};
use snapgram_core::gateways::{AccountGateway, DocumentList, DocumentStore, FileStore};
use snapgram_core::models::{Account, FileHandle, FileUpload, Session};
use snapgram_core::query::Query;
use snapgram_core::services::{AccountService, PostService, UserService};

/// Wire up log capture once per test binary; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn collections() -> Collections {
    Collections {
        users: "users".to_string(),
        posts: "posts".to_string(),
        saves: "saves".to_string(),
    }
}

pub fn png(name: &str) -> FileUpload {
    FileUpload::new(name, mime::IMAGE_PNG, vec![0u8; 16])
}

pub fn post_service(
    documents: &Arc<InMemoryDocumentStore>,
    files: &Arc<InMemoryFileStore>,
) -> PostService {
    init_tracing();
    PostService::new(
        documents.clone(),
        files.clone(),
        collections(),
        PreviewConfig::default(),
        FeedConfig::default(),
    )
}

pub fn user_service(
    documents: &Arc<InMemoryDocumentStore>,
    files: &Arc<InMemoryFileStore>,
) -> UserService {
    init_tracing();
    UserService::new(
        documents.clone(),
        files.clone(),
        collections(),
        PreviewConfig::default(),
    )
}

pub fn account_service(
    accounts: &Arc<StubAccountGateway>,
    documents: &Arc<InMemoryDocumentStore>,
) -> AccountService {
    init_tracing();
    AccountService::new(accounts.clone(), documents.clone(), collections())
}

// ============================================
// File store fake
// ============================================

#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, usize>>,
    pub fail_uploads: AtomicBool,
    pub fail_previews: AtomicBool,
    pub fail_deletes: AtomicBool,
    next_id: AtomicI64,
}

impl InMemoryFileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, file_id: &str) -> bool {
        self.files.lock().unwrap().contains_key(file_id)
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn upload(&self, file: FileUpload) -> Result<FileHandle> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Storage {
                operation: StorageOp::Upload,
                message: "injected upload failure".to_string(),
            });
        }

        let id = format!("file-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.files
            .lock()
            .unwrap()
            .insert(id.clone(), file.bytes.len());
        Ok(FileHandle {
            id,
            name: file.name,
        })
    }

    fn preview_url(&self, file_id: &str, preview: &PreviewConfig) -> Result<String> {
        if self.fail_previews.load(Ordering::SeqCst) {
            return Err(AppError::Storage {
                operation: StorageOp::Preview,
                message: "injected preview failure".to_string(),
            });
        }
        Ok(format!(
            "mem://files/{}/preview?width={}&height={}",
            file_id, preview.width, preview.height
        ))
    }

    async fn delete(&self, file_id: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::Storage {
                operation: StorageOp::Delete,
                message: "injected delete failure".to_string(),
            });
        }
        match self.files.lock().unwrap().remove(file_id) {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("file", file_id)),
        }
    }
}

// ============================================
// Document store fake
// ============================================

#[derive(Default)]
pub struct InMemoryDocumentStore {
    /// collection -> insertion-ordered (id, document) pairs
    collections: Mutex<HashMap<String, Vec<(String, Value)>>>,
    pub fail_creates: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_deletes: AtomicBool,
    ticks: AtomicI64,
}

impl InMemoryDocumentStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn contains(&self, collection: &str, document_id: &str) -> bool {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.iter().any(|(id, _)| id.as_str() == document_id))
            .unwrap_or(false)
    }

    /// Monotonic whole-second timestamps so lexicographic ordering of the
    /// serialized form matches temporal ordering.
    fn tick(&self) -> DateTime<Utc> {
        let seq = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + seq, 0).unwrap()
    }

    fn store_error(collection: &str, operation: DocumentOp, message: &str) -> AppError {
        AppError::DocumentStore {
            collection: collection.to_string(),
            operation,
            message: message.to_string(),
        }
    }
}

fn attr_string(document: &Value, attribute: &str) -> String {
    match document.get(attribute) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, document_id: &str, data: Value) -> Result<Value> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(Self::store_error(
                collection,
                DocumentOp::Create,
                "injected create failure",
            ));
        }

        let now = self.tick();
        let mut document = data;
        let fields = document
            .as_object_mut()
            .expect("document data must be a JSON object");
        fields.insert("$id".to_string(), json!(document_id));
        fields.insert("$createdAt".to_string(), json!(now));
        fields.insert("$updatedAt".to_string(), json!(now));

        let mut collections = self.collections.lock().unwrap();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|(id, _)| id.as_str() == document_id) {
            return Err(Self::store_error(
                collection,
                DocumentOp::Create,
                "document id already exists",
            ));
        }
        docs.push((document_id.to_string(), document.clone()));
        Ok(document)
    }

    async fn get(&self, collection: &str, document_id: &str) -> Result<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| {
                docs.iter()
                    .find(|(id, _)| id.as_str() == document_id)
                    .map(|(_, doc)| doc.clone())
            })
            .ok_or_else(|| AppError::not_found(collection, document_id))
    }

    async fn update(&self, collection: &str, document_id: &str, data: Value) -> Result<Value> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(Self::store_error(
                collection,
                DocumentOp::Update,
                "injected update failure",
            ));
        }

        let now = self.tick();
        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(collection, document_id))?;
        let (_, document) = docs
            .iter_mut()
            .find(|(id, _)| id.as_str() == document_id)
            .ok_or_else(|| AppError::not_found(collection, document_id))?;

        let fields = document.as_object_mut().unwrap();
        for (key, value) in data.as_object().expect("update data must be an object") {
            fields.insert(key.clone(), value.clone());
        }
        fields.insert("$updatedAt".to_string(), json!(now));
        Ok(document.clone())
    }

    async fn delete(&self, collection: &str, document_id: &str) -> Result<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(Self::store_error(
                collection,
                DocumentOp::Delete,
                "injected delete failure",
            ));
        }

        let mut collections = self.collections.lock().unwrap();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(collection, document_id))?;
        let before = docs.len();
        docs.retain(|(id, _)| id.as_str() != document_id);
        if docs.len() == before {
            return Err(AppError::not_found(collection, document_id));
        }
        Ok(())
    }

    async fn list(&self, collection: &str, queries: &[Query]) -> Result<DocumentList> {
        let mut documents: Vec<Value> = self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default();

        // Filters first, then ordering, then cursor and limit.
        for query in queries {
            match query {
                Query::Equal { attribute, value } => {
                    documents.retain(|doc| attr_string(doc, attribute) == *value);
                }
                Query::Search { attribute, term } => {
                    let term = term.to_lowercase();
                    documents
                        .retain(|doc| attr_string(doc, attribute).to_lowercase().contains(&term));
                }
                _ => {}
            }
        }
        let total = documents.len() as u64;

        for query in queries {
            if let Query::OrderDesc { attribute } = query {
                documents.sort_by(|a, b| attr_string(b, attribute).cmp(&attr_string(a, attribute)));
            }
        }
        for query in queries {
            if let Query::CursorAfter(cursor) = query {
                if let Some(pos) = documents
                    .iter()
                    .position(|doc| attr_string(doc, "$id") == *cursor)
                {
                    documents.drain(..=pos);
                } else {
                    documents.clear();
                }
            }
        }
        for query in queries {
            if let Query::Limit(limit) = query {
                documents.truncate(*limit as usize);
            }
        }

        Ok(DocumentList { total, documents })
    }
}

// ============================================
// Account gateway stub
// ============================================

#[derive(Default)]
pub struct StubAccountGateway {
    accounts: Mutex<Vec<Account>>,
    passwords: Mutex<HashMap<String, String>>,
    session: Mutex<Option<Session>>,
    pub fail_creates: AtomicBool,
    next_id: AtomicI64,
}

impl StubAccountGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .any(|account| account.email == email)
    }

    pub fn active_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    pub fn open_session_for(&self, account_id: &str) {
        *self.session.lock().unwrap() = Some(Session {
            id: "sess-seeded".to_string(),
            user_id: account_id.to_string(),
        });
    }
}

#[async_trait]
impl AccountGateway for StubAccountGateway {
    async fn create(&self, email: &str, password: &str, name: &str) -> Result<Account> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(AppError::AccountCreation(
                "injected account failure".to_string(),
            ));
        }
        if self.has_account(email) {
            return Err(AppError::AccountCreation(
                "email already registered".to_string(),
            ));
        }

        let account = Account {
            id: format!("account-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            email: email.to_string(),
            name: name.to_string(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        self.passwords
            .lock()
            .unwrap()
            .insert(email.to_string(), password.to_string());
        Ok(account)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session> {
        let known = self
            .passwords
            .lock()
            .unwrap()
            .get(email)
            .map(|stored| stored == password)
            .unwrap_or(false);
        if !known {
            return Err(AppError::Authentication("invalid credentials".to_string()));
        }

        let account = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.email == email)
            .cloned()
            .expect("account exists for known password");
        let session = Session {
            id: format!("sess-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            user_id: account.id,
        };
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(session)
    }

    async fn delete_current_session(&self) -> Result<()> {
        let mut session = self.session.lock().unwrap();
        if session.is_none() {
            return Err(AppError::Authentication("no active session".to_string()));
        }
        *session = None;
        Ok(())
    }

    async fn current(&self) -> Result<Option<Account>> {
        let session = self.session.lock().unwrap().clone();
        let Some(session) = session else {
            return Ok(None);
        };
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.id == session.user_id)
            .cloned())
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        format!("mem://avatars/initials?name={}", urlencoding::encode(name))
    }
}
