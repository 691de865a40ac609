/// Top-level wiring for the workflow layer
///
/// Builds the HTTP gateways from an explicit [`Config`] and hands them to
/// the three services. This is the only place gateway implementations are
/// chosen; everything below works against the gateway traits.
use std::sync::Arc;

use crate::config::Config;
use crate::gateways::{BackendClient, HttpAccountGateway, HttpDocumentStore, HttpFileStore};
use crate::services::{AccountService, PostService, UserService};

pub struct Snapgram {
    pub accounts: AccountService,
    pub posts: PostService,
    pub users: UserService,
}

impl Snapgram {
    /// Wire the full workflow layer against the remote backend.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let client = BackendClient::new(&config.backend)?;

        let accounts = Arc::new(HttpAccountGateway::new(client.clone()));
        let documents = Arc::new(HttpDocumentStore::new(
            client.clone(),
            config.database.database_id.clone(),
        ));
        let files = Arc::new(HttpFileStore::new(
            client,
            config.storage.bucket_id.clone(),
        ));

        let collections = config.database.collections.clone();

        Ok(Snapgram {
            accounts: AccountService::new(
                accounts,
                documents.clone(),
                collections.clone(),
            ),
            posts: PostService::new(
                documents.clone(),
                files.clone(),
                collections.clone(),
                config.preview.clone(),
                config.feed.clone(),
            ),
            users: UserService::new(documents, files, collections, config.preview.clone()),
        })
    }

    /// Convenience: load configuration from the environment and wire up.
    pub fn from_env() -> Result<Self, String> {
        let config = Config::from_env()?;
        Self::from_config(&config)
    }
}
