/// Account workflows: sign-up, sign-in, sign-out, current user
use std::sync::Arc;

use serde_json::json;

use crate::config::Collections;
use crate::error::{AppError, Result};
use crate::gateways::{decode, AccountGateway, DocumentStore};
use crate::models::{NewUser, Session, UserProfile};
use crate::query::Query;
use crate::validators::{self, sanitize_identifier};

pub struct AccountService {
    accounts: Arc<dyn AccountGateway>,
    documents: Arc<dyn DocumentStore>,
    collections: Collections,
}

impl AccountService {
    pub fn new(
        accounts: Arc<dyn AccountGateway>,
        documents: Arc<dyn DocumentStore>,
        collections: Collections,
    ) -> Self {
        AccountService {
            accounts,
            documents,
            collections,
        }
    }

    /// Create an external account plus its profile document.
    ///
    /// On success exactly one account and one profile exist, linked by the
    /// sanitized account id. Known gap: if the profile write fails, the
    /// already-created account is NOT rolled back; the caller gets
    /// [`AppError::ProfilePersistence`] and the account stays live without
    /// a profile. Logged at warn, deliberately not patched over.
    pub async fn create_user_account(&self, input: NewUser) -> Result<UserProfile> {
        validators::check(&input)?;

        let account = self
            .accounts
            .create(&input.email, &input.password, &input.name)
            .await?;

        let avatar_url = self.accounts.initials_avatar_url(&account.name);
        let profile_id = sanitize_identifier(&account.id);

        let data = json!({
            "accountId": account.id,
            "name": account.name,
            "email": account.email,
            "username": input.username,
            "imageUrl": avatar_url,
        });

        let document = self
            .documents
            .create(&self.collections.users, &profile_id, data)
            .await
            .map_err(|err| {
                tracing::warn!(
                    account_id = %account.id,
                    "profile write failed after account creation; account left without profile: {err}"
                );
                AppError::ProfilePersistence(err.to_string())
            })?;

        decode(&self.collections.users, document)
    }

    /// Create a session, invalidating any existing one first.
    ///
    /// The invalidation is best-effort: "no active session" is not an
    /// error here.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        if email.trim().is_empty() {
            return Err(AppError::validation("email", "email is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password", "password is required"));
        }

        if let Err(err) = self.accounts.delete_current_session().await {
            tracing::debug!("no session to invalidate before sign-in: {err}");
        }

        self.accounts.create_session(email, password).await
    }

    /// Invalidate the current session.
    pub async fn sign_out(&self) -> Result<()> {
        self.accounts.delete_current_session().await
    }

    /// Profile of the currently signed-in account, or `None` when there is
    /// no session or no matching profile document.
    pub async fn current_user(&self) -> Result<Option<UserProfile>> {
        let Some(account) = self.accounts.current().await? else {
            return Ok(None);
        };

        let page = self
            .documents
            .list(
                &self.collections.users,
                &[Query::equal("accountId", &account.id)],
            )
            .await?;

        match page.documents.into_iter().next() {
            Some(document) => Ok(Some(decode(&self.collections.users, document)?)),
            None => Ok(None),
        }
    }
}
