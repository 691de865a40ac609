/// Account gateway: pass-through to the backend's auth subsystem
use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::gateways::http::{error_message, BackendClient};
use crate::models::{Account, Session};

/// Create and authenticate accounts at the remote backend.
///
/// `current` returns `Ok(None)` when there is no active session; that is
/// not an error. All other failures surface immediately, single attempt.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn create(&self, email: &str, password: &str, name: &str) -> Result<Account>;
    async fn create_session(&self, email: &str, password: &str) -> Result<Session>;
    async fn delete_current_session(&self) -> Result<()>;
    async fn current(&self) -> Result<Option<Account>>;

    /// Deterministic initials-based avatar URL for a display name.
    fn initials_avatar_url(&self, name: &str) -> String;
}

/// HTTP implementation of [`AccountGateway`].
///
/// Holds the most recent session token so that `current` and
/// `delete_current_session` act on the session this client created.
pub struct HttpAccountGateway {
    client: BackendClient,
    session: RwLock<Option<String>>,
}

impl HttpAccountGateway {
    pub fn new(client: BackendClient) -> Self {
        HttpAccountGateway {
            client,
            session: RwLock::new(None),
        }
    }

    fn session_token(&self) -> Option<String> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    fn set_session(&self, token: Option<String>) {
        if let Ok(mut guard) = self.session.write() {
            *guard = token;
        }
    }
}

#[async_trait]
impl AccountGateway for HttpAccountGateway {
    async fn create(&self, email: &str, password: &str, name: &str) -> Result<Account> {
        let response = self
            .client
            .request(Method::POST, "/account")
            .json(&json!({
                "userId": Uuid::new_v4().to_string(),
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await
            .map_err(|e| AppError::AccountCreation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AccountCreation(error_message(response).await));
        }

        response
            .json::<Account>()
            .await
            .map_err(|e| AppError::AccountCreation(format!("malformed account payload: {e}")))
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .request(Method::POST, "/account/sessions/email")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Authentication(error_message(response).await));
        }

        let secret = response
            .headers()
            .get("X-Appwrite-Session")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let session = response
            .json::<Session>()
            .await
            .map_err(|e| AppError::Authentication(format!("malformed session payload: {e}")))?;

        self.set_session(secret.or_else(|| Some(session.id.clone())));
        Ok(session)
    }

    async fn delete_current_session(&self) -> Result<()> {
        let token = self.session_token();
        let request = self
            .client
            .request(Method::DELETE, "/account/sessions/current");
        let response = BackendClient::with_session(request, token.as_deref())
            .send()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Authentication(error_message(response).await));
        }

        self.set_session(None);
        Ok(())
    }

    async fn current(&self) -> Result<Option<Account>> {
        let token = self.session_token();
        let request = self.client.request(Method::GET, "/account");
        let response = BackendClient::with_session(request, token.as_deref())
            .send()
            .await
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::Authentication(error_message(response).await));
        }

        let account = response
            .json::<Account>()
            .await
            .map_err(|e| AppError::Authentication(format!("malformed account payload: {e}")))?;
        Ok(Some(account))
    }

    fn initials_avatar_url(&self, name: &str) -> String {
        format!(
            "{}/avatars/initials?name={}&project={}",
            self.client.endpoint(),
            urlencoding::encode(name),
            self.client.project_id(),
        )
    }
}
