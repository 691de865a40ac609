/// Shared HTTP client for the remote backend
///
/// One explicitly constructed client is passed into each gateway; there is
/// no process-wide SDK singleton. Project and key headers are attached to
/// every request here so the per-gateway code stays wire-logic only.
use reqwest::{Method, RequestBuilder, Response};

use crate::config::BackendConfig;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const SESSION_HEADER: &str = "X-Appwrite-Session";

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
}

impl BackendClient {
    /// Construction-time failures (TLS backend init) are startup errors,
    /// reported the same way as configuration problems.
    pub fn new(config: &BackendConfig) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        Ok(BackendClient {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Build an absolute URL for an API path (`path` starts with `/`).
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    /// Start a request with project/key headers attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .header(PROJECT_HEADER, &self.project_id);
        if let Some(key) = &self.api_key {
            builder = builder.header(KEY_HEADER, key);
        }
        builder
    }

    /// Attach a session token to a request, when one is active.
    pub(crate) fn with_session(builder: RequestBuilder, session: Option<&str>) -> RequestBuilder {
        match session {
            Some(token) => builder.header(SESSION_HEADER, token),
            None => builder,
        }
    }
}

/// Extract a human-readable failure message from an error response.
///
/// The backend reports failures as `{ "message": ..., "code": ... }`; fall
/// back to the bare status line when the body is not in that shape.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<serde_json::Value>().await {
        Ok(body) => match body.get("message").and_then(|m| m.as_str()) {
            Some(message) => format!("{status}: {message}"),
            None => status.to_string(),
        },
        Err(_) => status.to_string(),
    }
}
