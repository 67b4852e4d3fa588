//! Blocking reqwest client (no Tokio runtime required).

use std::time::Duration;

use labsheet_io::{BackendError, SavePayload, TemplateBackend};
use reqwest::blocking::{RequestBuilder, Response};
use serde_json::Value;
use thiserror::Error;

/// Error type for backend requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client could not be constructed
    #[error("failed to create HTTP client: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// Server rejected the request (400/422 with message)
    #[error("{0}")]
    Validation(String),
    #[error("parse error: {0}")]
    Parse(String),
    /// Token file could not be read or written
    #[error("{0}")]
    Credentials(String),
}

impl From<ClientError> for BackendError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Network(msg) => BackendError::Network(msg),
            ClientError::Http { status, body } => BackendError::Http { status, body },
            ClientError::Validation(msg) => BackendError::Validation(msg),
            ClientError::Parse(msg) => BackendError::Parse(msg),
            other @ (ClientError::Build(_) | ClientError::Credentials(_)) => {
                BackendError::Network(other.to_string())
            }
        }
    }
}

/// Endpoint roots and credentials.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// JSON API root, e.g. "https://lab.example/api"
    pub api_base: String,
    /// Static media root, e.g. "https://lab.example/media"
    pub media_base: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientOptions {
    pub fn new(api_base: impl Into<String>, media_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            media_base: media_base.into(),
            token: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Template backend client (blocking).
#[derive(Clone)]
pub struct TemplateClient {
    http: reqwest::blocking::Client,
    api_base: String,
    media_base: String,
    token: Option<String>,
}

impl TemplateClient {
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("labsheet/{}", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http,
            api_base: options.api_base.trim_end_matches('/').to_string(),
            media_base: options.media_base.trim_end_matches('/').to_string(),
            token: options.token,
        })
    }

    pub fn styles_url(&self, section: &str) -> String {
        format!("{}/templates/{}/styles", self.api_base, section)
    }

    pub fn content_url(&self, section: &str) -> String {
        format!("{}/templates/{}.xlsx", self.media_base, section)
    }

    pub fn save_url(&self) -> String {
        format!("{}/templates/save", self.api_base)
    }

    /// GET the section's style overlay (`{ "styles": {...} }`).
    pub fn get_styles(&self, section: &str) -> Result<Value, ClientError> {
        let resp = self.send(self.http.get(self.styles_url(section)))?;
        resp.json::<Value>().map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// GET the section's spreadsheet file. `cache_bust` is sent as `t` so
    /// intermediaries never serve a stale copy after a save.
    pub fn get_content(&self, section: &str, cache_bust: u64) -> Result<Vec<u8>, ClientError> {
        let request = self
            .http
            .get(self.content_url(section))
            .query(&[("t", cache_bust.to_string())]);
        let resp = self.send(request)?;
        let bytes = resp.bytes().map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// POST the full document. The response body is ignored.
    pub fn post_save(&self, payload: &SavePayload) -> Result<(), ClientError> {
        self.send(self.http.post(self.save_url()).json(payload))?;
        Ok(())
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let resp = request.send().map_err(|e| ClientError::Network(e.to_string()))?;
        check_status(resp)
    }
}

fn check_status(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let code = status.as_u16();
    let body = resp.text().unwrap_or_default();
    log::debug!("backend returned {}: {}", code, body);
    match code {
        400 | 422 => Err(ClientError::Validation(body)),
        _ => Err(ClientError::Http { status: code, body }),
    }
}

impl TemplateBackend for TemplateClient {
    fn fetch_styles(&self, section: &str) -> Result<Value, BackendError> {
        Ok(self.get_styles(section)?)
    }

    fn fetch_content(&self, section: &str, cache_bust: u64) -> Result<Vec<u8>, BackendError> {
        Ok(self.get_content(section, cache_bust)?)
    }

    fn save(&self, payload: &SavePayload) -> Result<(), BackendError> {
        Ok(self.post_save(payload)?)
    }
}
