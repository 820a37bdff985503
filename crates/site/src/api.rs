//! HTTP access to the section endpoints.

use std::time::Duration;

use async_trait::async_trait;
use carlton_core::section::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ClientError;
use crate::session::{SessionInfo, SessionProbe};

/// The calls the fetch-or-seed protocol makes.
#[async_trait]
pub trait SectionApi: Send + Sync {
    /// First stored section with this key.
    async fn find_by_key(&self, key: &str) -> Result<Option<GlobalSection>, ClientError>;

    /// [`ClientError::Conflict`] when the key is already stored.
    async fn create(&self, section: &NewGlobalSection) -> Result<GlobalSection, ClientError>;

    /// [`ClientError::Conflict`] when `update.version` is stale.
    async fn update(
        &self,
        id: Uuid,
        update: &SectionUpdate,
    ) -> Result<GlobalSection, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpSectionApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSectionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send this session token on writes.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string())
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status == StatusCode::CONFLICT {
        return Err(ClientError::Conflict(error_message(response).await));
    }
    if !status.is_success() {
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: error_message(response).await,
        });
    }
    Ok(response.json().await?)
}

#[async_trait]
impl SectionApi for HttpSectionApi {
    async fn find_by_key(&self, key: &str) -> Result<Option<GlobalSection>, ClientError> {
        let response = self
            .client
            .get(self.url("/api/globalSections"))
            .query(&SectionFilter::by_key(key))
            .send()
            .await?;
        let sections: Vec<GlobalSection> = read_json(response).await?;
        Ok(sections.into_iter().next())
    }

    async fn create(&self, section: &NewGlobalSection) -> Result<GlobalSection, ClientError> {
        let request = self.client.post(self.url("/api/globalSections")).json(section);
        read_json(self.authorized(request).send().await?).await
    }

    async fn update(
        &self,
        id: Uuid,
        update: &SectionUpdate,
    ) -> Result<GlobalSection, ClientError> {
        let request = self
            .client
            .put(self.url(&format!("/api/globalSections/{id}")))
            .json(update);
        read_json(self.authorized(request).send().await?).await
    }
}

#[async_trait]
impl SessionProbe for HttpSectionApi {
    async fn session(&self, token: &str) -> Result<SessionInfo, ClientError> {
        let response = self
            .client
            .get(self.url("/api/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        read_json(response).await
    }
}
