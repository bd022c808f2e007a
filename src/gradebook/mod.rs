pub mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;
use crate::models::Snapshot;
use crate::session::{Credentials, Session};

#[derive(Clone, Debug)]
pub struct GradebookConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[async_trait]
pub trait GradebookClient: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AppError>;
    async fn fetch_snapshot(&self, session: &Session) -> Result<Snapshot, AppError>;
}

pub struct GradebookHttpClient {
    client: Client,
    config: GradebookConfig,
}

impl GradebookHttpClient {
    pub fn new(config: GradebookConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl GradebookClient for GradebookHttpClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        let request_body = dto::LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        };

        let response = self
            .client
            .post(self.url("api/login"))
            .json(&request_body)
            .send()
            .await?;

        let login: dto::LoginResponse = Self::read_json(response).await?;
        Ok(Session::new(credentials.username.clone(), login.token))
    }

    async fn fetch_snapshot(&self, session: &Session) -> Result<Snapshot, AppError> {
        let response = self
            .client
            .get(self.url("api/gradebook"))
            .bearer_auth(&session.token)
            .send()
            .await?;

        let gradebook: dto::GradebookResponse = Self::read_json(response).await?;
        let snapshot = gradebook.into_snapshot();
        debug!("fetched gradebook with {} periods", snapshot.len());
        Ok(snapshot)
    }
}

/// Offline client: every login succeeds and the gradebook is always empty.
pub struct NoopGradebookClient;

#[async_trait]
impl GradebookClient for NoopGradebookClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AppError> {
        Ok(Session::new(credentials.username.clone(), "offline"))
    }

    async fn fetch_snapshot(&self, _session: &Session) -> Result<Snapshot, AppError> {
        Ok(Snapshot::default())
    }
}
