use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::gradebook::GradebookClient;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated gradebook session. Passed explicitly to every fetch.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            token: token.into(),
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Holds the signed-in session, if any. Cloning shares the slot.
#[derive(Clone, Default)]
pub struct SessionManager {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn login(
        &self,
        client: &dyn GradebookClient,
        credentials: &Credentials,
    ) -> Result<Session, AppError> {
        if credentials.username.trim().is_empty() {
            return Err(AppError::BadRequest("username is required".to_string()));
        }

        let session = client.login(credentials).await?;
        info!("signed in as {} (session {})", session.username, session.id);
        *self.current.write().await = Some(session.clone());
        Ok(session)
    }

    pub async fn logout(&self) -> Option<Session> {
        let previous = self.current.write().await.take();
        if let Some(session) = &previous {
            info!("signed out {} (session {})", session.username, session.id);
        }
        previous
    }

    pub async fn current(&self) -> Result<Session, AppError> {
        self.current.read().await.clone().ok_or(AppError::Unauthorized)
    }
}
