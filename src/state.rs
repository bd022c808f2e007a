use std::sync::Arc;

use sqlx::SqlitePool;

use crate::diff::PeriodAlignment;
use crate::gradebook::GradebookClient;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub gradebook: Arc<dyn GradebookClient>,
    pub sessions: SessionManager,
    pub alignment: PeriodAlignment,
}

impl AppState {
    pub fn new(db: SqlitePool, gradebook: Arc<dyn GradebookClient>, alignment: PeriodAlignment) -> Self {
        Self {
            db,
            gradebook,
            sessions: SessionManager::new(),
            alignment,
        }
    }
}
