use std::sync::Arc;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository;
use crate::diff::{self, PeriodAlignment};
use crate::error::AppError;
use crate::gradebook::GradebookClient;
use crate::models::ChangeReport;
use crate::session::SessionManager;
use crate::state::AppState;

/// One fetch → diff → persist cycle.
#[derive(Clone)]
pub struct RefreshService {
    db: SqlitePool,
    gradebook: Arc<dyn GradebookClient>,
    sessions: SessionManager,
    alignment: PeriodAlignment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub refresh_id: Uuid,
    /// No earlier snapshot existed, so nothing was diffed.
    pub first_run: bool,
    pub periods: usize,
    pub report: ChangeReport,
    pub has_unseen_changes: bool,
}

impl RefreshService {
    pub fn new(
        db: SqlitePool,
        gradebook: Arc<dyn GradebookClient>,
        sessions: SessionManager,
        alignment: PeriodAlignment,
    ) -> Self {
        Self {
            db,
            gradebook,
            sessions,
            alignment,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.db.clone(),
            state.gradebook.clone(),
            state.sessions.clone(),
            state.alignment,
        )
    }

    pub async fn is_signed_in(&self) -> bool {
        self.sessions.current().await.is_ok()
    }

    /// Runs a refresh and records its failure, if any, for the UI to show.
    pub async fn refresh(&self) -> Result<RefreshOutcome, AppError> {
        match self.run().await {
            Ok(outcome) => {
                repository::clear_refresh_error(&self.db).await?;
                Ok(outcome)
            }
            Err(e) => {
                if let Err(store_err) = repository::record_refresh_error(&self.db, &e.to_string()).await {
                    warn!("could not record refresh error: {}", store_err);
                }
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<RefreshOutcome, AppError> {
        let refresh_id = Uuid::new_v4();
        let session = self.sessions.current().await?;
        info!("Refresh {} started for {}", refresh_id, session.username);

        let current = self.gradebook.fetch_snapshot(&session).await?;
        info!("Fetched {} periods", current.len());

        // Take the write lock up front so overlapping refreshes queue on the
        // busy timeout instead of failing the read-to-write lock upgrade.
        let mut tx = self.db.begin_with("BEGIN IMMEDIATE").await?;
        let previous = repository::load_snapshot(&mut *tx).await?;

        let (first_run, report) = match previous {
            None => {
                info!("No previous snapshot, storing baseline");
                repository::save_refresh(&mut tx, &current, None).await?;
                (true, ChangeReport::default())
            }
            Some(previous) => match diff::diff(&previous, &current, self.alignment) {
                Ok(report) => {
                    repository::save_refresh(&mut tx, &current, Some(&report)).await?;
                    (false, report)
                }
                Err(e) => {
                    // Keep the new shape as the baseline so the next cycle can diff again.
                    warn!("Refresh {} could not diff: {}", refresh_id, e);
                    repository::save_refresh(&mut tx, &current, None).await?;
                    tx.commit().await?;
                    return Err(e.into());
                }
            },
        };

        let acknowledged = repository::changes_acknowledged(&mut *tx).await?;
        tx.commit().await?;

        let (added, changed, removed) = report.counts();
        info!(
            "Refresh {} completed: {} added, {} changed, {} removed",
            refresh_id, added, changed, removed
        );

        Ok(RefreshOutcome {
            refresh_id,
            first_run,
            periods: current.len(),
            report,
            has_unseen_changes: !acknowledged,
        })
    }
}
