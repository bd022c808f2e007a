use std::time::Duration;

use tracing::{debug, info, warn};

use crate::services::refresh_service::RefreshService;

/// Background refresh loop.
/// Waits one interval, refreshes, repeats. Failures are logged and the loop continues.
pub struct RefreshScheduler {
    service: RefreshService,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(service: RefreshService, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn start(self) {
        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;
            self.tick().await;
        }
    }

    /// Runs one scheduled cycle. Returns whether a refresh was attempted.
    pub async fn tick(&self) -> bool {
        if !self.service.is_signed_in().await {
            debug!("Skipping scheduled refresh: not signed in");
            return false;
        }

        match self.service.refresh().await {
            Ok(outcome) => {
                let (added, changed, removed) = outcome.report.counts();
                info!(
                    "Scheduled refresh completed - {} added, {} changed, {} removed | unseen: {}",
                    added, changed, removed, outcome.has_unseen_changes
                );
            }
            Err(e) => {
                // Already recorded by the service for the UI.
                warn!("Scheduled refresh failed: {}", e);
            }
        }
        true
    }
}
