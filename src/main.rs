use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradewatch::api::router;
use gradewatch::config::AppConfig;
use gradewatch::db;
use gradewatch::gradebook::{GradebookClient, GradebookHttpClient, NoopGradebookClient};
use gradewatch::services::{RefreshScheduler, RefreshService};
use gradewatch::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gradewatch=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let pool = db::connect(&config.database_url, 5).await?;
    db::migrate(&pool).await?;

    let gradebook: Arc<dyn GradebookClient> = match &config.gradebook {
        Some(gradebook_config) => Arc::new(GradebookHttpClient::new(gradebook_config.clone())?),
        None => {
            warn!("GRADEBOOK_OFFLINE is set, using the offline gradebook client");
            Arc::new(NoopGradebookClient)
        }
    };

    let state = AppState::new(pool, gradebook, config.alignment);

    if let Some(interval) = config.refresh_interval {
        let scheduler = RefreshScheduler::new(RefreshService::from_state(&state), interval);
        tokio::spawn(scheduler.start());
    }

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
