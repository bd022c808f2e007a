use axum::Json;
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{ChangeReport, Snapshot};
use crate::notifications::{self, Notification};
use crate::services::{RefreshOutcome, RefreshService};
use crate::session::{Credentials, Session};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangesView {
    report: ChangeReport,
    acknowledged: bool,
    last_error: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", post(login).delete(logout))
        .route("/refresh", post(refresh_now))
        .route("/snapshot", get(last_snapshot))
        .route("/changes", get(changes))
        .route("/changes/ack", post(acknowledge))
        .route("/notifications", get(list_notifications))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .sessions
        .login(state.gradebook.as_ref(), &credentials)
        .await?;
    Ok(Json(session))
}

async fn logout(State(state): State<AppState>) -> StatusCode {
    state.sessions.logout().await;
    StatusCode::NO_CONTENT
}

async fn refresh_now(State(state): State<AppState>) -> Result<Json<RefreshOutcome>, AppError> {
    let service = RefreshService::from_state(&state);
    let outcome = service.refresh().await?;
    Ok(Json(outcome))
}

async fn last_snapshot(State(state): State<AppState>) -> Result<Json<Snapshot>, AppError> {
    let snapshot = repository::load_snapshot(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(snapshot))
}

async fn changes(State(state): State<AppState>) -> Result<Json<ChangesView>, AppError> {
    let report = repository::load_report(&state.db).await?.unwrap_or_default();
    let acknowledged = repository::changes_acknowledged(&state.db).await?;
    let last_error = repository::last_refresh_error(&state.db).await?;
    Ok(Json(ChangesView {
        report,
        acknowledged,
        last_error,
    }))
}

async fn acknowledge(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    repository::acknowledge_changes(&state.db).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let report = repository::load_report(&state.db).await?.unwrap_or_default();
    let snapshot = repository::load_snapshot(&state.db).await?.unwrap_or_default();
    Ok(Json(notifications::notifications(&report, &snapshot)))
}
