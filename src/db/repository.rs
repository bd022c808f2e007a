use chrono::Utc;
use sqlx::sqlite::{SqliteConnection, SqliteExecutor};

use crate::error::AppError;
use crate::models::{ChangeReport, Snapshot};

pub const LAST_SNAPSHOT: &str = "last_snapshot";
pub const LAST_REPORT: &str = "last_report";
pub const CHANGES_ACKNOWLEDGED: &str = "changes_acknowledged";
pub const LAST_REFRESH_ERROR: &str = "last_refresh_error";

async fn read_document<'c>(
    db: impl SqliteExecutor<'c>,
    key: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM documents WHERE key = ?1")
        .bind(key)
        .fetch_optional(db)
        .await
}

async fn write_document<'c>(
    db: impl SqliteExecutor<'c>,
    key: &str,
    value: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO documents (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(db)
    .await?;
    Ok(())
}

async fn delete_document<'c>(db: impl SqliteExecutor<'c>, key: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM documents WHERE key = ?1")
        .bind(key)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn load_snapshot<'c>(db: impl SqliteExecutor<'c>) -> Result<Option<Snapshot>, AppError> {
    match read_document(db, LAST_SNAPSHOT).await? {
        Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        None => Ok(None),
    }
}

pub async fn load_report<'c>(db: impl SqliteExecutor<'c>) -> Result<Option<ChangeReport>, AppError> {
    match read_document(db, LAST_REPORT).await? {
        Some(value) => Ok(Some(serde_json::from_str(&value)?)),
        None => Ok(None),
    }
}

/// Nothing stored yet counts as acknowledged.
pub async fn changes_acknowledged<'c>(db: impl SqliteExecutor<'c>) -> Result<bool, AppError> {
    Ok(read_document(db, CHANGES_ACKNOWLEDGED)
        .await?
        .map_or(true, |value| value == "true"))
}

/// Stores the new snapshot. A non-empty report replaces the previous one
/// and marks it unseen; an empty or absent report leaves both untouched.
pub async fn save_refresh(
    conn: &mut SqliteConnection,
    snapshot: &Snapshot,
    report: Option<&ChangeReport>,
) -> Result<(), AppError> {
    write_document(&mut *conn, LAST_SNAPSHOT, &serde_json::to_string(snapshot)?).await?;

    if let Some(report) = report.filter(|report| !report.is_empty()) {
        write_document(&mut *conn, LAST_REPORT, &serde_json::to_string(report)?).await?;
        write_document(&mut *conn, CHANGES_ACKNOWLEDGED, "false").await?;
    }
    Ok(())
}

pub async fn acknowledge_changes<'c>(db: impl SqliteExecutor<'c>) -> Result<(), AppError> {
    write_document(db, CHANGES_ACKNOWLEDGED, "true").await?;
    Ok(())
}

pub async fn record_refresh_error<'c>(
    db: impl SqliteExecutor<'c>,
    message: &str,
) -> Result<(), AppError> {
    write_document(db, LAST_REFRESH_ERROR, message).await?;
    Ok(())
}

pub async fn clear_refresh_error<'c>(db: impl SqliteExecutor<'c>) -> Result<(), AppError> {
    delete_document(db, LAST_REFRESH_ERROR).await?;
    Ok(())
}

pub async fn last_refresh_error<'c>(db: impl SqliteExecutor<'c>) -> Result<Option<String>, AppError> {
    Ok(read_document(db, LAST_REFRESH_ERROR).await?)
}
