//! Audit trail for authentication attempts.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// One authentication attempt, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditLog {
    pub id: String,
    pub username: String,
    pub outcome: String,
    pub created_at: String,
}

/// Audit outcome values
pub mod outcomes {
    pub const SUCCESS: &str = "success";
    pub const FAILURE: &str = "failure";
}

/// Append one audit row. The table is append-only; nothing in this crate
/// updates or deletes rows.
pub async fn record_auth_attempt(
    db: &SqlitePool,
    username: &str,
    outcome: &str,
) -> Result<(), sqlx::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO audit_logs (id, username, outcome, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(username)
        .bind(outcome)
        .bind(&now)
        .execute(db)
        .await?;

    tracing::debug!(username, outcome, "audit log recorded");
    Ok(())
}

/// Most recent attempts first.
pub async fn list_auth_attempts(
    db: &SqlitePool,
    limit: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM audit_logs ORDER BY created_at DESC, id LIMIT ?")
        .bind(limit)
        .fetch_all(db)
        .await
}
