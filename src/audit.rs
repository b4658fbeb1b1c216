use sea_orm::{ActiveValue::NotSet, DatabaseConnection, EntityTrait, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    entity::{AuditLogs, audit_logs::ActiveModel},
    error::AppResult,
};

pub async fn log_audit(
    conn: &DatabaseConnection,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let entry = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: NotSet,
    };
    AuditLogs::insert(entry).exec(conn).await?;

    Ok(())
}

/// Writes an audit entry; a failure is logged and never fails the caller.
pub async fn record(
    conn: &DatabaseConnection,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(conn, user_id, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
