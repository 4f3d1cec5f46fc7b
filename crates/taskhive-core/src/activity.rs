//! Team activity trail
//!
//! Append-only. [`record`] takes the caller's open connection handle;
//! mutating use cases pass their transaction, so a rolled-back mutation
//! can never leave an orphan log entry. Rows are never updated or deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use taskhive_db::entities::{team_activity_log, team_activity_log::ActivityAction};

use crate::access;
use crate::error::{CoreError, CoreResult};

/// Default/maximum page size for activity feed reads.
pub const MAX_ACTIVITY_LIMIT: u64 = 200;

/// Append one activity entry.
///
/// Must be called with the same transaction handle as the mutation it
/// records, never from a separate fire-and-forget path.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    actor_id: Uuid,
    action_type: ActivityAction,
    target: Option<(Uuid, &str)>,
    message: impl Into<String>,
    metadata: Option<serde_json::Value>,
) -> CoreResult<team_activity_log::Model> {
    let (target_id, target_type) = match target {
        Some((id, kind)) => (Some(id), Some(kind.to_string())),
        None => (None, None),
    };

    let entry = team_activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        team_id: Set(team_id),
        actor_id: Set(actor_id),
        action_type: Set(action_type),
        target_id: Set(target_id),
        target_type: Set(target_type),
        message: Set(Some(message.into())),
        metadata: Set(metadata.map(|m| m.to_string())),
        created_at: Set(Utc::now()),
    };

    Ok(entry.insert(conn).await?)
}

/// Read side of the trail, consumed by the team activity feed.
pub struct ActivityService {
    db: DatabaseConnection,
}

impl ActivityService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Entries for a team, newest first, bounded by `limit`. Member-gated.
    pub async fn activity_logs(
        &self,
        team_id: Uuid,
        user_id: Uuid,
        limit: u64,
    ) -> CoreResult<Vec<team_activity_log::Model>> {
        debug!(%team_id, "Listing activity logs");

        if !access::is_team_member(&self.db, team_id, user_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }

        let entries = team_activity_log::Entity::find()
            .filter(team_activity_log::Column::TeamId.eq(team_id))
            .order_by_desc(team_activity_log::Column::CreatedAt)
            .limit(limit.min(MAX_ACTIVITY_LIMIT))
            .all(&self.db)
            .await?;

        Ok(entries)
    }
}
