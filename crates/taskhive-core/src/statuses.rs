//! Kanban status engine
//!
//! Statuses are the ordered, WIP-limited columns of a project board. Only
//! the relative order of `position` values is contractual; a reorder
//! rewrites them to 0-based list rank. At most one status per project is
//! the default, and deleting a column re-homes its issues to the default
//! instead of orphaning them.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use taskhive_db::entities::{issue, issue_status};

use crate::access;
use crate::error::{CoreError, CoreResult};
use crate::projects::live_project;

/// What happens when a status update lowers `wip_limit` below the live
/// issue count of the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipTightenPolicy {
    /// Reject the update with a conflict, keeping the limit invariant
    /// true at every instant.
    Reject,
    /// Accept the update and surface a transient over-limit column.
    AllowOverLimit,
}

/// Pinned policy: tightening below the live count is rejected.
pub const WIP_TIGHTEN_POLICY: WipTightenPolicy = WipTightenPolicy::Reject;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStatusInput {
    pub name: String,
    pub color: Option<String>,
    /// Rank within the board; appended after the last column when omitted
    pub position: Option<i32>,
    pub is_default: bool,
    pub wip_limit: Option<i32>,
}

/// Full-replace update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusInput {
    pub name: String,
    pub color: Option<String>,
    pub is_default: bool,
    pub wip_limit: Option<i32>,
}

/// Status plus its live issue count, for board rendering.
#[derive(Debug, Clone)]
pub struct StatusView {
    pub status: issue_status::Model,
    pub issue_count: u64,
}

pub struct StatusService {
    db: DatabaseConnection,
}

impl StatusService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a status column. Requires project access.
    pub async fn create_status(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        input: CreateStatusInput,
    ) -> CoreResult<issue_status::Model> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "status name must not be empty".into(),
            ));
        }
        if input.wip_limit.is_some_and(|w| w < 0) {
            return Err(CoreError::Validation(
                "wip limit must not be negative".into(),
            ));
        }
        if input.position.is_some_and(|p| p < 0) {
            return Err(CoreError::Validation("position must not be negative".into()));
        }

        let txn = self.db.begin().await?;

        live_project(&txn, project_id).await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage statuses in this project",
            ));
        }

        let duplicate = issue_status::Entity::find()
            .filter(issue_status::Column::ProjectId.eq(project_id))
            .filter(issue_status::Column::Name.eq(name.as_str()))
            .filter(issue_status::Column::DeletedAt.is_null())
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(CoreError::Validation(
                "status name already exists in this project".into(),
            ));
        }

        let position = match input.position {
            Some(p) => p,
            None => next_position(&txn, project_id).await?,
        };

        // Single default per project: claiming the default unsets any other.
        if input.is_default {
            clear_default(&txn, project_id, None).await?;
        }

        let now = Utc::now();
        let created = issue_status::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            name: Set(name),
            color: Set(input.color),
            position: Set(position),
            is_default: Set(input.is_default),
            wip_limit: Set(input.wip_limit),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(status_id = %created.id, %project_id, "Status created");
        Ok(created)
    }

    /// Replace a status's fields. Requires project access.
    ///
    /// Tightening the WIP limit below the column's live issue count is
    /// rejected per [`WIP_TIGHTEN_POLICY`].
    pub async fn update_status(
        &self,
        status_id: Uuid,
        project_id: Uuid,
        actor_id: Uuid,
        input: UpdateStatusInput,
    ) -> CoreResult<issue_status::Model> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "status name must not be empty".into(),
            ));
        }
        if input.wip_limit.is_some_and(|w| w < 0) {
            return Err(CoreError::Validation(
                "wip limit must not be negative".into(),
            ));
        }

        let txn = self.db.begin().await?;

        let existing = issue_status::Entity::find_by_id(status_id)
            .filter(issue_status::Column::ProjectId.eq(project_id))
            .filter(issue_status::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("issue status"))?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage statuses in this project",
            ));
        }

        if name != existing.name {
            let duplicate = issue_status::Entity::find()
                .filter(issue_status::Column::ProjectId.eq(project_id))
                .filter(issue_status::Column::Name.eq(name.as_str()))
                .filter(issue_status::Column::Id.ne(status_id))
                .filter(issue_status::Column::DeletedAt.is_null())
                .one(&txn)
                .await?;
            if duplicate.is_some() {
                return Err(CoreError::Validation(
                    "status name already exists in this project".into(),
                ));
            }
        }

        if let Some(new_limit) = input.wip_limit {
            let live = live_issue_count(&txn, status_id).await?;
            if WIP_TIGHTEN_POLICY == WipTightenPolicy::Reject && (new_limit as u64) < live {
                return Err(CoreError::Conflict(format!(
                    "wip limit {} is below the current issue count {}",
                    new_limit, live
                )));
            }
        }

        if input.is_default && !existing.is_default {
            clear_default(&txn, project_id, Some(status_id)).await?;
        }

        let mut active: issue_status::ActiveModel = existing.into();
        active.name = Set(name);
        active.color = Set(input.color);
        active.is_default = Set(input.is_default);
        active.wip_limit = Set(input.wip_limit);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Rewrite the board order to match `ordered_ids`.
    ///
    /// The list must be a permutation of the project's live status ids;
    /// positions become the 0-based list rank.
    pub async fn reorder_statuses(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        live_project(&txn, project_id).await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage statuses in this project",
            ));
        }

        let statuses = issue_status::Entity::find()
            .filter(issue_status::Column::ProjectId.eq(project_id))
            .filter(issue_status::Column::DeletedAt.is_null())
            .all(&txn)
            .await?;

        let current: HashSet<Uuid> = statuses.iter().map(|s| s.id).collect();
        let proposed: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if proposed.len() != ordered_ids.len() || current != proposed {
            return Err(CoreError::Validation(
                "ordered ids must be a permutation of the project's statuses".into(),
            ));
        }

        let now = Utc::now();
        for (rank, id) in ordered_ids.iter().enumerate() {
            issue_status::Entity::update_many()
                .col_expr(issue_status::Column::Position, Expr::value(rank as i32))
                .col_expr(issue_status::Column::UpdatedAt, Expr::value(now))
                .filter(issue_status::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(%project_id, "Statuses reordered");
        Ok(())
    }

    /// Soft-delete a status, re-homing its issues to the default column.
    ///
    /// The default status itself cannot be deleted; an occupied column
    /// requires the project to have a default to receive its issues.
    /// Re-homed issues append after the default column's existing ones and
    /// are exempt from its WIP cap.
    pub async fn delete_status(
        &self,
        status_id: Uuid,
        project_id: Uuid,
        actor_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = issue_status::Entity::find_by_id(status_id)
            .filter(issue_status::Column::ProjectId.eq(project_id))
            .filter(issue_status::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("issue status"))?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage statuses in this project",
            ));
        }

        if existing.is_default {
            return Err(CoreError::Conflict(
                "the default status cannot be deleted".into(),
            ));
        }

        let residents = issue::Entity::find()
            .filter(issue::Column::StatusId.eq(status_id))
            .filter(issue::Column::DeletedAt.is_null())
            .order_by_asc(issue::Column::Position)
            .all(&txn)
            .await?;

        if !residents.is_empty() {
            let default = issue_status::Entity::find()
                .filter(issue_status::Column::ProjectId.eq(project_id))
                .filter(issue_status::Column::IsDefault.eq(true))
                .filter(issue_status::Column::DeletedAt.is_null())
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    CoreError::Conflict(
                        "project has no default status to receive the issues".into(),
                    )
                })?;

            let mut next = next_issue_position(&txn, default.id).await?;
            let now = Utc::now();
            for resident in residents {
                let mut active: issue::ActiveModel = resident.into();
                active.status_id = Set(default.id);
                active.position = Set(next);
                active.updated_at = Set(now);
                active.update(&txn).await?;
                next += 1;
            }
        }

        let mut active: issue_status::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        txn.commit().await?;
        info!(%status_id, "Status deleted");
        Ok(())
    }

    /// Board columns in position order with live issue counts.
    /// Access-gated.
    pub async fn statuses(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<Vec<StatusView>> {
        if !access::has_project_access(&self.db, project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this project",
            ));
        }

        let statuses = issue_status::Entity::find()
            .filter(issue_status::Column::ProjectId.eq(project_id))
            .filter(issue_status::Column::DeletedAt.is_null())
            .order_by_asc(issue_status::Column::Position)
            .all(&self.db)
            .await?;

        let mut views = Vec::with_capacity(statuses.len());
        for status in statuses {
            let issue_count = live_issue_count(&self.db, status.id).await?;
            views.push(StatusView {
                status,
                issue_count,
            });
        }
        Ok(views)
    }
}

/// Number of live issues currently in a status column.
pub(crate) async fn live_issue_count<C: ConnectionTrait>(
    conn: &C,
    status_id: Uuid,
) -> CoreResult<u64> {
    Ok(issue::Entity::find()
        .filter(issue::Column::StatusId.eq(status_id))
        .filter(issue::Column::DeletedAt.is_null())
        .count(conn)
        .await?)
}

/// Fetch a status that exists and is not soft-deleted.
pub(crate) async fn live_status<C: ConnectionTrait>(
    conn: &C,
    status_id: Uuid,
) -> CoreResult<issue_status::Model> {
    issue_status::Entity::find_by_id(status_id)
        .filter(issue_status::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("issue status"))
}

/// Append rank for a new status column: max existing position + 1.
async fn next_position<C: ConnectionTrait>(conn: &C, project_id: Uuid) -> CoreResult<i32> {
    let last = issue_status::Entity::find()
        .filter(issue_status::Column::ProjectId.eq(project_id))
        .filter(issue_status::Column::DeletedAt.is_null())
        .order_by_desc(issue_status::Column::Position)
        .one(conn)
        .await?;
    Ok(last.map_or(0, |s| s.position + 1))
}

/// Append rank for an issue entering a status column.
pub(crate) async fn next_issue_position<C: ConnectionTrait>(
    conn: &C,
    status_id: Uuid,
) -> CoreResult<i32> {
    let last = issue::Entity::find()
        .filter(issue::Column::StatusId.eq(status_id))
        .filter(issue::Column::DeletedAt.is_null())
        .order_by_desc(issue::Column::Position)
        .one(conn)
        .await?;
    Ok(last.map_or(0, |i| i.position + 1))
}

/// Unset `is_default` on every status of the project except `keep`.
async fn clear_default<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    keep: Option<Uuid>,
) -> CoreResult<()> {
    let mut query = issue_status::Entity::update_many()
        .col_expr(issue_status::Column::IsDefault, Expr::value(false))
        .filter(issue_status::Column::ProjectId.eq(project_id))
        .filter(issue_status::Column::IsDefault.eq(true))
        .filter(issue_status::Column::DeletedAt.is_null());
    if let Some(keep_id) = keep {
        query = query.filter(issue_status::Column::Id.ne(keep_id));
    }
    query.exec(conn).await?;
    Ok(())
}
