//! Issue positioning engine
//!
//! Issues are ordered within (project, status); moving one closes the gap
//! it leaves in the source column, opens a slot in the target column, and
//! re-checks the target's WIP limit, all inside one transaction, so a
//! failure at any step leaves the original ordering intact. The final
//! write of the moved row is conditioned on the (status, position) read at
//! the start; a concurrent reorder invalidates it and the whole move rolls
//! back with a conflict.

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use uuid::Uuid;

use taskhive_db::entities::{
    issue, issue::IssuePriority, issue_history, issue_label, project_label,
};

use crate::access;
use crate::error::{CoreError, CoreResult};
use crate::statuses::{live_issue_count, live_status, next_issue_position};

/// Labels attachable to a single issue.
pub const MAX_LABELS_PER_ISSUE: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIssueInput {
    pub project_id: Uuid,
    pub status_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<IssuePriority>,
    /// Rank within the column; appended when omitted
    pub position: Option<i32>,
    pub label_ids: Vec<Uuid>,
}

/// Partial update; `None` leaves a field untouched. The double options
/// distinguish "leave as is" from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateIssueInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status_id: Option<Uuid>,
    pub assignee_id: Option<Option<Uuid>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<IssuePriority>,
    pub label_ids: Option<Vec<Uuid>>,
}

pub struct IssueService {
    db: DatabaseConnection,
}

impl IssueService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create an issue in a column, respecting its WIP limit.
    pub async fn create_issue(
        &self,
        actor_id: Uuid,
        input: CreateIssueInput,
    ) -> CoreResult<issue::Model> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::Validation("issue title must not be empty".into()));
        }
        if input.position.is_some_and(|p| p < 0) {
            return Err(CoreError::Validation("position must not be negative".into()));
        }
        if input.label_ids.len() > MAX_LABELS_PER_ISSUE {
            return Err(CoreError::Validation(format!(
                "at most {} labels per issue",
                MAX_LABELS_PER_ISSUE
            )));
        }

        let txn = self.db.begin().await?;

        if !access::has_project_access(&txn, input.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to create issues in this project",
            ));
        }

        let status = live_status(&txn, input.status_id).await?;
        if status.project_id != input.project_id {
            return Err(CoreError::Validation(
                "status does not belong to this project".into(),
            ));
        }

        let occupancy = live_issue_count(&txn, status.id).await?;
        if let Some(limit) = status.wip_limit {
            if occupancy >= limit as u64 {
                return Err(CoreError::Conflict(format!(
                    "wip limit reached: at most {} issues in status '{}'",
                    limit, status.name
                )));
            }
        }

        let now = Utc::now();
        let position = match input.position {
            Some(p) => {
                let slot = p.min(occupancy as i32);
                open_slot(&txn, status.id, slot, None).await?;
                slot
            }
            None => next_issue_position(&txn, status.id).await?,
        };

        let created = issue::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            status_id: Set(input.status_id),
            title: Set(title),
            description: Set(input.description),
            owner_id: Set(actor_id),
            assignee_id: Set(input.assignee_id),
            due_date: Set(input.due_date),
            priority: Set(input.priority.unwrap_or(IssuePriority::Medium)),
            position: Set(position),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        if !input.label_ids.is_empty() {
            replace_labels(&txn, &created, &input.label_ids).await?;
        }

        record_history(&txn, created.id, actor_id, "created", None, Some(created.title.clone())).await?;

        txn.commit().await?;
        info!(issue_id = %created.id, "Issue created");
        Ok(created)
    }

    /// Move an issue to (target status, target position).
    ///
    /// Steps, all in one transaction: resolve the current slot, re-check
    /// the target WIP limit when changing columns, close the source gap,
    /// open the target slot, write the new (status, position) guarded on
    /// the originally observed one, and append a history entry on a
    /// column change.
    pub async fn move_issue(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        target_status_id: Uuid,
        target_position: i32,
    ) -> CoreResult<issue::Model> {
        if target_position < 0 {
            return Err(CoreError::Validation("position must not be negative".into()));
        }

        let txn = self.db.begin().await?;

        let moving = live_issue(&txn, issue_id).await?;

        if !access::has_project_access(&txn, moving.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to move this issue",
            ));
        }

        let target = live_status(&txn, target_status_id).await?;
        if target.project_id != moving.project_id {
            return Err(CoreError::Validation(
                "status does not belong to this project".into(),
            ));
        }

        let source_status_id = moving.status_id;
        let source_position = moving.position;
        let changing_column = target.id != source_status_id;

        // The mover is leaving its old column, so the target count excludes
        // nothing; it simply must be below the limit.
        if changing_column {
            if let Some(limit) = target.wip_limit {
                let occupancy = live_issue_count(&txn, target.id).await?;
                if occupancy >= limit as u64 {
                    return Err(CoreError::Conflict(format!(
                        "wip limit reached: at most {} issues in status '{}'",
                        limit, target.name
                    )));
                }
            }
        }

        // Close the gap the mover leaves behind.
        close_gap(&txn, source_status_id, source_position, issue_id).await?;

        // Positions are interpreted against the column without the mover.
        let siblings = if changing_column {
            live_issue_count(&txn, target.id).await?
        } else {
            live_issue_count(&txn, target.id).await?.saturating_sub(1)
        };
        let slot = target_position.min(siblings as i32);

        open_slot(&txn, target.id, slot, Some(issue_id)).await?;

        // Guarded write: a concurrent reorder that already moved this row
        // makes the guard miss, and the whole transaction rolls back.
        let now = Utc::now();
        let claimed = issue::Entity::update_many()
            .col_expr(issue::Column::StatusId, Expr::value(target.id))
            .col_expr(issue::Column::Position, Expr::value(slot))
            .col_expr(issue::Column::UpdatedAt, Expr::value(now))
            .filter(issue::Column::Id.eq(issue_id))
            .filter(issue::Column::StatusId.eq(source_status_id))
            .filter(issue::Column::Position.eq(source_position))
            .filter(issue::Column::DeletedAt.is_null())
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            return Err(CoreError::Conflict(
                "issue was reordered concurrently".into(),
            ));
        }

        if changing_column {
            let source = live_status(&txn, source_status_id).await?;
            record_history(
                &txn,
                issue_id,
                actor_id,
                "status",
                Some(source.name.clone()),
                Some(target.name.clone()),
            )
            .await?;
        }

        txn.commit().await?;
        debug!(%issue_id, status_id = %target.id, position = slot, "Issue moved");

        Ok(issue::Model {
            status_id: target.id,
            position: slot,
            updated_at: now,
            ..moving
        })
    }

    /// Update issue fields, recording one history entry per changed field.
    pub async fn update_issue(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        input: UpdateIssueInput,
    ) -> CoreResult<issue::Model> {
        let txn = self.db.begin().await?;

        let existing = live_issue(&txn, issue_id).await?;

        if !access::has_project_access(&txn, existing.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this issue",
            ));
        }

        if let Some(ref label_ids) = input.label_ids {
            if label_ids.len() > MAX_LABELS_PER_ISSUE {
                return Err(CoreError::Validation(format!(
                    "at most {} labels per issue",
                    MAX_LABELS_PER_ISSUE
                )));
            }
        }

        let now = Utc::now();
        let mut active: issue::ActiveModel = existing.clone().into();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::Validation("issue title must not be empty".into()));
            }
            if title != existing.title {
                record_history(
                    &txn,
                    issue_id,
                    actor_id,
                    "title",
                    Some(existing.title.clone()),
                    Some(title.clone()),
                )
                .await?;
                active.title = Set(title);
            }
        }

        if let Some(description) = input.description {
            active.description = Set(description);
        }

        // A status change through update is a move-to-append: the source
        // gap closes and the issue lands after the target's existing ones.
        if let Some(new_status_id) = input.status_id {
            if new_status_id != existing.status_id {
                let target = live_status(&txn, new_status_id).await?;
                if target.project_id != existing.project_id {
                    return Err(CoreError::Validation(
                        "status does not belong to this project".into(),
                    ));
                }
                if let Some(limit) = target.wip_limit {
                    let occupancy = live_issue_count(&txn, target.id).await?;
                    if occupancy >= limit as u64 {
                        return Err(CoreError::Conflict(format!(
                            "wip limit reached: at most {} issues in status '{}'",
                            limit, target.name
                        )));
                    }
                }

                close_gap(&txn, existing.status_id, existing.position, issue_id).await?;
                let appended = next_issue_position(&txn, target.id).await?;

                let source = live_status(&txn, existing.status_id).await?;
                record_history(
                    &txn,
                    issue_id,
                    actor_id,
                    "status",
                    Some(source.name.clone()),
                    Some(target.name.clone()),
                )
                .await?;

                active.status_id = Set(new_status_id);
                active.position = Set(appended);
            }
        }

        if let Some(assignee) = input.assignee_id {
            if assignee != existing.assignee_id {
                record_history(
                    &txn,
                    issue_id,
                    actor_id,
                    "assignee",
                    existing.assignee_id.map(|id| id.to_string()),
                    assignee.map(|id| id.to_string()),
                )
                .await?;
                active.assignee_id = Set(assignee);
            }
        }

        if let Some(due) = input.due_date {
            if due != existing.due_date {
                record_history(
                    &txn,
                    issue_id,
                    actor_id,
                    "due_date",
                    existing
                        .due_date
                        .map(|d| d.format("%Y-%m-%d").to_string()),
                    due.map(|d| d.format("%Y-%m-%d").to_string()),
                )
                .await?;
                active.due_date = Set(due);
            }
        }

        if let Some(priority) = input.priority {
            if priority != existing.priority {
                record_history(
                    &txn,
                    issue_id,
                    actor_id,
                    "priority",
                    Some(format!("{:?}", existing.priority)),
                    Some(format!("{:?}", priority)),
                )
                .await?;
                active.priority = Set(priority);
            }
        }

        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        if let Some(ref label_ids) = input.label_ids {
            replace_labels(&txn, &updated, label_ids).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-delete an issue. Issue owner only; closes the column gap.
    pub async fn delete_issue(&self, issue_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_issue(&txn, issue_id).await?;

        if existing.owner_id != actor_id {
            return Err(CoreError::denied(
                "only the issue owner can delete the issue",
            ));
        }

        let mut active: issue::ActiveModel = existing.clone().into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        close_gap(&txn, existing.status_id, existing.position, issue_id).await?;

        txn.commit().await?;
        info!(%issue_id, "Issue deleted");
        Ok(())
    }

    /// Fetch an issue. Access-gated.
    pub async fn issue(&self, issue_id: Uuid, user_id: Uuid) -> CoreResult<issue::Model> {
        let found = live_issue(&self.db, issue_id).await?;
        if !access::has_project_access(&self.db, found.project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this issue",
            ));
        }
        Ok(found)
    }

    /// Live issues of a column in position order. Access-gated.
    pub async fn issues_for_status(
        &self,
        status_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<issue::Model>> {
        let status = live_status(&self.db, status_id).await?;
        if !access::has_project_access(&self.db, status.project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this project",
            ));
        }

        let issues = issue::Entity::find()
            .filter(issue::Column::StatusId.eq(status_id))
            .filter(issue::Column::DeletedAt.is_null())
            .order_by_asc(issue::Column::Position)
            .all(&self.db)
            .await?;
        Ok(issues)
    }

    /// Attach a label. Idempotent; the label must belong to the issue's
    /// project.
    pub async fn add_label(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        label_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_issue(&txn, issue_id).await?;

        if !access::has_project_access(&txn, existing.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this issue",
            ));
        }

        let attached = issue_label::Entity::find_by_id((issue_id, label_id))
            .one(&txn)
            .await?;
        if attached.is_some() {
            txn.commit().await?;
            return Ok(());
        }

        let count = issue_label::Entity::find()
            .filter(issue_label::Column::IssueId.eq(issue_id))
            .count(&txn)
            .await?;
        if count >= MAX_LABELS_PER_ISSUE as u64 {
            return Err(CoreError::Validation(format!(
                "at most {} labels per issue",
                MAX_LABELS_PER_ISSUE
            )));
        }

        let label = project_label::Entity::find_by_id(label_id)
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("label"))?;
        if label.project_id != existing.project_id {
            return Err(CoreError::Validation(
                "label does not belong to the issue's project".into(),
            ));
        }

        issue_label::ActiveModel {
            issue_id: Set(issue_id),
            label_id: Set(label_id),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Detach a label. Idempotent.
    pub async fn remove_label(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        label_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_issue(&txn, issue_id).await?;

        if !access::has_project_access(&txn, existing.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this issue",
            ));
        }

        issue_label::Entity::delete_by_id((issue_id, label_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Replace the issue's label set: add the missing, remove the extra.
    pub async fn update_issue_labels(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        label_ids: &[Uuid],
    ) -> CoreResult<()> {
        if label_ids.len() > MAX_LABELS_PER_ISSUE {
            return Err(CoreError::Validation(format!(
                "at most {} labels per issue",
                MAX_LABELS_PER_ISSUE
            )));
        }

        let txn = self.db.begin().await?;

        let existing = live_issue(&txn, issue_id).await?;

        if !access::has_project_access(&txn, existing.project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this issue",
            ));
        }

        replace_labels(&txn, &existing, label_ids).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Labels currently attached to an issue.
    pub async fn issue_labels(
        &self,
        issue_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<project_label::Model>> {
        let existing = live_issue(&self.db, issue_id).await?;
        if !access::has_project_access(&self.db, existing.project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this issue",
            ));
        }

        let joins = issue_label::Entity::find()
            .filter(issue_label::Column::IssueId.eq(issue_id))
            .all(&self.db)
            .await?;
        let label_ids: Vec<Uuid> = joins.iter().map(|j| j.label_id).collect();

        let labels = project_label::Entity::find()
            .filter(project_label::Column::Id.is_in(label_ids))
            .order_by_asc(project_label::Column::Name)
            .all(&self.db)
            .await?;
        Ok(labels)
    }

    /// Change records of an issue, newest first, bounded by `limit`.
    pub async fn history(
        &self,
        issue_id: Uuid,
        user_id: Uuid,
        limit: u64,
    ) -> CoreResult<Vec<issue_history::Model>> {
        let existing = live_issue(&self.db, issue_id).await?;
        if !access::has_project_access(&self.db, existing.project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this issue",
            ));
        }

        let entries = issue_history::Entity::find()
            .filter(issue_history::Column::IssueId.eq(issue_id))
            .order_by_desc(issue_history::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(entries)
    }
}

/// Fetch an issue that exists and is not soft-deleted.
async fn live_issue<C: ConnectionTrait>(conn: &C, issue_id: Uuid) -> CoreResult<issue::Model> {
    issue::Entity::find_by_id(issue_id)
        .filter(issue::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("issue"))
}

/// Decrement positions above the vacated slot.
async fn close_gap<C: ConnectionTrait>(
    conn: &C,
    status_id: Uuid,
    vacated: i32,
    exclude: Uuid,
) -> CoreResult<()> {
    issue::Entity::update_many()
        .col_expr(
            issue::Column::Position,
            Expr::col(issue::Column::Position).sub(1),
        )
        .filter(issue::Column::StatusId.eq(status_id))
        .filter(issue::Column::Position.gt(vacated))
        .filter(issue::Column::Id.ne(exclude))
        .filter(issue::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    Ok(())
}

/// Increment positions at or above the slot being opened.
async fn open_slot<C: ConnectionTrait>(
    conn: &C,
    status_id: Uuid,
    slot: i32,
    exclude: Option<Uuid>,
) -> CoreResult<()> {
    let mut query = issue::Entity::update_many()
        .col_expr(
            issue::Column::Position,
            Expr::col(issue::Column::Position).add(1),
        )
        .filter(issue::Column::StatusId.eq(status_id))
        .filter(issue::Column::Position.gte(slot))
        .filter(issue::Column::DeletedAt.is_null());
    if let Some(id) = exclude {
        query = query.filter(issue::Column::Id.ne(id));
    }
    query.exec(conn).await?;
    Ok(())
}

/// Replace the issue's attached label set with `label_ids` (diff-based).
async fn replace_labels<C: ConnectionTrait>(
    conn: &C,
    target: &issue::Model,
    label_ids: &[Uuid],
) -> CoreResult<()> {
    let desired: HashSet<Uuid> = label_ids.iter().copied().collect();

    // Every requested label must exist in the issue's project.
    if !desired.is_empty() {
        let known = project_label::Entity::find()
            .filter(project_label::Column::Id.is_in(desired.iter().copied().collect::<Vec<_>>()))
            .filter(project_label::Column::ProjectId.eq(target.project_id))
            .count(conn)
            .await?;
        if known != desired.len() as u64 {
            return Err(CoreError::Validation(
                "some labels were not found in this project".into(),
            ));
        }
    }

    let current_rows = issue_label::Entity::find()
        .filter(issue_label::Column::IssueId.eq(target.id))
        .all(conn)
        .await?;
    let current: HashSet<Uuid> = current_rows.iter().map(|r| r.label_id).collect();

    let to_remove: Vec<Uuid> = current.difference(&desired).copied().collect();
    if !to_remove.is_empty() {
        issue_label::Entity::delete_many()
            .filter(issue_label::Column::IssueId.eq(target.id))
            .filter(issue_label::Column::LabelId.is_in(to_remove))
            .exec(conn)
            .await?;
    }

    for label_id in desired.difference(&current) {
        issue_label::ActiveModel {
            issue_id: Set(target.id),
            label_id: Set(*label_id),
        }
        .insert(conn)
        .await?;
    }

    Ok(())
}

/// Append one per-field change record.
pub(crate) async fn record_history<C: ConnectionTrait>(
    conn: &C,
    issue_id: Uuid,
    actor_id: Uuid,
    field: &str,
    old_value: Option<String>,
    new_value: Option<String>,
) -> CoreResult<issue_history::Model> {
    let entry = issue_history::ActiveModel {
        id: Set(Uuid::new_v4()),
        issue_id: Set(issue_id),
        actor_id: Set(actor_id),
        field: Set(field.to_string()),
        old_value: Set(old_value),
        new_value: Set(new_value),
        created_at: Set(Utc::now()),
    };
    Ok(entry.insert(conn).await?)
}
