//! Subtask positioning engine
//!
//! The same ordering discipline as issues, scoped to a single issue and
//! with no WIP-limit concept: create appends, delete closes the gap, and
//! reorder rewrites positions from a validated permutation.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use taskhive_db::entities::{issue, issue_subtask};

use crate::access;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSubtaskInput {
    pub title: String,
    /// Rank within the issue; appended when omitted
    pub position: Option<i32>,
    pub assignee_id: Option<Uuid>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubtaskInput {
    pub title: Option<String>,
    pub is_done: Option<bool>,
    pub position: Option<i32>,
    pub assignee_id: Option<Option<Uuid>>,
}

pub struct SubtaskService {
    db: DatabaseConnection,
}

impl SubtaskService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Add a subtask to an issue. Requires issue access.
    pub async fn create_subtask(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        input: CreateSubtaskInput,
    ) -> CoreResult<issue_subtask::Model> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(CoreError::Validation(
                "subtask title must not be empty".into(),
            ));
        }
        if input.position.is_some_and(|p| p < 0) {
            return Err(CoreError::Validation("position must not be negative".into()));
        }

        let txn = self.db.begin().await?;

        require_issue_access(&txn, issue_id, actor_id).await?;

        let count = subtask_count(&txn, issue_id).await?;
        let position = match input.position {
            Some(p) => {
                let slot = p.min(count);
                open_slot(&txn, issue_id, slot).await?;
                slot
            }
            None => count,
        };

        let now = Utc::now();
        let created = issue_subtask::ActiveModel {
            id: Set(Uuid::new_v4()),
            issue_id: Set(issue_id),
            title: Set(title),
            is_done: Set(false),
            position: Set(position),
            assignee_id: Set(input.assignee_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Update a subtask's fields. Requires issue access.
    pub async fn update_subtask(
        &self,
        subtask_id: Uuid,
        issue_id: Uuid,
        actor_id: Uuid,
        input: UpdateSubtaskInput,
    ) -> CoreResult<issue_subtask::Model> {
        let txn = self.db.begin().await?;

        require_issue_access(&txn, issue_id, actor_id).await?;

        let existing = issue_subtask::Entity::find_by_id(subtask_id)
            .filter(issue_subtask::Column::IssueId.eq(issue_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("subtask"))?;

        let mut active: issue_subtask::ActiveModel = existing.into();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::Validation(
                    "subtask title must not be empty".into(),
                ));
            }
            active.title = Set(title);
        }
        if let Some(done) = input.is_done {
            active.is_done = Set(done);
        }
        if let Some(position) = input.position {
            if position < 0 {
                return Err(CoreError::Validation("position must not be negative".into()));
            }
            active.position = Set(position);
        }
        if let Some(assignee) = input.assignee_id {
            active.assignee_id = Set(assignee);
        }

        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Remove a subtask and close the gap it leaves. Requires issue access.
    pub async fn delete_subtask(
        &self,
        subtask_id: Uuid,
        issue_id: Uuid,
        actor_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        require_issue_access(&txn, issue_id, actor_id).await?;

        let existing = issue_subtask::Entity::find_by_id(subtask_id)
            .filter(issue_subtask::Column::IssueId.eq(issue_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("subtask"))?;

        let vacated = existing.position;
        issue_subtask::Entity::delete_by_id(subtask_id)
            .exec(&txn)
            .await?;

        issue_subtask::Entity::update_many()
            .col_expr(
                issue_subtask::Column::Position,
                Expr::col(issue_subtask::Column::Position).sub(1),
            )
            .filter(issue_subtask::Column::IssueId.eq(issue_id))
            .filter(issue_subtask::Column::Position.gt(vacated))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Rewrite the checklist order to match `ordered_ids`.
    ///
    /// The list must be a permutation of the issue's subtask ids;
    /// positions become the 0-based list rank.
    pub async fn reorder_subtasks(
        &self,
        issue_id: Uuid,
        actor_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        require_issue_access(&txn, issue_id, actor_id).await?;

        let subtasks = issue_subtask::Entity::find()
            .filter(issue_subtask::Column::IssueId.eq(issue_id))
            .all(&txn)
            .await?;

        let current: HashSet<Uuid> = subtasks.iter().map(|s| s.id).collect();
        let proposed: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if proposed.len() != ordered_ids.len() || current != proposed {
            return Err(CoreError::Validation(
                "ordered ids must be a permutation of the issue's subtasks".into(),
            ));
        }

        let now = Utc::now();
        for (rank, id) in ordered_ids.iter().enumerate() {
            issue_subtask::Entity::update_many()
                .col_expr(issue_subtask::Column::Position, Expr::value(rank as i32))
                .col_expr(issue_subtask::Column::UpdatedAt, Expr::value(now))
                .filter(issue_subtask::Column::Id.eq(*id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(%issue_id, "Subtasks reordered");
        Ok(())
    }

    /// Subtasks of an issue in position order. Requires issue access.
    pub async fn subtasks(
        &self,
        issue_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<issue_subtask::Model>> {
        require_issue_access(&self.db, issue_id, user_id).await?;

        let subtasks = issue_subtask::Entity::find()
            .filter(issue_subtask::Column::IssueId.eq(issue_id))
            .order_by_asc(issue_subtask::Column::Position)
            .all(&self.db)
            .await?;
        Ok(subtasks)
    }
}

/// Resolve issue access, failing closed when the issue is missing.
async fn require_issue_access<C: ConnectionTrait>(
    conn: &C,
    issue_id: Uuid,
    user_id: Uuid,
) -> CoreResult<()> {
    issue::Entity::find_by_id(issue_id)
        .filter(issue::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("issue"))?;

    if !access::has_issue_access(conn, issue_id, user_id).await? {
        return Err(CoreError::denied(
            "you don't have permission to modify this issue",
        ));
    }
    Ok(())
}

/// Number of subtasks currently on the issue.
async fn subtask_count<C: ConnectionTrait>(conn: &C, issue_id: Uuid) -> CoreResult<i32> {
    use sea_orm::PaginatorTrait;
    let count = issue_subtask::Entity::find()
        .filter(issue_subtask::Column::IssueId.eq(issue_id))
        .count(conn)
        .await?;
    Ok(count as i32)
}

/// Increment positions at or above the slot being opened.
async fn open_slot<C: ConnectionTrait>(conn: &C, issue_id: Uuid, slot: i32) -> CoreResult<()> {
    issue_subtask::Entity::update_many()
        .col_expr(
            issue_subtask::Column::Position,
            Expr::col(issue_subtask::Column::Position).add(1),
        )
        .filter(issue_subtask::Column::IssueId.eq(issue_id))
        .filter(issue_subtask::Column::Position.gte(slot))
        .exec(conn)
        .await?;
    Ok(())
}
