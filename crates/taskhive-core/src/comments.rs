//! Issue comments
//!
//! Access-gated through the issue's project; only the author may edit or
//! delete a comment. Deletion is soft, so counts and feeds stay stable.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use taskhive_db::entities::{issue, issue_comment};

use crate::access;
use crate::error::{CoreError, CoreResult};

pub struct CommentService {
    db: DatabaseConnection,
}

impl CommentService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Comment on an issue. Requires issue access.
    pub async fn create_comment(
        &self,
        issue_id: Uuid,
        author_id: Uuid,
        body: &str,
    ) -> CoreResult<issue_comment::Model> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CoreError::Validation(
                "comment body must not be empty".into(),
            ));
        }

        let txn = self.db.begin().await?;

        require_live_issue(&txn, issue_id).await?;
        if !access::has_issue_access(&txn, issue_id, author_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to comment on this issue",
            ));
        }

        let now = Utc::now();
        let created = issue_comment::ActiveModel {
            id: Set(Uuid::new_v4()),
            issue_id: Set(issue_id),
            author_id: Set(author_id),
            body: Set(body.to_string()),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Edit a comment. Author only.
    pub async fn update_comment(
        &self,
        comment_id: Uuid,
        actor_id: Uuid,
        body: &str,
    ) -> CoreResult<issue_comment::Model> {
        let body = body.trim();
        if body.is_empty() {
            return Err(CoreError::Validation(
                "comment body must not be empty".into(),
            ));
        }

        let txn = self.db.begin().await?;

        let existing = live_comment(&txn, comment_id).await?;
        if existing.author_id != actor_id {
            return Err(CoreError::denied("only the author can edit a comment"));
        }

        let mut active: issue_comment::ActiveModel = existing.into();
        active.body = Set(body.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-delete a comment. Author only.
    pub async fn delete_comment(&self, comment_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_comment(&txn, comment_id).await?;
        if existing.author_id != actor_id {
            return Err(CoreError::denied("only the author can delete a comment"));
        }

        let mut active: issue_comment::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Live comments of an issue in chronological order. Requires issue
    /// access.
    pub async fn comments(
        &self,
        issue_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<issue_comment::Model>> {
        require_live_issue(&self.db, issue_id).await?;
        if !access::has_issue_access(&self.db, issue_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this issue",
            ));
        }

        let comments = issue_comment::Entity::find()
            .filter(issue_comment::Column::IssueId.eq(issue_id))
            .filter(issue_comment::Column::DeletedAt.is_null())
            .order_by_asc(issue_comment::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(comments)
    }

    /// Live comment count of an issue.
    pub async fn comment_count(&self, issue_id: Uuid) -> CoreResult<u64> {
        Ok(issue_comment::Entity::find()
            .filter(issue_comment::Column::IssueId.eq(issue_id))
            .filter(issue_comment::Column::DeletedAt.is_null())
            .count(&self.db)
            .await?)
    }
}

async fn require_live_issue<C: ConnectionTrait>(conn: &C, issue_id: Uuid) -> CoreResult<()> {
    issue::Entity::find_by_id(issue_id)
        .filter(issue::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("issue"))?;
    Ok(())
}

async fn live_comment<C: ConnectionTrait>(
    conn: &C,
    comment_id: Uuid,
) -> CoreResult<issue_comment::Model> {
    issue_comment::Entity::find_by_id(comment_id)
        .filter(issue_comment::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("comment"))
}
