//! Project management and the favorite set
//!
//! Projects belong to exactly one team. Favorites are pure set membership
//! keyed by (user, project): adding twice and removing the absent pair are
//! both no-op successes.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use taskhive_db::entities::{
    favorite_project, project, team_activity_log::ActivityAction,
};

use crate::access;
use crate::activity;
use crate::error::{CoreError, CoreResult};
use crate::teams::live_team;

pub struct ProjectService {
    db: DatabaseConnection,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a project in a team. Any team member may create projects.
    pub async fn create_project(
        &self,
        team_id: Uuid,
        actor_id: Uuid,
        name: &str,
        description: Option<String>,
    ) -> CoreResult<project::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "project name must not be empty".into(),
            ));
        }

        let txn = self.db.begin().await?;

        live_team(&txn, team_id).await?;

        if !access::is_team_member(&txn, team_id, actor_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }

        let now = Utc::now();
        let created = project::ActiveModel {
            id: Set(Uuid::new_v4()),
            team_id: Set(team_id),
            owner_id: Set(actor_id),
            name: Set(name.to_string()),
            description: Set(description),
            is_archived: Set(false),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::ProjectCreated,
            Some((created.id, "project")),
            format!("Created project '{}'", created.name),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(project_id = %created.id, "Project created");
        Ok(created)
    }

    /// Update name/description. Requires project access.
    pub async fn update_project(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        name: &str,
        description: Option<String>,
    ) -> CoreResult<project::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation(
                "project name must not be empty".into(),
            ));
        }

        let txn = self.db.begin().await?;

        let existing = live_project(&txn, project_id).await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this project",
            ));
        }

        let team_id = existing.team_id;
        let old_name = existing.name.clone();
        let mut active: project::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.description = Set(description);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::ProjectUpdated,
            Some((project_id, "project")),
            format!("Updated project '{}' to '{}'", old_name, updated.name),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Archive or unarchive. Requires project access.
    pub async fn archive_project(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        archived: bool,
    ) -> CoreResult<project::Model> {
        let txn = self.db.begin().await?;

        let existing = live_project(&txn, project_id).await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to archive this project",
            ));
        }

        let team_id = existing.team_id;
        let project_name = existing.name.clone();
        let mut active: project::ActiveModel = existing.into();
        active.is_archived = Set(archived);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        let (action, message) = if archived {
            (
                ActivityAction::ProjectArchived,
                format!("Archived project '{}'", project_name),
            )
        } else {
            (
                ActivityAction::ProjectUnarchived,
                format!("Unarchived project '{}'", project_name),
            )
        };
        activity::record(
            &txn,
            team_id,
            actor_id,
            action,
            Some((project_id, "project")),
            message,
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-delete a project. Project owner only.
    pub async fn delete_project(&self, project_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_project(&txn, project_id).await?;

        if existing.owner_id != actor_id {
            return Err(CoreError::denied(
                "only the project owner can delete the project",
            ));
        }

        let team_id = existing.team_id;
        let project_name = existing.name.clone();
        let mut active: project::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::ProjectDeleted,
            Some((project_id, "project")),
            format!("Deleted project '{}'", project_name),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(%project_id, "Project deleted");
        Ok(())
    }

    /// Fetch a project. Access-gated.
    pub async fn project(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<project::Model> {
        let found = live_project(&self.db, project_id).await?;
        if !access::has_project_access(&self.db, project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this project",
            ));
        }
        Ok(found)
    }

    /// Live projects of a team, newest first. Member-gated.
    pub async fn projects_for_team(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<project::Model>> {
        debug!(%team_id, "Listing projects");

        if !access::is_team_member(&self.db, team_id, user_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }

        let projects = project::Entity::find()
            .filter(project::Column::TeamId.eq(team_id))
            .filter(project::Column::DeletedAt.is_null())
            .order_by_desc(project::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(projects)
    }

    /// Bookmark a project. Idempotent: re-adding is a no-op success.
    pub async fn add_favorite(&self, user_id: Uuid, project_id: Uuid) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        if !access::has_project_access(&txn, project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to favorite this project",
            ));
        }

        let existing = favorite_project::Entity::find_by_id((user_id, project_id))
            .one(&txn)
            .await?;
        if existing.is_none() {
            favorite_project::ActiveModel {
                user_id: Set(user_id),
                project_id: Set(project_id),
                created_at: Set(Utc::now()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(())
    }

    /// Remove a bookmark. Idempotent: removing the absent pair is a no-op.
    pub async fn remove_favorite(&self, user_id: Uuid, project_id: Uuid) -> CoreResult<()> {
        favorite_project::Entity::delete_by_id((user_id, project_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: Uuid, project_id: Uuid) -> CoreResult<bool> {
        let found = favorite_project::Entity::find_by_id((user_id, project_id))
            .one(&self.db)
            .await?;
        Ok(found.is_some())
    }

    /// The user's bookmarks, newest first, skipping soft-deleted projects.
    pub async fn favorites(&self, user_id: Uuid) -> CoreResult<Vec<project::Model>> {
        let rows = favorite_project::Entity::find()
            .filter(favorite_project::Column::UserId.eq(user_id))
            .order_by_desc(favorite_project::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let project_ids: Vec<Uuid> = rows.iter().map(|f| f.project_id).collect();

        let projects = project::Entity::find()
            .filter(project::Column::Id.is_in(project_ids))
            .filter(project::Column::DeletedAt.is_null())
            .order_by_desc(project::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(projects)
    }
}

/// Fetch a project that exists and is not soft-deleted.
pub(crate) async fn live_project<C: sea_orm::ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
) -> CoreResult<project::Model> {
    project::Entity::find_by_id(project_id)
        .filter(project::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("project"))
}
