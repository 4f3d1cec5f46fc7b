//! Project label definitions
//!
//! Labels are defined per project, unique by (project, name), and capped
//! in number. Attaching them to issues lives in the issue engine.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use taskhive_db::entities::{issue_label, project_label};

use crate::access;
use crate::error::{CoreError, CoreResult};
use crate::projects::live_project;

/// Label definitions per project.
pub const MAX_LABELS_PER_PROJECT: u64 = 20;

pub struct LabelService {
    db: DatabaseConnection,
}

impl LabelService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Define a label in a project. Requires project access.
    pub async fn create_label(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        name: &str,
        color: Option<String>,
    ) -> CoreResult<project_label::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("label name must not be empty".into()));
        }

        let txn = self.db.begin().await?;

        live_project(&txn, project_id).await?;
        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage labels in this project",
            ));
        }

        let count = project_label::Entity::find()
            .filter(project_label::Column::ProjectId.eq(project_id))
            .count(&txn)
            .await?;
        if count >= MAX_LABELS_PER_PROJECT {
            return Err(CoreError::Validation(format!(
                "at most {} labels per project",
                MAX_LABELS_PER_PROJECT
            )));
        }

        let duplicate = project_label::Entity::find()
            .filter(project_label::Column::ProjectId.eq(project_id))
            .filter(project_label::Column::Name.eq(name))
            .one(&txn)
            .await?;
        if duplicate.is_some() {
            return Err(CoreError::Validation(
                "label name already exists in this project".into(),
            ));
        }

        let now = Utc::now();
        let created = project_label::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            name: Set(name.to_string()),
            color: Set(color),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(created)
    }

    /// Rename/recolor a label. Requires project access.
    pub async fn update_label(
        &self,
        label_id: Uuid,
        project_id: Uuid,
        actor_id: Uuid,
        name: &str,
        color: Option<String>,
    ) -> CoreResult<project_label::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("label name must not be empty".into()));
        }

        let txn = self.db.begin().await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage labels in this project",
            ));
        }

        let existing = project_label::Entity::find_by_id(label_id)
            .filter(project_label::Column::ProjectId.eq(project_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("label"))?;

        if name != existing.name {
            let duplicate = project_label::Entity::find()
                .filter(project_label::Column::ProjectId.eq(project_id))
                .filter(project_label::Column::Name.eq(name))
                .filter(project_label::Column::Id.ne(label_id))
                .one(&txn)
                .await?;
            if duplicate.is_some() {
                return Err(CoreError::Validation(
                    "label name already exists in this project".into(),
                ));
            }
        }

        let mut active: project_label::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.color = Set(color);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Delete a label and detach it from every issue. Requires project
    /// access.
    pub async fn delete_label(
        &self,
        label_id: Uuid,
        project_id: Uuid,
        actor_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        if !access::has_project_access(&txn, project_id, actor_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to manage labels in this project",
            ));
        }

        project_label::Entity::find_by_id(label_id)
            .filter(project_label::Column::ProjectId.eq(project_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("label"))?;

        issue_label::Entity::delete_many()
            .filter(issue_label::Column::LabelId.eq(label_id))
            .exec(&txn)
            .await?;
        project_label::Entity::delete_by_id(label_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Labels of a project in name order. Access-gated.
    pub async fn labels_for_project(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<project_label::Model>> {
        if !access::has_project_access(&self.db, project_id, user_id).await? {
            return Err(CoreError::denied(
                "you don't have permission to view this project",
            ));
        }

        let labels = project_label::Entity::find()
            .filter(project_label::Column::ProjectId.eq(project_id))
            .order_by_asc(project_label::Column::Name)
            .all(&self.db)
            .await?;
        Ok(labels)
    }
}
