//! Issue entity
//!
//! Issues are ordered within their status column by `position`, scoped to
//! (project_id, status_id). Only the relative order is contractual.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Issue priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum IssuePriority {
    #[sea_orm(string_value = "high")]
    High,

    #[sea_orm(string_value = "medium")]
    Medium,

    #[sea_orm(string_value = "low")]
    Low,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issues")]
pub struct Model {
    /// Issue UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub project_id: Uuid,

    /// Current kanban column
    pub status_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// User who created the issue; the only one allowed to delete it
    pub owner_id: Uuid,

    pub assignee_id: Option<Uuid>,

    pub due_date: Option<ChronoDateTimeUtc>,

    pub priority: IssuePriority,

    /// Rank within (project_id, status_id)
    pub position: i32,

    /// Soft-delete marker
    pub deleted_at: Option<ChronoDateTimeUtc>,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Project,

    #[sea_orm(
        belongs_to = "super::issue_status::Entity",
        from = "Column::StatusId",
        to = "super::issue_status::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Status,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(has_many = "super::issue_subtask::Entity")]
    Subtasks,

    #[sea_orm(has_many = "super::issue_label::Entity")]
    Labels,

    #[sea_orm(has_many = "super::issue_comment::Entity")]
    Comments,

    #[sea_orm(has_many = "super::issue_history::Entity")]
    History,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::issue_status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::issue_subtask::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
