//! IssueStatus entity, a kanban column
//!
//! Statuses are ordered per project by `position`; only the relative order
//! is meaningful. At most one status per project carries `is_default`.
//! `wip_limit` caps the live issue count in the column (null = unlimited).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "issue_statuses")]
pub struct Model {
    /// Status UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning project; (project_id, name) is unique
    pub project_id: Uuid,

    pub name: String,

    /// Display color (hex), purely cosmetic
    pub color: Option<String>,

    /// Rank within the project's column order
    pub position: i32,

    /// Issues land here when their column is deleted; also the target for
    /// new issues created without an explicit status
    pub is_default: bool,

    /// Maximum live issues in this column; null = unconstrained
    pub wip_limit: Option<i32>,

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

    #[sea_orm(has_many = "super::issue::Entity")]
    Issues,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::issue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Issues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
