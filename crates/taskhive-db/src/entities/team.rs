//! Team entity for multi-tenancy
//!
//! A team owns projects; project and issue access always derives from
//! membership in the owning team.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    /// Team UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Team name (human-readable)
    pub name: String,

    /// User ID of the team owner; the owner always holds an OWNER
    /// membership row as well
    pub owner_id: Uuid,

    /// Soft-delete marker; deleted teams are invisible to all reads
    pub deleted_at: Option<ChronoDateTimeUtc>,

    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Team belongs to a user (owner)
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,

    /// Team has members
    #[sea_orm(has_many = "super::team_member::Entity")]
    Members,

    /// Team has outstanding invites
    #[sea_orm(has_many = "super::team_invite::Entity")]
    Invites,

    /// Team owns projects
    #[sea_orm(has_many = "super::project::Entity")]
    Projects,

    /// Team has an activity log
    #[sea_orm(has_many = "super::team_activity_log::Entity")]
    ActivityLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
