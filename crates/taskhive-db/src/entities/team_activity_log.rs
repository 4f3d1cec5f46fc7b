//! TeamActivityLog entity
//!
//! Append-only: rows are inserted in the same transaction as the action
//! they record and are never updated or deleted afterwards.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of recorded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ActivityAction {
    #[sea_orm(string_value = "team_created")]
    TeamCreated,

    #[sea_orm(string_value = "team_updated")]
    TeamUpdated,

    #[sea_orm(string_value = "team_deleted")]
    TeamDeleted,

    #[sea_orm(string_value = "member_invited")]
    MemberInvited,

    #[sea_orm(string_value = "member_joined")]
    MemberJoined,

    #[sea_orm(string_value = "member_kicked")]
    MemberKicked,

    #[sea_orm(string_value = "member_left")]
    MemberLeft,

    #[sea_orm(string_value = "role_changed")]
    RoleChanged,

    #[sea_orm(string_value = "project_created")]
    ProjectCreated,

    #[sea_orm(string_value = "project_updated")]
    ProjectUpdated,

    #[sea_orm(string_value = "project_archived")]
    ProjectArchived,

    #[sea_orm(string_value = "project_unarchived")]
    ProjectUnarchived,

    #[sea_orm(string_value = "project_deleted")]
    ProjectDeleted,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_activity_logs")]
pub struct Model {
    /// Log entry UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub team_id: Uuid,

    /// User who performed the action
    pub actor_id: Uuid,

    pub action_type: ActivityAction,

    /// Entity the action touched, if any
    pub target_id: Option<Uuid>,

    /// Kind of the target, e.g. "project", "user"
    pub target_type: Option<String>,

    /// Human-readable summary
    pub message: Option<String>,

    /// Action-type-specific JSON payload; schema is additive-only so old
    /// consumers keep parsing
    pub metadata: Option<String>,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Team,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ActorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Actor,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
