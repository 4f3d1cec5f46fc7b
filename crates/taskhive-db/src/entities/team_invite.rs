//! TeamInvite entity
//!
//! An invite is a unique, time-bounded token. Lifecycle: pending
//! (`accepted_at` null, not yet expired) until it is accepted
//! (`accepted_at` set, terminal), expires (`expires_at` in the past), or
//! is cancelled (row deleted by an admin). `is_expired`/`is_accepted` are
//! derived at read time, never stored.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_invites")]
pub struct Model {
    /// Invite UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Team the invite grants membership to
    pub team_id: Uuid,

    /// Email address the invite was sent to; acceptance requires the
    /// accepting user's email to match
    pub email: String,

    /// Redemption token (unique, cryptographically random)
    #[sea_orm(unique)]
    pub token: String,

    /// End of the validity window
    pub expires_at: ChronoDateTimeUtc,

    /// Set exactly once on acceptance; terminal
    pub accepted_at: Option<ChronoDateTimeUtc>,

    /// User who issued the invite
    pub created_by: Uuid,

    pub created_at: ChronoDateTimeUtc,
}

impl Model {
    /// Derived: the validity window has passed and the invite was never
    /// accepted in time.
    pub fn is_expired(&self, now: ChronoDateTimeUtc) -> bool {
        self.accepted_at.is_none() && self.expires_at < now
    }

    /// Derived: the invite has been redeemed.
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Invite belongs to a team
    #[sea_orm(
        belongs_to = "super::team::Entity",
        from = "Column::TeamId",
        to = "super::team::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Team,

    /// Invite was created by a user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Creator,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Team.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
