//! User entity
//!
//! Identity management (registration, login, password reset) lives outside
//! this workspace; the tracker only needs the user row for membership,
//! invite email matching and display in activity feeds.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User UUID (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address (unique), matched against invite emails on acceptance
    #[sea_orm(unique)]
    pub email: String,

    /// Display name shown in activity feeds and member lists
    pub display_name: String,

    /// Deactivated users keep their rows but cannot act
    pub is_active: bool,

    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Teams owned by this user
    #[sea_orm(has_many = "super::team::Entity")]
    OwnedTeams,

    /// Team memberships of this user
    #[sea_orm(has_many = "super::team_member::Entity")]
    Memberships,

    /// Favorite-project bookmarks of this user
    #[sea_orm(has_many = "super::favorite_project::Entity")]
    Favorites,
}

impl Related<super::team::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedTeams.def()
    }
}

impl Related<super::team_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
