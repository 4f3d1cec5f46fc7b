//! Team management and membership
//!
//! Creating a team atomically grants the creator an OWNER membership row;
//! the (team_id, user_id) pair is the composite primary key, so a user can
//! never hold two membership rows in one team. Every mutation appends to
//! the team activity trail inside its own transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use taskhive_db::entities::{
    team, team_activity_log::ActivityAction, team_member, team_member::TeamRole, user,
};

use crate::access;
use crate::activity;
use crate::error::{CoreError, CoreResult};

pub struct TeamService {
    db: DatabaseConnection,
}

impl TeamService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a team owned by `actor_id`, with the owner auto-membership.
    pub async fn create_team(&self, actor_id: Uuid, name: &str) -> CoreResult<team::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("team name must not be empty".into()));
        }

        let txn = self.db.begin().await?;

        let creator = user::Entity::find_by_id(actor_id)
            .filter(user::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        let now = Utc::now();
        let created = team::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            owner_id: Set(actor_id),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        team_member::ActiveModel {
            team_id: Set(created.id),
            user_id: Set(actor_id),
            role: Set(TeamRole::Owner),
            joined_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            created.id,
            actor_id,
            ActivityAction::TeamCreated,
            Some((created.id, "team")),
            format!("{} created team '{}'", creator.display_name, created.name),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(team_id = %created.id, "Team created");
        Ok(created)
    }

    /// Rename a team. Requires at least ADMIN.
    pub async fn update_team(
        &self,
        team_id: Uuid,
        actor_id: Uuid,
        name: &str,
    ) -> CoreResult<team::Model> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("team name must not be empty".into()));
        }

        let txn = self.db.begin().await?;

        let existing = live_team(&txn, team_id).await?;

        if !access::has_permission(&txn, team_id, actor_id, TeamRole::Admin).await? {
            return Err(CoreError::denied(
                "you don't have permission to update this team",
            ));
        }

        let old_name = existing.name.clone();
        let mut active: team::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::TeamUpdated,
            Some((team_id, "team")),
            format!("Renamed team '{}' to '{}'", old_name, updated.name),
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Soft-delete a team. Owner only.
    pub async fn delete_team(&self, team_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let existing = live_team(&txn, team_id).await?;

        if existing.owner_id != actor_id {
            return Err(CoreError::denied("only the team owner can delete the team"));
        }

        let team_name = existing.name.clone();
        let mut active: team::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&txn).await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::TeamDeleted,
            Some((team_id, "team")),
            format!("Deleted team '{}'", team_name),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(%team_id, "Team deleted");
        Ok(())
    }

    /// Fetch a team. Member-gated.
    pub async fn team(&self, team_id: Uuid, user_id: Uuid) -> CoreResult<team::Model> {
        let found = live_team(&self.db, team_id).await?;
        if !access::is_team_member(&self.db, team_id, user_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }
        Ok(found)
    }

    /// All live teams the user belongs to, newest first.
    pub async fn teams_for_user(&self, user_id: Uuid) -> CoreResult<Vec<team::Model>> {
        debug!(%user_id, "Listing teams");
        let memberships = team_member::Entity::find()
            .filter(team_member::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        let team_ids: Vec<Uuid> = memberships.iter().map(|m| m.team_id).collect();

        let teams = team::Entity::find()
            .filter(team::Column::Id.is_in(team_ids))
            .filter(team::Column::DeletedAt.is_null())
            .order_by_desc(team::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(teams)
    }

    /// Membership rows of a team, grouped by role then join date.
    /// Member-gated.
    pub async fn members(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<team_member::Model>> {
        if !access::is_team_member(&self.db, team_id, user_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }

        let members = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .order_by_asc(team_member::Column::Role)
            .order_by_asc(team_member::Column::JoinedAt)
            .all(&self.db)
            .await?;
        Ok(members)
    }

    /// Change a member's role. Requires at least ADMIN; the owner's role is
    /// immutable, and nobody can be promoted to OWNER.
    pub async fn update_member_role(
        &self,
        team_id: Uuid,
        member_user_id: Uuid,
        actor_id: Uuid,
        new_role: TeamRole,
    ) -> CoreResult<team_member::Model> {
        let txn = self.db.begin().await?;

        live_team(&txn, team_id).await?;

        let member = team_member::Entity::find_by_id((team_id, member_user_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("team member"))?;

        if member.role == TeamRole::Owner || new_role == TeamRole::Owner {
            return Err(CoreError::Validation("cannot change the owner role".into()));
        }

        if !access::has_permission(&txn, team_id, actor_id, TeamRole::Admin).await? {
            return Err(CoreError::denied(
                "you don't have permission to change member roles",
            ));
        }

        let old_role = member.role;
        let mut active: team_member::ActiveModel = member.into();
        active.role = Set(new_role);
        let updated = active.update(&txn).await?;

        activity::record(
            &txn,
            team_id,
            actor_id,
            ActivityAction::RoleChanged,
            Some((member_user_id, "user")),
            "Changed member role",
            Some(serde_json::json!({
                "old_role": old_role,
                "new_role": new_role,
            })),
        )
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Remove a member (or leave, when `member_user_id == actor_id`).
    ///
    /// The owner can never be removed. Admins may remove regular members
    /// but not other admins; members may only remove themselves.
    pub async fn remove_member(
        &self,
        team_id: Uuid,
        member_user_id: Uuid,
        actor_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        live_team(&txn, team_id).await?;

        let member = team_member::Entity::find_by_id((team_id, member_user_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("team member"))?;

        if member.role == TeamRole::Owner {
            return Err(CoreError::Validation("cannot remove the team owner".into()));
        }

        let actor_role = access::role_of(&txn, team_id, actor_id)
            .await?
            .ok_or_else(|| CoreError::denied("you are not a member of this team"))?;

        let leaving = member_user_id == actor_id;
        if !leaving {
            if actor_role == TeamRole::Member {
                return Err(CoreError::denied(
                    "you don't have permission to remove members",
                ));
            }
            if actor_role == TeamRole::Admin && member.role == TeamRole::Admin {
                return Err(CoreError::denied("an admin cannot remove another admin"));
            }
        }

        team_member::Entity::delete_by_id((team_id, member_user_id))
            .exec(&txn)
            .await?;

        let (action, message) = if leaving {
            (ActivityAction::MemberLeft, "Member left the team")
        } else {
            (ActivityAction::MemberKicked, "Removed member from the team")
        };
        activity::record(
            &txn,
            team_id,
            actor_id,
            action,
            Some((member_user_id, "user")),
            message,
            None,
        )
        .await?;

        txn.commit().await?;
        Ok(())
    }
}

/// Fetch a team that exists and is not soft-deleted.
pub(crate) async fn live_team<C: sea_orm::ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
) -> CoreResult<team::Model> {
    team::Entity::find_by_id(team_id)
        .filter(team::Column::DeletedAt.is_null())
        .one(conn)
        .await?
        .ok_or(CoreError::NotFound("team"))
}
