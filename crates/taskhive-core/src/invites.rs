//! Invite lifecycle
//!
//! An invite moves from pending to exactly one of accepted, expired or
//! cancelled. Acceptance is terminal: the `accepted_at` write is a
//! conditional update on `accepted_at IS NULL`, so the loser of a
//! concurrent double-accept fails deterministically instead of racing.
//! The accepted-invite/membership/audit writes share one transaction.

use chrono::{Duration, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use taskhive_db::entities::{
    team_activity_log::ActivityAction, team_invite, team_member, team_member::TeamRole, user,
};

use crate::access;
use crate::activity;
use crate::error::{CoreError, CoreResult};
use crate::teams::live_team;

/// Invite validity window.
pub const INVITE_VALIDITY_DAYS: i64 = 7;

/// Invite annotated with its derived lifecycle flags.
///
/// `is_expired` / `is_accepted` are computed from `expires_at` /
/// `accepted_at` at read time so they can never diverge from the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteView {
    pub id: Uuid,
    pub team_id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: chrono::DateTime<Utc>,
    pub accepted_at: Option<chrono::DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<Utc>,
    pub is_expired: bool,
    pub is_accepted: bool,
}

impl InviteView {
    fn from_model(invite: team_invite::Model, now: chrono::DateTime<Utc>) -> Self {
        Self {
            is_expired: invite.is_expired(now),
            is_accepted: invite.is_accepted(),
            id: invite.id,
            team_id: invite.team_id,
            email: invite.email,
            token: invite.token,
            expires_at: invite.expires_at,
            accepted_at: invite.accepted_at,
            created_by: invite.created_by,
            created_at: invite.created_at,
        }
    }
}

pub struct InviteService {
    db: DatabaseConnection,
}

impl InviteService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issue an invite for `email`. Requires at least ADMIN.
    ///
    /// Rejected when the email already belongs to a member, or while a
    /// pending un-expired invite for the same (team, email) exists.
    pub async fn create_invite(
        &self,
        team_id: Uuid,
        inviter_id: Uuid,
        email: &str,
    ) -> CoreResult<team_invite::Model> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CoreError::Validation("invalid invite email".into()));
        }

        let txn = self.db.begin().await?;

        live_team(&txn, team_id).await?;

        if !access::has_permission(&txn, team_id, inviter_id, TeamRole::Admin).await? {
            return Err(CoreError::denied(
                "you don't have permission to invite members",
            ));
        }

        // Reject when the address already maps to a member of this team.
        if let Some(existing_user) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&txn)
            .await?
        {
            if access::is_team_member(&txn, team_id, existing_user.id).await? {
                return Err(CoreError::Validation(
                    "user is already a member of this team".into(),
                ));
            }
        }

        let now = Utc::now();

        // One pending invite per (team, email) at a time.
        let pending = team_invite::Entity::find()
            .filter(team_invite::Column::TeamId.eq(team_id))
            .filter(team_invite::Column::Email.eq(email))
            .filter(team_invite::Column::AcceptedAt.is_null())
            .filter(team_invite::Column::ExpiresAt.gt(now))
            .one(&txn)
            .await?;
        if pending.is_some() {
            return Err(CoreError::Conflict(
                "an invite has already been sent to this email".into(),
            ));
        }

        let invite = team_invite::ActiveModel {
            id: Set(Uuid::new_v4()),
            team_id: Set(team_id),
            email: Set(email.to_string()),
            token: Set(generate_token()),
            expires_at: Set(now + Duration::days(INVITE_VALIDITY_DAYS)),
            accepted_at: Set(None),
            created_by: Set(inviter_id),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            team_id,
            inviter_id,
            ActivityAction::MemberInvited,
            None,
            format!("Invited {} to the team", invite.email),
            Some(serde_json::json!({ "email": invite.email })),
        )
        .await?;

        txn.commit().await?;
        info!(%team_id, invite_id = %invite.id, "Invite created");
        Ok(invite)
    }

    /// Redeem an invite token, creating the MEMBER membership row.
    ///
    /// Fails with [`CoreError::NotFound`] for an unknown token,
    /// [`CoreError::InviteExpired`] past the validity window, and
    /// [`CoreError::InviteAlreadyUsed`] once redeemed. The invite email
    /// must match the accepting user's email.
    pub async fn accept_invite(&self, token: &str, user_id: Uuid) -> CoreResult<team_invite::Model> {
        let txn = self.db.begin().await?;

        let invite = team_invite::Entity::find()
            .filter(team_invite::Column::Token.eq(token))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("invite"))?;

        if invite.is_accepted() {
            return Err(CoreError::InviteAlreadyUsed);
        }

        let now = Utc::now();
        if invite.expires_at < now {
            return Err(CoreError::InviteExpired);
        }

        let accepting_user = user::Entity::find_by_id(user_id)
            .filter(user::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("user"))?;

        if accepting_user.email != invite.email {
            return Err(CoreError::denied(
                "this invite was sent to a different email address",
            ));
        }

        live_team(&txn, invite.team_id).await?;

        // Terminal-state write: only succeeds while accepted_at is unset.
        let claimed = team_invite::Entity::update_many()
            .col_expr(team_invite::Column::AcceptedAt, Expr::value(Some(now)))
            .filter(team_invite::Column::Id.eq(invite.id))
            .filter(team_invite::Column::AcceptedAt.is_null())
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            return Err(CoreError::InviteAlreadyUsed);
        }

        // The membership insert is skipped when a row already exists, so
        // the (team, user) pair stays unique.
        if !access::is_team_member(&txn, invite.team_id, user_id).await? {
            team_member::ActiveModel {
                team_id: Set(invite.team_id),
                user_id: Set(user_id),
                role: Set(TeamRole::Member),
                joined_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }

        activity::record(
            &txn,
            invite.team_id,
            user_id,
            ActivityAction::MemberJoined,
            Some((user_id, "user")),
            format!("{} joined the team", accepting_user.display_name),
            None,
        )
        .await?;

        txn.commit().await?;
        info!(team_id = %invite.team_id, %user_id, "Invite accepted");

        Ok(team_invite::Model {
            accepted_at: Some(now),
            ..invite
        })
    }

    /// Withdraw a pending invite. Requires at least ADMIN.
    pub async fn cancel_invite(
        &self,
        invite_id: Uuid,
        team_id: Uuid,
        requester_id: Uuid,
    ) -> CoreResult<()> {
        let txn = self.db.begin().await?;

        let invite = team_invite::Entity::find_by_id(invite_id)
            .filter(team_invite::Column::TeamId.eq(team_id))
            .one(&txn)
            .await?
            .ok_or(CoreError::NotFound("invite"))?;

        if !access::has_permission(&txn, team_id, requester_id, TeamRole::Admin).await? {
            return Err(CoreError::denied(
                "you don't have permission to cancel invites",
            ));
        }

        if invite.is_accepted() {
            return Err(CoreError::Conflict(
                "an accepted invite cannot be cancelled".into(),
            ));
        }

        team_invite::Entity::delete_by_id(invite_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Unaccepted invites of a team, newest first, with derived flags.
    /// Member-gated.
    pub async fn pending_invites_for_team(
        &self,
        team_id: Uuid,
        user_id: Uuid,
    ) -> CoreResult<Vec<InviteView>> {
        debug!(%team_id, "Listing team invites");

        if !access::is_team_member(&self.db, team_id, user_id).await? {
            return Err(CoreError::denied("you are not a member of this team"));
        }

        let now = Utc::now();
        let invites = team_invite::Entity::find()
            .filter(team_invite::Column::TeamId.eq(team_id))
            .filter(team_invite::Column::AcceptedAt.is_null())
            .order_by_desc(team_invite::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(invites
            .into_iter()
            .map(|i| InviteView::from_model(i, now))
            .collect())
    }

    /// Open invites addressed to an email, excluding expired ones.
    pub async fn pending_invites_for_email(&self, email: &str) -> CoreResult<Vec<InviteView>> {
        let now = Utc::now();
        let invites = team_invite::Entity::find()
            .filter(team_invite::Column::Email.eq(email))
            .filter(team_invite::Column::AcceptedAt.is_null())
            .filter(team_invite::Column::ExpiresAt.gt(now))
            .order_by_desc(team_invite::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(invites
            .into_iter()
            .map(|i| InviteView::from_model(i, now))
            .collect())
    }
}

/// Cryptographically random, URL-safe redemption token.
fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}
