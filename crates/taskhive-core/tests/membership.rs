//! Team membership and invite lifecycle tests

mod common;

use chrono::{Duration, Utc};
use common::{ctx, join_team, user};
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use taskhive_core::CoreError;
use taskhive_db::entities::{team_invite, team_member, team_member::TeamRole};

#[tokio::test]
async fn create_team_grants_owner_membership() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;

    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let members = cx.teams.members(team.id, owner.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, owner.id);
    assert_eq!(members[0].role, TeamRole::Owner);
}

#[tokio::test]
async fn invite_accept_creates_single_membership() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let joiner = join_team(&cx, team.id, owner.id, "dev@example.com").await;

    let rows = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team.id))
        .filter(team_member::Column::UserId.eq(joiner.id))
        .count(&cx.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let role = team_member::Entity::find_by_id((team.id, joiner.id))
        .one(&cx.db)
        .await
        .unwrap()
        .unwrap()
        .role;
    assert_eq!(role, TeamRole::Member);
}

#[tokio::test]
async fn invite_requires_admin() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();
    let member = join_team(&cx, team.id, owner.id, "dev@example.com").await;

    let err = cx
        .invites
        .create_invite(team.id, member.id, "friend@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));
}

#[tokio::test]
async fn accepting_unknown_token_is_not_found() {
    let cx = ctx().await;
    let someone = user(&cx.db, "dev@example.com").await;

    let err = cx
        .invites
        .accept_invite("no-such-token", someone.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn accepting_expired_invite_creates_no_membership() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "late@example.com")
        .await
        .unwrap();

    // Age the invite past its validity window
    team_invite::Entity::update_many()
        .col_expr(
            team_invite::Column::ExpiresAt,
            Expr::value(Utc::now() - Duration::days(1)),
        )
        .filter(team_invite::Column::Id.eq(invite.id))
        .exec(&cx.db)
        .await
        .unwrap();

    let late = user(&cx.db, "late@example.com").await;
    let err = cx
        .invites
        .accept_invite(&invite.token, late.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InviteExpired));

    let rows = team_member::Entity::find()
        .filter(team_member::Column::UserId.eq(late.id))
        .count(&cx.db)
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn accepting_same_token_twice_is_terminal() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap();
    let joiner = user(&cx.db, "dev@example.com").await;

    cx.invites
        .accept_invite(&invite.token, joiner.id)
        .await
        .unwrap();

    let before = team_member::Entity::find().count(&cx.db).await.unwrap();

    let err = cx
        .invites
        .accept_invite(&invite.token, joiner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InviteAlreadyUsed));

    let after = team_member::Entity::find().count(&cx.db).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn invite_email_must_match_accepting_user() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "intended@example.com")
        .await
        .unwrap();
    let stranger = user(&cx.db, "stranger@example.com").await;

    let err = cx
        .invites
        .accept_invite(&invite.token, stranger.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));
}

#[tokio::test]
async fn second_pending_invite_for_same_email_conflicts() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    cx.invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap();

    let err = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn cancelled_invite_cannot_be_accepted() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap();

    cx.invites
        .cancel_invite(invite.id, team.id, owner.id)
        .await
        .unwrap();

    let joiner = user(&cx.db, "dev@example.com").await;
    let err = cx
        .invites
        .accept_invite(&invite.token, joiner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[tokio::test]
async fn accepted_invite_cannot_be_cancelled() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap();
    let joiner = user(&cx.db, "dev@example.com").await;
    cx.invites
        .accept_invite(&invite.token, joiner.id)
        .await
        .unwrap();

    let err = cx
        .invites
        .cancel_invite(invite.id, team.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn pending_invites_carry_derived_flags() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let fresh = cx
        .invites
        .create_invite(team.id, owner.id, "fresh@example.com")
        .await
        .unwrap();
    let stale = cx
        .invites
        .create_invite(team.id, owner.id, "stale@example.com")
        .await
        .unwrap();

    team_invite::Entity::update_many()
        .col_expr(
            team_invite::Column::ExpiresAt,
            Expr::value(Utc::now() - Duration::hours(1)),
        )
        .filter(team_invite::Column::Id.eq(stale.id))
        .exec(&cx.db)
        .await
        .unwrap();

    let views = cx
        .invites
        .pending_invites_for_team(team.id, owner.id)
        .await
        .unwrap();
    assert_eq!(views.len(), 2);

    let fresh_view = views.iter().find(|v| v.id == fresh.id).unwrap();
    assert!(!fresh_view.is_expired && !fresh_view.is_accepted);

    let stale_view = views.iter().find(|v| v.id == stale.id).unwrap();
    assert!(stale_view.is_expired && !stale_view.is_accepted);
}

#[tokio::test]
async fn membership_stays_unique_across_leave_and_rejoin() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let dev = join_team(&cx, team.id, owner.id, "dev@example.com").await;

    // Leave, then rejoin through a second invite
    cx.teams.remove_member(team.id, dev.id, dev.id).await.unwrap();
    let invite = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap();
    cx.invites.accept_invite(&invite.token, dev.id).await.unwrap();

    let rows = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team.id))
        .filter(team_member::Column::UserId.eq(dev.id))
        .count(&cx.db)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn member_joining_twice_conflicts() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();
    let dev = join_team(&cx, team.id, owner.id, "dev@example.com").await;

    // A second invite cannot even be issued for a current member
    let err = cx
        .invites
        .create_invite(team.id, owner.id, "dev@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    let _ = dev;
}

#[tokio::test]
async fn role_update_rules() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();
    let dev = join_team(&cx, team.id, owner.id, "dev@example.com").await;

    // Promote to admin
    let updated = cx
        .teams
        .update_member_role(team.id, dev.id, owner.id, TeamRole::Admin)
        .await
        .unwrap();
    assert_eq!(updated.role, TeamRole::Admin);

    // The owner's role is immutable
    let err = cx
        .teams
        .update_member_role(team.id, owner.id, owner.id, TeamRole::Member)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // Nobody can be promoted to owner
    let err = cx
        .teams
        .update_member_role(team.id, dev.id, owner.id, TeamRole::Owner)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // A plain member cannot change roles
    let peer = join_team(&cx, team.id, owner.id, "peer@example.com").await;
    let err = cx
        .teams
        .update_member_role(team.id, peer.id, peer.id, TeamRole::Admin)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));
}

#[tokio::test]
async fn remove_member_rules() {
    let cx = ctx().await;
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();

    let admin = join_team(&cx, team.id, owner.id, "admin@example.com").await;
    cx.teams
        .update_member_role(team.id, admin.id, owner.id, TeamRole::Admin)
        .await
        .unwrap();
    let admin2 = join_team(&cx, team.id, owner.id, "admin2@example.com").await;
    cx.teams
        .update_member_role(team.id, admin2.id, owner.id, TeamRole::Admin)
        .await
        .unwrap();
    let dev = join_team(&cx, team.id, owner.id, "dev@example.com").await;
    let dev2 = join_team(&cx, team.id, owner.id, "dev2@example.com").await;

    // The owner can never be removed
    let err = cx
        .teams
        .remove_member(team.id, owner.id, owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    // A member cannot remove another member
    let err = cx
        .teams
        .remove_member(team.id, dev2.id, dev.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    // An admin cannot remove another admin
    let err = cx
        .teams
        .remove_member(team.id, admin2.id, admin.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));

    // An admin can remove a member
    cx.teams.remove_member(team.id, dev2.id, admin.id).await.unwrap();

    // Anyone can leave
    cx.teams.remove_member(team.id, dev.id, dev.id).await.unwrap();

    let remaining = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team.id))
        .count(&cx.db)
        .await
        .unwrap();
    assert_eq!(remaining, 3);
}
