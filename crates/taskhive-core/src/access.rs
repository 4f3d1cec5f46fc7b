//! Access resolution
//!
//! Pure reads with no side effects. Team-level authority comes from the
//! membership role ladder (Owner > Admin > Member); project- and
//! issue-level access derive transitively from the owning team's member
//! set. Every lookup miss resolves to "no access"; callers decide whether
//! that is a denial.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use taskhive_db::entities::{issue, project, team, team_member, team_member::TeamRole};

use crate::error::CoreResult;

/// Role of `user_id` within `team_id`, `None` when not a member.
pub async fn role_of<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
) -> CoreResult<Option<TeamRole>> {
    let member = team_member::Entity::find_by_id((team_id, user_id))
        .one(conn)
        .await?;
    Ok(member.map(|m| m.role))
}

/// True when the user's role carries at least `minimum` authority.
pub async fn has_permission<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
    minimum: TeamRole,
) -> CoreResult<bool> {
    Ok(match role_of(conn, team_id, user_id).await? {
        Some(role) => role.at_least(minimum),
        None => false,
    })
}

pub async fn is_team_member<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    Ok(role_of(conn, team_id, user_id).await?.is_some())
}

pub async fn is_team_admin<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    has_permission(conn, team_id, user_id, TeamRole::Admin).await
}

/// Ownership check against the team row itself, not the membership table.
pub async fn is_team_owner<C: ConnectionTrait>(
    conn: &C,
    team_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    let found = team::Entity::find_by_id(team_id)
        .filter(team::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(found.is_some_and(|t| t.owner_id == user_id))
}

/// Project access = membership in the project's owning team. Never granted
/// independently of team membership.
pub async fn has_project_access<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    let found = project::Entity::find_by_id(project_id)
        .filter(project::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    match found {
        Some(p) => is_team_member(conn, p.team_id, user_id).await,
        None => Ok(false),
    }
}

/// Narrower check against `projects.owner_id`.
pub async fn is_project_owner<C: ConnectionTrait>(
    conn: &C,
    project_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    let found = project::Entity::find_by_id(project_id)
        .filter(project::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    Ok(found.is_some_and(|p| p.owner_id == user_id))
}

/// Issue access = project access of the issue's project.
pub async fn has_issue_access<C: ConnectionTrait>(
    conn: &C,
    issue_id: Uuid,
    user_id: Uuid,
) -> CoreResult<bool> {
    let found = issue::Entity::find_by_id(issue_id)
        .filter(issue::Column::DeletedAt.is_null())
        .one(conn)
        .await?;
    match found {
        Some(i) => has_project_access(conn, i.project_id, user_id).await,
        None => Ok(false),
    }
}
