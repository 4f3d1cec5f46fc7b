//! Shared fixtures for the service integration tests

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use taskhive_core::{
    ActivityService, CommentService, InviteService, IssueService, LabelService, ProjectService,
    StatusService, SubtaskService, TeamService,
};
use taskhive_db::entities::user;
use uuid::Uuid;

pub struct Ctx {
    pub db: DatabaseConnection,
    pub teams: TeamService,
    pub invites: InviteService,
    pub projects: ProjectService,
    pub statuses: StatusService,
    pub issues: IssueService,
    pub subtasks: SubtaskService,
    pub comments: CommentService,
    pub labels: LabelService,
    pub activity: ActivityService,
}

/// In-memory database with migrations applied and all services wired up.
pub async fn ctx() -> Ctx {
    let db = taskhive_db::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    taskhive_db::migrate(&db).await.expect("Failed to migrate");

    Ctx {
        teams: TeamService::new(db.clone()),
        invites: InviteService::new(db.clone()),
        projects: ProjectService::new(db.clone()),
        statuses: StatusService::new(db.clone()),
        issues: IssueService::new(db.clone()),
        subtasks: SubtaskService::new(db.clone()),
        comments: CommentService::new(db.clone()),
        labels: LabelService::new(db.clone()),
        activity: ActivityService::new(db.clone()),
        db,
    }
}

/// Insert an active user row (identity management is out of scope for the
/// core, so tests create users directly).
pub async fn user(db: &DatabaseConnection, email: &str) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        display_name: Set(email.split('@').next().unwrap().to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

/// Invite `email`, register the matching user, and accept: the shortest
/// path to a MEMBER membership.
pub async fn join_team(cx: &Ctx, team_id: Uuid, inviter_id: Uuid, email: &str) -> user::Model {
    let invite = cx
        .invites
        .create_invite(team_id, inviter_id, email)
        .await
        .expect("Failed to create invite");
    let joiner = user(&cx.db, email).await;
    cx.invites
        .accept_invite(&invite.token, joiner.id)
        .await
        .expect("Failed to accept invite");
    joiner
}
