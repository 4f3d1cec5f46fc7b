//! Consolidated initial schema migration

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. Create users table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 255).not_null().unique_key())
                    .col(string_len(User::DisplayName, 255).not_null())
                    .col(boolean(User::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. Create teams table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(uuid(Team::Id).primary_key())
                    .col(string_len(Team::Name, 255).not_null())
                    .col(uuid(Team::OwnerId).not_null())
                    .col(timestamp_with_time_zone_null(Team::DeletedAt))
                    .col(
                        timestamp_with_time_zone(Team::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Team::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_owner_id")
                            .from(Team::Table, Team::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_owner_id")
                    .table(Team::Table)
                    .col(Team::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. Create team_members junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamMember::Table)
                    .if_not_exists()
                    .col(uuid(TeamMember::TeamId).not_null())
                    .col(uuid(TeamMember::UserId).not_null())
                    .col(
                        string_len(TeamMember::Role, 32)
                            .not_null()
                            .default("member"),
                    )
                    .col(
                        timestamp_with_time_zone(TeamMember::JoinedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TeamMember::TeamId)
                            .col(TeamMember::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_team_id")
                            .from(TeamMember::Table, TeamMember::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_members_user_id")
                            .from(TeamMember::Table, TeamMember::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_members_user_id")
                    .table(TeamMember::Table)
                    .col(TeamMember::UserId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. Create team_invites table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamInvite::Table)
                    .if_not_exists()
                    .col(uuid(TeamInvite::Id).primary_key())
                    .col(uuid(TeamInvite::TeamId).not_null())
                    .col(string_len(TeamInvite::Email, 255).not_null())
                    .col(
                        string_len(TeamInvite::Token, 255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(timestamp_with_time_zone(TeamInvite::ExpiresAt).not_null())
                    .col(timestamp_with_time_zone_null(TeamInvite::AcceptedAt))
                    .col(uuid(TeamInvite::CreatedBy).not_null())
                    .col(
                        timestamp_with_time_zone(TeamInvite::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_invites_team_id")
                            .from(TeamInvite::Table, TeamInvite::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_invites_created_by")
                            .from(TeamInvite::Table, TeamInvite::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_invites_team_id")
                    .table(TeamInvite::Table)
                    .col(TeamInvite::TeamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_invites_email")
                    .table(TeamInvite::Table)
                    .col(TeamInvite::Email)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. Create projects table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Project::Table)
                    .if_not_exists()
                    .col(uuid(Project::Id).primary_key())
                    .col(uuid(Project::TeamId).not_null())
                    .col(uuid(Project::OwnerId).not_null())
                    .col(string_len(Project::Name, 255).not_null())
                    .col(text_null(Project::Description))
                    .col(boolean(Project::IsArchived).not_null().default(false))
                    .col(timestamp_with_time_zone_null(Project::DeletedAt))
                    .col(
                        timestamp_with_time_zone(Project::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Project::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_team_id")
                            .from(Project::Table, Project::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_owner_id")
                            .from(Project::Table, Project::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_projects_team_id")
                    .table(Project::Table)
                    .col(Project::TeamId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. Create favorite_projects table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(FavoriteProject::Table)
                    .if_not_exists()
                    .col(uuid(FavoriteProject::UserId).not_null())
                    .col(uuid(FavoriteProject::ProjectId).not_null())
                    .col(
                        timestamp_with_time_zone(FavoriteProject::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(FavoriteProject::UserId)
                            .col(FavoriteProject::ProjectId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_projects_user_id")
                            .from(FavoriteProject::Table, FavoriteProject::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_projects_project_id")
                            .from(FavoriteProject::Table, FavoriteProject::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. Create issue_statuses table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IssueStatus::Table)
                    .if_not_exists()
                    .col(uuid(IssueStatus::Id).primary_key())
                    .col(uuid(IssueStatus::ProjectId).not_null())
                    .col(string_len(IssueStatus::Name, 64).not_null())
                    .col(string_len_null(IssueStatus::Color, 7))
                    .col(integer(IssueStatus::Position).not_null())
                    .col(boolean(IssueStatus::IsDefault).not_null().default(false))
                    .col(integer_null(IssueStatus::WipLimit))
                    .col(timestamp_with_time_zone_null(IssueStatus::DeletedAt))
                    .col(
                        timestamp_with_time_zone(IssueStatus::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(IssueStatus::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_statuses_project_id")
                            .from(IssueStatus::Table, IssueStatus::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issue_statuses_project_id_name")
                    .table(IssueStatus::Table)
                    .col(IssueStatus::ProjectId)
                    .col(IssueStatus::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issue_statuses_project_id_position")
                    .table(IssueStatus::Table)
                    .col(IssueStatus::ProjectId)
                    .col(IssueStatus::Position)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 8. Create issues table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Issue::Table)
                    .if_not_exists()
                    .col(uuid(Issue::Id).primary_key())
                    .col(uuid(Issue::ProjectId).not_null())
                    .col(uuid(Issue::StatusId).not_null())
                    .col(string_len(Issue::Title, 255).not_null())
                    .col(text_null(Issue::Description))
                    .col(uuid(Issue::OwnerId).not_null())
                    .col(uuid_null(Issue::AssigneeId))
                    .col(timestamp_with_time_zone_null(Issue::DueDate))
                    .col(
                        string_len(Issue::Priority, 32)
                            .not_null()
                            .default("medium"),
                    )
                    .col(integer(Issue::Position).not_null())
                    .col(timestamp_with_time_zone_null(Issue::DeletedAt))
                    .col(
                        timestamp_with_time_zone(Issue::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Issue::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_project_id")
                            .from(Issue::Table, Issue::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_status_id")
                            .from(Issue::Table, Issue::StatusId)
                            .to(IssueStatus::Table, IssueStatus::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issues_owner_id")
                            .from(Issue::Table, Issue::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issues_project_id_status_id_position")
                    .table(Issue::Table)
                    .col(Issue::ProjectId)
                    .col(Issue::StatusId)
                    .col(Issue::Position)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 9. Create project_labels table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ProjectLabel::Table)
                    .if_not_exists()
                    .col(uuid(ProjectLabel::Id).primary_key())
                    .col(uuid(ProjectLabel::ProjectId).not_null())
                    .col(string_len(ProjectLabel::Name, 64).not_null())
                    .col(string_len_null(ProjectLabel::Color, 7))
                    .col(
                        timestamp_with_time_zone(ProjectLabel::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ProjectLabel::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_labels_project_id")
                            .from(ProjectLabel::Table, ProjectLabel::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_project_labels_project_id_name")
                    .table(ProjectLabel::Table)
                    .col(ProjectLabel::ProjectId)
                    .col(ProjectLabel::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 10. Create issue_labels junction table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IssueLabel::Table)
                    .if_not_exists()
                    .col(uuid(IssueLabel::IssueId).not_null())
                    .col(uuid(IssueLabel::LabelId).not_null())
                    .primary_key(
                        Index::create()
                            .col(IssueLabel::IssueId)
                            .col(IssueLabel::LabelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_labels_issue_id")
                            .from(IssueLabel::Table, IssueLabel::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_labels_label_id")
                            .from(IssueLabel::Table, IssueLabel::LabelId)
                            .to(ProjectLabel::Table, ProjectLabel::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 11. Create issue_subtasks table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IssueSubtask::Table)
                    .if_not_exists()
                    .col(uuid(IssueSubtask::Id).primary_key())
                    .col(uuid(IssueSubtask::IssueId).not_null())
                    .col(string_len(IssueSubtask::Title, 255).not_null())
                    .col(boolean(IssueSubtask::IsDone).not_null().default(false))
                    .col(integer(IssueSubtask::Position).not_null())
                    .col(uuid_null(IssueSubtask::AssigneeId))
                    .col(
                        timestamp_with_time_zone(IssueSubtask::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(IssueSubtask::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_subtasks_issue_id")
                            .from(IssueSubtask::Table, IssueSubtask::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issue_subtasks_issue_id_position")
                    .table(IssueSubtask::Table)
                    .col(IssueSubtask::IssueId)
                    .col(IssueSubtask::Position)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 12. Create issue_comments table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IssueComment::Table)
                    .if_not_exists()
                    .col(uuid(IssueComment::Id).primary_key())
                    .col(uuid(IssueComment::IssueId).not_null())
                    .col(uuid(IssueComment::AuthorId).not_null())
                    .col(text(IssueComment::Body).not_null())
                    .col(timestamp_with_time_zone_null(IssueComment::DeletedAt))
                    .col(
                        timestamp_with_time_zone(IssueComment::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(IssueComment::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_comments_issue_id")
                            .from(IssueComment::Table, IssueComment::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_comments_author_id")
                            .from(IssueComment::Table, IssueComment::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issue_comments_issue_id")
                    .table(IssueComment::Table)
                    .col(IssueComment::IssueId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 13. Create issue_history table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(IssueHistory::Table)
                    .if_not_exists()
                    .col(uuid(IssueHistory::Id).primary_key())
                    .col(uuid(IssueHistory::IssueId).not_null())
                    .col(uuid(IssueHistory::ActorId).not_null())
                    .col(string_len(IssueHistory::Field, 64).not_null())
                    .col(text_null(IssueHistory::OldValue))
                    .col(text_null(IssueHistory::NewValue))
                    .col(
                        timestamp_with_time_zone(IssueHistory::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_issue_history_issue_id")
                            .from(IssueHistory::Table, IssueHistory::IssueId)
                            .to(Issue::Table, Issue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_issue_history_issue_id")
                    .table(IssueHistory::Table)
                    .col(IssueHistory::IssueId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 14. Create team_activity_logs table
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamActivityLog::Table)
                    .if_not_exists()
                    .col(uuid(TeamActivityLog::Id).primary_key())
                    .col(uuid(TeamActivityLog::TeamId).not_null())
                    .col(uuid(TeamActivityLog::ActorId).not_null())
                    .col(string_len(TeamActivityLog::ActionType, 32).not_null())
                    .col(uuid_null(TeamActivityLog::TargetId))
                    .col(string_len_null(TeamActivityLog::TargetType, 50))
                    .col(text_null(TeamActivityLog::Message))
                    .col(text_null(TeamActivityLog::Metadata))
                    .col(
                        timestamp_with_time_zone(TeamActivityLog::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_activity_logs_team_id")
                            .from(TeamActivityLog::Table, TeamActivityLog::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_activity_logs_actor_id")
                            .from(TeamActivityLog::Table, TeamActivityLog::ActorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_activity_logs_team_id_created_at")
                    .table(TeamActivityLog::Table)
                    .col(TeamActivityLog::TeamId)
                    .col(TeamActivityLog::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order (respecting foreign keys)
        manager
            .drop_table(Table::drop().table(TeamActivityLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IssueHistory::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IssueComment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IssueSubtask::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IssueLabel::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ProjectLabel::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Issue::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(IssueStatus::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(FavoriteProject::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamInvite::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamMember::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

// ============================================================
// Table identifiers
// ============================================================

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Email,
    DisplayName,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Team {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    Name,
    OwnerId,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TeamMember {
    #[sea_orm(iden = "team_members")]
    Table,
    TeamId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum TeamInvite {
    #[sea_orm(iden = "team_invites")]
    Table,
    Id,
    TeamId,
    Email,
    Token,
    ExpiresAt,
    AcceptedAt,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Project {
    #[sea_orm(iden = "projects")]
    Table,
    Id,
    TeamId,
    OwnerId,
    Name,
    Description,
    IsArchived,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FavoriteProject {
    #[sea_orm(iden = "favorite_projects")]
    Table,
    UserId,
    ProjectId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum IssueStatus {
    #[sea_orm(iden = "issue_statuses")]
    Table,
    Id,
    ProjectId,
    Name,
    Color,
    Position,
    IsDefault,
    WipLimit,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Issue {
    #[sea_orm(iden = "issues")]
    Table,
    Id,
    ProjectId,
    StatusId,
    Title,
    Description,
    OwnerId,
    AssigneeId,
    DueDate,
    Priority,
    Position,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProjectLabel {
    #[sea_orm(iden = "project_labels")]
    Table,
    Id,
    ProjectId,
    Name,
    Color,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IssueLabel {
    #[sea_orm(iden = "issue_labels")]
    Table,
    IssueId,
    LabelId,
}

#[derive(DeriveIden)]
enum IssueSubtask {
    #[sea_orm(iden = "issue_subtasks")]
    Table,
    Id,
    IssueId,
    Title,
    IsDone,
    Position,
    AssigneeId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IssueComment {
    #[sea_orm(iden = "issue_comments")]
    Table,
    Id,
    IssueId,
    AuthorId,
    Body,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum IssueHistory {
    #[sea_orm(iden = "issue_history")]
    Table,
    Id,
    IssueId,
    ActorId,
    Field,
    OldValue,
    NewValue,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamActivityLog {
    #[sea_orm(iden = "team_activity_logs")]
    Table,
    Id,
    TeamId,
    ActorId,
    ActionType,
    TargetId,
    TargetType,
    Message,
    Metadata,
    CreatedAt,
}
