//! Database entities

pub mod favorite_project;
pub mod issue;
pub mod issue_comment;
pub mod issue_history;
pub mod issue_label;
pub mod issue_status;
pub mod issue_subtask;
pub mod project;
pub mod project_label;
pub mod team;
pub mod team_activity_log;
pub mod team_invite;
pub mod team_member;
pub mod user;

pub use favorite_project::Entity as FavoriteProject;
pub use issue::Entity as Issue;
pub use issue_comment::Entity as IssueComment;
pub use issue_history::Entity as IssueHistory;
pub use issue_label::Entity as IssueLabel;
pub use issue_status::Entity as IssueStatus;
pub use issue_subtask::Entity as IssueSubtask;
pub use project::Entity as Project;
pub use project_label::Entity as ProjectLabel;
pub use team::Entity as Team;
pub use team_activity_log::Entity as TeamActivityLog;
pub use team_invite::Entity as TeamInvite;
pub use team_member::Entity as TeamMember;
pub use user::Entity as User;

pub mod prelude {
    pub use super::favorite_project::Entity as FavoriteProject;
    pub use super::issue::Entity as Issue;
    pub use super::issue_comment::Entity as IssueComment;
    pub use super::issue_history::Entity as IssueHistory;
    pub use super::issue_label::Entity as IssueLabel;
    pub use super::issue_status::Entity as IssueStatus;
    pub use super::issue_subtask::Entity as IssueSubtask;
    pub use super::project::Entity as Project;
    pub use super::project_label::Entity as ProjectLabel;
    pub use super::team::Entity as Team;
    pub use super::team_activity_log::Entity as TeamActivityLog;
    pub use super::team_invite::Entity as TeamInvite;
    pub use super::team_member::Entity as TeamMember;
    pub use super::user::Entity as User;
}
