//! Domain engine for taskhive
//!
//! The rules layer of the tracker: cascading team/project/issue access
//! control, the invite-token state machine, WIP-limited kanban ordering
//! for statuses/issues/subtasks, and the append-only team activity trail.
//!
//! Services are stateless over a shared [`sea_orm::DatabaseConnection`];
//! every mutating use case runs inside exactly one transaction. The
//! transaction handle is threaded through helpers such as
//! [`activity::record`], so an audit append can never outlive a rolled
//! back mutation. HTTP routing, authentication, email delivery and other
//! side-effect channels live outside this crate.

pub mod access;
pub mod activity;
pub mod comments;
pub mod error;
pub mod invites;
pub mod issues;
pub mod labels;
pub mod projects;
pub mod statuses;
pub mod subtasks;
pub mod teams;

pub use error::{CoreError, CoreResult};

pub use activity::ActivityService;
pub use comments::CommentService;
pub use invites::{InviteService, InviteView};
pub use issues::{CreateIssueInput, IssueService, UpdateIssueInput};
pub use labels::LabelService;
pub use projects::ProjectService;
pub use statuses::{CreateStatusInput, StatusService, StatusView, UpdateStatusInput};
pub use subtasks::{CreateSubtaskInput, SubtaskService, UpdateSubtaskInput};
pub use teams::TeamService;
