//! Issue and subtask positioning tests

mod common;

use common::{ctx, user, Ctx};
use taskhive_core::{
    CoreError, CreateIssueInput, CreateStatusInput, CreateSubtaskInput, UpdateIssueInput,
};
use taskhive_db::entities::{issue, user::Model as User};
use uuid::Uuid;

struct Board {
    project_id: Uuid,
    owner: User,
    todo: Uuid,
    done: Uuid,
}

/// Project with two columns: "To Do" (unlimited) and "Done" (wip 2).
async fn board(cx: &Ctx) -> Board {
    let owner = user(&cx.db, "owner@example.com").await;
    let team = cx.teams.create_team(owner.id, "Platform").await.unwrap();
    let project = cx
        .projects
        .create_project(team.id, owner.id, "Tracker", None)
        .await
        .unwrap();

    let todo = cx
        .statuses
        .create_status(
            project.id,
            owner.id,
            CreateStatusInput {
                name: "To Do".into(),
                is_default: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let done = cx
        .statuses
        .create_status(
            project.id,
            owner.id,
            CreateStatusInput {
                name: "Done".into(),
                wip_limit: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    Board {
        project_id: project.id,
        owner,
        todo: todo.id,
        done: done.id,
    }
}

async fn add_issue(cx: &Ctx, b: &Board, status_id: Uuid, title: &str) -> issue::Model {
    cx.issues
        .create_issue(
            b.owner.id,
            CreateIssueInput {
                project_id: b.project_id,
                status_id,
                title: title.into(),
                description: None,
                assignee_id: None,
                due_date: None,
                priority: None,
                position: None,
                label_ids: vec![],
            },
        )
        .await
        .unwrap()
}

async fn column_order(cx: &Ctx, b: &Board, status_id: Uuid) -> Vec<(String, i32)> {
    cx.issues
        .issues_for_status(status_id, b.owner.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.title, i.position))
        .collect()
}

#[tokio::test]
async fn issues_append_within_their_column() {
    let cx = ctx().await;
    let b = board(&cx).await;

    add_issue(&cx, &b, b.todo, "a").await;
    add_issue(&cx, &b, b.todo, "b").await;
    add_issue(&cx, &b, b.todo, "c").await;

    assert_eq!(
        column_order(&cx, &b, b.todo).await,
        [
            ("a".to_string(), 0),
            ("b".to_string(), 1),
            ("c".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn explicit_position_opens_a_slot() {
    let cx = ctx().await;
    let b = board(&cx).await;

    add_issue(&cx, &b, b.todo, "a").await;
    add_issue(&cx, &b, b.todo, "b").await;

    cx.issues
        .create_issue(
            b.owner.id,
            CreateIssueInput {
                project_id: b.project_id,
                status_id: b.todo,
                title: "first".into(),
                description: None,
                assignee_id: None,
                due_date: None,
                priority: None,
                position: Some(0),
                label_ids: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(
        column_order(&cx, &b, b.todo).await,
        [
            ("first".to_string(), 0),
            ("a".to_string(), 1),
            ("b".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn wip_limit_blocks_create_into_full_column() {
    let cx = ctx().await;
    let b = board(&cx).await;

    add_issue(&cx, &b, b.done, "x").await;
    add_issue(&cx, &b, b.done, "y").await;

    let err = cx
        .issues
        .create_issue(
            b.owner.id,
            CreateIssueInput {
                project_id: b.project_id,
                status_id: b.done,
                title: "overflow".into(),
                description: None,
                assignee_id: None,
                due_date: None,
                priority: None,
                position: None,
                label_ids: vec![],
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));
}

#[tokio::test]
async fn wip_limit_blocks_move_into_full_column() {
    let cx = ctx().await;
    let b = board(&cx).await;

    // "Done" holds exactly its WIP limit of 2
    add_issue(&cx, &b, b.done, "x").await;
    add_issue(&cx, &b, b.done, "y").await;
    let third = add_issue(&cx, &b, b.todo, "third").await;

    let err = cx
        .issues
        .move_issue(third.id, b.owner.id, b.done, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Conflict(_)));

    // The rejected move left the issue exactly where it was
    let unchanged = cx.issues.issue(third.id, b.owner.id).await.unwrap();
    assert_eq!(unchanged.status_id, b.todo);
    assert_eq!(unchanged.position, third.position);
    assert_eq!(column_order(&cx, &b, b.done).await.len(), 2);
}

#[tokio::test]
async fn cross_column_move_renumbers_both_columns() {
    let cx = ctx().await;
    let b = board(&cx).await;

    add_issue(&cx, &b, b.todo, "a").await;
    let moved = add_issue(&cx, &b, b.todo, "b").await;
    add_issue(&cx, &b, b.todo, "c").await;
    add_issue(&cx, &b, b.done, "d").await;

    cx.issues
        .move_issue(moved.id, b.owner.id, b.done, 0)
        .await
        .unwrap();

    // Source gap closed
    assert_eq!(
        column_order(&cx, &b, b.todo).await,
        [("a".to_string(), 0), ("c".to_string(), 1)]
    );
    // Target slot opened at the head
    assert_eq!(
        column_order(&cx, &b, b.done).await,
        [("b".to_string(), 0), ("d".to_string(), 1)]
    );
}

#[tokio::test]
async fn same_column_move_to_tail() {
    let cx = ctx().await;
    let b = board(&cx).await;

    let a = add_issue(&cx, &b, b.todo, "a").await;
    add_issue(&cx, &b, b.todo, "b").await;
    add_issue(&cx, &b, b.todo, "c").await;

    cx.issues.move_issue(a.id, b.owner.id, b.todo, 2).await.unwrap();

    assert_eq!(
        column_order(&cx, &b, b.todo).await,
        [
            ("b".to_string(), 0),
            ("c".to_string(), 1),
            ("a".to_string(), 2)
        ]
    );
}

#[tokio::test]
async fn oversized_target_position_clamps_to_append() {
    let cx = ctx().await;
    let b = board(&cx).await;

    let mover = add_issue(&cx, &b, b.todo, "mover").await;
    add_issue(&cx, &b, b.done, "d").await;

    let moved = cx
        .issues
        .move_issue(mover.id, b.owner.id, b.done, 99)
        .await
        .unwrap();
    assert_eq!(moved.position, 1);

    assert_eq!(
        column_order(&cx, &b, b.done).await,
        [("d".to_string(), 0), ("mover".to_string(), 1)]
    );
}

#[tokio::test]
async fn negative_target_position_is_invalid() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let mover = add_issue(&cx, &b, b.todo, "mover").await;

    let err = cx
        .issues
        .move_issue(mover.id, b.owner.id, b.done, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn moving_across_projects_is_invalid() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let mover = add_issue(&cx, &b, b.todo, "mover").await;

    // A column of a different project owned by the same team
    let other = cx
        .projects
        .create_project(
            cx.teams.teams_for_user(b.owner.id).await.unwrap()[0].id,
            b.owner.id,
            "Other",
            None,
        )
        .await
        .unwrap();
    let foreign = cx
        .statuses
        .create_status(
            other.id,
            b.owner.id,
            CreateStatusInput {
                name: "Elsewhere".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = cx
        .issues
        .move_issue(mover.id, b.owner.id, foreign.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn move_records_status_history() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let mover = add_issue(&cx, &b, b.todo, "mover").await;

    cx.issues.move_issue(mover.id, b.owner.id, b.done, 0).await.unwrap();

    let history = cx.issues.history(mover.id, b.owner.id, 10).await.unwrap();
    let status_change = history.iter().find(|h| h.field == "status").unwrap();
    assert_eq!(status_change.old_value.as_deref(), Some("To Do"));
    assert_eq!(status_change.new_value.as_deref(), Some("Done"));
}

#[tokio::test]
async fn update_tracks_changed_fields() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let target = add_issue(&cx, &b, b.todo, "draft").await;

    cx.issues
        .update_issue(
            target.id,
            b.owner.id,
            UpdateIssueInput {
                title: Some("final".into()),
                assignee_id: Some(Some(b.owner.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let history = cx.issues.history(target.id, b.owner.id, 10).await.unwrap();
    let fields: Vec<&str> = history.iter().map(|h| h.field.as_str()).collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"assignee"));
    assert!(fields.contains(&"created"));
}

#[tokio::test]
async fn delete_issue_closes_the_gap() {
    let cx = ctx().await;
    let b = board(&cx).await;

    add_issue(&cx, &b, b.todo, "a").await;
    let doomed = add_issue(&cx, &b, b.todo, "b").await;
    add_issue(&cx, &b, b.todo, "c").await;

    cx.issues.delete_issue(doomed.id, b.owner.id).await.unwrap();

    assert_eq!(
        column_order(&cx, &b, b.todo).await,
        [("a".to_string(), 0), ("c".to_string(), 1)]
    );
}

#[tokio::test]
async fn only_the_owner_deletes_an_issue() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let target = add_issue(&cx, &b, b.todo, "a").await;

    let peer = common::join_team(
        &cx,
        cx.teams.teams_for_user(b.owner.id).await.unwrap()[0].id,
        b.owner.id,
        "peer@example.com",
    )
    .await;

    let err = cx.issues.delete_issue(target.id, peer.id).await.unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied(_)));
}

#[tokio::test]
async fn label_set_replacement_is_a_diff() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let target = add_issue(&cx, &b, b.todo, "a").await;

    let bug = cx
        .labels
        .create_label(b.project_id, b.owner.id, "bug", None)
        .await
        .unwrap();
    let ui = cx
        .labels
        .create_label(b.project_id, b.owner.id, "ui", None)
        .await
        .unwrap();
    let perf = cx
        .labels
        .create_label(b.project_id, b.owner.id, "perf", None)
        .await
        .unwrap();

    cx.issues
        .update_issue_labels(target.id, b.owner.id, &[bug.id, ui.id])
        .await
        .unwrap();
    cx.issues
        .update_issue_labels(target.id, b.owner.id, &[ui.id, perf.id])
        .await
        .unwrap();

    let attached = cx.issues.issue_labels(target.id, b.owner.id).await.unwrap();
    let mut names: Vec<&str> = attached.iter().map(|l| l.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["perf", "ui"]);
}

#[tokio::test]
async fn label_attach_is_idempotent() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let target = add_issue(&cx, &b, b.todo, "a").await;
    let bug = cx
        .labels
        .create_label(b.project_id, b.owner.id, "bug", None)
        .await
        .unwrap();

    cx.issues.add_label(target.id, b.owner.id, bug.id).await.unwrap();
    cx.issues.add_label(target.id, b.owner.id, bug.id).await.unwrap();

    let attached = cx.issues.issue_labels(target.id, b.owner.id).await.unwrap();
    assert_eq!(attached.len(), 1);

    // Detaching twice is also a no-op
    cx.issues.remove_label(target.id, b.owner.id, bug.id).await.unwrap();
    cx.issues.remove_label(target.id, b.owner.id, bug.id).await.unwrap();
    let attached = cx.issues.issue_labels(target.id, b.owner.id).await.unwrap();
    assert!(attached.is_empty());
}

#[tokio::test]
async fn subtasks_follow_the_same_ordering_discipline() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let parent = add_issue(&cx, &b, b.todo, "parent").await;

    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let subtask = cx
            .subtasks
            .create_subtask(
                parent.id,
                b.owner.id,
                CreateSubtaskInput {
                    title: title.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        ids.push(subtask.id);
    }

    cx.subtasks
        .reorder_subtasks(parent.id, b.owner.id, &[ids[2], ids[0], ids[1]])
        .await
        .unwrap();

    let ordered = cx.subtasks.subtasks(parent.id, b.owner.id).await.unwrap();
    let titles: Vec<&str> = ordered.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["three", "one", "two"]);
    let positions: Vec<i32> = ordered.iter().map(|s| s.position).collect();
    assert_eq!(positions, [0, 1, 2]);

    // Non-permutation rejected
    let err = cx
        .subtasks
        .reorder_subtasks(parent.id, b.owner.id, &[ids[0], ids[1]])
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn deleting_a_subtask_closes_the_gap() {
    let cx = ctx().await;
    let b = board(&cx).await;
    let parent = add_issue(&cx, &b, b.todo, "parent").await;

    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let subtask = cx
            .subtasks
            .create_subtask(
                parent.id,
                b.owner.id,
                CreateSubtaskInput {
                    title: title.into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        ids.push(subtask.id);
    }

    cx.subtasks
        .delete_subtask(ids[1], parent.id, b.owner.id)
        .await
        .unwrap();

    let ordered = cx.subtasks.subtasks(parent.id, b.owner.id).await.unwrap();
    let remaining: Vec<(&str, i32)> = ordered
        .iter()
        .map(|s| (s.title.as_str(), s.position))
        .collect();
    assert_eq!(remaining, [("one", 0), ("three", 1)]);
}
