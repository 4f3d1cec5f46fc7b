//! Integration tests for taskhive-db
//!
//! Tests schema and entity operations with a real SQLite in-memory database

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, Set,
};
use taskhive_db::{
    connect,
    entities::{team, team_invite, team_member, team_member::TeamRole, user},
    migrate,
};
use uuid::Uuid;

/// Helper to create a test database
async fn setup_test_db() -> sea_orm::DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

async fn insert_user(db: &sea_orm::DatabaseConnection, email: &str) -> user::Model {
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

#[tokio::test]
async fn test_database_connection() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let backend = db.get_database_backend();
    assert!(matches!(backend, sea_orm::DatabaseBackend::Sqlite));
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let result = migrate(&db).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_team_with_owner() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@example.com").await;

    let team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Platform".to_string()),
        owner_id: Set(owner.id),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert team");

    let found = team::Entity::find_by_id(team.id)
        .one(&db)
        .await
        .expect("Failed to query")
        .expect("Team not found");

    assert_eq!(found.name, "Platform");
    assert_eq!(found.owner_id, owner.id);
    assert!(found.deleted_at.is_none());
}

#[tokio::test]
async fn test_membership_composite_key_is_unique() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@example.com").await;

    let team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Core".to_string()),
        owner_id: Set(owner.id),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert team");

    team_member::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(owner.id),
        role: Set(TeamRole::Owner),
        joined_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert membership");

    // Same (team, user) pair again must violate the composite primary key
    let duplicate = team_member::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(owner.id),
        role: Set(TeamRole::Member),
        joined_at: Set(Utc::now()),
    }
    .insert(&db)
    .await;

    assert!(duplicate.is_err());

    let count = team_member::Entity::find()
        .filter(team_member::Column::TeamId.eq(team.id))
        .count(&db)
        .await
        .expect("Failed to count");
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_invite_token_is_unique() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@example.com").await;

    let team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Infra".to_string()),
        owner_id: Set(owner.id),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert team");

    let invite = team_invite::ActiveModel {
        id: Set(Uuid::new_v4()),
        team_id: Set(team.id),
        email: Set("dev@example.com".to_string()),
        token: Set("token-abc".to_string()),
        expires_at: Set(Utc::now() + Duration::days(7)),
        accepted_at: Set(None),
        created_by: Set(owner.id),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert invite");

    let clash = team_invite::ActiveModel {
        id: Set(Uuid::new_v4()),
        team_id: Set(team.id),
        email: Set("other@example.com".to_string()),
        token: Set("token-abc".to_string()),
        expires_at: Set(Utc::now() + Duration::days(7)),
        accepted_at: Set(None),
        created_by: Set(owner.id),
        created_at: Set(Utc::now()),
    }
    .insert(&db)
    .await;

    assert!(clash.is_err());

    // Derived flags come from the row, not stored state
    let now = Utc::now();
    assert!(!invite.is_expired(now));
    assert!(!invite.is_accepted());

    let expired = team_invite::Model {
        expires_at: now - Duration::days(1),
        ..invite
    };
    assert!(expired.is_expired(now));
}

#[tokio::test]
async fn test_cascade_delete_team_removes_members() {
    let db = setup_test_db().await;
    let owner = insert_user(&db, "owner@example.com").await;
    let member = insert_user(&db, "member@example.com").await;

    let team = team::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Ephemeral".to_string()),
        owner_id: Set(owner.id),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(Utc::now()),
    }
    .insert(&db)
    .await
    .expect("Failed to insert team");

    for (user_id, role) in [(owner.id, TeamRole::Owner), (member.id, TeamRole::Member)] {
        team_member::ActiveModel {
            team_id: Set(team.id),
            user_id: Set(user_id),
            role: Set(role),
            joined_at: Set(Utc::now()),
        }
        .insert(&db)
        .await
        .expect("Failed to insert membership");
    }

    team.delete(&db).await.expect("Failed to delete team");

    let remaining = team_member::Entity::find().count(&db).await.expect("count");
    assert_eq!(remaining, 0);
}
