//! Integration tests for user, client, project and shotlist repositories.

use callsheet_core::types::DbId;
use callsheet_db::models::client::{CreateClient, UpdateClient};
use callsheet_db::models::project::{CreateProject, ProjectStatus, UpdateProject};
use callsheet_db::models::session::CreateSession;
use callsheet_db::models::shotlist::CreateShotlist;
use callsheet_db::models::user::CreateUser;
use callsheet_db::repositories::{
    ClientRepo, ProjectRepo, SessionRepo, ShotlistRepo, UserRepo,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;

fn new_user(username: &str) -> CreateUser {
    CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: Some("Test User".to_string()),
        password_hash: "not-a-real-hash".to_string(),
    }
}

async fn active_sessions(pool: &PgPool, user_id: DbId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_sessions
         WHERE user_id = $1 AND is_revoked = false AND expires_at > NOW()",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

fn new_project(name: &str, client_id: Option<DbId>) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        client_id,
        description: None,
        production_company: None,
        director: None,
        producer: None,
        status: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_lookup_by_username_or_email(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("gaffer")).await.unwrap();

    let by_name = UserRepo::find_by_login(&pool, "gaffer").await.unwrap().unwrap();
    assert_eq!(by_name.id, user.id);
    let by_email = UserRepo::find_by_login(&pool, "gaffer@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, user.id);

    assert!(UserRepo::exists(&pool, "gaffer", "other@example.com").await.unwrap());
    assert!(!UserRepo::exists(&pool, "grip", "grip@example.com").await.unwrap());

    UserRepo::record_login(&pool, user.id).await.unwrap();
    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_username_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, &new_user("gaffer")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("gaffer")).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_token_redeems_once(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("gaffer")).await.unwrap();
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "abc123".to_string(),
            expires_at: Utc::now() + Duration::days(1),
            user_agent: Some("callsheet-test".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(active_sessions(&pool, user.id).await, 1);

    let redeemed = SessionRepo::redeem(&pool, "abc123").await.unwrap().unwrap();
    assert_eq!(redeemed.id, session.id);
    assert!(redeemed.is_revoked);
    assert_eq!(redeemed.user_agent.as_deref(), Some("callsheet-test"));

    assert!(SessionRepo::redeem(&pool, "abc123").await.unwrap().is_none());
    assert_eq!(active_sessions(&pool, user.id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_refresh_token_cannot_be_redeemed(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("gaffer")).await.unwrap();
    SessionRepo::create(
        &pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: "stale".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
            user_agent: None,
        },
    )
    .await
    .unwrap();

    assert!(SessionRepo::redeem(&pool, "stale").await.unwrap().is_none());
    assert_eq!(active_sessions(&pool, user.id).await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_revoke_all_for_user_only_touches_that_user(pool: PgPool) {
    let gaffer = UserRepo::create(&pool, &new_user("gaffer")).await.unwrap();
    let grip = UserRepo::create(&pool, &new_user("grip")).await.unwrap();
    for (user_id, hash) in [(gaffer.id, "g1"), (gaffer.id, "g2"), (grip.id, "k1")] {
        SessionRepo::create(
            &pool,
            &CreateSession {
                user_id,
                refresh_token_hash: hash.to_string(),
                expires_at: Utc::now() + Duration::days(1),
                user_agent: None,
            },
        )
        .await
        .unwrap();
    }

    assert_eq!(SessionRepo::revoke_all_for_user(&pool, gaffer.id).await.unwrap(), 2);
    assert_eq!(active_sessions(&pool, gaffer.id).await, 0);
    assert_eq!(active_sessions(&pool, grip.id).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_client_crud_and_cascade(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("producer")).await.unwrap();
    let client = ClientRepo::create(
        &pool,
        user.id,
        &CreateClient {
            name: "Acme Films".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let updated = ClientRepo::update(
        &pool,
        client.id,
        &UpdateClient {
            name: None,
            description: Some("Commercials".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Acme Films");
    assert_eq!(updated.description.as_deref(), Some("Commercials"));

    let project = ProjectRepo::create(&pool, user.id, &new_project("Spot", Some(client.id)))
        .await
        .unwrap();
    assert_eq!(
        ProjectRepo::list_by_client(&pool, client.id).await.unwrap().len(),
        1
    );

    assert!(ClientRepo::delete(&pool, client.id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_project_defaults_filters_and_update(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("director")).await.unwrap();
    let other = UserRepo::create(&pool, &new_user("someone")).await.unwrap();
    let client = ClientRepo::create(
        &pool,
        user.id,
        &CreateClient {
            name: "Acme".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();

    let standalone = ProjectRepo::create(&pool, user.id, &new_project("Short", None))
        .await
        .unwrap();
    assert_eq!(standalone.status, ProjectStatus::PreProduction);
    ProjectRepo::create(&pool, user.id, &new_project("Ad", Some(client.id)))
        .await
        .unwrap();
    ProjectRepo::create(&pool, other.id, &new_project("Theirs", None))
        .await
        .unwrap();

    let mine = ProjectRepo::list_by_user(&pool, user.id, None, 100, 0).await.unwrap();
    assert_eq!(mine.len(), 2);
    let for_client = ProjectRepo::list_by_user(&pool, user.id, Some(client.id), 100, 0)
        .await
        .unwrap();
    assert_eq!(for_client.len(), 1);
    assert_eq!(for_client[0].name, "Ad");

    let updated = ProjectRepo::update(
        &pool,
        standalone.id,
        &UpdateProject {
            name: None,
            client_id: None,
            description: None,
            production_company: None,
            director: Some("R. Deakins".to_string()),
            producer: None,
            status: Some(ProjectStatus::Production),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, ProjectStatus::Production);
    assert_eq!(updated.director.as_deref(), Some("R. Deakins"));
    assert_eq!(updated.name, "Short");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_shotlist_owner_and_cascade(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("ad")).await.unwrap();
    let project = ProjectRepo::create(&pool, user.id, &new_project("Feature", None))
        .await
        .unwrap();
    let shotlist = ShotlistRepo::create(
        &pool,
        project.id,
        &CreateShotlist {
            name: "Day 1".to_string(),
            shooting_date: None,
            call_time: None,
            wrap_time: None,
            location: Some("Stage 4".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(
        ShotlistRepo::find_owner_id(&pool, shotlist.id).await.unwrap(),
        Some(user.id)
    );
    assert_eq!(
        ShotlistRepo::list_by_project(&pool, project.id, 100, 0)
            .await
            .unwrap()
            .len(),
        1
    );

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ShotlistRepo::find_by_id(&pool, shotlist.id).await.unwrap().is_none());
    assert_eq!(ShotlistRepo::find_owner_id(&pool, shotlist.id).await.unwrap(), None);
}
