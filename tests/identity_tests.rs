//! Integration tests for accounts, sessions, seeding and export.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use softbuy::db::Store;
use softbuy::domain::{Actor, FixedClock, Role, UserId};
use softbuy::models::NewUser;
use softbuy::services::{AuthError, export_snapshot, seed_demo_data, write_export};
use softbuy::state::SharedState;

async fn spawn_state(seed: bool) -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("softbuy-identity-test-{}.db", uuid::Uuid::new_v4()));
    let store = Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("Failed to open store");

    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 23, 12, 0, 0).unwrap(),
    ));
    if seed {
        seed_demo_data(&store, clock.as_ref())
            .await
            .expect("Failed to seed demo data");
    }

    SharedState::with_clock(store, clock)
}

fn sidorova() -> NewUser {
    NewUser {
        last_name: "Сидорова".to_string(),
        first_name: "Анна".to_string(),
        middle_name: Some("  ".to_string()),
        email: "sidorova@example.com".to_string(),
        login: "anna_s".to_string(),
        phone: Some("+7 900 000-00-00".to_string()),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
        subscribe_news: true,
    }
}

#[tokio::test]
async fn test_register_then_login() {
    let state = spawn_state(true).await;

    let user = state.identity.register(sidorova()).await.unwrap();
    assert_eq!(user.role, Role::User);
    assert!(user.password.is_empty());
    assert_eq!(user.middle_name, None);
    assert_eq!(
        user.id.value(),
        Utc.with_ymd_and_hms(2024, 3, 23, 12, 0, 0)
            .unwrap()
            .timestamp_millis()
    );

    let logged_in = state.identity.login("anna_s", "secret1").await.unwrap();
    assert_eq!(logged_in.id, user.id);

    let current = state.identity.current_user().await.unwrap().unwrap();
    assert_eq!(current.login, "anna_s");
    assert!(current.password.is_empty());
}

#[tokio::test]
async fn test_register_conflicts() {
    let state = spawn_state(true).await;

    let taken_login = NewUser {
        login: "petrov".to_string(),
        ..sidorova()
    };
    assert!(matches!(
        state.identity.register(taken_login).await.unwrap_err(),
        AuthError::Conflict(msg) if msg.contains("login")
    ));

    let taken_email = NewUser {
        email: "ivanov@example.com".to_string(),
        ..sidorova()
    };
    assert!(matches!(
        state.identity.register(taken_email).await.unwrap_err(),
        AuthError::Conflict(msg) if msg.contains("email")
    ));
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let state = spawn_state(false).await;

    let input = NewUser {
        login: "a!".to_string(),
        confirm_password: "other".to_string(),
        ..sidorova()
    };
    let err = state.identity.register(input).await.unwrap_err();
    let AuthError::Validation(msg) = err else {
        panic!("expected validation error");
    };
    assert!(msg.contains("login"));
    assert!(msg.contains("confirmPassword"));
    assert!(state.identity.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_failures() {
    let state = spawn_state(true).await;

    assert!(matches!(
        state.identity.login("admin", "wrong").await.unwrap_err(),
        AuthError::InvalidCredentials
    ));
    assert!(matches!(
        state.identity.login("nobody", "admin").await.unwrap_err(),
        AuthError::InvalidCredentials
    ));
    assert!(matches!(
        state.identity.login("", "").await.unwrap_err(),
        AuthError::Validation(_)
    ));
    assert!(state.identity.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_logout_clears_session() {
    let state = spawn_state(true).await;

    let admin = state.identity.login("admin", "admin").await.unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert!(state.session_actor().await.unwrap().unwrap().is_admin());

    assert!(state.identity.logout().await.unwrap());
    assert!(state.session_actor().await.unwrap().is_none());
    assert!(!state.identity.logout().await.unwrap());
}

#[tokio::test]
async fn test_seed_runs_once() {
    let state = spawn_state(false).await;

    assert!(seed_demo_data(&state.store, state.clock.as_ref()).await.unwrap());
    state.store.save_requests(&[]).await.unwrap();

    assert!(!seed_demo_data(&state.store, state.clock.as_ref()).await.unwrap());
    assert!(state.store.load_requests().await.unwrap().is_empty());
    assert_eq!(state.store.load_users().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_export_strips_passwords() {
    let state = spawn_state(true).await;

    let admin = Actor::admin(UserId::new(1));
    let export = export_snapshot(&state.store, state.clock.as_ref(), Some(&admin))
        .await
        .unwrap();
    assert_eq!(export.users.len(), 3);
    assert_eq!(export.requests.len(), 4);
    assert!(export.users.iter().all(|u| u.password.is_empty()));

    let path =
        std::env::temp_dir().join(format!("softbuy-export-test-{}.json", uuid::Uuid::new_v4()));
    let written = write_export(&export, Some(path.as_path())).await.unwrap();
    assert_eq!(written, path);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["users"].as_array().unwrap().len(), 3);
    assert!(json["users"][0].get("password").is_none());
    assert!(json["exportDate"].as_str().unwrap().starts_with("2024-03-23"));

    std::fs::remove_file(path).ok();
}
