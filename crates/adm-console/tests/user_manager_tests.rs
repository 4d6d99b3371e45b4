use adm_console::{
    ConsoleError, FormMode, LoadState, ModalPhase, Severity, UserForm, UserManager,
};
use std::time::Duration;

use adm_store::RecordId;
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{MockStore, closed_port_url, console_for, drain, seed};

fn new_user_form() -> UserForm {
    UserForm {
        name: "Cleo Park".to_string(),
        email: "cleo@x.com".to_string(),
        gender: "Female".to_string(),
        category: "Employee".to_string(),
    }
}

async fn loaded_manager(store: &MockStore) -> UserManager {
    let (state, _rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.expect("Initial load should succeed");
    users
}

#[tokio::test]
async fn test_reload_dedupes_last_wins() {
    let store = MockStore::start(json!({
        "users": [
            {"id": 1, "name": "A", "email": "a@x.com"},
            {"id": 2, "name": "B", "email": "b@x.com"},
            {"id": 1, "name": "C", "email": "c@x.com"}
        ]
    }))
    .await;
    let users = loaded_manager(&store).await;

    let names: Vec<&str> = users.records().iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B"]);
    assert_eq!(users.load_state(), &LoadState::Loaded);
}

#[tokio::test]
async fn test_reload_failure_clears_collection() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    let snapshots = users.subscribe();

    users.reload().await.expect("Initial load should succeed");
    assert_eq!(users.records().len(), 2);
    assert_eq!(snapshots.borrow().len(), 2);

    store.fail(Method::GET, StatusCode::INTERNAL_SERVER_ERROR);
    let err = users.reload().await.expect_err("Reload should fail");

    assert!(matches!(err, ConsoleError::Load { .. }));
    assert!(users.records().is_empty());
    assert!(snapshots.borrow().is_empty());
    assert!(matches!(users.load_state(), LoadState::Failed(_)));

    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].severity, Severity::Error);
    assert_eq!(
        notifications[0].message,
        "Failed to load users: Load users failed: 500 - Internal Server Error. \
         Please check if the server is running."
    );
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let (state, mut rx) = console_for(&closed_port_url().await);
    let mut users = state.user_manager();

    let err = users.reload().await.expect_err("Reload should fail");

    assert!(err.is_transport());
    assert!(users.records().is_empty());
    assert!(drain(&mut rx)[0].is_error());
}

#[tokio::test]
async fn test_empty_collection_loads() {
    let store = MockStore::start(json!({"users": []})).await;
    let users = loaded_manager(&store).await;

    assert!(users.records().is_empty());
    assert_eq!(users.load_state(), &LoadState::Loaded);
}

#[tokio::test]
async fn test_create_user() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();

    users.open_create();
    *users.form_mut().unwrap() = new_user_form();
    users.submit().await.expect("Create should succeed");

    let posts = store.requests_with(Method::POST);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].body,
        Some(json!({
            "name": "Cleo Park",
            "email": "cleo@x.com",
            "gender": "Female",
            "category": "Employee"
        }))
    );

    assert!(users.modal().is_none());
    assert_eq!(users.records().len(), 3);
    assert!(users.records().iter().any(|u| u.email == "cleo@x.com"));

    let notifications = drain(&mut rx);
    assert_eq!(notifications.last().unwrap().message, "User saved successfully.");
}

#[tokio::test]
async fn test_duplicate_email_blocks_create() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;
    store.clear_requests();

    users.open_create();
    *users.form_mut().unwrap() = UserForm {
        email: "A@X.com".to_string(),
        ..new_user_form()
    };
    let err = users.submit().await.expect_err("Duplicate email should be rejected");

    let fields = err.field_errors().expect("Should be a validation error");
    assert_eq!(fields.get("email"), Some("User with this email already exists"));
    assert!(store.requests().is_empty(), "No request may be sent");

    let modal = users.modal().expect("Form should stay open");
    assert_eq!(modal.phase, ModalPhase::Editing);
    assert!(modal.errors.contains("email"));
}

#[tokio::test]
async fn test_edit_merges_over_stored_record() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    users.open_edit(&RecordId::Number(1));
    let form = users.form_mut().expect("Form should be open");
    assert_eq!(form.name, "Ann", "Form is pre-filled from the cache");
    form.name = "Ann Marie".to_string();

    users.submit().await.expect("Update should succeed");

    let lookups = store.requests_with(Method::GET);
    assert!(lookups.iter().any(|r| r.query.get("id").map(String::as_str) == Some("1")));

    let puts = store.requests_with(Method::PUT);
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/users/1");

    let body = puts[0].body.as_ref().unwrap();
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["name"], "Ann Marie");
    assert_eq!(body["nickname"], "annie");
    assert_eq!(body["createdAt"], "2025-08-01T12:00:00.000Z");

    assert_eq!(users.find(&RecordId::Number(1)).unwrap().name, "Ann Marie");
}

#[tokio::test]
async fn test_edit_of_vanished_record_creates_it() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();
    store.clear_requests();

    users.open_edit(&RecordId::Number(42));
    assert_eq!(users.modal().unwrap().mode, FormMode::Edit(RecordId::Number(42)));
    *users.form_mut().unwrap() = new_user_form();

    users.submit().await.expect("Fallback create should succeed");

    let methods: Vec<Method> = store.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::POST, Method::GET]);
    assert_eq!(store.records("users").len(), 3);
    assert_eq!(
        drain(&mut rx).last().unwrap().message,
        "User saved successfully."
    );
}

#[tokio::test]
async fn test_failed_update_keeps_form_open() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();

    users.open_edit(&RecordId::Number(2));
    store.fail(Method::PUT, StatusCode::INTERNAL_SERVER_ERROR);
    let err = users.submit().await.expect_err("Update should fail");

    assert_eq!(err.to_string(), "Update failed: 500 - Internal Server Error");
    let modal = users.modal().expect("Form should stay open");
    assert!(matches!(modal.phase, ModalPhase::SaveError(_)));

    let notifications = drain(&mut rx);
    assert_eq!(
        notifications.last().unwrap().message,
        "Failed to save user: Update failed: 500 - Internal Server Error. Please try again."
    );
}

#[tokio::test]
async fn test_failed_lookup_reports_lookup() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    users.open_edit(&RecordId::Number(2));
    store.fail(Method::GET, StatusCode::BAD_GATEWAY);
    let err = users.submit().await.expect_err("Lookup should fail");

    assert!(matches!(err, ConsoleError::Lookup(_)));
    assert!(store.requests_with(Method::PUT).is_empty());
}

#[tokio::test]
async fn test_delete_user() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();

    users.delete(&RecordId::Number(2)).await.expect("Delete should succeed");

    let deletes = store.requests_with(Method::DELETE);
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, "/users/2");
    assert_eq!(users.records().len(), 1);
    assert_eq!(
        drain(&mut rx).last().unwrap().message,
        "User deleted successfully."
    );
}

#[tokio::test]
async fn test_delete_race_counts_as_success() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();
    store.vanish_on_delete(true);

    users.delete(&RecordId::Number(1)).await.expect("404 on DELETE is accepted");

    assert_eq!(users.records().len(), 1);
    let notifications = drain(&mut rx);
    assert_eq!(notifications.last().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn test_delete_absent_record_sends_no_delete() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    users.delete(&RecordId::from("nope")).await.expect("Absent record is fine");

    assert!(store.requests_with(Method::DELETE).is_empty());
}

#[tokio::test]
async fn test_delete_failure_is_notified() {
    let store = MockStore::start(seed()).await;
    let (state, mut rx) = store.console();
    let mut users = state.user_manager();
    users.reload().await.unwrap();

    store.fail(Method::DELETE, StatusCode::INTERNAL_SERVER_ERROR);
    let err = users.delete(&RecordId::Number(1)).await.expect_err("Delete should fail");

    assert!(matches!(err, ConsoleError::Write { .. }));
    assert_eq!(users.records().len(), 2, "Collection untouched");
    assert_eq!(
        drain(&mut rx).last().unwrap().message,
        "Failed to delete user: Delete failed: 500 - Internal Server Error. Please try again."
    );
}

#[tokio::test]
async fn test_submit_without_form() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    assert!(matches!(
        users.submit().await,
        Err(ConsoleError::NoOpenForm)
    ));
}

#[tokio::test]
async fn test_abandoned_save_returns_to_editing() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    users.open_edit(&RecordId::Number(2));
    users.form_mut().unwrap().name = "Bobby Tables".to_string();

    store.stall(Some(Method::PUT));
    let abandoned = tokio::time::timeout(Duration::from_millis(200), users.submit()).await;
    assert!(abandoned.is_err(), "Stalled save should time out");

    let modal = users.modal().expect("Form stays open");
    assert_eq!(modal.phase, ModalPhase::Editing);
    assert_eq!(modal.form.name, "Bobby Tables");
    assert_eq!(users.find(&RecordId::Number(2)).unwrap().name, "Bob");

    store.stall(None);
    users.submit().await.expect("Retry should succeed");
    assert_eq!(users.find(&RecordId::Number(2)).unwrap().name, "Bobby Tables");
}

#[tokio::test]
async fn test_abandoned_reload_keeps_previous_state() {
    let store = MockStore::start(seed()).await;
    let mut users = loaded_manager(&store).await;

    store.stall(Some(Method::GET));
    let abandoned = tokio::time::timeout(Duration::from_millis(200), users.reload()).await;
    assert!(abandoned.is_err(), "Stalled reload should time out");

    assert_eq!(users.load_state(), &LoadState::Loaded);
    assert_eq!(users.records().len(), 2);
}
