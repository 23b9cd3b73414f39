//! E2E tests using the mock Looker server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use lookerapi::mock_server::{Fixtures, MockServer, MockState};
use lookerapi::{
    AuthState, Get, ListParams, LookerClient, LookerConfig, LookerError, ModelSet, Workspace,
};
use secrecy::SecretString;

fn config(server: &MockServer) -> LookerConfig {
    LookerConfig {
        base_url: Some(server.api_url()),
        client_id: Some(Fixtures::CLIENT_ID.to_string()),
        client_secret: Some(SecretString::new(Fixtures::CLIENT_SECRET.to_string())),
    }
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    let result = reqwest::Client::new()
        .get(format!("{url}/health"))
        .send()
        .await;
    assert!(result.is_err());
}

// =============================================================================
// Session Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_connect_and_read_session() {
    let server = MockServer::start().await;

    let client = LookerClient::connect(config(&server)).await.unwrap();
    assert_eq!(client.workspace().await, Some(Workspace::Production));
    assert_eq!(server.login_count().await, 1);

    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let server = MockServer::start().await;
    let mut cfg = config(&server);
    cfg.client_secret = Some(SecretString::new("wrong".to_string()));

    let err = LookerClient::connect(cfg).await.unwrap_err();
    assert!(matches!(err, LookerError::Auth { status_code: Some(404), .. }));
    assert_eq!(server.login_count().await, 0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_dev_connection_against_mock() {
    let server = MockServer::start().await;
    let client = LookerClient::connect(config(&server)).await.unwrap();

    let (dev, session) = client.create_dev_connection().await.unwrap();
    assert_eq!(session.workspace, Workspace::Dev);
    assert_eq!(dev.current_session().await.unwrap().workspace, Workspace::Dev);
    assert_eq!(client.workspace().await, Some(Workspace::Production));
    assert_eq!(server.login_count().await, 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_short_lived_tokens_are_refreshed() {
    let state = MockState::new()
        .with_credentials(Fixtures::CLIENT_ID, Fixtures::CLIENT_SECRET)
        .with_token_lifetime(30)
        .with_model_set(Fixtures::model_set(1, "only", &["thelook"]));
    let server = MockServer::with_state(state).await;
    let client = LookerClient::connect(config(&server)).await.unwrap();

    // 30s is inside the refresh margin, so every call exchanges again
    client.model_sets().list().await.unwrap();
    assert!(server.login_count().await >= 2);
    assert!(matches!(client.auth_state().await, AuthState::Authenticated { .. }));

    server.shutdown().await;
}

// =============================================================================
// Model Set Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_list_walks_every_page() {
    let server = MockServer::start().await;
    let client = LookerClient::connect(config(&server)).await.unwrap();

    let (sets, last) = client
        .model_sets()
        .list_with(&ListParams::with_limit(2))
        .await
        .unwrap();

    let names: Vec<_> = sets.iter().filter_map(|s| s.name.as_deref()).collect();
    assert_eq!(names, ["All", "marketing", "finance", "support", "analysts"]);
    assert_eq!(last.total_count(), Some(5));

    server.shutdown().await;
}

#[tokio::test]
async fn test_model_set_lifecycle() {
    let server = MockServer::start().await;
    let client = LookerClient::connect(config(&server)).await.unwrap();
    let model_sets = client.model_sets();

    // Create
    let (created, _) = model_sets
        .create(&ModelSet::new("ops", ["thelook", "ledger"]))
        .await
        .unwrap();
    let id = created.id.clone().unwrap();
    assert_eq!(created.built_in, Some(false));

    // Duplicate names are rejected with field errors
    let err = model_sets
        .create(&ModelSet::new("ops", ["x"]))
        .await
        .unwrap_err();
    assert!(matches!(err, LookerError::Validation { ref errors, .. } if errors[0].field.as_deref() == Some("name")));

    // Update
    let patch = ModelSet {
        models: Some(["thelook".to_string()].into_iter().collect()),
        ..ModelSet::default()
    };
    let (updated, _) = model_sets.update(id.as_str(), &patch).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("ops"));
    assert_eq!(updated.models.map(|m| m.len()), Some(1));

    // Read back through the trait API
    let (fetched, _) = ModelSet::get(&client, id.clone()).await.unwrap();
    assert_eq!(fetched.id, created.id);

    // Delete, then delete again
    model_sets.delete(id.as_str()).await.unwrap();
    let err = model_sets.delete(id.as_str()).await.unwrap_err();
    assert!(matches!(err, LookerError::NotFound { .. }));

    server.shutdown().await;
}

// =============================================================================
// Group Membership Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_group_membership_workflow() {
    let server = MockServer::start().await;
    let client = LookerClient::connect(config(&server)).await.unwrap();
    let groups = client.groups();

    let (members, _) = groups.list_users("10").await.unwrap();
    assert_eq!(members.len(), 2);

    groups.add_user("10", "3").await.unwrap();
    groups.remove_user("10", "1").await.unwrap();

    let (members, _) = groups.list_users("10").await.unwrap();
    let ids: Vec<_> = members.iter().filter_map(|u| u.id.as_deref()).collect();
    assert_eq!(ids, ["2", "3"]);

    let err = groups.remove_user("10", "1").await.unwrap_err();
    assert!(err.is_not_found());

    server.shutdown().await;
}
