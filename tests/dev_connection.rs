//! Dev-workspace connections against wiremock.

mod common;

use common::*;
use lookerapi::{AuthState, LookerError, Workspace};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_dev_connection_is_independent() {
    let server = MockServer::start().await;
    mount_session(&server, "production").await;

    // Primary gets token-1; the dev sibling gets its own token
    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("primary", 3600)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("dev", 3600)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/4.0/session"))
        .and(header("authorization", "Bearer dev"))
        .and(body_string_contains("dev"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"workspace_id": "dev"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let primary = client(&server);
    primary.login().await.unwrap();
    assert_eq!(primary.current_session().await.unwrap().workspace, Workspace::Production);

    let (dev, session) = primary.create_dev_connection().await.unwrap();
    assert_eq!(session.workspace, Workspace::Dev);
    assert_eq!(dev.workspace().await, Some(Workspace::Dev));

    // Primary session is untouched
    assert_eq!(primary.workspace().await, Some(Workspace::Production));
}

#[tokio::test]
async fn test_dev_connection_failure_leaves_primary_usable() {
    let server = MockServer::start().await;
    mount_session(&server, "production").await;
    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("primary", 3600)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("dev", 3600)))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/4.0/session"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(serde_json::json!({"message": "Dev mode is not allowed"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/model_sets"))
        .and(header("authorization", "Bearer primary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let primary = client(&server);
    primary.login().await.unwrap();

    let err = primary.create_dev_connection().await.unwrap_err();
    match err {
        LookerError::DevSession(inner) => assert_eq!(inner.status_code(), Some(403)),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(matches!(primary.auth_state().await, AuthState::Authenticated { .. }));
    primary.model_sets().list().await.unwrap();
}

#[tokio::test]
async fn test_dev_connection_requires_credentials() {
    let server = MockServer::start().await;
    let client = lookerapi::LookerClient::builder()
        .base_url(&api_root(&server))
        .unwrap()
        .build()
        .unwrap();

    let err = client.create_dev_connection().await.unwrap_err();
    assert!(matches!(err, LookerError::DevSession(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
