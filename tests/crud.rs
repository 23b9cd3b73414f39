//! CRUD contract and sub-resources against wiremock.

mod common;

use common::*;
use lookerapi::{
    Capabilities, Create, Get, LookerError, ModelSet, Project, Resource, WorkspaceDetail,
};
use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_model_set() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/model_sets/3"))
        .and(header("authorization", "Bearer token-1"))
        .and(header_regex("user-agent", "^lookerapi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_set_json(3, "finance")))
        .expect(1)
        .mount(&server)
        .await;

    let (set, response) = client.model_sets().get("3").await.unwrap();
    assert_eq!(set.name.as_deref(), Some("finance"));
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/model_sets/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not found"})),
        )
        .mount(&server)
        .await;

    let err = client.model_sets().get("404").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        LookerError::NotFound { entity_type: "ModelSet", ref id } if id == "404"
    ));
}

#[tokio::test]
async fn test_create_sends_only_set_fields() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/4.0/model_sets"))
        .and(body_json(serde_json::json!({"name": "ops", "models": ["thelook"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_set_json(9, "ops")))
        .expect(1)
        .mount(&server)
        .await;

    let (created, _) = client
        .model_sets()
        .create(&ModelSet::new("ops", ["thelook"]))
        .await
        .unwrap();
    assert_eq!(created.id.as_deref(), Some("9"));
}

#[tokio::test]
async fn test_update_uses_patch() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/api/4.0/model_sets/9"))
        .and(body_json(serde_json::json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_set_json(9, "renamed")))
        .expect(1)
        .mount(&server)
        .await;

    let patch = ModelSet {
        name: Some("renamed".to_string()),
        ..ModelSet::default()
    };
    let (updated, _) = client.model_sets().update("9", &patch).await.unwrap();
    assert_eq!(updated.name.as_deref(), Some("renamed"));
}

#[tokio::test]
async fn test_validation_errors_are_typed() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/4.0/model_sets"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "message": "Validation Failed",
            "errors": [{"field": "name", "code": "already_exists", "message": "Name is taken"}],
            "documentation_url": "https://cloud.google.com/looker/docs/r/api/4.0"
        })))
        .mount(&server)
        .await;

    let err = client
        .model_sets()
        .create(&ModelSet::new("dup", ["a"]))
        .await
        .unwrap_err();
    match err {
        LookerError::Validation { message, errors } => {
            assert_eq!(message, "Validation Failed");
            assert_eq!(errors[0].code.as_deref(), Some("already_exists"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/4.0/model_sets/5"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/4.0/model_sets/5"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"message": "Not found"})),
        )
        .mount(&server)
        .await;

    let response = client.model_sets().delete("5").await.unwrap();
    assert_eq!(response.status(), 204);

    let err = client.model_sets().delete("5").await.unwrap_err();
    assert!(matches!(err, LookerError::NotFound { entity_type: "ModelSet", .. }));
}

#[tokio::test]
async fn test_server_errors_keep_status_and_path() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/users"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = client.users().list().await.unwrap_err();
    assert!(err.is_retryable());
    match err {
        LookerError::Api {
            status_code,
            message,
            path,
        } => {
            assert_eq!(status_code, 429);
            assert_eq!(message, "slow down");
            assert_eq!(path, "/api/4.0/users");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Unsupported operations never reach the network
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct Sealed {
    id: String,
}

impl Resource for Sealed {
    type Id = String;
    const NAME: &'static str = "Sealed";
    const PATH: &'static str = "sealed";
    const CAPABILITIES: Capabilities = Capabilities::NONE;
}

#[tokio::test]
async fn test_unsupported_operations_fail_locally() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    let err = WorkspaceDetail::create(&client, &WorkspaceDetail::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LookerError::Unimplemented { entity_type: "Workspace", operation: "create" }
    ));

    let err = client.projects().delete("thelook").await.unwrap_err();
    assert!(matches!(
        err,
        LookerError::Unimplemented { entity_type: "Project", operation: "delete" }
    ));

    let err = Sealed::get(&client, "1".to_string()).await.unwrap_err();
    assert!(matches!(err, LookerError::Unimplemented { operation: "get", .. }));

    // Only the login ever hit the server
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// =============================================================================
// Sub-resources
// =============================================================================

#[tokio::test]
async fn test_group_membership() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/4.0/groups/10/users"))
        .and(body_json(serde_json::json!({"user_id": "2"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "2", "email": "grace@example.com"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/4.0/groups/10/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "1", "email": "ada@example.com"},
            {"id": "2", "email": "grace@example.com"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/4.0/groups/10/users/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let groups = client.groups();
    let (added, _) = groups.add_user("10", "2").await.unwrap();
    assert_eq!(added.email.as_deref(), Some("grace@example.com"));

    let (members, _) = groups.list_users("10").await.unwrap();
    assert_eq!(members.len(), 2);

    groups.remove_user("10", "2").await.unwrap();
}

#[tokio::test]
async fn test_role_groups_are_replaced_with_put() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("PUT"))
        .and(path("/api/4.0/roles/3/groups"))
        .and(body_json(serde_json::json!(["10", "11"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": "10", "name": "Analysts"},
            {"id": "11", "name": "Admins"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (groups, _) = client
        .roles()
        .set_groups("3", &["10".to_string(), "11".to_string()])
        .await
        .unwrap();
    let names: Vec<_> = groups.iter().filter_map(|g| g.name.as_deref()).collect();
    assert_eq!(names, ["Analysts", "Admins"]);
}

#[tokio::test]
async fn test_project_deploy_key_is_plain_text() {
    let server = MockServer::start().await;
    let client = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/4.0/projects/thelook/git/deploy_key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("ssh-rsa AAAAB3Nza looker"),
        )
        .mount(&server)
        .await;

    let (key, _) = client.projects().deploy_key("thelook").await.unwrap();
    assert!(key.starts_with("ssh-rsa "));

    // Project capabilities still allow get
    assert!(Project::CAPABILITIES.get);
}
