//! Shared wiremock helpers for the integration tests.

#![allow(dead_code)]

use lookerapi::LookerClient;
use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const CLIENT_ID: &str = "api3-client";
pub const CLIENT_SECRET: &str = "api3-secret";

pub fn api_root(server: &MockServer) -> String {
    format!("{}/api/", server.uri())
}

pub fn token_body(token: &str, expires_in: u64) -> serde_json::Value {
    serde_json::json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in,
    })
}

/// Accept any credentials at `/login`.
pub async fn mount_login(server: &MockServer, expires_in: u64) {
    Mock::given(method("POST"))
        .and(path("/api/4.0/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("token-1", expires_in)))
        .mount(server)
        .await;
}

pub async fn mount_session(server: &MockServer, workspace: &str) {
    Mock::given(method("GET"))
        .and(path("/api/4.0/session"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"workspace_id": workspace})),
        )
        .mount(server)
        .await;
}

/// A client pointed at `server`, holding credentials but not logged in.
pub fn client(server: &MockServer) -> LookerClient {
    LookerClient::builder()
        .base_url(&api_root(server))
        .unwrap()
        .credentials(CLIENT_ID, SecretString::new(CLIENT_SECRET.to_string()))
        .build()
        .unwrap()
}

/// A client that has completed the credential exchange.
pub async fn logged_in(server: &MockServer) -> LookerClient {
    mount_login(server, 3600).await;
    let client = client(server);
    client.login().await.unwrap();
    client
}

/// Requests the server received on `path`.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

pub fn model_set_json(id: u32, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id.to_string(),
        "name": name,
        "built_in": false,
        "all_access": false,
        "models": ["thelook"],
    })
}
