//! Mock Looker API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Looker
//! 4.0 API for integration and end-to-end testing. Unlike wiremock, which
//! mocks at the HTTP level per-test, this server keeps state across
//! requests: tokens it issued, the workspace of each session and the
//! entities created or deleted so far.
//!
//! # Example
//!
//! ```ignore
//! use lookerapi::mock_server::{Fixtures, MockServer};
//! use lookerapi::LookerClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = LookerClient::builder()
//!         .base_url(&server.api_url())?
//!         .credentials(Fixtures::CLIENT_ID, SecretString::new(Fixtures::CLIENT_SECRET.to_string()))
//!         .build()?;
//!     client.login().await?;
//!
//!     let (sets, _) = client.model_sets().list().await?;
//!     assert_eq!(sets.len(), 5);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockState, SharedState};
