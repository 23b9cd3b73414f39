//! Mock Looker API server.
//!
//! Provides an axum-based HTTP server that simulates the Looker 4.0 API.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::{MockState, SharedState};

/// A mock Looker API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: SharedState,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server that only accepts the default credentials.
    pub async fn start_empty() -> Self {
        Self::with_state(
            MockState::new().with_credentials(Fixtures::CLIENT_ID, Fixtures::CLIENT_SECRET),
        )
        .await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{addr}"),
            handle,
            state: shared_state,
        }
    }

    /// Origin of the server, e.g. `http://127.0.0.1:4242`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// API root to hand to the client builder.
    pub fn api_url(&self) -> String {
        format!("{}/api/", self.url)
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Number of successful logins so far.
    pub async fn login_count(&self) -> u64 {
        self.state.read().await.login_count
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let (client_id, client_secret) = &scenario.credentials;
        let mut state = MockState::new().with_credentials(client_id, client_secret);

        for model_set in scenario.model_sets {
            state = state.with_model_set(model_set);
        }
        for user in scenario.users {
            state = state.with_user(user);
        }
        for (group, members) in scenario.groups {
            state = state.with_group(group, &members);
        }

        state
    }

    /// Create the axum router with all routes.
    pub(crate) fn create_router(state: SharedState) -> Router {
        Router::new()
            // Session routes
            .route("/api/4.0/login", post(handlers::login))
            .route("/api/4.0/logout", delete(handlers::logout))
            .route(
                "/api/4.0/session",
                get(handlers::get_session).patch(handlers::patch_session),
            )
            // Model set routes
            .route(
                "/api/4.0/model_sets",
                get(handlers::list_model_sets).post(handlers::create_model_set),
            )
            .route(
                "/api/4.0/model_sets/:id",
                get(handlers::get_model_set)
                    .patch(handlers::update_model_set)
                    .delete(handlers::delete_model_set),
            )
            // User and group routes
            .route("/api/4.0/users", get(handlers::list_users))
            .route("/api/4.0/users/:id", get(handlers::get_user))
            .route(
                "/api/4.0/groups/:id/users",
                get(handlers::list_group_users).post(handlers::add_group_user),
            )
            .route(
                "/api/4.0/groups/:id/users/:user_id",
                delete(handlers::remove_group_user),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
