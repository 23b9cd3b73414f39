//! Looker REST API client library.
//!
//! A typed client for the Looker 4.0 API built around one generic
//! resource layer: every entity type implements [`Resource`] and gets
//! [`List`], [`Get`], [`Create`], [`Update`] and [`Delete`] from it, with
//! authentication, token refresh, pagination and error mapping handled in
//! one place.
//!
//! # Quick Start
//!
//! ```no_run
//! use lookerapi::{LookerClient, LookerConfig, ModelSet};
//!
//! #[tokio::main]
//! async fn main() -> lookerapi::Result<()> {
//!     // Base URL and API3 credentials from the environment
//!     let client = LookerClient::connect(LookerConfig::from_env()).await?;
//!
//!     // Every model set, however many pages it takes
//!     let (model_sets, _) = client.model_sets().list().await?;
//!     println!("Found {} model sets", model_sets.len());
//!
//!     // Create, read back and remove one
//!     let (created, _) = client
//!         .model_sets()
//!         .create(&ModelSet::new("analysts", ["thelook"]))
//!         .await?;
//!     let id = created.id.unwrap_or_default();
//!     let (fetched, _) = client.model_sets().get(id.as_str()).await?;
//!     println!("Fetched {:?}", fetched.name);
//!     client.model_sets().delete(id).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Sessions and workspaces
//!
//! A Looker session is bound to either the `production` or the `dev`
//! workspace. [`LookerClient::current_session`] reports it,
//! [`LookerClient::switch_workspace`] changes it and
//! [`LookerClient::create_dev_connection`] opens an independent client
//! already in `dev`.
//!
//! # Cancellation
//!
//! Attach a [`Context`] with [`LookerClient::with_context`] to bound every
//! call by a cancellation token or deadline.
//!
//! # Configuration
//!
//! [`LookerConfig::from_env`] reads:
//!
//! - `LOOKER_BASE_URL` - API root, e.g. `https://example.looker.com:19999/api/`
//! - `LOOKER_API_CLIENT_ID` - API3 client id
//! - `LOOKER_API_CLIENT_SECRET` - API3 client secret

mod auth;
mod client;
mod config;
mod context;
mod error;
mod models;
mod ops;
mod pagination;
mod response;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use auth::{AuthState, Credentials, Session, Workspace, REFRESH_MARGIN_SECS};
pub use client::LookerClient;
pub use config::{
    ClientBuilder, ClientConfig, LookerConfig, API_VERSION, ENV_BASE_URL, ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
};
pub use context::Context;
pub use error::{FieldError, LookerError, Result};
pub use ops::ResourceOps;
pub use pagination::{ListParams, Page, PageLinks, Paginator};
pub use response::Response;

// Re-export traits
pub use traits::{Capabilities, Create, Delete, Get, List, Operation, Resource, Update};

// Re-export models
pub use models::{
    DbConnection, Group, GroupIdForGroupUserInclusion, LookmlModel, ModelSet, PermissionSet,
    Project, Role, User, WorkspaceDetail, WorkspaceProject,
};

// Cancellation tokens accepted by `Context`
pub use tokio_util::sync::CancellationToken;

// HTTP method taken by `LookerClient::request_json`
pub use reqwest::Method;
