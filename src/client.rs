//! Looker API client.
//!
//! Low-level HTTP engine plus the facade that hands out one operation set per
//! resource type. Every request goes through one `execute` path, which
//! asks the session manager for a bearer token, runs under the client's
//! [`Context`] and maps non-2xx responses to typed errors.

use std::sync::Arc;

use reqwest::header::USER_AGENT;
use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::auth::{Credentials, SessionManager};
use crate::config::{ClientBuilder, ClientConfig, LookerConfig};
use crate::context::Context;
use crate::error::{LookerError, Result};
use crate::models::{
    DbConnection, Group, LookmlModel, ModelSet, PermissionSet, Project, Role, User,
    WorkspaceDetail,
};
use crate::ops::ResourceOps;
use crate::response::Response;

/// Looker API client.
///
/// Cheaply cloneable; clones share the connection pool, the configuration
/// and the authenticated session.
///
/// # Example
///
/// ```no_run
/// use lookerapi::{LookerClient, LookerConfig};
///
/// # async fn example() -> lookerapi::Result<()> {
/// let client = LookerClient::connect(LookerConfig::from_env()).await?;
/// let (model_sets, _) = client.model_sets().list().await?;
/// println!("{} model sets", model_sets.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LookerClient {
    pub(crate) inner: Arc<Inner>,
    pub(crate) ctx: Context,
}

pub(crate) struct Inner {
    pub(crate) config: ClientConfig,
    pub(crate) auth: SessionManager,
}

impl std::fmt::Debug for LookerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookerClient")
            .field("base_url", &self.inner.config.base_url.as_str())
            .field("user_agent", &self.inner.config.user_agent)
            .finish_non_exhaustive()
    }
}

impl LookerClient {
    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Build, authenticate and validate the session in one go.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::InvalidConfig`] for incomplete configuration,
    /// [`LookerError::Auth`] if the credentials are rejected and
    /// [`LookerError::UnknownWorkspace`] if the session is bound to neither
    /// `production` nor `dev`.
    pub async fn connect(config: LookerConfig) -> Result<Self> {
        let (base_url, credentials) = config.into_parts()?;
        let client = ClientBuilder::new()
            .base_url(&base_url)?
            .with_credentials(credentials)
            .build()?;

        client.login().await?;
        let session = client.current_session().await?;
        tracing::debug!(workspace = %session.workspace, "connected to Looker");
        Ok(client)
    }

    pub(crate) fn from_parts(config: ClientConfig, credentials: Option<Credentials>) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                auth: SessionManager::new(credentials),
            }),
            ctx: Context::background(),
        }
    }

    /// A handle sharing this client's session whose calls run under `ctx`.
    #[must_use]
    pub fn with_context(&self, ctx: Context) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ctx,
        }
    }

    /// Context governing this handle's calls.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Transport configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.config.base_url
    }

    // Resource operation sets

    pub fn users(&self) -> ResourceOps<'_, User> {
        ResourceOps::new(self)
    }

    pub fn groups(&self) -> ResourceOps<'_, Group> {
        ResourceOps::new(self)
    }

    pub fn roles(&self) -> ResourceOps<'_, Role> {
        ResourceOps::new(self)
    }

    pub fn permission_sets(&self) -> ResourceOps<'_, PermissionSet> {
        ResourceOps::new(self)
    }

    pub fn model_sets(&self) -> ResourceOps<'_, ModelSet> {
        ResourceOps::new(self)
    }

    pub fn connections(&self) -> ResourceOps<'_, DbConnection> {
        ResourceOps::new(self)
    }

    pub fn projects(&self) -> ResourceOps<'_, Project> {
        ResourceOps::new(self)
    }

    pub fn lookml_models(&self) -> ResourceOps<'_, LookmlModel> {
        ResourceOps::new(self)
    }

    pub fn workspaces(&self) -> ResourceOps<'_, WorkspaceDetail> {
        ResourceOps::new(self)
    }

    // Request engine

    /// Make a GET request.
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::GET, url, |req| req).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_query<Q: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::GET, url, |req| req.query(query)).await
    }

    /// GET an absolute URL, e.g. a pagination link.
    pub async fn get_url(&self, url: Url) -> Result<Response> {
        self.execute(Method::GET, url, |req| req).await
    }

    /// Make a POST request with JSON body.
    pub async fn post<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::POST, url, |req| req.json(body)).await
    }

    /// Make a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::POST, url, |req| req).await
    }

    /// Make a PATCH request with JSON body.
    pub async fn patch<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::PATCH, url, |req| req.json(body)).await
    }

    /// Make a PUT request with JSON body.
    pub async fn put<B: Serialize + ?Sized + Sync>(&self, path: &str, body: &B) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::PUT, url, |req| req.json(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.url_for(path)?;
        self.execute(Method::DELETE, url, |req| req).await
    }

    /// Issue a request and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Decode`] if the body does not match `T`, plus
    /// any error the request itself produces.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(T, Response)> {
        let url = self.url_for(path)?;
        let response = match body {
            Some(body) => self.execute(method, url, |req| req.json(body)).await?,
            None => self.execute(method, url, |req| req).await?,
        };
        let value = response.json()?;
        Ok((value, response))
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        Ok(self.inner.config.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Issue one request.
    ///
    /// Attaches the bearer token and user agent, reads the whole body under
    /// the client's context and maps non-2xx statuses to errors. Never
    /// retries.
    #[tracing::instrument(skip(self, url, build), fields(url = %url))]
    async fn execute<F>(&self, method: Method, url: Url, build: F) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder + Send,
    {
        let config = &self.inner.config;
        let token = self.inner.auth.bearer_token(config, &self.ctx).await?;

        let request = build(config.http.request(method, url))
            .bearer_auth(token.expose_secret())
            .header(USER_AGENT, &config.user_agent);

        let response = self
            .ctx
            .run(async {
                let raw = request.send().await.map_err(LookerError::Transport)?;
                Response::read(raw).await
            })
            .await??;

        tracing::debug!(status = %response.status(), "response received");
        response.error_for_status()
    }
}
