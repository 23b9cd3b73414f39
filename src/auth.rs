//! OAuth2 credential exchange and session state.
//!
//! Looker's API3 credentials are exchanged at `4.0/login` for a short-lived
//! bearer token. [`SessionManager`] owns that token: it is the only component
//! that knows the validity window, refreshes the token before it expires and
//! serialises refreshes so concurrent callers trigger a single exchange.
//!
//! ```text
//! Unauthenticated ──authenticate──▶ Authenticated ◀──▶ (refreshing)
//!        │                               │
//!        └──────── rejected ─────────▶ Failed ◀── unknown workspace
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use reqwest::header::USER_AGENT;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::client::LookerClient;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{LookerError, Result};
use crate::response::api_message;

/// Tokens expiring within this many seconds are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Upper bound applied to the server's `expires_in`.
const MAX_TOKEN_LIFETIME_SECS: i64 = 60 * 60 * 24 * 365;

pub(crate) const LOGIN_PATH: &str = "4.0/login";
pub(crate) const LOGOUT_PATH: &str = "4.0/logout";
pub(crate) const SESSION_PATH: &str = "4.0/session";

/// API3 client credentials.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(client_id: String, client_secret: SecretString) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

/// The Looker workspace a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workspace {
    Production,
    Dev,
}

impl Workspace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Workspace {
    type Err = LookerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "production" => Ok(Self::Production),
            "dev" => Ok(Self::Dev),
            other => Err(LookerError::UnknownWorkspace(other.to_string())),
        }
    }
}

/// Read-only view of the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub workspace: Workspace,
    pub sudo_user_id: Option<String>,
    /// Expiry of the bearer token backing this session.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Externally visible authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { expires_at: DateTime<Utc> },
    Failed { reason: String },
}

/// Body of `GET`/`PATCH 4.0/session`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo_user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    expires_in: u64,
}

struct BearerToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl BearerToken {
    fn expires_within(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }
}

/// Errors that poison the manager until the next `authenticate`.
#[derive(Debug, Clone)]
enum Fatal {
    Auth {
        message: String,
        status_code: Option<u16>,
    },
    UnknownWorkspace(String),
}

impl Fatal {
    fn from_error(err: &LookerError) -> Option<Self> {
        match err {
            LookerError::Auth {
                message,
                status_code,
            } => Some(Self::Auth {
                message: message.clone(),
                status_code: *status_code,
            }),
            LookerError::UnknownWorkspace(ws) => Some(Self::UnknownWorkspace(ws.clone())),
            _ => None,
        }
    }

    fn to_error(&self) -> LookerError {
        match self {
            Self::Auth {
                message,
                status_code,
            } => LookerError::Auth {
                message: message.clone(),
                status_code: *status_code,
            },
            Self::UnknownWorkspace(ws) => LookerError::UnknownWorkspace(ws.clone()),
        }
    }
}

enum TokenState {
    Unauthenticated,
    Authenticated(BearerToken),
    Failed(Fatal),
}

struct Slot {
    credentials: Option<Credentials>,
    state: TokenState,
    session: Option<Session>,
    /// Workspace re-applied to the fresh server session after a refresh.
    workspace: Workspace,
}

/// Owner of the bearer token and cached session.
pub(crate) struct SessionManager {
    slot: Mutex<Slot>,
}

impl SessionManager {
    pub(crate) fn new(credentials: Option<Credentials>) -> Self {
        Self {
            slot: Mutex::new(Slot {
                credentials,
                state: TokenState::Unauthenticated,
                session: None,
                workspace: Workspace::Production,
            }),
        }
    }

    pub(crate) async fn state(&self) -> AuthState {
        let slot = self.slot.lock().await;
        match &slot.state {
            TokenState::Unauthenticated => AuthState::Unauthenticated,
            TokenState::Authenticated(token) => AuthState::Authenticated {
                expires_at: token.expires_at,
            },
            TokenState::Failed(fatal) => AuthState::Failed {
                reason: fatal.to_error().to_string(),
            },
        }
    }

    pub(crate) async fn credentials(&self) -> Option<Credentials> {
        self.slot.lock().await.credentials.clone()
    }

    pub(crate) async fn cached_session(&self) -> Option<Session> {
        self.slot.lock().await.session.clone()
    }

    /// Exchange `credentials` for a token, replacing whatever state came before.
    pub(crate) async fn authenticate(
        &self,
        config: &ClientConfig,
        ctx: &Context,
        credentials: Credentials,
    ) -> Result<()> {
        ctx.run(self.exchange_and_store(config, credentials)).await?
    }

    /// Only a successful or rejected exchange changes state; transport
    /// failures and cancellation leave the previous token, session and
    /// credentials in place.
    async fn exchange_and_store(&self, config: &ClientConfig, credentials: Credentials) -> Result<()> {
        let mut slot = self.slot.lock().await;

        match exchange(config, &credentials).await {
            Ok(token) => {
                tracing::debug!(expires_at = %token.expires_at, "authenticated");
                slot.credentials = Some(credentials);
                slot.state = TokenState::Authenticated(token);
                slot.session = None;
                slot.workspace = Workspace::Production;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "credential exchange failed");
                if let Some(fatal) = Fatal::from_error(&err) {
                    slot.credentials = None;
                    slot.session = None;
                    slot.workspace = Workspace::Production;
                    slot.state = TokenState::Failed(fatal);
                }
                Err(err)
            }
        }
    }

    /// Current bearer token, refreshing it first if it is about to expire.
    pub(crate) async fn bearer_token(
        &self,
        config: &ClientConfig,
        ctx: &Context,
    ) -> Result<SecretString> {
        ctx.run(self.acquire(config)).await?
    }

    /// Holding the slot lock across the exchange makes concurrent callers
    /// wait for the in-flight refresh instead of starting their own.
    async fn acquire(&self, config: &ClientConfig) -> Result<SecretString> {
        let mut slot = self.slot.lock().await;
        match &slot.state {
            TokenState::Authenticated(token)
                if !token.expires_within(Duration::seconds(REFRESH_MARGIN_SECS)) =>
            {
                return Ok(token.access_token.clone());
            }
            TokenState::Failed(fatal) => return Err(fatal.to_error()),
            _ => {}
        }

        let credentials = slot.credentials.clone().ok_or_else(|| LookerError::Auth {
            message: "client is not authenticated".to_string(),
            status_code: None,
        })?;

        tracing::debug!("refreshing bearer token");
        let token = match exchange(config, &credentials).await {
            Ok(token) => token,
            Err(err) => {
                if let Some(fatal) = Fatal::from_error(&err) {
                    slot.credentials = None;
                    slot.session = None;
                    slot.state = TokenState::Failed(fatal);
                }
                return Err(err);
            }
        };

        // A new token is a new server-side session, which starts in production.
        if slot.workspace == Workspace::Dev {
            patch_workspace(config, &token.access_token, Workspace::Dev).await?;
        }

        let access_token = token.access_token.clone();
        if let Some(session) = slot.session.as_mut() {
            session.expires_at = Some(token.expires_at);
        }
        slot.state = TokenState::Authenticated(token);
        Ok(access_token)
    }

    /// Validate a session payload and cache it.
    ///
    /// An unrecognised workspace poisons the manager.
    pub(crate) async fn adopt_session(&self, wire: WireSession) -> Result<Session> {
        let mut slot = self.slot.lock().await;
        let raw = wire.workspace_id.unwrap_or_default();

        let workspace = match raw.parse::<Workspace>() {
            Ok(ws) => ws,
            Err(err) => {
                tracing::warn!(workspace_id = %raw, "session reports unknown workspace");
                slot.session = None;
                if let Some(fatal) = Fatal::from_error(&err) {
                    slot.state = TokenState::Failed(fatal);
                }
                return Err(err);
            }
        };

        let expires_at = match &slot.state {
            TokenState::Authenticated(token) => Some(token.expires_at),
            _ => None,
        };
        let session = Session {
            workspace,
            sudo_user_id: wire.sudo_user_id,
            expires_at,
        };
        slot.workspace = workspace;
        slot.session = Some(session.clone());
        Ok(session)
    }

    pub(crate) async fn reset(&self) {
        let mut slot = self.slot.lock().await;
        slot.state = TokenState::Unauthenticated;
        slot.session = None;
        slot.workspace = Workspace::Production;
    }
}

/// `POST 4.0/login` with form-encoded client credentials.
#[tracing::instrument(skip_all, fields(client_id = %credentials.client_id))]
async fn exchange(config: &ClientConfig, credentials: &Credentials) -> Result<BearerToken> {
    let url = config.base_url.join(LOGIN_PATH)?;
    let response = config
        .http
        .post(url)
        .header(USER_AGENT, &config.user_agent)
        .form(&[
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret().as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(LookerError::Auth {
            message: api_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
            status_code: Some(status.as_u16()),
        });
    }

    let malformed = |detail: String| LookerError::Auth {
        message: format!("malformed token payload: {detail}"),
        status_code: Some(status.as_u16()),
    };

    let token: TokenResponse =
        serde_json::from_slice(&body).map_err(|e| malformed(e.to_string()))?;
    if token.access_token.is_empty() {
        return Err(malformed("empty access_token".to_string()));
    }
    if let Some(kind) = token.token_type.as_deref() {
        if !kind.eq_ignore_ascii_case("bearer") {
            return Err(malformed(format!("unsupported token_type '{kind}'")));
        }
    }

    let lifetime = i64::try_from(token.expires_in)
        .unwrap_or(MAX_TOKEN_LIFETIME_SECS)
        .min(MAX_TOKEN_LIFETIME_SECS);

    Ok(BearerToken {
        access_token: SecretString::new(token.access_token),
        expires_at: Utc::now() + Duration::seconds(lifetime),
    })
}

/// Switch the server-side session bound to `token` to `workspace`.
async fn patch_workspace(
    config: &ClientConfig,
    token: &SecretString,
    workspace: Workspace,
) -> Result<()> {
    let url = config.base_url.join(SESSION_PATH)?;
    let response = config
        .http
        .patch(url)
        .bearer_auth(token.expose_secret())
        .header(USER_AGENT, &config.user_agent)
        .json(&WireSession {
            workspace_id: Some(workspace.as_str().to_string()),
            sudo_user_id: None,
        })
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.bytes().await?;
    Err(LookerError::Api {
        status_code: status.as_u16(),
        message: api_message(&body).unwrap_or_else(|| format!("HTTP {status}")),
        path: SESSION_PATH.to_string(),
    })
}

/// Session operations on the client facade.
impl LookerClient {
    /// Exchange `client_id`/`client_secret` for a bearer token.
    ///
    /// The credentials are kept by the session manager for transparent
    /// refresh and replace any previously configured ones.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Auth`] if the credentials are rejected or the
    /// token payload is malformed; the client then refuses every request
    /// until `authenticate` succeeds.
    #[tracing::instrument(skip(self, client_secret))]
    pub async fn authenticate(&self, client_id: &str, client_secret: SecretString) -> Result<()> {
        let credentials = Credentials::new(client_id.to_string(), client_secret);
        self.inner
            .auth
            .authenticate(&self.inner.config, &self.ctx, credentials)
            .await
    }

    /// Authenticate with the credentials given to the builder.
    pub async fn login(&self) -> Result<()> {
        let credentials = self.inner.auth.credentials().await.ok_or_else(|| {
            LookerError::InvalidConfig("no client credentials configured".to_string())
        })?;
        self.inner
            .auth
            .authenticate(&self.inner.config, &self.ctx, credentials)
            .await
    }

    /// Current authentication state.
    pub async fn auth_state(&self) -> AuthState {
        self.inner.auth.state().await
    }

    /// Workspace of the cached session, if one has been fetched.
    pub async fn workspace(&self) -> Option<Workspace> {
        self.inner.auth.cached_session().await.map(|s| s.workspace)
    }

    /// Fetch the session descriptor, or return the cached one.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::UnknownWorkspace`] if the workspace is neither
    /// `production` nor `dev` (fatal for the client), and
    /// [`LookerError::Session`] wrapping any other failure.
    #[tracing::instrument(skip(self))]
    pub async fn current_session(&self) -> Result<Session> {
        if let Some(session) = self.inner.auth.cached_session().await {
            return Ok(session);
        }

        let response = self.get(SESSION_PATH).await.map_err(session_error)?;
        let wire: WireSession = response.json().map_err(session_error)?;
        self.inner.auth.adopt_session(wire).await
    }

    /// Move the session to another workspace.
    #[tracing::instrument(skip(self))]
    pub async fn switch_workspace(&self, workspace: Workspace) -> Result<Session> {
        let body = WireSession {
            workspace_id: Some(workspace.as_str().to_string()),
            sudo_user_id: None,
        };
        let response = self.patch(SESSION_PATH, &body).await.map_err(session_error)?;
        let wire: WireSession = response.json().map_err(session_error)?;
        self.inner.auth.adopt_session(wire).await
    }

    /// Open a second, independently authenticated client bound to the dev
    /// workspace.
    ///
    /// Failure leaves this client and its session untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::DevSession`] wrapping the underlying failure.
    #[tracing::instrument(skip(self))]
    pub async fn create_dev_connection(&self) -> Result<(LookerClient, Session)> {
        let credentials = self.inner.auth.credentials().await.ok_or_else(|| {
            dev_error(LookerError::Auth {
                message: "primary client holds no credentials".to_string(),
                status_code: None,
            })
        })?;

        let dev = LookerClient::from_parts(self.inner.config.clone(), Some(credentials))
            .with_context(self.ctx.clone());
        dev.login().await.map_err(dev_error)?;

        let session = dev
            .switch_workspace(Workspace::Dev)
            .await
            .map_err(dev_error)?;
        if session.workspace != Workspace::Dev {
            return Err(dev_error(LookerError::UnknownWorkspace(
                session.workspace.to_string(),
            )));
        }

        tracing::debug!("dev connection established");
        Ok((dev, session))
    }

    /// End the server-side session and drop the token.
    ///
    /// Stored credentials are kept so [`login`](Self::login) can start over.
    pub async fn logout(&self) -> Result<()> {
        let result = self.delete(LOGOUT_PATH).await;
        self.inner.auth.reset().await;
        result.map(|_| ())
    }
}

fn session_error(err: LookerError) -> LookerError {
    match err {
        LookerError::Cancelled => LookerError::Cancelled,
        err if err.is_fatal() => err,
        err => LookerError::Session(Box::new(err)),
    }
}

fn dev_error(err: LookerError) -> LookerError {
    match err {
        LookerError::Cancelled => LookerError::Cancelled,
        LookerError::DevSession(inner) => LookerError::DevSession(inner),
        err => LookerError::DevSession(Box::new(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_parsing() {
        assert_eq!("production".parse::<Workspace>().unwrap(), Workspace::Production);
        assert_eq!("dev".parse::<Workspace>().unwrap(), Workspace::Dev);

        for raw in ["", "Production", "staging", "dev "] {
            assert!(matches!(
                raw.parse::<Workspace>(),
                Err(LookerError::UnknownWorkspace(_))
            ));
        }
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("id-123".to_string(), SecretString::new("s3cret".to_string()));
        let debug = format!("{creds:?}");
        assert!(debug.contains("id-123"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_token_expiry_margin() {
        let token = BearerToken {
            access_token: SecretString::new("t".to_string()),
            expires_at: Utc::now() + Duration::seconds(30),
        };
        assert!(token.expires_within(Duration::seconds(REFRESH_MARGIN_SECS)));
        assert!(!token.expires_within(Duration::seconds(5)));
    }

    #[tokio::test]
    async fn test_unknown_workspace_poisons_manager() {
        let manager = SessionManager::new(None);
        let err = manager
            .adopt_session(WireSession {
                workspace_id: Some("sandbox".to_string()),
                sudo_user_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LookerError::UnknownWorkspace(ref ws) if ws == "sandbox"));
        assert!(matches!(manager.state().await, AuthState::Failed { .. }));
        assert!(manager.cached_session().await.is_none());
    }

    #[tokio::test]
    async fn test_adopt_session_caches_workspace() {
        let manager = SessionManager::new(None);
        let session = manager
            .adopt_session(WireSession {
                workspace_id: Some("dev".to_string()),
                sudo_user_id: None,
            })
            .await
            .unwrap();

        assert_eq!(session.workspace, Workspace::Dev);
        assert_eq!(manager.cached_session().await, Some(session));
    }
}
