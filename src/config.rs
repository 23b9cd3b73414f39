//! Client configuration.
//!
//! [`LookerConfig`] is the inbound configuration object (base URL plus
//! client credentials, each with an environment-variable fallback).
//! [`ClientBuilder`] applies it to the transport and produces an immutable
//! [`LookerClient`](crate::LookerClient).

use std::env;
use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::Credentials;
use crate::client::LookerClient;
use crate::error::{LookerError, Result};

/// Environment variable holding the API root URL.
pub const ENV_BASE_URL: &str = "LOOKER_BASE_URL";
/// Environment variable holding the API3 client id.
pub const ENV_CLIENT_ID: &str = "LOOKER_API_CLIENT_ID";
/// Environment variable holding the API3 client secret.
pub const ENV_CLIENT_SECRET: &str = "LOOKER_API_CLIENT_SECRET";

/// API version segment appended to every resource path.
pub const API_VERSION: &str = "4.0";

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("lookerapi/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings supplied by the caller.
///
/// Unset fields fall back to `LOOKER_BASE_URL`, `LOOKER_API_CLIENT_ID` and
/// `LOOKER_API_CLIENT_SECRET`.
#[derive(Clone, Default)]
pub struct LookerConfig {
    /// Root of the API, including `/api/` but not the version segment
    /// (e.g. `https://example.looker.com:19999/api/`).
    pub base_url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
}

impl fmt::Debug for LookerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookerConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl LookerConfig {
    /// Read every field from the environment.
    pub fn from_env() -> Self {
        Self::default().resolve()
    }

    /// Fill fields that are still unset from the environment.
    #[must_use]
    pub fn resolve(mut self) -> Self {
        if self.base_url.is_none() {
            self.base_url = non_empty_var(ENV_BASE_URL);
        }
        if self.client_id.is_none() {
            self.client_id = non_empty_var(ENV_CLIENT_ID);
        }
        if self.client_secret.is_none() {
            self.client_secret = non_empty_var(ENV_CLIENT_SECRET).map(SecretString::new);
        }
        self
    }

    /// Validate completeness and split into base URL and credentials.
    pub(crate) fn into_parts(self) -> Result<(String, Credentials)> {
        let base_url = self.base_url.ok_or_else(|| missing("base_url", ENV_BASE_URL))?;
        let client_id = self.client_id.ok_or_else(|| missing("client_id", ENV_CLIENT_ID))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| missing("client_secret", ENV_CLIENT_SECRET))?;
        Ok((base_url, Credentials::new(client_id, client_secret)))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn missing(field: &str, var: &str) -> LookerError {
    LookerError::InvalidConfig(format!("{field} is not set (and {var} is empty)"))
}

/// Transport settings shared by every request a client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) user_agent: String,
    pub(crate) http: reqwest::Client,
    pub(crate) timeout: Duration,
}

impl ClientConfig {
    /// API root every resource path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout of the built-in transport.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Builder for [`LookerClient`].
///
/// # Example
///
/// ```no_run
/// use lookerapi::LookerClient;
///
/// # fn example() -> lookerapi::Result<()> {
/// let client = LookerClient::builder()
///     .base_url("https://example.looker.com:19999/api/")?
///     .user_agent("my-tool/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http: Option<reqwest::Client>,
    credentials: Option<Credentials>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::InvalidConfig`] if the URL is malformed, is not
    /// http(s), or already contains a version segment such as `4.0` or the
    /// `login` suffix.
    pub fn base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Some(parse_base_url(url)?);
        Ok(self)
    }

    /// Set the user agent.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::InvalidConfig`] if `user_agent` is blank.
    pub fn user_agent(mut self, user_agent: &str) -> Result<Self> {
        let user_agent = user_agent.trim();
        if user_agent.is_empty() {
            return Err(LookerError::InvalidConfig(
                "user agent must not be empty".to_string(),
            ));
        }
        self.user_agent = Some(user_agent.to_string());
        Ok(self)
    }

    /// Overall timeout for each request made by the built-in transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-supplied transport instead of the built-in one.
    ///
    /// The builder's timeout is not applied to a custom transport.
    #[must_use]
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Credentials used by [`LookerClient::login`] and for
    /// transparent token refresh.
    #[must_use]
    pub fn credentials(mut self, client_id: &str, client_secret: SecretString) -> Self {
        self.credentials = Some(Credentials::new(client_id.to_string(), client_secret));
        self
    }

    pub(crate) fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build the client. Configuration is frozen from here on.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was set or the transport cannot be built.
    pub fn build(self) -> Result<LookerClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| LookerError::InvalidConfig("base URL is required".to_string()))?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .brotli(true)
                .gzip(true)
                .deflate(true)
                .timeout(timeout)
                .build()
                .map_err(LookerError::Transport)?,
        };

        let config = ClientConfig {
            base_url,
            user_agent,
            http,
            timeout,
        };
        Ok(LookerClient::from_parts(config, self.credentials))
    }
}

/// Parse and normalise an API root URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|e| LookerError::InvalidConfig(format!("malformed base URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(LookerError::InvalidConfig(format!(
            "base URL '{raw}' must use http or https"
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(LookerError::InvalidConfig(format!(
            "base URL '{raw}' must not carry a query or fragment"
        )));
    }

    let forbidden = url
        .path_segments()
        .into_iter()
        .flatten()
        .find(|segment| is_version_segment(segment) || segment.eq_ignore_ascii_case("login"));
    if let Some(segment) = forbidden {
        return Err(LookerError::InvalidConfig(format!(
            "base URL '{raw}' must not include '{segment}'; the client appends '{API_VERSION}/...' itself"
        )));
    }

    Ok(url)
}

/// A dotted pair of integers such as `4.0` or `3.1`.
fn is_version_segment(segment: &str) -> bool {
    let mut parts = segment.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(major), Some(minor), None) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.chars().all(|c| c.is_ascii_digit())
                && minor.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}
