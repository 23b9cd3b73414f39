//! Response envelope shared by every API call.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::{FieldError, LookerError, Result};
use crate::pagination::PageLinks;

/// Header carrying the total row count of a paginated collection.
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// A fully read HTTP response.
///
/// Every call returns one of these next to its decoded value so pagination
/// and error mapping are decided in a single place.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    url: Url,
    body: Vec<u8>,
    links: PageLinks,
}

impl Response {
    /// Read the whole body of a reqwest response.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?.to_vec();
        let links = PageLinks::from_headers(&headers);

        Ok(Self {
            status,
            headers,
            url,
            body,
            links,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Final URL of the request (after redirects).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw response body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn links(&self) -> &PageLinks {
        &self.links
    }

    /// The `rel="next"` link, if the server advertised one.
    pub fn next_link(&self) -> Option<&str> {
        self.links.next.as_deref()
    }

    /// Total size of the collection from `X-Total-Count`.
    pub fn total_count(&self) -> Option<u64> {
        self.headers
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| LookerError::Decode {
            path: self.url.path().to_string(),
            source,
        })
    }

    /// Pass successful responses through and map the rest to typed errors.
    pub(crate) fn error_for_status(self) -> Result<Self> {
        if self.status.is_success() {
            return Ok(self);
        }
        Err(self.to_error())
    }

    fn to_error(&self) -> LookerError {
        let status = self.status;
        let parsed = serde_json::from_slice::<ApiErrorBody>(&self.body).ok();

        let message = parsed
            .as_ref()
            .and_then(ApiErrorBody::message)
            .or_else(|| {
                let text = self.text();
                (!text.trim().is_empty()).then_some(text)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));

        if status.is_client_error() {
            if let Some(body) = parsed {
                if !body.errors.is_empty() {
                    return LookerError::Validation {
                        message,
                        errors: body.errors,
                    };
                }
            }
        }

        LookerError::Api {
            status_code: status.as_u16(),
            message,
            path: self.url.path().to_string(),
        }
    }
}

/// Looker's error body: `{"message": ..., "errors": [...], "documentation_url": ...}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

impl ApiErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Extract the human-readable message from an error body.
pub(crate) fn api_message(body: &[u8]) -> Option<String> {
    if let Some(msg) = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
    {
        return Some(msg);
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
