//! Pagination over Looker list endpoints.
//!
//! List endpoints accept `limit`/`offset` and advertise further pages with an
//! RFC 8288 `Link` header. [`Paginator`] follows `rel="next"` until the server
//! stops sending one, refusing links that revisit a page or leave the API host.

use std::collections::HashSet;
use std::marker::PhantomData;

use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use url::Url;

use crate::client::LookerClient;
use crate::error::{LookerError, Result};
use crate::response::Response;

/// Pagination links parsed from a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

impl PageLinks {
    /// Parse a `Link` header value.
    pub fn from_header(value: &str) -> Self {
        let mut links = Self::default();

        for part in value.split(',') {
            let mut target = None;
            let mut rels = Vec::new();

            for segment in part.split(';') {
                let segment = segment.trim();
                if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                    target = Some(inner.to_string());
                } else if let Some(rel) = segment.strip_prefix("rel=") {
                    rels.extend(rel.trim_matches('"').split_whitespace().map(str::to_string));
                }
            }

            let Some(target) = target else { continue };
            for rel in rels {
                let slot = match rel.as_str() {
                    "next" => &mut links.next,
                    "prev" | "previous" => &mut links.prev,
                    "first" => &mut links.first,
                    "last" => &mut links.last,
                    _ => continue,
                };
                *slot = Some(target.clone());
            }
        }

        links
    }

    /// Parse every `Link` header in `headers`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(LINK)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        Self::from_header(&joined)
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Query parameters accepted by Looker list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// Comma-separated list of fields to return.
    pub fields: Option<String>,
    /// Sort expression, e.g. `name desc`.
    pub sorts: Option<String>,
    /// Page size.
    pub limit: Option<u64>,
    /// Rows to skip before the first page.
    pub offset: Option<u64>,
}

impl ListParams {
    /// Params requesting pages of `limit` rows.
    #[must_use]
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub(crate) fn apply(&self, url: &mut Url) {
        let mut has_any = false;
        let mut pairs = url.query_pairs_mut();
        if let Some(fields) = &self.fields {
            pairs.append_pair("fields", fields);
            has_any = true;
        }
        if let Some(sorts) = &self.sorts {
            pairs.append_pair("sorts", sorts);
            has_any = true;
        }
        if let Some(limit) = self.limit {
            pairs.append_pair("limit", &limit.to_string());
            has_any = true;
        }
        if let Some(offset) = self.offset {
            pairs.append_pair("offset", &offset.to_string());
            has_any = true;
        }
        drop(pairs);
        if !has_any {
            url.set_query(None);
        }
    }
}

/// A page of results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// The items on this page, in server order.
    pub items: Vec<T>,
    /// The response this page was decoded from.
    pub response: Response,
}

impl<T> Page<T> {
    /// Total number of items across all pages (if the server said).
    pub fn total(&self) -> Option<u64> {
        self.response.total_count()
    }

    /// Whether the server advertised another page.
    pub fn has_more(&self) -> bool {
        self.response.links().has_next()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Lazy, sequential walk over a paginated collection.
///
/// Not restartable: once drained, start a fresh list call.
pub struct Paginator<'a, T> {
    client: &'a LookerClient,
    next: Option<Url>,
    visited: HashSet<String>,
    last: Option<Response>,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    pub(crate) fn new(client: &'a LookerClient, path: &str, params: &ListParams) -> Result<Self> {
        let mut url = client.base_url().join(path)?;
        params.apply(&mut url);

        let mut visited = HashSet::new();
        visited.insert(page_key(&url));

        Ok(Self {
            client,
            next: Some(url),
            visited,
            last: None,
            _item: PhantomData,
        })
    }

    /// Fetch the next page, or `None` once the collection is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`LookerError::Pagination`] if the server links back to a page
    /// already fetched or to another host, plus any request or decode error.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let response = self.client.get_url(url.clone()).await?;
        let items: Vec<T> = response.json()?;

        self.next = match response.next_link() {
            Some(link) => Some(self.check_next(&url, link)?),
            None => None,
        };

        tracing::debug!(
            url = %url,
            items = items.len(),
            has_more = self.next.is_some(),
            "fetched page"
        );

        self.last = Some(response.clone());
        Ok(Some(Page { items, response }))
    }

    /// Drain every remaining page, appending items in page order.
    ///
    /// Returns the items and the last page's response.
    pub async fn collect_all(mut self) -> Result<(Vec<T>, Response)> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.items);
        }
        let last = self
            .last
            .ok_or_else(|| LookerError::Pagination("no page was fetched".to_string()))?;
        Ok((items, last))
    }

    fn check_next(&mut self, current: &Url, link: &str) -> Result<Url> {
        let next = current
            .join(link)
            .map_err(|e| LookerError::Pagination(format!("invalid next link '{link}': {e}")))?;

        if next.origin() != self.client.base_url().origin() {
            return Err(LookerError::Pagination(format!(
                "next link '{next}' points outside {}",
                self.client.base_url()
            )));
        }

        if !self.visited.insert(page_key(&next)) {
            return Err(LookerError::Pagination(format!(
                "next link '{next}' revisits a page already fetched"
            )));
        }

        Ok(next)
    }
}

/// Identity of a page: path plus query pairs, independent of their order.
///
/// `offset=0` is the server default and is dropped.
fn page_key(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .into_owned()
        .filter(|(k, v)| !(k == "offset" && v == "0"))
        .collect();
    pairs.sort();
    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", url.path(), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_link_header() {
        let header = r#"<https://looker.example.com/api/4.0/users?limit=2&offset=2>; rel="next", <https://looker.example.com/api/4.0/users?limit=2&offset=0>; rel="first""#;
        let links = PageLinks::from_header(header);

        assert_eq!(
            links.next.as_deref(),
            Some("https://looker.example.com/api/4.0/users?limit=2&offset=2")
        );
        assert!(links.first.is_some());
        assert!(links.prev.is_none());
        assert!(links.has_next());
    }

    #[test]
    fn test_parse_link_header_multiple_rels() {
        let links = PageLinks::from_header(r#"</api/4.0/users?offset=4>; rel="next last""#);
        assert_eq!(links.next, links.last);
        assert_eq!(links.next.as_deref(), Some("/api/4.0/users?offset=4"));
    }

    #[test]
    fn test_parse_link_header_without_next() {
        let links = PageLinks::from_header(r#"<https://x/api/4.0/users?offset=0>; rel="prev""#);
        assert!(!links.has_next());
        assert!(PageLinks::from_header("").next.is_none());
    }

    #[test]
    fn test_list_params_apply() {
        let mut url = Url::parse("https://looker.example.com/api/4.0/users").unwrap();
        ListParams {
            fields: Some("id,email".to_string()),
            sorts: None,
            limit: Some(50),
            offset: Some(100),
        }
        .apply(&mut url);
        assert_eq!(url.query(), Some("fields=id%2Cemail&limit=50&offset=100"));

        let mut bare = Url::parse("https://looker.example.com/api/4.0/users").unwrap();
        ListParams::default().apply(&mut bare);
        assert_eq!(bare.query(), None);
    }

    #[test]
    fn test_page_key_ignores_query_order() {
        let a = Url::parse("https://x/api/4.0/users?limit=2&offset=2").unwrap();
        let b = Url::parse("https://x/api/4.0/users?offset=2&limit=2").unwrap();
        assert_eq!(page_key(&a), page_key(&b));
    }

    #[test]
    fn test_page_key_ignores_default_offset() {
        let a = Url::parse("https://x/api/4.0/users?limit=2").unwrap();
        let b = Url::parse("https://x/api/4.0/users?offset=0&limit=2").unwrap();
        let c = Url::parse("https://x/api/4.0/users?limit=2&offset=2").unwrap();
        assert_eq!(page_key(&a), page_key(&b));
        assert_ne!(page_key(&a), page_key(&c));
    }
}
