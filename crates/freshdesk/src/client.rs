//! Freshdesk v2 REST client.

use std::time::Duration;

use reqwest::header::{HeaderMap, LINK};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::HelpdeskError;
use crate::models::{Conversation, Include, Page, SearchPage, Ticket, TicketField};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Freshdesk ignores the password when authenticating with an API key.
const API_KEY_PASSWORD: &str = "X";

/// Results per search page. The search endpoint does not accept `per_page`.
pub const SEARCH_PAGE_SIZE: usize = 30;

/// Highest page number the search endpoint serves.
pub const SEARCH_MAX_PAGES: u32 = 10;

/// Freshdesk API client.
///
/// Every call is a plain GET; list endpoints follow `Link: <...>; rel="next"`
/// headers until the server stops sending one.
#[derive(Debug, Clone)]
pub struct FreshdeskClient {
    client: Client,
    api_root: Url,
    api_key: String,
}

impl FreshdeskClient {
    /// Create a client against an explicit API root such as
    /// `https://acme.freshdesk.com/api/v2/`.
    ///
    /// # Errors
    /// Returns error if the root is not a valid URL or the HTTP client cannot
    /// be created.
    pub fn new(api_root: &str, api_key: impl Into<String>) -> Result<Self, HelpdeskError> {
        let mut api_root = Url::parse(api_root)?;
        if !api_root.path().ends_with('/') {
            let path = format!("{}/", api_root.path());
            api_root.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_root,
            api_key: api_key.into(),
        })
    }

    /// Create a client for a `<subdomain>.freshdesk.com` account.
    ///
    /// # Errors
    /// Returns error if the subdomain does not form a valid URL.
    pub fn for_subdomain(
        subdomain: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, HelpdeskError> {
        Self::new(&format!("https://{subdomain}.freshdesk.com/api/v2/"), api_key)
    }

    /// The API root every relative path is joined onto.
    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// List tickets matching one of the predefined filters
    /// (`new_and_my_open`, `watching`, ...).
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable page.
    pub async fn list_tickets(&self, filter: &str) -> Result<Vec<Ticket>, HelpdeskError> {
        self.fetch_all("tickets", &[("filter", filter.to_string())])
            .await
    }

    /// Run a ticket search. `query` is the bare expression, e.g.
    /// `status:2 OR status:3`; it is quoted here as the API requires.
    ///
    /// Pages are requested by number until a short page arrives, `total`
    /// records are collected, or [`SEARCH_MAX_PAGES`] is reached.
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable page.
    pub async fn search_tickets(&self, query: &str) -> Result<Vec<Ticket>, HelpdeskError> {
        let base = self.api_root.join("search/tickets")?;
        let query = format!("\"{query}\"");
        let mut records = Vec::new();

        for page in 1..=SEARCH_MAX_PAGES {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("query", &query)
                .append_pair("page", &page.to_string());

            let response = self.get(&url).await?;
            let body: SearchPage<Ticket> = decode(&url, response).await?;
            let SearchPage { total, results } = body;
            let fetched = results.len();
            records.extend(results);
            debug!(url = %url, records = fetched, total = ?total, "Fetched search page");

            if fetched < SEARCH_PAGE_SIZE || total.is_some_and(|total| records.len() >= total) {
                return Ok(records);
            }
        }

        warn!(
            query = %query,
            records = records.len(),
            max_pages = SEARCH_MAX_PAGES,
            "Search hit the page limit, remaining results are not reachable"
        );
        Ok(records)
    }

    /// Fetch one ticket with the requested sub-resources embedded.
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable body.
    pub async fn ticket(&self, id: u64, includes: &[Include]) -> Result<Ticket, HelpdeskError> {
        let mut url = self.api_root.join(&format!("tickets/{id}"))?;
        if !includes.is_empty() {
            let include = includes
                .iter()
                .copied()
                .map(Include::as_str)
                .collect::<Vec<_>>()
                .join(",");
            url.query_pairs_mut().append_pair("include", &include);
        }

        let response = self.get(&url).await?;
        decode(&url, response).await
    }

    /// All conversations of a ticket, oldest first as the API returns them.
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable page.
    pub async fn conversations(&self, ticket_id: u64) -> Result<Vec<Conversation>, HelpdeskError> {
        self.fetch_all(&format!("tickets/{ticket_id}/conversations"), &[])
            .await
    }

    /// Ticket field definitions, optionally restricted to one field type
    /// (`default_status`, `default_priority`, ...).
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable page.
    pub async fn ticket_fields(
        &self,
        field_type: Option<&str>,
    ) -> Result<Vec<TicketField>, HelpdeskError> {
        let query: Vec<(&str, String)> = field_type
            .map(|t| vec![("type", t.to_string())])
            .unwrap_or_default();
        self.fetch_all("ticket_fields", &query).await
    }

    /// GET `path` and every page linked from it, concatenated in order.
    ///
    /// # Errors
    /// Returns error on transport failure or an undecodable page.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, HelpdeskError> {
        let mut url = self.api_root.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let mut records = Vec::new();
        let mut next = Some(url);
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let response = self.get(&url).await?;
            next = next_link(response.headers())
                .map(|link| resolve_next(&url, &link))
                .transpose()?;

            let page: Page<T> = decode(&url, response).await?;
            let page = page.into_records();
            pages += 1;
            debug!(url = %url, records = page.len(), has_next = next.is_some(), "Fetched page");
            records.extend(page);
        }

        debug!(path, pages, records = records.len(), "Pagination complete");
        Ok(records)
    }

    /// Authenticated GET, failing on non-success statuses.
    async fn get(&self, url: &Url) -> Result<reqwest::Response, HelpdeskError> {
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.api_key, Some(API_KEY_PASSWORD))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "Freshdesk request failed");
            Err(HelpdeskError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            })
        }
    }
}

/// Decode a successful response body.
async fn decode<T: DeserializeOwned>(
    url: &Url,
    response: reqwest::Response,
) -> Result<T, HelpdeskError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| {
        warn!(url = %url, error = %source, "Failed to parse response");
        HelpdeskError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

/// Resolve a next link against the page it came from. A link that does not
/// form a URL is a malformed response, not a configuration error.
fn resolve_next(base: &Url, link: &str) -> Result<Url, HelpdeskError> {
    base.join(link).map_err(|e| {
        HelpdeskError::UnexpectedShape(format!("invalid next link {link:?} from {base}: {e}"))
    })
}

/// Extract the `rel="next"` target from an RFC 8288 `Link` header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

fn parse_next_link(header: &str) -> Option<String> {
    let mut rest = header;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        let end = after.find('>')?;
        let target = &after[..end];
        let params_end = after[end..].find('<').map_or(after.len(), |i| end + i);
        let params = &after[end + 1..params_end];

        let is_next = params.split(';').any(|param| {
            param
                .trim()
                .trim_end_matches(',')
                .split_once('=')
                .is_some_and(|(key, value)| {
                    key.trim().eq_ignore_ascii_case("rel")
                        && value
                            .trim()
                            .trim_matches('"')
                            .split_whitespace()
                            .any(|r| r.eq_ignore_ascii_case("next"))
                })
        });
        if is_next {
            return Some(target.to_string());
        }

        rest = &after[params_end..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_link_single() {
        let header = r#"<https://acme.freshdesk.com/api/v2/tickets?page=2>; rel="next""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://acme.freshdesk.com/api/v2/tickets?page=2")
        );
    }

    #[test]
    fn test_parse_next_link_among_others() {
        let header = r#"<https://x/api/v2/tickets?page=1>; rel="prev", <https://x/api/v2/tickets?include=company,stats&page=3>; rel="next""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://x/api/v2/tickets?include=company,stats&page=3")
        );
    }

    #[test]
    fn test_parse_next_link_allows_space_around_equals() {
        let header = r#"<https://x/api/v2/tickets?page=2>; rel = "next""#;
        assert_eq!(
            parse_next_link(header).as_deref(),
            Some("https://x/api/v2/tickets?page=2")
        );
        assert_eq!(
            parse_next_link("<https://x/a?page=4>;REL=next").as_deref(),
            Some("https://x/a?page=4")
        );
    }

    #[test]
    fn test_resolve_next_rejects_malformed_link() {
        let base = Url::parse("https://x/api/v2/tickets").unwrap();
        let err = resolve_next(&base, "http://[oops").unwrap_err();
        assert!(matches!(err, HelpdeskError::UnexpectedShape(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_parse_next_link_absent() {
        assert!(parse_next_link(r#"<https://x/api/v2/tickets?page=1>; rel="prev""#).is_none());
        assert!(parse_next_link("").is_none());
    }

    #[test]
    fn test_new_appends_trailing_slash() {
        let client = FreshdeskClient::new("https://acme.freshdesk.com/api/v2", "key").unwrap();
        assert_eq!(
            client.api_root().as_str(),
            "https://acme.freshdesk.com/api/v2/"
        );
    }

    #[test]
    fn test_for_subdomain() {
        let client = FreshdeskClient::for_subdomain("acme", "key").unwrap();
        assert_eq!(
            client.api_root().join("tickets").unwrap().as_str(),
            "https://acme.freshdesk.com/api/v2/tickets"
        );
    }
}
