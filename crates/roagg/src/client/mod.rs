//! Registry API client.
//!
//! One pooled reqwest client behind a transient-retry middleware, shared by
//! every registry. Each list endpoint is drained completely before returning:
//! DataCite follows `links.next`, OpenAIRE and OpenAlex follow their cursors.
//! A fixed delay precedes every request.

mod envelope;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{RorOrganization, strip_identifier_prefix};

use envelope::{DataCitePage, Identified, OpenAirePage, OpenAlexPage};

/// Query parameters of one request.
type Params = Vec<(&'static str, String)>;

/// Cursor value that starts an OpenAIRE or OpenAlex listing.
const FIRST_CURSOR: &str = "*";

/// Client for every registry the aggregator talks to.
#[derive(Clone)]
pub struct RegistryClient {
    http: ClientWithMiddleware,
    config: Config,
}

impl RegistryClient {
    /// Build a client for the configured registries.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend or connection pool cannot be set up.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let headers = HeaderMap::from_iter([(ACCEPT, HeaderValue::from_static("application/json"))]);

        let pooled = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("roagg/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let backoff = ExponentialBackoff::builder()
            .retry_bounds(api::RETRY_MIN_BACKOFF, api::RETRY_MAX_BACKOFF)
            .build_with_max_retries(config.max_retries);

        let http = ClientBuilder::new(pooled)
            .with(RetryTransientMiddleware::new_with_policy(backoff))
            .build();

        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Check if a polite-pool contact is configured.
    #[must_use]
    pub const fn has_mailto(&self) -> bool {
        self.config.has_mailto()
    }

    /// All DataCite DOI records matching a query.
    ///
    /// # Errors
    ///
    /// Returns the first failed page request.
    pub async fn datacite_dois(&self, query: &str) -> ClientResult<Vec<Value>> {
        let endpoint = format!("{}/dois", self.config.datacite_api_url);
        let first: Params = vec![
            ("query", query.to_string()),
            ("page[size]", self.config.datacite_page_size.to_string()),
            ("page[cursor]", "1".to_string()),
            ("affiliation", "true".to_string()),
            ("publisher", "true".to_string()),
            ("disable-facets", "true".to_string()),
        ];

        let mut records = Vec::new();
        let mut page: DataCitePage = self.fetch(&endpoint, &first).await?;

        loop {
            records.append(&mut page.data);
            tracing::info!(registry = "DataCite", retrieved = records.len(), total = ?page.meta.total, "Retrieved page");

            // `links.next` is absolute and already carries every parameter.
            let Some(next) = page.links.next.take().filter(|n| !n.is_empty()) else {
                break;
            };
            page = self.fetch(&next, &[]).await?;
        }

        Ok(records)
    }

    /// OpenAIRE organization id for a ROR id, if OpenAIRE knows it.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup request fails.
    pub async fn openaire_organization_id(&self, ror: &str) -> ClientResult<Option<String>> {
        let endpoint = format!("{}/organizations", self.config.openaire_api_url);
        let page: OpenAirePage = self.fetch(&endpoint, &[("pid", ror.to_string())]).await?;

        Ok(page
            .results
            .into_iter()
            .find_map(|org| serde_json::from_value::<Identified>(org).ok()?.id))
    }

    /// All OpenAIRE datasets related to an organization.
    ///
    /// # Errors
    ///
    /// Returns the first failed page request.
    pub async fn openaire_research_products(&self, organization_id: &str) -> ClientResult<Vec<Value>> {
        let endpoint = format!("{}/researchProducts", self.config.openaire_api_url);
        let filter: Params = vec![
            ("pageSize", self.config.openaire_page_size.to_string()),
            ("type", "dataset".to_string()),
            ("relOrganizationId", organization_id.to_string()),
        ];

        self.drain_cursor("OpenAIRE", &endpoint, filter, |page: OpenAirePage| {
            (page.results, page.header.num_found, page.header.next_cursor)
        })
        .await
    }

    /// OpenAlex institution id (`I…`) for a ROR id; `None` if OpenAlex has no such institution.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup fails for any reason other than 404.
    pub async fn openalex_institution_id(&self, ror: &str) -> ClientResult<Option<String>> {
        let bare = strip_identifier_prefix(ror).unwrap_or(ror);
        let endpoint = format!("{}/institutions/ror:{bare}", self.config.openalex_api_url);

        let institution = match self.fetch::<Identified>(&endpoint, &self.polite()).await {
            Ok(institution) => institution,
            Err(ClientError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(institution.id.as_deref().and_then(short_openalex_id))
    }

    /// All OpenAlex datasets with an authorship at an institution.
    ///
    /// # Errors
    ///
    /// Returns the first failed page request.
    pub async fn openalex_works(&self, institution_id: &str) -> ClientResult<Vec<Value>> {
        let endpoint = format!("{}/works", self.config.openalex_api_url);
        let mut filter = self.polite();
        filter.push(("per-page", self.config.openalex_page_size.to_string()));
        filter.push(("filter", format!("institutions.id:{institution_id},type:dataset")));

        self.drain_cursor("OpenAlex", &endpoint, filter, |page: OpenAlexPage| {
            (page.results, page.meta.count, page.meta.next_cursor)
        })
        .await
    }

    /// ROR organization record.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup request fails.
    pub async fn ror_organization(&self, ror: &str) -> ClientResult<RorOrganization> {
        let bare = strip_identifier_prefix(ror).unwrap_or(ror);
        let endpoint = format!("{}/organizations/{bare}", self.config.ror_api_url);
        self.fetch(&endpoint, &[]).await
    }

    /// `mailto` for the OpenAlex polite pool, when configured.
    fn polite(&self) -> Params {
        self.config.mailto.iter().map(|m| ("mailto", m.clone())).collect()
    }

    /// Page through a cursor-paginated listing until the cursor runs out.
    ///
    /// `split` takes a page apart into its records, the reported total and the
    /// next cursor. A missing, empty or repeated cursor ends the listing.
    async fn drain_cursor<P, F>(
        &self,
        registry: &'static str,
        endpoint: &str,
        filter: Params,
        split: F,
    ) -> ClientResult<Vec<Value>>
    where
        P: DeserializeOwned,
        F: Fn(P) -> (Vec<Value>, Option<u64>, Option<String>),
    {
        let mut records = Vec::new();
        let mut cursor = FIRST_CURSOR.to_string();

        loop {
            let mut params = filter.clone();
            params.push(("cursor", cursor.clone()));

            let (mut batch, total, next) = split(self.fetch(endpoint, &params).await?);
            records.append(&mut batch);
            tracing::info!(registry, retrieved = records.len(), total = ?total, "Retrieved page");

            match next {
                Some(next) if !next.is_empty() && next != cursor => cursor = next,
                _ => return Ok(records),
            }
        }
    }

    /// GET a JSON document, waiting the configured delay first.
    async fn fetch<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> ClientResult<T> {
        tokio::time::sleep(self.config.rate_limit_delay).await;
        tracing::debug!(url, "GET");

        let response = self.http.get(url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn status_error(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        let path = response.url().path().to_string();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());
        let body = response.text().await.unwrap_or_default();

        ClientError::from_status(status, &path, body, retry_after)
    }
}

/// `https://openalex.org/I123` to `I123`, the form OpenAlex filters take.
/// Ids that are not URLs pass through unchanged.
fn short_openalex_id(id: &str) -> Option<String> {
    match url::Url::parse(id) {
        Ok(url) => url.path_segments()?.next_back().filter(|s| !s.is_empty()).map(str::to_string),
        Err(_) => Some(id.trim().to_string()).filter(|s| !s.is_empty()),
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("datacite", &self.config.datacite_api_url)
            .field("openaire", &self.config.openaire_api_url)
            .field("openalex", &self.config.openalex_api_url)
            .field("has_mailto", &self.has_mailto())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_openalex_id() {
        assert_eq!(short_openalex_id("https://openalex.org/I187531555").as_deref(), Some("I187531555"));
        assert_eq!(short_openalex_id("I187531555").as_deref(), Some("I187531555"));
        assert_eq!(short_openalex_id("https://openalex.org/"), None);
        assert_eq!(short_openalex_id(""), None);
    }
}
