//! Configuration for registry retrieval.

use std::time::Duration;

/// Registry endpoints, paging and HTTP tuning.
pub mod api {
    use std::time::Duration;

    /// DataCite REST API.
    pub const DATACITE_API: &str = "https://api.datacite.org";

    /// OpenAIRE Graph API.
    pub const OPENAIRE_API: &str = "https://api.openaire.eu/graph/v1";

    /// OpenAlex API.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// ROR organization registry API.
    pub const ROR_API: &str = "https://api.ror.org/v2";

    /// DataCite page size (API maximum).
    pub const DATACITE_PAGE_SIZE: u32 = 1000;

    /// OpenAIRE page size.
    pub const OPENAIRE_PAGE_SIZE: u32 = 100;

    /// OpenAlex page size (API maximum).
    pub const OPENALEX_PAGE_SIZE: u32 = 200;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay between page requests against the same registry.
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(200);

    /// Retries for transient failures (5xx, connection resets).
    pub const MAX_RETRIES: u32 = 3;

    /// Shortest back-off between retries.
    pub const RETRY_MIN_BACKOFF: Duration = Duration::from_secs(1);

    /// Longest back-off between retries.
    pub const RETRY_MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// Idle connections kept per registry host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Identifier conventions shared by the query builder and the matcher.
pub mod identifiers {
    /// Canonical prefix of a ROR organization identifier.
    pub const ROR_PREFIX: &str = "https://ror.org/";

    /// Other spellings of the ROR prefix seen in registry metadata.
    pub const ROR_PREFIX_VARIANTS: &[&str] = &["https://ror.org/", "http://ror.org/", "ror.org/"];
}

/// Retrieval configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Contact address for the OpenAlex polite pool (optional).
    pub mailto: Option<String>,

    /// Base URL for DataCite (for testing with mock servers).
    pub datacite_api_url: String,

    /// Base URL for OpenAIRE Graph.
    pub openaire_api_url: String,

    /// Base URL for OpenAlex.
    pub openalex_api_url: String,

    /// Base URL for ROR.
    pub ror_api_url: String,

    /// DataCite page size.
    pub datacite_page_size: u32,

    /// OpenAIRE page size.
    pub openaire_page_size: u32,

    /// OpenAlex page size.
    pub openalex_page_size: u32,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay between page requests.
    pub rate_limit_delay: Duration,

    /// Retries for transient failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a new configuration with an optional polite-pool contact.
    #[must_use]
    pub fn new(mailto: Option<String>) -> Self {
        Self {
            mailto,
            datacite_api_url: api::DATACITE_API.to_string(),
            openaire_api_url: api::OPENAIRE_API.to_string(),
            openalex_api_url: api::OPENALEX_API.to_string(),
            ror_api_url: api::ROR_API.to_string(),
            datacite_page_size: api::DATACITE_PAGE_SIZE,
            openaire_page_size: api::OPENAIRE_PAGE_SIZE,
            openalex_page_size: api::OPENALEX_PAGE_SIZE,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: api::RATE_LIMIT_DELAY,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Point every registry at one mock server, with tiny pages and no delays.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            mailto: None,
            datacite_api_url: format!("{}/datacite", base_url),
            openaire_api_url: format!("{}/openaire", base_url),
            openalex_api_url: format!("{}/openalex", base_url),
            ror_api_url: format!("{}/ror", base_url),
            datacite_page_size: 2,
            openaire_page_size: 2,
            openalex_page_size: 2,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::ZERO,
            max_retries: 0,
        }
    }

    /// Read `ROAGG_MAILTO` and `ROAGG_MAX_RETRIES` from the environment.
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns error if `ROAGG_MAX_RETRIES` is not a non-negative integer.
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut config = Self::new(var("ROAGG_MAILTO"));
        if let Some(retries) = var("ROAGG_MAX_RETRIES") {
            config.max_retries = retries
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("ROAGG_MAX_RETRIES={retries}: {e}"))?;
        }
        Ok(config)
    }

    /// Check if a polite-pool contact is configured.
    #[must_use]
    pub const fn has_mailto(&self) -> bool {
        self.mailto.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_contact() {
        let config = Config::default();
        assert!(config.mailto.is_none());
        assert!(!config.has_mailto());
        assert_eq!(config.datacite_api_url, api::DATACITE_API);
    }

    #[test]
    fn test_config_with_mailto() {
        let config = Config::new(Some("data@example.org".to_string()));
        assert!(config.has_mailto());
    }

    #[test]
    fn test_testing_config_points_at_mock() {
        let config = Config::for_testing("http://127.0.0.1:9999");
        assert_eq!(config.openalex_api_url, "http://127.0.0.1:9999/openalex");
        assert_eq!(config.max_retries, 0);
        assert!(config.rate_limit_delay.is_zero());
    }
}
