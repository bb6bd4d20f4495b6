//! Error types for the research output aggregator.
//!
//! Resolution itself cannot fail. Errors come from talking to registries,
//! from command-line input, and from writing output.

use std::time::Duration;

use crate::models::Registry;

/// Wait assumed when a 429 response carries no usable `Retry-After`.
pub const DEFAULT_THROTTLE_WAIT: Duration = Duration::from_secs(60);

/// Failure of a single registry request.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Connection, DNS, TLS or body read failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failure surfaced by the retry middleware.
    #[error("request failed after retries: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// HTTP 429.
    #[error("throttled, retry in {wait:?}")]
    Throttled {
        /// How long the registry asked us to back off.
        wait: Duration,
    },

    /// HTTP 404. Lookups by identifier treat this as "unknown".
    #[error("not found: {path}")]
    NotFound {
        /// Request path.
        path: String,
    },

    /// Any other 4xx; the request itself is wrong.
    #[error("request rejected ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// HTTP 5xx.
    #[error("registry unavailable ({status}): {body}")]
    Unavailable {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The body was not the JSON shape we expect.
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Map a non-success HTTP status to an error.
    ///
    /// `retry_after` is the parsed `Retry-After` header in seconds, if any.
    #[must_use]
    pub fn from_status(status: u16, path: &str, body: String, retry_after: Option<u64>) -> Self {
        match status {
            429 => Self::Throttled {
                wait: retry_after.map_or(DEFAULT_THROTTLE_WAIT, Duration::from_secs),
            },
            404 => Self::NotFound { path: path.to_string() },
            500..=599 => Self::Unavailable { status, body },
            _ => Self::Rejected { status, body },
        }
    }

    /// True when repeating the same request later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled { .. } | Self::Unavailable { .. })
    }

    /// Back-off requested by the registry, for throttling errors.
    #[must_use]
    pub const fn wait(&self) -> Option<Duration> {
        match self {
            Self::Throttled { wait } => Some(*wait),
            _ => None,
        }
    }
}

/// Failure of an aggregation run.
#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    /// A registry could not be retrieved completely. Aborts the run.
    #[error("{registry} retrieval failed: {source}")]
    Retrieval {
        /// Registry being retrieved.
        registry: Registry,
        /// Request failure.
        #[source]
        source: ClientError,
    },

    /// Bad command-line or identity input.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Offending input.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A name variant that does not compile as a pattern.
    #[error("name pattern does not compile: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AggregateError {
    /// Wrap a request failure with the registry it came from.
    #[must_use]
    pub fn retrieval(registry: Registry, source: ClientError) -> Self {
        Self::Retrieval { registry, source }
    }

    /// Reject an input field.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Message for the command line.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Retrieval { registry, source } => match source.wait() {
                Some(wait) => format!("{registry} is throttling requests; try again in {wait:?}."),
                None => format!("Could not retrieve {registry}: {source}"),
            },
            Self::Validation { field, message } => format!("Invalid {field}: {message}"),
            _ => self.to_string(),
        }
    }
}

/// Result of a registry request.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result of an aggregation step.
pub type AggregateResult<T> = Result<T, AggregateError>;
