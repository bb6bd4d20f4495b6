//! Retrieval sources, one per registry.
//!
//! Each source turns an [`OrganizationIdentity`] into the registry's fully
//! paginated raw records. A source that cannot run for an identity (no query
//! terms, no persistent identifier) returns `Ok(None)` and is skipped.

mod datacite;
mod openaire;
mod openalex;

use std::sync::Arc;

use serde_json::Value;

use crate::client::RegistryClient;
use crate::error::ClientResult;
use crate::models::{OrganizationIdentity, Registry};

pub use datacite::DataCiteSource;
pub use openaire::OpenAireSource;
pub use openalex::OpenAlexSource;

/// Shared state handed to every source.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Registry API client.
    pub client: Arc<RegistryClient>,
}

impl SourceContext {
    /// Create a context around a client.
    #[must_use]
    pub const fn new(client: Arc<RegistryClient>) -> Self {
        Self { client }
    }
}

/// A registry the aggregator can retrieve from.
#[async_trait::async_trait]
pub trait RegistrySource: Send + Sync {
    /// Registry this source reads.
    fn registry(&self) -> Registry;

    /// Retrieve every raw record for the organization.
    ///
    /// `Ok(None)` means the source was skipped for this identity.
    async fn retrieve(
        &self,
        ctx: &SourceContext,
        identity: &OrganizationIdentity,
    ) -> ClientResult<Option<Vec<Value>>>;
}

/// The source for a registry.
#[must_use]
pub fn source_for(registry: Registry) -> Box<dyn RegistrySource> {
    match registry {
        Registry::DataCite => Box::new(DataCiteSource),
        Registry::OpenAire => Box::new(OpenAireSource),
        Registry::OpenAlex => Box::new(OpenAlexSource),
    }
}

/// Sources for registries in the given order.
#[must_use]
pub fn sources_for(registries: &[Registry]) -> Vec<Box<dyn RegistrySource>> {
    registries.iter().copied().map(source_for).collect()
}
