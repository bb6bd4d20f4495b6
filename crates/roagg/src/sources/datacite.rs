//! DataCite: full-text query over affiliation and publisher fields.

use serde_json::Value;

use super::{RegistrySource, SourceContext};
use crate::error::ClientResult;
use crate::models::{OrganizationIdentity, Registry};
use crate::query::{self, DATACITE_FIELDS};

/// DataCite DOI search.
pub struct DataCiteSource;

#[async_trait::async_trait]
impl RegistrySource for DataCiteSource {
    fn registry(&self) -> Registry {
        Registry::DataCite
    }

    async fn retrieve(
        &self,
        ctx: &SourceContext,
        identity: &OrganizationIdentity,
    ) -> ClientResult<Option<Vec<Value>>> {
        let query = query::for_identity(identity, &DATACITE_FIELDS);
        if query.is_empty() {
            tracing::info!(registry = %self.registry(), "No names or identifier, skipping");
            return Ok(None);
        }

        tracing::debug!(registry = %self.registry(), %query, "Built query");
        ctx.client.datacite_dois(&query).await.map(Some)
    }
}
