//! OpenAlex: datasets with an authorship at the organization's institution.

use serde_json::Value;

use super::{RegistrySource, SourceContext};
use crate::error::ClientResult;
use crate::models::{OrganizationIdentity, Registry};

/// OpenAlex works lookup. Needs a ROR id.
pub struct OpenAlexSource;

#[async_trait::async_trait]
impl RegistrySource for OpenAlexSource {
    fn registry(&self) -> Registry {
        Registry::OpenAlex
    }

    async fn retrieve(
        &self,
        ctx: &SourceContext,
        identity: &OrganizationIdentity,
    ) -> ClientResult<Option<Vec<Value>>> {
        let Some(ror) = identity.identifier() else {
            tracing::info!(registry = %self.registry(), "No ROR id, skipping");
            return Ok(None);
        };

        let Some(institution_id) = ctx.client.openalex_institution_id(ror.full()).await? else {
            tracing::info!(registry = %self.registry(), ror = ror.full(), "No OpenAlex institution for ROR id");
            return Ok(Some(Vec::new()));
        };

        ctx.client.openalex_works(&institution_id).await.map(Some)
    }
}
