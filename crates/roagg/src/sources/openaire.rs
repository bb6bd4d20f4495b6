//! OpenAIRE Graph: datasets related to the organization's OpenAIRE id.

use serde_json::Value;

use super::{RegistrySource, SourceContext};
use crate::error::ClientResult;
use crate::models::{OrganizationIdentity, Registry};

/// OpenAIRE research product lookup. Needs a ROR id.
pub struct OpenAireSource;

#[async_trait::async_trait]
impl RegistrySource for OpenAireSource {
    fn registry(&self) -> Registry {
        Registry::OpenAire
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

        let Some(organization_id) = ctx.client.openaire_organization_id(ror.full()).await? else {
            tracing::info!(registry = %self.registry(), ror = ror.full(), "No OpenAIRE organization for ROR id");
            return Ok(Some(Vec::new()));
        };

        ctx.client.openaire_research_products(&organization_id).await.map(Some)
    }
}
