//! End-to-end aggregation run.
//!
//! Seeds the organization identity (ROR names), retrieves every registry
//! concurrently and hands the complete batches to the core resolver.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::client::RegistryClient;
use crate::config::identifiers::ROR_PREFIX;
use crate::error::{AggregateError, AggregateResult};
use crate::models::{OrganizationIdentity, Registry};
use crate::resolve::{RegistryBatch, Resolution, resolve_with_summary};
use crate::sources::{RegistrySource, SourceContext, sources_for};

/// Validate a ROR id given on the command line.
///
/// # Errors
///
/// Returns a validation error unless the value starts with `https://ror.org/`
/// and has an id after the prefix.
pub fn validate_ror(value: &str) -> AggregateResult<String> {
    let value = value.trim();
    match value.strip_prefix(ROR_PREFIX) {
        Some(id) if !id.is_empty() && !id.contains('/') => Ok(value.to_string()),
        _ => Err(AggregateError::invalid_input("ror", format!("ROR ID must start with '{ROR_PREFIX}'"))),
    }
}

/// Read name variants from text, one per line, ignoring blank lines.
#[must_use]
pub fn parse_name_lines(text: &str) -> Vec<String> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect()
}

/// Runs aggregations against the configured registries.
#[derive(Debug, Clone)]
pub struct Aggregator {
    ctx: SourceContext,
}

impl Aggregator {
    /// Create an aggregator around a client.
    #[must_use]
    pub fn new(client: RegistryClient) -> Self {
        Self { ctx: SourceContext::new(Arc::new(client)) }
    }

    /// Build the organization identity from command-line names and a ROR id.
    ///
    /// When a ROR id is given, its English and language-less names are added
    /// to the variants. A failed ROR lookup is logged and the given names are
    /// used alone.
    ///
    /// # Errors
    ///
    /// Returns a validation error if there are neither names nor a ROR id, or
    /// the ROR id is malformed.
    pub async fn identity(
        &self,
        names: &[String],
        ror: Option<&str>,
    ) -> AggregateResult<OrganizationIdentity> {
        let ror = ror.map(validate_ror).transpose()?;
        let identity = OrganizationIdentity::new(names, ror.as_deref())?;
        if identity.is_empty() {
            return Err(AggregateError::invalid_input(
                "organization",
                "provide at least one name (--name, --name-txt) or a ROR id (--ror)",
            ));
        }

        let Some(ror) = ror else {
            return Ok(identity);
        };

        match self.ctx.client.ror_organization(&ror).await {
            Ok(org) => {
                let variants = org.name_variants();
                tracing::info!(ror = %ror, names = ?variants, "Resolved ROR names");
                Ok(identity.with_names(variants)?)
            }
            Err(e) => {
                tracing::warn!(ror = %ror, error = %e, "ROR lookup failed, using given names only");
                Ok(identity)
            }
        }
    }

    /// Retrieve every registry and resolve the records.
    ///
    /// Registries are retrieved concurrently; the first one in `registries`
    /// that is not skipped is the primary.
    ///
    /// # Errors
    ///
    /// Returns the first retrieval failure. Nothing is merged in that case.
    pub async fn run(
        &self,
        identity: &OrganizationIdentity,
        registries: &[Registry],
    ) -> AggregateResult<Resolution> {
        let sources = sources_for(registries);
        let batches = self.retrieve(&sources, identity).await?;
        Ok(resolve_with_summary(identity, &batches))
    }

    async fn retrieve(
        &self,
        sources: &[Box<dyn RegistrySource>],
        identity: &OrganizationIdentity,
    ) -> AggregateResult<Vec<RegistryBatch>> {
        let retrievals = sources.iter().map(|source| async move {
            let registry = source.registry();
            tracing::info!(registry = %registry, "Retrieving");
            source
                .retrieve(&self.ctx, identity)
                .await
                .map(|records| records.map(|records| RegistryBatch::new(registry, records)))
                .map_err(|e| AggregateError::retrieval(registry, e))
        });

        let batches: Vec<RegistryBatch> = try_join_all(retrievals).await?.into_iter().flatten().collect();
        for batch in &batches {
            tracing::info!(registry = %batch.registry, records = batch.records.len(), "Retrieved");
        }
        Ok(batches)
    }
}
