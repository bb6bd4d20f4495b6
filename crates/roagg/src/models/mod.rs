//! Data models: organization identity, registry records and canonical outputs.

pub mod datacite;
mod identity;
pub mod lenient;
pub mod openaire;
pub mod openalex;
mod output;
mod registry;
pub mod ror;
mod source;

pub use identity::{OrgIdentifier, OrganizationIdentity, strip_identifier_prefix};
pub use output::{Delta, ResearchOutput, word_count};
pub use registry::Registry;
pub use ror::RorOrganization;
pub use source::{Affiliation, Agent, Contributor, Enrichment, SourceRecord};
