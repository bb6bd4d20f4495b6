//! Research Output Aggregator
//!
//! Finds the research outputs (datasets) attributable to one organization
//! across DataCite, OpenAIRE and OpenAlex, and merges them into one record
//! per DOI.
//!
//! # Features
//!
//! - **Affiliation matching**: ROR id equality or name patterns (`*`, `?` globs)
//!   over publishers, creators, contributors and funders
//! - **DOI normalization**: resolver URLs, vendor URLs and free text
//! - **Monotonic merge**: flags never revert, first known value wins
//! - **Concurrent retrieval**: every registry paginated in parallel, with retries
//!
//! The core ([`resolve()`]) is synchronous and works on in-memory JSON, so it
//! can be used without any network access.
//!
//! # Example
//!
//! ```no_run
//! use roagg::{Aggregator, Config, RegistryClient, models::Registry};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RegistryClient::new(Config::from_env()?)?;
//!     let aggregator = Aggregator::new(client);
//!
//!     let names = vec!["Lund University".to_string()];
//!     let identity = aggregator.identity(&names, Some("https://ror.org/012a77v79")).await?;
//!     let resolution = aggregator.run(&identity, &Registry::ALL).await?;
//!     println!("{} outputs", resolution.records.len());
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
pub mod doi;
pub mod error;
pub mod formatters;
pub mod matching;
pub mod merge;
pub mod models;
pub mod query;
pub mod resolve;
pub mod sources;

pub use aggregator::Aggregator;
pub use client::RegistryClient;
pub use config::Config;
pub use error::{AggregateError, ClientError};
pub use resolve::{RegistryBatch, resolve};
