//! Research Output Aggregator - Entry Point
//!
//! Writes one row per research output of an organization to stdout or a file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roagg::aggregator::{parse_name_lines, validate_ror};
use roagg::formatters::{self, OutputFormat};
use roagg::models::Registry;
use roagg::{Aggregator, Config, RegistryClient};

#[derive(Parser, Debug)]
#[command(name = "roagg")]
#[command(about = "Aggregate research outputs for an organization across DataCite, OpenAIRE and OpenAlex")]
#[command(version)]
struct Cli {
    /// Name variant of the organization (repeatable, `*` and `?` wildcards allowed)
    #[arg(long = "name")]
    names: Vec<String>,

    /// Text file with name variants, one per line
    #[arg(long)]
    name_txt: Option<PathBuf>,

    /// ROR ID of the organization (must start with https://ror.org/)
    #[arg(long, value_parser = parse_ror)]
    ror: Option<String>,

    /// Registries to query, in order; the first is the primary
    #[arg(long = "registry", value_delimiter = ',', default_values_t = Registry::ALL)]
    registries: Vec<Registry>,

    /// Output file (stdout when absent)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Contact address for the OpenAlex polite pool
    #[arg(long, env = "ROAGG_MAILTO")]
    mailto: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn parse_ror(value: &str) -> Result<String, String> {
    validate_ror(value).map_err(|e| e.to_user_message())
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        registries = ?cli.registries,
        "Starting research output aggregation"
    );

    let mut names = cli.names.clone();
    if let Some(path) = &cli.name_txt {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read names file {}", path.display()))?;
        names.extend(parse_name_lines(&text));
    }

    let mut config = Config::from_env()?;
    if cli.mailto.is_some() {
        config.mailto.clone_from(&cli.mailto);
    }
    let client = RegistryClient::new(config)?;
    let aggregator = Aggregator::new(client);

    let identity = aggregator
        .identity(&names, cli.ror.as_deref())
        .await
        .map_err(|e| anyhow::anyhow!(e.to_user_message()))?;

    let resolution = aggregator
        .run(&identity, &cli.registries)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_user_message()))?;

    let rendered = formatters::render(cli.format, &resolution)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                records = resolution.records.len(),
                "Wrote output"
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
