mod report;
mod scan;
mod source;
mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use report::Reporter;
use scan::{scan_package, VendoredImportPatterns};
use source::{aws::AwsSource, fixtures::FixtureSource, FunctionSource};
use types::{FunctionInfo, ScanResult};

/// Find Lambda functions whose deployment packages still import
/// botocore's vendored requests.
#[derive(Parser, Debug)]
#[command(name = "vendored-scan", version, about)]
struct Cli {
    /// AWS region to scan (defaults to the ambient SDK region)
    #[arg(long)]
    region: Option<String>,

    /// Shared-config profile to use for credentials
    #[arg(long)]
    profile: Option<String>,

    /// Alternate Lambda endpoint, e.g. a LocalStack instance
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Replace the built-in heuristic patterns (repeatable)
    #[arg(long = "pattern", value_name = "REGEX")]
    patterns: Vec<String>,

    /// How many functions to fetch and scan at once
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Scan a local fixture directory instead of an AWS account
    #[arg(long, value_name = "DIR")]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let patterns = if cli.patterns.is_empty() {
        VendoredImportPatterns::builtin()?
    } else {
        VendoredImportPatterns::custom(&cli.patterns)?
    };

    let source: Arc<dyn FunctionSource> = match cli.fixtures {
        Some(dir) => Arc::new(FixtureSource::new(dir)),
        None => Arc::new(AwsSource::connect(cli.region, cli.profile, cli.endpoint_url).await?),
    };

    let functions = source
        .list_python_functions()
        .await
        .context("could not list Lambda functions")?;
    tracing::info!(
        source = source.name(),
        count = functions.len(),
        "python functions to scan"
    );

    let mut reporter = Reporter::stdout();
    let mut results = futures::stream::iter(functions)
        .map(|function| {
            let source = &source;
            let patterns = &patterns;
            async move { scan_one(source.as_ref(), patterns, function).await }
        })
        .buffered(cli.concurrency.max(1));
    while let Some(result) = results.next().await {
        reporter.report(&result);
    }
    reporter.finish();

    if !reporter.all_clean() {
        std::process::exit(1);
    }
    Ok(())
}

async fn scan_one(
    source: &dyn FunctionSource,
    patterns: &VendoredImportPatterns,
    function: FunctionInfo,
) -> ScanResult {
    match source.fetch_package(&function).await {
        Ok(package) => scan_package(&package, patterns),
        Err(err) => ScanResult::failed(&function.name, format!("{err:#}")),
    }
}
