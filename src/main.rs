// src/main.rs

use color_eyre::eyre::{Result, bail, eyre};
use url::Url;

mod core;
mod logging;

use crate::core::orchestrator::Orchestrator;
use crate::core::store::{JsonFileStore, ReportStore};
use crate::core::summary::{Summarizer, TemplateSummarizer};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let raw_input = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: aegis-scan <url>"))?;
    let target = parse_target(&raw_input)?;

    let orchestrator = Orchestrator::new()?;
    let mut report = orchestrator.scan(&target).await;
    report.summary = TemplateSummarizer.summarize(report.score, report.grade, &report.issues);

    // A scan that cannot be persisted must fail loudly; the caller could
    // otherwise never retrieve a report it believes was stored.
    let store = JsonFileStore::at_default_location();
    let id = store.save(&report)?;
    report.id = Some(id);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Normalizes user input into a scannable target URL: a bare domain gets an
/// https scheme, and only http/https targets with a hostname are accepted.
fn parse_target(raw: &str) -> Result<Url> {
    let with_scheme = if !raw.starts_with("http://") && !raw.starts_with("https://") {
        format!("https://{}", raw)
    } else {
        raw.to_string()
    };

    let target = Url::parse(&with_scheme)?;
    if !matches!(target.scheme(), "http" | "https") {
        bail!("unsupported scheme: {}", target.scheme());
    }
    if target.host_str().is_none() {
        bail!("target has no hostname: {}", raw);
    }
    Ok(target)
}
