// src/core/probe/dmarc.rs

use crate::core::models::DmarcProbeResult;
use hickory_resolver::TokioAsyncResolver;
use tracing::{debug, info, warn};
use url::Url;

/// Looks up the `_dmarc` TXT record for the target's root domain. Positive
/// iff any answer contains the `v=DMARC1` marker; lookup failures are
/// recorded, never propagated.
pub async fn run(resolver: &TokioAsyncResolver, target: &Url) -> DmarcProbeResult {
    let Some(host) = target.host_str() else {
        return DmarcProbeResult {
            has_dmarc: false,
            record: None,
            error: Some("Invalid hostname".to_string()),
        };
    };

    let dmarc_target = format!("_dmarc.{}", root_domain(host));
    info!(target = %dmarc_target, "Starting DMARC probe.");

    match resolver.txt_lookup(dmarc_target.clone()).await {
        Ok(txt_records) => {
            for record in txt_records.iter() {
                let record_str = record.to_string();
                if record_str.contains("v=DMARC1") {
                    debug!(record = %record_str, "DMARC record found.");
                    return DmarcProbeResult {
                        has_dmarc: true,
                        record: Some(record_str),
                        error: None,
                    };
                }
            }
            debug!(target = %dmarc_target, "TXT records present but none carry v=DMARC1.");
            DmarcProbeResult {
                has_dmarc: false,
                record: None,
                error: Some("No DMARC record found".to_string()),
            }
        }
        Err(e) => {
            warn!(target = %dmarc_target, error = %e, "DMARC lookup failed.");
            DmarcProbeResult {
                has_dmarc: false,
                record: None,
                error: Some(format!("DNS Error: {}", e)),
            }
        }
    }
}

/// Keeps the last two dot-separated labels of the hostname. Simplified on
/// purpose: multi-part public suffixes like `.co.uk` are not special-cased.
pub fn root_domain(hostname: &str) -> String {
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        hostname.to_string()
    }
}
