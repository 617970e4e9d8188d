// src/core/probe/mod.rs

// Public interface for the `probe` module. Each sub-module is one
// self-contained network check: it takes the target URL (plus an injected
// client where needed), never panics or returns an error past its boundary,
// and maps every failure into its result struct.
pub mod agent;
pub mod cors;
pub mod dmarc;
pub mod exposure;
pub mod headers;
pub mod tls;

use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Timeout for the single-request probes (headers, CORS, TLS, DNS).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-path timeout for the exposure sweeps.
pub const SWEEP_TIMEOUT: Duration = Duration::from_secs(3);

/// Body and content type of a successfully fetched candidate path.
pub(crate) struct PathResponse {
    pub content_type: String,
    pub body: String,
}

/// Fetches one candidate path for an exposure sweep. Returns `None` for
/// anything other than a readable 200 response; failures are isolated per
/// path and never abort the sweep.
pub(crate) async fn fetch_path(client: &reqwest::Client, url: Url) -> Option<PathResponse> {
    let response = match client.get(url.clone()).timeout(SWEEP_TIMEOUT).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!(url = %url, error = %e, "Path request failed, skipping.");
            return None;
        }
    };

    if response.status() != StatusCode::OK {
        debug!(url = %url, status = %response.status(), "Non-200 response, not a finding.");
        return None;
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match response.text().await {
        Ok(body) => Some(PathResponse { content_type, body }),
        Err(e) => {
            debug!(url = %url, error = %e, "Failed to read path response body.");
            None
        }
    }
}
