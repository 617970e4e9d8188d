// src/core/probe/cors.rs

use crate::core::models::CorsProbeResult;
use crate::core::probe::PROBE_TIMEOUT;
use reqwest::Method;
use tracing::{info, warn};
use url::Url;

/// Origin injected into the preflight request. The policy is over-permissive
/// iff the server reflects this origin back or answers with a wildcard.
pub const TEST_ORIGIN: &str = "https://evil-untrusted-site.com";

/// Sends one preflight-style OPTIONS request with a forged Origin (no
/// redirects followed) and inspects `Access-Control-Allow-Origin`. Fail-open:
/// a network failure records the error but is never reported as a finding.
pub async fn run(client: &reqwest::Client, target: &Url) -> CorsProbeResult {
    info!(target = %target, "Starting CORS probe.");

    let response = match client
        .request(Method::OPTIONS, target.clone())
        .header("Origin", TEST_ORIGIN)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            warn!(target = %target, error = %e, "CORS probe request failed.");
            return CorsProbeResult {
                vulnerable: false,
                allowed_origin: None,
                detail: "CORS check could not be completed.".to_string(),
                error: Some(format!("HTTP request failed: {}", e)),
            };
        }
    };

    let allowed_origin = response
        .headers()
        .get("access-control-allow-origin")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let result = match allowed_origin {
        Some(origin) if origin == "*" || origin == TEST_ORIGIN => CorsProbeResult {
            vulnerable: true,
            allowed_origin: Some(origin),
            detail: "CORS policy is overly permissive, allowing any origin.".to_string(),
            error: None,
        },
        Some(origin) => CorsProbeResult {
            vulnerable: false,
            allowed_origin: Some(origin),
            detail: "CORS policy restricts origin correctly.".to_string(),
            error: None,
        },
        None => CorsProbeResult {
            vulnerable: false,
            allowed_origin: None,
            detail: "No CORS policy detected.".to_string(),
            error: None,
        },
    };

    info!(vulnerable = result.vulnerable, "CORS probe finished.");
    result
}
