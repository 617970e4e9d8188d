// src/core/probe/headers.rs

use crate::core::models::{HeaderCheck, HeaderProbeResult, SecurityHeaders};
use crate::core::probe::PROBE_TIMEOUT;
use reqwest::header::HeaderMap;
use tracing::{debug, info, warn};
use url::Url;

/// Fetches the target once (redirects followed) and records presence and raw
/// value of the four security headers. A failed request yields
/// `success: false` with no header data; the orchestrator skips the header
/// rules entirely in that case.
pub async fn run(client: &reqwest::Client, target: &Url) -> HeaderProbeResult {
    info!(target = %target, "Starting header probe.");

    match client
        .get(target.clone())
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
    {
        Ok(response) => {
            info!(status = %response.status(), "Received HTTP response for header probe.");
            let headers = response.headers();
            HeaderProbeResult {
                success: true,
                headers: Some(SecurityHeaders {
                    csp: check_header(headers, "content-security-policy"),
                    hsts: check_header(headers, "strict-transport-security"),
                    x_frame_options: check_header(headers, "x-frame-options"),
                    x_content_type_options: check_header(headers, "x-content-type-options"),
                }),
                error: None,
            }
        }
        Err(e) => {
            warn!(target = %target, error = %e, "Header probe request failed.");
            HeaderProbeResult {
                success: false,
                headers: None,
                error: Some(format!("HTTP request failed: {}", e)),
            }
        }
    }
}

/// Looks a header up by name (reqwest matches case-insensitively) and
/// captures its raw value. Non-UTF-8 values still count as present.
fn check_header(headers: &HeaderMap, name: &str) -> HeaderCheck {
    match headers.get(name) {
        Some(value) => match value.to_str() {
            Ok(s) => {
                debug!(header_name = name, value = s, "Header found.");
                HeaderCheck {
                    present: true,
                    value: Some(s.to_string()),
                }
            }
            Err(_) => {
                warn!(header_name = name, "Header found but contained invalid UTF-8.");
                HeaderCheck {
                    present: true,
                    value: Some("[Invalid UTF-8]".to_string()),
                }
            }
        },
        None => {
            debug!(header_name = name, "Header not found.");
            HeaderCheck {
                present: false,
                value: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    #[test]
    fn present_header_keeps_raw_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("SAMEORIGIN"),
        );
        let check = check_header(&headers, "x-frame-options");
        assert!(check.present);
        assert_eq!(check.value.as_deref(), Some("SAMEORIGIN"));
    }

    #[test]
    fn absent_header_is_not_present() {
        let headers = HeaderMap::new();
        let check = check_header(&headers, "content-security-policy");
        assert!(!check.present);
        assert!(check.value.is_none());
    }
}
